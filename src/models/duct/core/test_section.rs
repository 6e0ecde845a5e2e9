use uom::si::{
    f64::{Area, Length},
    length::meter,
};

use crate::support::{gas_dynamics::Isentropic, thermo::PerfectGas};

use super::{
    error::{DuctError, check_positive},
    field::{FlowRatios, Inflow, LocalFlow},
    geometry::WallPoint,
};

/// A constant-area test section downstream of the nozzle.
///
/// The flow is uniform and equal to whatever the nozzle delivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestSection {
    area: Area,
    length: Length,
    span: Length,
}

impl TestSection {
    /// Creates a test section.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless every dimension is strictly positive.
    pub fn new(area: Area, length: Length, span: Length) -> Result<Self, DuctError> {
        Ok(Self {
            area: check_positive("test-section area", area)?,
            length: check_positive("test-section length", length)?,
            span: check_positive("span", span)?,
        })
    }

    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }

    #[must_use]
    pub fn length(&self) -> Length {
        self.length
    }

    #[must_use]
    pub fn half_height(&self) -> Length {
        self.area / self.span / 2.0
    }

    /// Upper wall at the inlet and exit planes, in local coordinates.
    #[must_use]
    pub fn breakpoints(&self) -> [WallPoint; 2] {
        let y = self.half_height();
        [
            WallPoint {
                x: Length::new::<meter>(0.0),
                y,
            },
            WallPoint { x: self.length, y },
        ]
    }

    pub(super) fn ratios(
        &self,
        x: Length,
        inflow: &Inflow,
        isentropic: &Isentropic,
    ) -> Result<FlowRatios, DuctError> {
        self.check_position(x)?;
        Ok(FlowRatios {
            mach: inflow.mach,
            pressure: isentropic.pressure_ratio(inflow.mach),
            temperature: isentropic.temperature_ratio(inflow.mach),
        })
    }

    pub(super) fn local(
        &self,
        x: Length,
        inflow: &Inflow,
        isentropic: &Isentropic,
        gas: &PerfectGas,
    ) -> Result<LocalFlow, DuctError> {
        let ratios = self.ratios(x, inflow, isentropic)?;
        Ok(inflow
            .stagnation()
            .local(x, self.area, self.half_height(), ratios, gas))
    }

    fn check_position(&self, x: Length) -> Result<(), DuctError> {
        if x.get::<meter>() >= 0.0 && x <= self.length {
            Ok(())
        } else {
            Err(DuctError::OutOfRange {
                position: x,
                length: self.length,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{Pressure, ThermodynamicTemperature},
        pressure::pascal,
        thermodynamic_temperature::kelvin,
    };

    use crate::models::duct::core::test_support::{m, m2};

    fn inflow(mach: f64) -> Inflow {
        Inflow {
            mach,
            critical_area: m2(0.1),
            total_pressure: Pressure::new::<pascal>(1.0e6),
            total_temperature: ThermodynamicTemperature::new::<kelvin>(300.0),
        }
    }

    #[test]
    fn flow_is_uniform() -> Result<(), DuctError> {
        let gas = PerfectGas::air();
        let isentropic = Isentropic::new(&gas);
        let section = TestSection::new(m2(0.24), m(4.0), m(1.0))?;
        let inflow = inflow(2.4);

        let inlet = section.local(m(0.0), &inflow, &isentropic, &gas)?;
        let exit = section.local(m(4.0), &inflow, &isentropic, &gas)?;
        assert_eq!(inlet.mach, exit.mach);
        assert_eq!(inlet.pressure, exit.pressure);
        assert_relative_eq!(exit.temperature.get::<kelvin>(), 300.0 / 2.152, max_relative = 1e-12);
        assert_relative_eq!(exit.half_height.get::<meter>(), 0.12);
        Ok(())
    }

    #[test]
    fn positions_outside_are_rejected() {
        let isentropic = Isentropic::new(&PerfectGas::air());
        let section = TestSection::new(m2(0.24), m(4.0), m(1.0)).unwrap();
        assert!(matches!(
            section.ratios(m(4.5), &inflow(0.5), &isentropic),
            Err(DuctError::OutOfRange { .. })
        ));
    }

    #[test]
    fn zero_length_is_invalid() {
        let err = TestSection::new(m2(0.24), m(0.0), m(1.0)).unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}
