use std::cell::Cell;

use log::debug;
use uom::si::{
    f64::{Area, Length, MassDensity, Pressure, ThermodynamicTemperature},
    length::meter,
    ratio::ratio,
};

use super::{
    diffuser::{Diffuser, DiffuserCondition, DiffuserDesign, DiffuserFlow},
    error::DuctError,
    field::{FlowRatios, Inflow, LocalFlow},
    geometry::{WallPoint, closed_outline},
    nozzle::Nozzle,
    regime::WorkingCondition,
    test_section::TestSection,
};

/// The segment a global axial position falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Nozzle,
    TestSection,
    Diffuser,
}

/// A nozzle, optional test section, and optional diffuser on one axis.
///
/// Positions run from the nozzle inlet to the last segment's exit. A position
/// on a shared boundary belongs to the downstream segment. Pressure and
/// density ratios are referenced to the reservoir, so shock losses anywhere
/// upstream show up in them.
///
/// The test section carries the nozzle outflow unchanged, and the diffuser
/// is resolved against that outflow. Each is resolved on first use and cached
/// until a boundary condition changes. A diffuser that cannot be resolved
/// never affects queries upstream of it.
#[derive(Debug, Clone)]
pub struct CompositeDuct {
    nozzle: Nozzle,
    test_section: Option<TestSection>,
    diffuser: Option<Diffuser>,
    inflow: Cell<Option<Inflow>>,
    diffuser_flow: Cell<Option<DiffuserFlow>>,
}

impl CompositeDuct {
    #[must_use]
    pub fn new(nozzle: Nozzle) -> Self {
        Self {
            nozzle,
            test_section: None,
            diffuser: None,
            inflow: Cell::new(None),
            diffuser_flow: Cell::new(None),
        }
    }

    /// Adds a constant-area test section of the given length behind the nozzle.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless `length` is strictly positive.
    pub fn with_test_section(mut self, length: Length) -> Result<Self, DuctError> {
        self.test_section = Some(TestSection::new(
            self.nozzle.test_section_area(),
            length,
            self.nozzle.geometry().span(),
        )?);
        self.invalidate();
        Ok(self)
    }

    /// Adds a diffuser as the last segment.
    ///
    /// # Errors
    ///
    /// See [`Diffuser::new`].
    pub fn with_diffuser(mut self, design: DiffuserDesign) -> Result<Self, DuctError> {
        self.diffuser = Some(Diffuser::new(design, &self.nozzle)?);
        self.invalidate();
        Ok(self)
    }

    #[must_use]
    pub fn nozzle(&self) -> &Nozzle {
        &self.nozzle
    }

    #[must_use]
    pub fn test_section(&self) -> Option<&TestSection> {
        self.test_section.as_ref()
    }

    #[must_use]
    pub fn diffuser(&self) -> Option<&Diffuser> {
        self.diffuser.as_ref()
    }

    /// Sum of the segment lengths.
    #[must_use]
    pub fn total_length(&self) -> Length {
        self.segments()
            .fold(Length::new::<meter>(0.0), |total, segment| total + segment.length())
    }

    #[must_use]
    pub fn max_area(&self) -> Area {
        let nozzle = self.nozzle.max_area();
        match &self.diffuser {
            Some(diffuser) if diffuser.geometry().max_area() > nozzle => {
                diffuser.geometry().max_area()
            }
            _ => nozzle,
        }
    }

    #[must_use]
    pub fn max_half_height(&self) -> Length {
        self.nozzle.geometry().half_height_of(self.max_area())
    }

    /// Closed wall outline through every geometric breakpoint.
    ///
    /// Upper wall points run from the nozzle inlet to the last exit, followed
    /// by the lower wall in reverse.
    #[must_use]
    pub fn wall_shape(&self) -> Vec<WallPoint> {
        let mut upper = self.nozzle.geometry().breakpoints().to_vec();
        let mut offset = self.nozzle.total_length();

        if let Some(section) = &self.test_section {
            upper.extend(section.breakpoints().iter().skip(1).map(|point| WallPoint {
                x: point.x + offset,
                y: point.y,
            }));
            offset += section.length();
        }
        if let Some(diffuser) = &self.diffuser {
            upper.extend(
                diffuser
                    .geometry()
                    .breakpoints()
                    .iter()
                    .skip(1)
                    .map(|point| WallPoint {
                        x: point.x + offset,
                        y: point.y,
                    }),
            );
        }

        closed_outline(&upper)
    }

    /// Maps a global position to its segment and the position within it.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::OutOfRange`] if `x` is outside the duct.
    pub fn map_coordinate(&self, x: Length) -> Result<(SegmentKind, Length), DuctError> {
        let (segment, local) = self.locate(x)?;
        Ok((segment.kind(), local))
    }

    /// Working condition of the nozzle.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if the nozzle flow cannot be resolved.
    pub fn working_condition(&self) -> Result<WorkingCondition, DuctError> {
        self.nozzle.working_condition()
    }

    /// Working condition of the diffuser, if there is one.
    ///
    /// A choked diffuser reports [`DiffuserCondition::ChokedThroat`] here,
    /// while its flow queries fail with [`DuctError::ChokedDiffuser`].
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if the nozzle or diffuser flow cannot be resolved.
    pub fn diffuser_condition(&self) -> Result<Option<DiffuserCondition>, DuctError> {
        match &self.diffuser {
            Some(diffuser) => Ok(Some(self.diffuser_flow(diffuser)?.condition())),
            None => Ok(None),
        }
    }

    /// Sets the back pressure of the last converging-diverging segment.
    ///
    /// This is the diffuser when one is present and the nozzle otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless the pressure is strictly positive.
    pub fn set_back_pressure(&mut self, back_pressure: Pressure) -> Result<(), DuctError> {
        match &mut self.diffuser {
            Some(diffuser) => diffuser.set_back_pressure(back_pressure)?,
            None => self.nozzle.set_back_pressure(back_pressure)?,
        }
        self.invalidate();
        Ok(())
    }

    /// Sets the pressure the nozzle discharges against, even when a diffuser
    /// follows it.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless the pressure is strictly positive.
    pub fn set_nozzle_back_pressure(&mut self, back_pressure: Pressure) -> Result<(), DuctError> {
        self.nozzle.set_back_pressure(back_pressure)?;
        self.invalidate();
        Ok(())
    }

    /// Sets the reservoir total pressure.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless the pressure is strictly positive.
    pub fn set_inlet_total_pressure(&mut self, total_pressure: Pressure) -> Result<(), DuctError> {
        self.nozzle.set_inlet_total_pressure(total_pressure)?;
        self.invalidate();
        Ok(())
    }

    /// Sets the reservoir total temperature.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless the temperature is strictly positive.
    pub fn set_inlet_total_temperature(
        &mut self,
        total_temperature: ThermodynamicTemperature,
    ) -> Result<(), DuctError> {
        self.nozzle.set_inlet_total_temperature(total_temperature)?;
        self.invalidate();
        Ok(())
    }

    /// Cross-sectional area at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::OutOfRange`] if `x` is outside the duct.
    pub fn x_to_area(&self, x: Length) -> Result<Area, DuctError> {
        match self.locate(x)? {
            (Segment::Nozzle(nozzle), local) => nozzle.x_to_area(local),
            (Segment::TestSection(section), _) => Ok(section.area()),
            (Segment::Diffuser(diffuser), local) => diffuser.geometry().area(local),
        }
    }

    /// Wall half-height at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::OutOfRange`] if `x` is outside the duct.
    pub fn x_to_half_height(&self, x: Length) -> Result<Length, DuctError> {
        Ok(self.nozzle.geometry().half_height_of(self.x_to_area(x)?))
    }

    /// Mach number at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the duct or the flow cannot be resolved.
    pub fn x_to_mach(&self, x: Length) -> Result<f64, DuctError> {
        Ok(self.ratios(x)?.mach)
    }

    /// Static pressure over reservoir total pressure at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the duct or the flow cannot be resolved.
    pub fn x_to_pressure_ratio(&self, x: Length) -> Result<f64, DuctError> {
        Ok(self.ratios(x)?.pressure)
    }

    /// Static temperature over reservoir total temperature at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the duct or the flow cannot be resolved.
    pub fn x_to_temperature_ratio(&self, x: Length) -> Result<f64, DuctError> {
        Ok(self.ratios(x)?.temperature)
    }

    /// Density over reservoir stagnation density at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the duct or the flow cannot be resolved.
    pub fn x_to_density_ratio(&self, x: Length) -> Result<f64, DuctError> {
        Ok(self.ratios(x)?.density())
    }

    /// Static pressure at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the duct or the flow cannot be resolved.
    pub fn x_to_pressure(&self, x: Length) -> Result<Pressure, DuctError> {
        Ok(self.x_to_state(x)?.pressure)
    }

    /// Static temperature at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the duct or the flow cannot be resolved.
    pub fn x_to_temperature(&self, x: Length) -> Result<ThermodynamicTemperature, DuctError> {
        Ok(self.x_to_state(x)?.temperature)
    }

    /// Density at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the duct or the flow cannot be resolved.
    pub fn x_to_density(&self, x: Length) -> Result<MassDensity, DuctError> {
        Ok(self.x_to_state(x)?.density)
    }

    /// All flow properties at `x`, with `position` set to the global coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the duct or the flow cannot be resolved.
    pub fn x_to_state(&self, x: Length) -> Result<LocalFlow, DuctError> {
        let isentropic = self.nozzle.isentropic();
        let gas = self.nozzle.gas();

        let local = match self.locate(x)? {
            (Segment::Nozzle(nozzle), local) => return nozzle.x_to_state(local),
            (Segment::TestSection(section), local) => {
                section.local(local, &self.inflow()?, &isentropic, gas)?
            }
            (Segment::Diffuser(diffuser), local) => {
                let field = self.diffuser_flow(diffuser)?.field()?;
                field.local(
                    diffuser.geometry(),
                    local,
                    self.inflow()?.stagnation(),
                    &isentropic,
                    gas,
                )?
            }
        };

        Ok(LocalFlow {
            position: x,
            ..local
        })
    }

    fn ratios(&self, x: Length) -> Result<FlowRatios, DuctError> {
        let isentropic = self.nozzle.isentropic();

        let (ratios, inflow) = match self.locate(x)? {
            (Segment::Nozzle(nozzle), local) => return nozzle.ratios(local),
            (Segment::TestSection(section), local) => {
                let inflow = self.inflow()?;
                (section.ratios(local, &inflow, &isentropic)?, inflow)
            }
            (Segment::Diffuser(diffuser), local) => {
                let field = self.diffuser_flow(diffuser)?.field()?;
                (
                    field.ratios(diffuser.geometry(), local, &isentropic)?,
                    self.inflow()?,
                )
            }
        };

        // Downstream ratios are referenced to the total pressure entering the segment.
        let total_pressure_ratio = (inflow.total_pressure
            / self.nozzle.boundary_conditions().total_pressure)
            .get::<ratio>();
        Ok(FlowRatios {
            pressure: ratios.pressure * total_pressure_ratio,
            ..ratios
        })
    }

    fn segments(&self) -> impl Iterator<Item = Segment<'_>> {
        std::iter::once(Segment::Nozzle(&self.nozzle))
            .chain(self.test_section.as_ref().map(Segment::TestSection))
            .chain(self.diffuser.as_ref().map(Segment::Diffuser))
    }

    /// Finds the segment containing `x`; shared boundaries go downstream.
    fn locate(&self, x: Length) -> Result<(Segment<'_>, Length), DuctError> {
        let total = self.total_length();

        if x.get::<meter>() >= 0.0 && x <= total {
            let mut start = Length::new::<meter>(0.0);
            let mut segments = self.segments().peekable();
            while let Some(segment) = segments.next() {
                let length = segment.length();
                let end = start + length;
                if x < end || segments.peek().is_none() {
                    let local = x - start;
                    // Rounding in `start` can push the final position past the segment end.
                    return Ok((segment, if local > length { length } else { local }));
                }
                start = end;
            }
        }

        Err(DuctError::OutOfRange {
            position: x,
            length: total,
        })
    }

    fn invalidate(&mut self) {
        self.inflow.set(None);
        self.diffuser_flow.set(None);
    }

    /// Nozzle outflow entering the test section or diffuser.
    fn inflow(&self) -> Result<Inflow, DuctError> {
        if let Some(inflow) = self.inflow.get() {
            return Ok(inflow);
        }

        let inflow = self.nozzle.outflow()?;
        debug!(
            "downstream inflow: M = {:.6}, A* = {:?}",
            inflow.mach, inflow.critical_area
        );
        self.inflow.set(Some(inflow));
        Ok(inflow)
    }

    fn diffuser_flow(&self, diffuser: &Diffuser) -> Result<DiffuserFlow, DuctError> {
        if let Some(flow) = self.diffuser_flow.get() {
            return Ok(flow);
        }

        let flow = diffuser.resolve(
            &self.inflow()?,
            &self.nozzle.isentropic(),
            &self.nozzle.normal_shock(),
            self.nozzle.config(),
        )?;
        self.diffuser_flow.set(Some(flow));
        Ok(flow)
    }
}

/// A borrowed segment of a [`CompositeDuct`].
#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Nozzle(&'a Nozzle),
    TestSection(&'a TestSection),
    Diffuser(&'a Diffuser),
}

impl Segment<'_> {
    fn kind(self) -> SegmentKind {
        match self {
            Self::Nozzle(_) => SegmentKind::Nozzle,
            Self::TestSection(_) => SegmentKind::TestSection,
            Self::Diffuser(_) => SegmentKind::Diffuser,
        }
    }

    fn length(self) -> Length {
        match self {
            Self::Nozzle(nozzle) => nozzle.total_length(),
            Self::TestSection(section) => section.length(),
            Self::Diffuser(diffuser) => diffuser.geometry().length(),
        }
    }
}
