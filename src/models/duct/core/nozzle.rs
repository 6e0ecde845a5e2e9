//! The converging-diverging nozzle of a supersonic wind tunnel.

use std::cell::Cell;

use log::debug;
use uom::si::{
    area::square_meter,
    f64::{Area, Length, MassDensity, MassRate, Pressure, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    pressure::pascal,
    ratio::ratio,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{Constrained, ConstraintError, GreaterThanOne},
    gas_dynamics::{Branch, Isentropic, NormalShock},
    thermo::PerfectGas,
};

use super::{
    config::DuctConfig,
    error::{DuctError, check_positive},
    field::{
        FieldSolver, FlowField, FlowRatios, Inflow, LocalFlow, NormalShockLocation, Stagnation,
    },
    geometry::{SegmentGeometry, Side, WallPoint, closed_outline},
    regime::{Thresholds, WorkingCondition},
};

/// Design parameters and initial boundary conditions for a [`Nozzle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NozzleDesign {
    /// Mach number in the test section at the design condition.
    pub design_mach: f64,
    /// Nozzle exit area, equal to the test-section area.
    pub test_section_area: Area,
    /// Reservoir total pressure.
    pub total_pressure: Pressure,
    /// Reservoir total temperature.
    pub total_temperature: ThermodynamicTemperature,
    pub inlet_area: Area,
    pub convergent_length: Length,
    pub divergent_length: Length,
    /// Depth of the two-dimensional duct, normal to the plane of the wall contour.
    pub span: Length,
    pub back_pressure: Pressure,
}

/// Reservoir and back-pressure conditions driving a nozzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryConditions {
    pub total_pressure: Pressure,
    pub total_temperature: ThermodynamicTemperature,
    pub back_pressure: Pressure,
}

impl BoundaryConditions {
    /// Creates validated boundary conditions.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless every value is strictly positive.
    pub fn new(
        total_pressure: Pressure,
        total_temperature: ThermodynamicTemperature,
        back_pressure: Pressure,
    ) -> Result<Self, DuctError> {
        Ok(Self {
            total_pressure: check_positive("total pressure", total_pressure)?,
            total_temperature: check_temperature(total_temperature)?,
            back_pressure: check_positive("back pressure", back_pressure)?,
        })
    }

    /// Back pressure over reservoir total pressure, `p_b/p₀`.
    #[must_use]
    pub fn pressure_ratio(&self) -> f64 {
        (self.back_pressure / self.total_pressure).get::<ratio>()
    }

    fn stagnation(&self) -> Stagnation {
        Stagnation {
            pressure: self.total_pressure,
            temperature: self.total_temperature,
        }
    }
}

/// A working condition together with the flow it produces.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Resolved {
    condition: WorkingCondition,
    field: FlowField,
}

/// A converging-diverging nozzle fed from a reservoir.
///
/// The throat is sized so that shock-free expansion reaches the design Mach
/// number at the exit. Changing the boundary conditions never changes the
/// geometry; it only changes the working condition, which is classified
/// lazily on the next query and cached until the next change.
///
/// All axial positions are measured from the nozzle inlet.
#[derive(Debug, Clone)]
pub struct Nozzle {
    geometry: SegmentGeometry,
    design_mach: Constrained<f64, GreaterThanOne>,
    conditions: BoundaryConditions,
    gas: PerfectGas,
    config: DuctConfig,
    resolved: Cell<Option<Resolved>>,
}

impl Nozzle {
    /// Builds an air nozzle.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] if the design Mach number is not
    /// supersonic, any dimension or boundary condition is not strictly positive,
    /// or the inlet is no larger than the throat.
    pub fn new(design: NozzleDesign) -> Result<Self, DuctError> {
        Self::with_gas(design, PerfectGas::air())
    }

    /// Builds a nozzle for an arbitrary perfect gas.
    ///
    /// # Errors
    ///
    /// See [`Nozzle::new`].
    pub fn with_gas(design: NozzleDesign, gas: PerfectGas) -> Result<Self, DuctError> {
        let design_mach = GreaterThanOne::new(design.design_mach).map_err(|source| {
            DuctError::InvalidParameter {
                parameter: "design Mach number",
                source,
            }
        })?;
        let test_section_area = check_positive("test-section area", design.test_section_area)?;

        let config = DuctConfig::default();
        let throat_area =
            test_section_area / config.isentropic(&gas).area_ratio(design_mach.into_inner());
        if design.inlet_area <= throat_area {
            return Err(DuctError::InvalidParameter {
                parameter: "inlet area",
                source: ConstraintError::BelowMinimum,
            });
        }

        let geometry = SegmentGeometry::new(
            design.inlet_area,
            throat_area,
            test_section_area,
            design.convergent_length,
            design.divergent_length,
            design.span,
        )?;
        let conditions = BoundaryConditions::new(
            design.total_pressure,
            design.total_temperature,
            design.back_pressure,
        )?;

        Ok(Self {
            geometry,
            design_mach,
            conditions,
            gas,
            config,
            resolved: Cell::new(None),
        })
    }

    /// Replaces the numerical settings.
    #[must_use]
    pub fn with_config(mut self, config: DuctConfig) -> Self {
        self.config = config;
        self.resolved = Cell::new(None);
        self
    }

    #[must_use]
    pub fn geometry(&self) -> &SegmentGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn design_mach(&self) -> f64 {
        self.design_mach.into_inner()
    }

    #[must_use]
    pub fn boundary_conditions(&self) -> BoundaryConditions {
        self.conditions
    }

    #[must_use]
    pub fn gas(&self) -> &PerfectGas {
        &self.gas
    }

    #[must_use]
    pub fn config(&self) -> &DuctConfig {
        &self.config
    }

    #[must_use]
    pub fn throat_area(&self) -> Area {
        self.geometry.throat_area()
    }

    #[must_use]
    pub fn test_section_area(&self) -> Area {
        self.geometry.exit_area()
    }

    #[must_use]
    pub fn total_length(&self) -> Length {
        self.geometry.length()
    }

    /// Larger of the inlet and exit areas.
    #[must_use]
    pub fn max_area(&self) -> Area {
        self.geometry.max_area()
    }

    #[must_use]
    pub fn max_half_height(&self) -> Length {
        self.geometry.half_height_of(self.max_area())
    }

    /// Closed wall outline: inlet, throat, and exit on the upper wall, then
    /// back along the lower wall.
    #[must_use]
    pub fn wall_shape(&self) -> Vec<WallPoint> {
        closed_outline(&self.geometry.breakpoints())
    }

    /// Sets the back pressure.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless the pressure is strictly positive.
    pub fn set_back_pressure(&mut self, back_pressure: Pressure) -> Result<(), DuctError> {
        self.conditions.back_pressure = check_positive("back pressure", back_pressure)?;
        self.invalidate();
        Ok(())
    }

    /// Sets the reservoir total pressure.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless the pressure is strictly positive.
    pub fn set_inlet_total_pressure(&mut self, total_pressure: Pressure) -> Result<(), DuctError> {
        self.conditions.total_pressure = check_positive("total pressure", total_pressure)?;
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
        self.conditions.total_temperature = check_temperature(total_temperature)?;
        self.invalidate();
        Ok(())
    }

    /// Regime thresholds for this nozzle's area ratio.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::RootFinding`] if a threshold cannot be computed.
    pub fn thresholds(&self) -> Result<Thresholds, DuctError> {
        let area_ratio = (self.geometry.exit_area() / self.geometry.throat_area()).get::<ratio>();
        Thresholds::new(
            self.design_mach(),
            area_ratio,
            &self.isentropic(),
            &self.normal_shock(),
        )
    }

    /// Working condition under the current boundary conditions.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if the condition or its flow field cannot be resolved.
    pub fn working_condition(&self) -> Result<WorkingCondition, DuctError> {
        Ok(self.resolve()?.condition)
    }

    /// Resolved flow field under the current boundary conditions.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if the condition or its flow field cannot be resolved.
    pub fn flow_field(&self) -> Result<FlowField, DuctError> {
        Ok(self.resolve()?.field)
    }

    /// The normal shock inside the nozzle, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if the flow field cannot be resolved.
    pub fn shock(&self) -> Result<Option<NormalShockLocation>, DuctError> {
        Ok(self.flow_field()?.shock())
    }

    /// Flow delivered to the test section.
    ///
    /// A shock standing at the exit plane is considered crossed.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if the flow field cannot be resolved.
    pub fn outflow(&self) -> Result<Inflow, DuctError> {
        self.flow_field()?
            .outflow(&self.geometry, self.conditions.stagnation(), &self.isentropic())
    }

    /// Mass flow rate, `ṁ = p₀·A*·√(γ/(R·T₀))·(2/(γ+1))^((γ+1)/(2(γ−1)))`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if the flow field cannot be resolved.
    pub fn mass_flow_rate(&self) -> Result<MassRate, DuctError> {
        let critical_area = self.flow_field()?.critical_area();

        let g = self.gas.gamma();
        let r = self.gas.gas_constant().get::<joule_per_kilogram_kelvin>();
        let t0 = self.conditions.total_temperature.get::<kelvin>();
        let flux_factor =
            (g / (r * t0)).sqrt() * (2.0 / (g + 1.0)).powf((g + 1.0) / (2.0 * (g - 1.0)));

        Ok(MassRate::new::<kilogram_per_second>(
            self.conditions.total_pressure.get::<pascal>()
                * critical_area.get::<square_meter>()
                * flux_factor,
        ))
    }

    /// Axial position where the wall has the given area.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::RootFinding`] if the area does not occur on that side.
    pub fn position_from_area(&self, area: Area, side: Side) -> Result<Length, DuctError> {
        self.geometry.position_from_area(area, side, &self.config.solver)
    }

    /// Cross-sectional area at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::OutOfRange`] if `x` is outside the nozzle.
    pub fn x_to_area(&self, x: Length) -> Result<Area, DuctError> {
        self.geometry.area(x)
    }

    /// Wall half-height at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::OutOfRange`] if `x` is outside the nozzle.
    pub fn x_to_half_height(&self, x: Length) -> Result<Length, DuctError> {
        self.geometry.half_height(x)
    }

    /// Mach number at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the nozzle or the flow cannot be resolved.
    pub fn x_to_mach(&self, x: Length) -> Result<f64, DuctError> {
        Ok(self.ratios(x)?.mach)
    }

    /// Static pressure ratio `p/p₀` at `x`, referenced to the reservoir.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the nozzle or the flow cannot be resolved.
    pub fn x_to_pressure_ratio(&self, x: Length) -> Result<f64, DuctError> {
        Ok(self.ratios(x)?.pressure)
    }

    /// Static temperature ratio `T/T₀` at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the nozzle or the flow cannot be resolved.
    pub fn x_to_temperature_ratio(&self, x: Length) -> Result<f64, DuctError> {
        Ok(self.ratios(x)?.temperature)
    }

    /// Density ratio `ρ/ρ₀` at `x`, referenced to the reservoir.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the nozzle or the flow cannot be resolved.
    pub fn x_to_density_ratio(&self, x: Length) -> Result<f64, DuctError> {
        Ok(self.ratios(x)?.density())
    }

    /// Static pressure at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the nozzle or the flow cannot be resolved.
    pub fn x_to_pressure(&self, x: Length) -> Result<Pressure, DuctError> {
        Ok(self.x_to_state(x)?.pressure)
    }

    /// Static temperature at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the nozzle or the flow cannot be resolved.
    pub fn x_to_temperature(&self, x: Length) -> Result<ThermodynamicTemperature, DuctError> {
        Ok(self.x_to_state(x)?.temperature)
    }

    /// Density at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the nozzle or the flow cannot be resolved.
    pub fn x_to_density(&self, x: Length) -> Result<MassDensity, DuctError> {
        Ok(self.x_to_state(x)?.density)
    }

    /// All flow properties at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError`] if `x` is outside the nozzle or the flow cannot be resolved.
    pub fn x_to_state(&self, x: Length) -> Result<LocalFlow, DuctError> {
        self.flow_field()?.local(
            &self.geometry,
            x,
            self.conditions.stagnation(),
            &self.isentropic(),
            &self.gas,
        )
    }

    pub(super) fn ratios(&self, x: Length) -> Result<FlowRatios, DuctError> {
        self.flow_field()?.ratios(&self.geometry, x, &self.isentropic())
    }

    pub(super) fn isentropic(&self) -> Isentropic {
        self.config.isentropic(&self.gas)
    }

    pub(super) fn normal_shock(&self) -> NormalShock {
        self.config.normal_shock(&self.gas)
    }

    fn invalidate(&mut self) {
        self.resolved.set(None);
    }

    fn resolve(&self) -> Result<Resolved, DuctError> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }

        let pressure_ratio = self.conditions.pressure_ratio();
        let condition = self
            .thresholds()?
            .classify(pressure_ratio, self.config.pressure_ratio_tol)?;
        debug!("nozzle at p_b/p0 = {pressure_ratio:.6}: {condition}");

        let isentropic = self.isentropic();
        let normal_shock = self.normal_shock();
        let field = FieldSolver {
            geometry: &self.geometry,
            critical_area: self.geometry.throat_area(),
            design_mach: self.design_mach(),
            convergent: Branch::Subsonic,
            isentropic: &isentropic,
            normal_shock: &normal_shock,
            solver: &self.config.solver,
        }
        .resolve(condition, pressure_ratio)?;

        let resolved = Resolved { condition, field };
        self.resolved.set(Some(resolved));
        Ok(resolved)
    }
}

fn check_temperature(
    temperature: ThermodynamicTemperature,
) -> Result<ThermodynamicTemperature, DuctError> {
    check_positive("total temperature", temperature.get::<kelvin>())?;
    Ok(temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{length::meter, pressure::megapascal};

    use crate::models::duct::core::test_support::{design, m};

    fn nozzle_at(back_pressure_mpa: f64) -> Nozzle {
        Nozzle::new(NozzleDesign {
            back_pressure: Pressure::new::<megapascal>(back_pressure_mpa),
            ..design()
        })
        .unwrap()
    }

    #[test]
    fn throat_is_sized_by_design_mach() {
        let nozzle = nozzle_at(0.7);
        assert_relative_eq!(
            nozzle.throat_area().get::<square_meter>(),
            0.099_871,
            max_relative = 1e-4
        );
        assert_relative_eq!(nozzle.total_length().get::<meter>(), 10.0);
        assert_relative_eq!(nozzle.max_area().get::<square_meter>(), 10.0);
        assert_relative_eq!(nozzle.max_half_height().get::<meter>(), 5.0);
    }

    #[test]
    fn high_back_pressure_is_subsonic_throughout() -> Result<(), DuctError> {
        let nozzle = nozzle_at(0.98);
        assert_eq!(nozzle.working_condition()?, WorkingCondition::SubsonicThroughout);

        for x in [0.0, 2.5, 5.0, 7.5, 10.0] {
            assert!(nozzle.x_to_mach(m(x))? < 1.0);
        }
        assert_relative_eq!(nozzle.x_to_pressure_ratio(m(10.0))?, 0.98, max_relative = 1e-9);
        assert!(nozzle.shock()?.is_none());
        Ok(())
    }

    #[test]
    fn shock_in_divergent_section() -> Result<(), DuctError> {
        let nozzle = nozzle_at(0.7);
        assert_eq!(nozzle.working_condition()?, WorkingCondition::ShockInDivergent);

        let shock = nozzle.shock()?.expect("shock in divergent section");
        assert_relative_eq!(shock.position.get::<meter>(), 7.0661, max_relative = 1e-4);
        assert_relative_eq!(shock.upstream_mach, 1.9195, max_relative = 1e-4);
        assert_relative_eq!(shock.downstream_mach, 0.591_86, max_relative = 1e-4);

        assert!(nozzle.x_to_mach(shock.position)? > 1.0);
        assert!(nozzle.x_to_mach(shock.position + m(1e-6))? < 1.0);
        assert_relative_eq!(nozzle.x_to_pressure_ratio(m(10.0))?, 0.7, max_relative = 1e-9);
        assert_relative_eq!(
            nozzle.x_to_pressure(m(10.0))?.get::<pascal>(),
            0.7e6,
            max_relative = 1e-9
        );
        Ok(())
    }

    #[test]
    fn shock_at_exit_and_supersonic_conditions() -> Result<(), DuctError> {
        let mut nozzle = nozzle_at(0.7);
        let thresholds = nozzle.thresholds()?;
        let p0 = Pressure::new::<megapascal>(1.0);
        let inside_band = 0.1 * nozzle.config().pressure_ratio_tol;

        nozzle.set_back_pressure(p0 * (thresholds.shock_at_exit - inside_band))?;
        assert_eq!(nozzle.working_condition()?, WorkingCondition::ShockAtExit);
        let shock = nozzle.shock()?.expect("shock at exit");
        assert_eq!(shock.position, nozzle.total_length());
        assert_relative_eq!(nozzle.x_to_mach(m(10.0))?, 2.4, max_relative = 1e-9);
        assert_relative_eq!(nozzle.outflow()?.mach, shock.downstream_mach, max_relative = 1e-9);

        nozzle.set_back_pressure(p0 * (thresholds.design - inside_band))?;
        assert_eq!(nozzle.working_condition()?, WorkingCondition::Design);
        assert_relative_eq!(
            nozzle.x_to_pressure_ratio(m(10.0))?,
            thresholds.design,
            max_relative = 1e-9
        );

        nozzle.set_back_pressure(Pressure::new::<megapascal>(0.2))?;
        assert_eq!(nozzle.working_condition()?, WorkingCondition::OverExpanded);

        nozzle.set_back_pressure(Pressure::new::<megapascal>(0.01))?;
        assert_eq!(nozzle.working_condition()?, WorkingCondition::UnderExpanded);
        assert_relative_eq!(nozzle.x_to_mach(m(10.0))?, 2.4, max_relative = 1e-9);
        assert!(nozzle.x_to_mach(m(2.0))? < 1.0);
        Ok(())
    }

    #[test]
    fn choked_limit_has_sonic_throat() -> Result<(), DuctError> {
        let mut nozzle = nozzle_at(0.7);
        let limit = nozzle.thresholds()?.limit - 0.1 * nozzle.config().pressure_ratio_tol;
        nozzle.set_back_pressure(Pressure::new::<megapascal>(limit))?;

        assert_eq!(nozzle.working_condition()?, WorkingCondition::ChokedSubsonic);
        assert_relative_eq!(nozzle.x_to_mach(m(5.0))?, 1.0);
        assert!(nozzle.x_to_mach(m(8.0))? < 1.0);
        Ok(())
    }

    #[test]
    fn mutators_invalidate_the_cached_regime() -> Result<(), DuctError> {
        let mut nozzle = nozzle_at(0.98);
        assert_eq!(nozzle.working_condition()?, WorkingCondition::SubsonicThroughout);

        nozzle.set_inlet_total_pressure(Pressure::new::<megapascal>(1.4))?;
        assert_eq!(nozzle.working_condition()?, WorkingCondition::ShockInDivergent);

        nozzle.set_inlet_total_pressure(Pressure::new::<megapascal>(1.0))?;
        nozzle.set_back_pressure(Pressure::new::<megapascal>(0.05))?;
        assert_eq!(nozzle.working_condition()?, WorkingCondition::UnderExpanded);
        Ok(())
    }

    #[test]
    fn temperature_scales_with_total_temperature() -> Result<(), DuctError> {
        let mut nozzle = nozzle_at(0.05);
        let before = nozzle.x_to_temperature(m(10.0))?.get::<kelvin>();

        nozzle.set_inlet_total_temperature(ThermodynamicTemperature::new::<kelvin>(600.0))?;
        let after = nozzle.x_to_temperature(m(10.0))?.get::<kelvin>();

        assert_relative_eq!(after, 2.0 * before, max_relative = 1e-12);
        assert_relative_eq!(
            nozzle.x_to_temperature_ratio(m(10.0))?,
            1.0 / 2.152,
            max_relative = 1e-9
        );
        Ok(())
    }

    #[test]
    fn repeated_queries_are_identical() -> Result<(), DuctError> {
        let nozzle = nozzle_at(0.7);
        for x in [0.0, 3.3, 7.2, 10.0] {
            let first = nozzle.x_to_state(m(x))?;
            let second = nozzle.x_to_state(m(x))?;
            assert_eq!(first, second);
        }
        Ok(())
    }

    #[test]
    fn density_follows_equation_of_state() -> Result<(), DuctError> {
        let nozzle = nozzle_at(0.7);
        let x = m(8.5);
        assert_relative_eq!(
            nozzle.x_to_density_ratio(x)?,
            nozzle.x_to_pressure_ratio(x)? / nozzle.x_to_temperature_ratio(x)?,
            max_relative = 1e-12
        );
        let state = nozzle.x_to_state(x)?;
        assert_eq!(nozzle.x_to_density(x)?, state.density);
        Ok(())
    }

    #[test]
    fn mass_flow_is_set_by_the_throat_once_choked() -> Result<(), DuctError> {
        let choked = nozzle_at(0.7).mass_flow_rate()?;
        assert_relative_eq!(choked.get::<kilogram_per_second>(), 233.05, max_relative = 1e-4);
        assert_eq!(nozzle_at(0.05).mass_flow_rate()?, choked);

        let unchoked = nozzle_at(0.98).mass_flow_rate()?;
        assert!(unchoked < choked);
        Ok(())
    }

    #[test]
    fn positions_outside_the_nozzle() {
        let nozzle = nozzle_at(0.7);
        for x in [-0.1, 10.1, f64::NAN] {
            assert!(matches!(
                nozzle.x_to_mach(m(x)),
                Err(DuctError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn invalid_designs_are_rejected() {
        let subsonic = Nozzle::new(NozzleDesign {
            design_mach: 0.9,
            ..design()
        })
        .unwrap_err();
        assert!(matches!(
            subsonic,
            DuctError::InvalidParameter {
                parameter: "design Mach number",
                ..
            }
        ));

        let tiny_inlet = Nozzle::new(NozzleDesign {
            inlet_area: Area::new::<square_meter>(0.05),
            ..design()
        })
        .unwrap_err();
        assert!(tiny_inlet.is_invalid_parameter());

        let mut nozzle = nozzle_at(0.7);
        assert!(nozzle.set_back_pressure(Pressure::new::<pascal>(0.0)).is_err());
        assert!(
            nozzle
                .set_inlet_total_temperature(ThermodynamicTemperature::new::<kelvin>(0.0))
                .is_err()
        );
    }

    #[test]
    fn other_gases_resize_the_throat() -> Result<(), DuctError> {
        use crate::support::thermo::fluid::Helium;

        let helium = PerfectGas::of::<Helium>().unwrap();
        let nozzle = Nozzle::with_gas(design(), helium)?;
        assert_relative_eq!(nozzle.gas().gamma(), 5.0 / 3.0, max_relative = 1e-3);
        assert!(nozzle.throat_area() > nozzle_at(0.7).throat_area());
        assert_relative_eq!(nozzle.x_to_mach(m(5.0))?, 1.0);
        Ok(())
    }

    #[test]
    fn wall_shape_and_area_lookup() -> Result<(), DuctError> {
        let nozzle = nozzle_at(0.7);
        let wall = nozzle.wall_shape();
        assert_eq!(wall.len(), 6);
        assert_relative_eq!(wall[0].y.get::<meter>(), 5.0);
        assert_relative_eq!(wall[2].y.get::<meter>(), 0.12);

        let x = nozzle.position_from_area(Area::new::<square_meter>(0.2), Side::Divergent)?;
        assert_relative_eq!(nozzle.x_to_area(x)?.get::<square_meter>(), 0.2, max_relative = 1e-9);
        assert_relative_eq!(nozzle.x_to_half_height(x)?.get::<meter>(), 0.1, max_relative = 1e-9);
        Ok(())
    }
}
