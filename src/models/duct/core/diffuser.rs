use std::fmt;

use log::debug;
use uom::si::{
    f64::{Area, Length, Pressure},
    ratio::ratio,
};

use crate::support::gas_dynamics::{Branch, Isentropic, NormalShock};

use super::{
    config::DuctConfig,
    error::{DuctError, check_positive},
    field::{FieldSolver, FlowField, Inflow},
    geometry::SegmentGeometry,
    nozzle::Nozzle,
    regime::{Thresholds, WorkingCondition},
};

/// Design parameters for a second-throat [`Diffuser`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffuserDesign {
    pub throat_area: Area,
    pub exit_area: Area,
    pub convergent_length: Length,
    pub divergent_length: Length,
    pub back_pressure: Pressure,
}

/// Operating regime of a diffuser, driven by the flow it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffuserCondition {
    /// Subsonic flow enters and stays subsonic, referenced to the incoming
    /// critical area.
    SubsonicInflow,

    /// Supersonic flow enters; the diffuser is classified like a nozzle whose
    /// critical area is that of the incoming flow.
    SupersonicInflow(WorkingCondition),

    /// Supersonic flow enters, but the back pressure needs a shock upstream of
    /// the diffuser throat. The shock stands at the inlet plane and the
    /// diffuser runs subsonic behind it.
    InletShock,

    /// The throat is smaller than the critical area of the subsonic flow it
    /// has to pass. The diffuser has no steady flow field.
    ChokedThroat,
}

impl fmt::Display for DiffuserCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubsonicInflow => f.write_str("subsonic inflow"),
            Self::SupersonicInflow(condition) => write!(f, "supersonic inflow, {condition}"),
            Self::InletShock => f.write_str("supersonic inflow, normal shock at inlet"),
            Self::ChokedThroat => f.write_str("choked throat"),
        }
    }
}

/// A classified diffuser and the flow through it, if one exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum DiffuserFlow {
    Flowing(DiffuserCondition, FlowField),
    Choked {
        throat_area: Area,
        critical_area: Area,
    },
}

impl DiffuserFlow {
    pub(super) fn condition(&self) -> DiffuserCondition {
        match *self {
            Self::Flowing(condition, _) => condition,
            Self::Choked { .. } => DiffuserCondition::ChokedThroat,
        }
    }

    /// # Errors
    ///
    /// Returns [`DuctError::ChokedDiffuser`] if the throat is choked.
    pub(super) fn field(&self) -> Result<FlowField, DuctError> {
        match *self {
            Self::Flowing(_, field) => Ok(field),
            Self::Choked {
                throat_area,
                critical_area,
            } => Err(DuctError::ChokedDiffuser {
                throat_area,
                critical_area,
            }),
        }
    }
}

/// A converging-diverging diffuser downstream of the test section.
///
/// The inlet matches the test-section area and the span matches the nozzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diffuser {
    geometry: SegmentGeometry,
    back_pressure: Pressure,
}

impl Diffuser {
    /// Sizes a diffuser behind `nozzle`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidThroatArea`] unless the throat area lies in
    /// `[nozzle throat, test-section area)`, or [`DuctError::InvalidParameter`]
    /// if any other dimension or the back pressure is not strictly positive.
    pub fn new(design: DiffuserDesign, nozzle: &Nozzle) -> Result<Self, DuctError> {
        let min = nozzle.throat_area();
        let max = nozzle.test_section_area();
        let throat_area = design.throat_area;
        if throat_area.is_nan() || throat_area < min || throat_area >= max {
            return Err(DuctError::InvalidThroatArea {
                throat_area,
                min,
                max,
            });
        }

        let geometry = SegmentGeometry::new(
            max,
            throat_area,
            design.exit_area,
            design.convergent_length,
            design.divergent_length,
            nozzle.geometry().span(),
        )?;

        Ok(Self {
            geometry,
            back_pressure: check_positive("diffuser back pressure", design.back_pressure)?,
        })
    }

    #[must_use]
    pub fn geometry(&self) -> &SegmentGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn back_pressure(&self) -> Pressure {
        self.back_pressure
    }

    /// Sets the diffuser back pressure.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::InvalidParameter`] unless the pressure is strictly positive.
    pub(super) fn set_back_pressure(&mut self, back_pressure: Pressure) -> Result<(), DuctError> {
        self.back_pressure = check_positive("diffuser back pressure", back_pressure)?;
        Ok(())
    }

    /// Classifies the diffuser and resolves its flow for the given inflow.
    ///
    /// Supersonic inflow whose back pressure calls for a shock ahead of the
    /// throat, including conditions 1 and 2, gets a normal shock at the inlet
    /// plane. Any subsonic flow must fit through the throat; otherwise the
    /// result is [`DiffuserFlow::Choked`].
    pub(super) fn resolve(
        &self,
        inflow: &Inflow,
        isentropic: &Isentropic,
        normal_shock: &NormalShock,
        config: &DuctConfig,
    ) -> Result<DiffuserFlow, DuctError> {
        let critical_area = inflow.critical_area;

        if !inflow.is_supersonic() {
            debug!("diffuser: subsonic inflow at M = {:.6}", inflow.mach);
            return Ok(self.subsonic(
                DiffuserCondition::SubsonicInflow,
                FlowField::Subsonic { critical_area },
                critical_area,
            ));
        }

        let area_ratio = (self.geometry.exit_area() / critical_area).get::<ratio>();
        let design_mach = isentropic
            .mach_from_area_ratio(area_ratio, Branch::Supersonic)
            .map_err(DuctError::relation("diffuser design Mach number"))?;

        let pressure_ratio = (self.back_pressure / inflow.total_pressure).get::<ratio>();
        let condition = Thresholds::new(design_mach, area_ratio, isentropic, normal_shock)?
            .classify(pressure_ratio, config.pressure_ratio_tol)?;

        let solver = FieldSolver {
            geometry: &self.geometry,
            critical_area,
            design_mach,
            convergent: Branch::Supersonic,
            isentropic,
            normal_shock,
            solver: &config.solver,
        };

        let starts = match condition {
            WorkingCondition::SubsonicThroughout | WorkingCondition::ChokedSubsonic => false,
            WorkingCondition::ShockInDivergent => {
                let (_, shock_area) = solver.required_shock(pressure_ratio)?;
                shock_area >= self.geometry.throat_area()
            }
            WorkingCondition::ShockAtExit
            | WorkingCondition::OverExpanded
            | WorkingCondition::Design
            | WorkingCondition::UnderExpanded => true,
        };

        if !starts {
            debug!("diffuser at p_b/p0 = {pressure_ratio:.6}: {condition}, shock at inlet");
            let field = solver.inlet_shock(inflow.mach)?;
            let behind = field
                .shock()
                .map_or(critical_area, |shock| shock.downstream_critical_area);
            return Ok(self.subsonic(DiffuserCondition::InletShock, field, behind));
        }

        debug!("diffuser at p_b/p0 = {pressure_ratio:.6}: {condition}");
        let field = solver.resolve(condition, pressure_ratio)?;
        Ok(DiffuserFlow::Flowing(
            DiffuserCondition::SupersonicInflow(condition),
            field,
        ))
    }

    /// Accepts a field whose subsonic part is referenced to `critical_area`,
    /// unless the throat is too small to pass it.
    fn subsonic(
        &self,
        condition: DiffuserCondition,
        field: FlowField,
        critical_area: Area,
    ) -> DiffuserFlow {
        let throat_area = self.geometry.throat_area();
        if critical_area > throat_area {
            debug!("diffuser throat {throat_area:?} chokes on A* = {critical_area:?}");
            DiffuserFlow::Choked {
                throat_area,
                critical_area,
            }
        } else {
            DiffuserFlow::Flowing(condition, field)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{area::square_meter, length::meter, pressure::megapascal};

    use crate::{
        models::duct::core::{
            nozzle::NozzleDesign,
            test_support::{design, m, m2},
        },
        support::thermo::PerfectGas,
    };

    fn nozzle(back_pressure_mpa: f64) -> Nozzle {
        Nozzle::new(NozzleDesign {
            back_pressure: Pressure::new::<megapascal>(back_pressure_mpa),
            ..design()
        })
        .unwrap()
    }

    fn diffuser_design(throat_area: f64) -> DiffuserDesign {
        DiffuserDesign {
            throat_area: m2(throat_area),
            exit_area: m2(0.5),
            convergent_length: m(5.0),
            divergent_length: m(5.0),
            back_pressure: Pressure::new::<megapascal>(0.5),
        }
    }

    fn resolve(nozzle: &Nozzle, diffuser: &Diffuser) -> DiffuserFlow {
        let gas = PerfectGas::air();
        diffuser
            .resolve(
                &nozzle.outflow().unwrap(),
                &Isentropic::new(&gas),
                &NormalShock::new(&gas),
                &DuctConfig::default(),
            )
            .unwrap()
    }

    fn with_back_pressure(mut diffuser: Diffuser, back_pressure_mpa: f64) -> Diffuser {
        diffuser
            .set_back_pressure(Pressure::new::<megapascal>(back_pressure_mpa))
            .unwrap();
        diffuser
    }

    #[test]
    fn throat_must_lie_between_nozzle_throat_and_test_section() {
        let nozzle = nozzle(0.98);
        assert!(Diffuser::new(diffuser_design(0.17), &nozzle).is_ok());
        let sonic = DiffuserDesign {
            throat_area: nozzle.throat_area(),
            ..diffuser_design(0.17)
        };
        assert!(Diffuser::new(sonic, &nozzle).is_ok());

        for throat in [0.24, 0.3, 0.05, f64::NAN] {
            let err = Diffuser::new(diffuser_design(throat), &nozzle).unwrap_err();
            assert!(matches!(err, DuctError::InvalidThroatArea { .. }));
            assert!(err.is_invalid_parameter());
        }
    }

    #[test]
    fn subsonic_inflow_keeps_incoming_critical_area() -> Result<(), DuctError> {
        let nozzle = nozzle(0.98);
        let diffuser = Diffuser::new(diffuser_design(0.17), &nozzle)?;

        let flow = resolve(&nozzle, &diffuser);
        assert_eq!(flow.condition(), DiffuserCondition::SubsonicInflow);
        assert_eq!(flow.field()?.critical_area(), nozzle.outflow()?.critical_area);
        Ok(())
    }

    #[test]
    fn sonic_nozzle_throat_passes_a_matching_diffuser_throat() -> Result<(), DuctError> {
        let mut nozzle = nozzle(0.98);
        let limit = nozzle.thresholds()?.limit - 0.1 * nozzle.config().pressure_ratio_tol;
        nozzle.set_back_pressure(Pressure::new::<megapascal>(limit))?;
        assert_eq!(nozzle.working_condition()?, WorkingCondition::ChokedSubsonic);

        let sonic = DiffuserDesign {
            throat_area: nozzle.throat_area(),
            ..diffuser_design(0.17)
        };
        let diffuser = Diffuser::new(sonic, &nozzle)?;

        let flow = resolve(&nozzle, &diffuser);
        assert_eq!(flow.condition(), DiffuserCondition::SubsonicInflow);
        assert!(flow.field().is_ok());
        Ok(())
    }

    #[test]
    fn supersonic_inflow_places_shock_in_divergent_section() -> Result<(), DuctError> {
        let nozzle = nozzle(0.05);
        let diffuser = Diffuser::new(diffuser_design(0.17), &nozzle)?;

        let flow = resolve(&nozzle, &diffuser);
        assert_eq!(
            flow.condition(),
            DiffuserCondition::SupersonicInflow(WorkingCondition::ShockInDivergent)
        );
        let field = flow.field()?;
        assert_eq!(field.critical_area(), nozzle.throat_area());

        let shock = field.shock().expect("diffuser shock");
        assert_relative_eq!(shock.position.get::<meter>(), 6.2375, max_relative = 1e-4);
        assert_relative_eq!(shock.upstream_mach, 2.4513, max_relative = 1e-4);
        Ok(())
    }

    #[test]
    fn low_back_pressure_runs_supersonic() -> Result<(), DuctError> {
        let nozzle = nozzle(0.05);
        let diffuser = with_back_pressure(Diffuser::new(diffuser_design(0.17), &nozzle)?, 0.001);

        let flow = resolve(&nozzle, &diffuser);
        let condition = flow.condition();
        assert_eq!(
            condition,
            DiffuserCondition::SupersonicInflow(WorkingCondition::UnderExpanded)
        );
        assert!(flow.field()?.shock().is_none());
        assert_eq!(condition.to_string(), "supersonic inflow, condition 7 (under-expanded)");
        Ok(())
    }

    #[test]
    fn shock_ahead_of_the_throat_moves_to_the_inlet() -> Result<(), DuctError> {
        let nozzle = nozzle(0.05);
        let base = Diffuser::new(diffuser_design(0.2), &nozzle)?;

        // 0.8 MPa needs a Mach 1.80 shock, which lies in the convergent part.
        // 0.995 MPa is above the limiting ratio for supersonic inflow.
        for back_pressure in [0.8, 0.995] {
            let flow = resolve(&nozzle, &with_back_pressure(base, back_pressure));
            assert_eq!(flow.condition(), DiffuserCondition::InletShock);

            let shock = flow.field()?.shock().expect("inlet shock");
            assert_eq!(shock.position, m(0.0));
            assert_relative_eq!(shock.upstream_mach, 2.4, max_relative = 1e-9);
            assert_relative_eq!(shock.downstream_mach, 0.523_12, max_relative = 1e-4);
            assert_relative_eq!(
                shock.downstream_critical_area.get::<square_meter>(),
                0.184_90,
                max_relative = 1e-4
            );
        }
        assert_eq!(
            DiffuserCondition::InletShock.to_string(),
            "supersonic inflow, normal shock at inlet"
        );
        Ok(())
    }

    #[test]
    fn narrow_throat_chokes_behind_an_inlet_shock() -> Result<(), DuctError> {
        let nozzle = nozzle(0.05);
        let diffuser = with_back_pressure(Diffuser::new(diffuser_design(0.17), &nozzle)?, 0.8);

        let flow = resolve(&nozzle, &diffuser);
        assert_eq!(flow.condition(), DiffuserCondition::ChokedThroat);
        let Err(DuctError::ChokedDiffuser {
            throat_area,
            critical_area,
        }) = flow.field()
        else {
            panic!("expected a choked diffuser");
        };
        assert_relative_eq!(throat_area.get::<square_meter>(), 0.17);
        assert_relative_eq!(critical_area.get::<square_meter>(), 0.184_90, max_relative = 1e-4);
        Ok(())
    }

    #[test]
    fn narrow_throat_chokes_behind_a_shocked_nozzle() -> Result<(), DuctError> {
        // The nozzle shock at 0.5 MPa raises A* to 0.1716 m².
        let nozzle = nozzle(0.5);
        let diffuser = Diffuser::new(diffuser_design(0.17), &nozzle)?;

        let flow = resolve(&nozzle, &diffuser);
        assert_eq!(flow.condition(), DiffuserCondition::ChokedThroat);
        assert!(matches!(flow.field(), Err(DuctError::ChokedDiffuser { .. })));

        let wider = Diffuser::new(diffuser_design(0.18), &nozzle)?;
        assert_eq!(resolve(&nozzle, &wider).condition(), DiffuserCondition::SubsonicInflow);
        Ok(())
    }
}
