//! Flow-field resolution and evaluation for one segment.
//!
//! A [`FlowField`] captures everything needed to evaluate the flow at any
//! station of a segment once its working condition is known: the critical
//! area the isentropic relations are referenced to, the Mach branch in the
//! convergent section, and (when present) the normal shock.

use log::debug;
use uom::si::{
    f64::{Area, Length, MassDensity, Pressure, ThermodynamicTemperature},
    length::meter,
    ratio::ratio,
};

use crate::support::{
    gas_dynamics::{Branch, Isentropic, NormalShock},
    root::RootConfig,
    thermo::PerfectGas,
};

use super::{
    error::DuctError,
    geometry::{SegmentGeometry, Side},
    regime::WorkingCondition,
};

/// A normal shock standing in a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalShockLocation {
    /// Axial position of the shock, local to its segment.
    pub position: Length,
    pub upstream_mach: f64,
    pub downstream_mach: f64,
    /// Stagnation pressure ratio `p₀₂/p₀₁` across the shock.
    pub total_pressure_ratio: f64,
    /// Critical area referencing the subsonic flow behind the shock.
    pub downstream_critical_area: Area,
}

/// The resolved flow in a segment, tagged by regime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowField {
    /// Isentropic subsonic flow everywhere.
    Subsonic { critical_area: Area },

    /// Isentropic flow that is supersonic downstream of the throat.
    ///
    /// `convergent` is the Mach branch upstream of the throat: subsonic for a
    /// nozzle fed from a reservoir, supersonic for a diffuser fed by a
    /// supersonic test section.
    Supersonic {
        critical_area: Area,
        convergent: Branch,
    },

    /// Supersonic flow terminated by a normal shock, subsonic behind it.
    Shocked {
        critical_area: Area,
        convergent: Branch,
        shock: NormalShockLocation,
    },
}

impl FlowField {
    /// Critical area of the flow entering the segment.
    #[must_use]
    pub fn critical_area(&self) -> Area {
        match *self {
            Self::Subsonic { critical_area }
            | Self::Supersonic { critical_area, .. }
            | Self::Shocked { critical_area, .. } => critical_area,
        }
    }

    /// The normal shock, if the segment contains one.
    #[must_use]
    pub fn shock(&self) -> Option<NormalShockLocation> {
        match *self {
            Self::Shocked { shock, .. } => Some(shock),
            Self::Subsonic { .. } | Self::Supersonic { .. } => None,
        }
    }

    /// Mach number and stagnation-referenced ratios at `x`.
    ///
    /// The pressure ratio is referenced to the total pressure entering the
    /// segment, so it includes the stagnation loss of a shock upstream of `x`.
    pub(super) fn ratios(
        &self,
        geometry: &SegmentGeometry,
        x: Length,
        isentropic: &Isentropic,
    ) -> Result<FlowRatios, DuctError> {
        let area = geometry.area(x)?;

        let (critical_area, branch, total_pressure_ratio) = match *self {
            Self::Subsonic { critical_area } => (critical_area, Branch::Subsonic, 1.0),
            Self::Shocked { shock, .. } if x > shock.position => (
                shock.downstream_critical_area,
                Branch::Subsonic,
                shock.total_pressure_ratio,
            ),
            Self::Supersonic {
                critical_area,
                convergent,
            }
            | Self::Shocked {
                critical_area,
                convergent,
                ..
            } => {
                let branch = if geometry.is_convergent(x) {
                    convergent
                } else {
                    Branch::Supersonic
                };
                (critical_area, branch, 1.0)
            }
        };

        let mach = isentropic
            .mach_from_area_ratio((area / critical_area).get::<ratio>(), branch)
            .map_err(DuctError::relation("local Mach number"))?;

        Ok(FlowRatios {
            mach,
            pressure: isentropic.pressure_ratio(mach) * total_pressure_ratio,
            temperature: isentropic.temperature_ratio(mach),
        })
    }

    /// Full local state at `x`.
    pub(super) fn local(
        &self,
        geometry: &SegmentGeometry,
        x: Length,
        stagnation: Stagnation,
        isentropic: &Isentropic,
        gas: &PerfectGas,
    ) -> Result<LocalFlow, DuctError> {
        let ratios = self.ratios(geometry, x, isentropic)?;
        let area = geometry.area(x)?;
        Ok(stagnation.local(x, area, geometry.half_height_of(area), ratios, gas))
    }

    /// State leaving the segment, as seen by the next one.
    ///
    /// A shock standing at the exit plane is considered crossed.
    pub(super) fn outflow(
        &self,
        geometry: &SegmentGeometry,
        stagnation: Stagnation,
        isentropic: &Isentropic,
    ) -> Result<Inflow, DuctError> {
        if let Self::Shocked { shock, .. } = *self {
            let area_ratio = (geometry.exit_area() / shock.downstream_critical_area).get::<ratio>();
            let mach = isentropic
                .mach_from_area_ratio(area_ratio, Branch::Subsonic)
                .map_err(DuctError::relation("post-shock exit Mach number"))?;

            return Ok(Inflow {
                mach,
                critical_area: shock.downstream_critical_area,
                total_pressure: stagnation.pressure * shock.total_pressure_ratio,
                total_temperature: stagnation.temperature,
            });
        }

        let exit = self.ratios(geometry, geometry.length(), isentropic)?;
        Ok(Inflow {
            mach: exit.mach,
            critical_area: self.critical_area(),
            total_pressure: stagnation.pressure,
            total_temperature: stagnation.temperature,
        })
    }
}

/// Inputs that turn a working condition into a [`FlowField`].
pub(super) struct FieldSolver<'a> {
    pub geometry: &'a SegmentGeometry,
    /// Critical area of the incoming flow.
    pub critical_area: Area,
    /// Shock-free supersonic exit Mach number.
    pub design_mach: f64,
    /// Mach branch upstream of the throat when the segment runs supersonic.
    pub convergent: Branch,
    pub isentropic: &'a Isentropic,
    pub normal_shock: &'a NormalShock,
    pub solver: &'a RootConfig,
}

impl FieldSolver<'_> {
    /// Resolves the flow for `condition` at back-pressure ratio `pressure_ratio`.
    pub(super) fn resolve(
        &self,
        condition: WorkingCondition,
        pressure_ratio: f64,
    ) -> Result<FlowField, DuctError> {
        let critical_area = self.critical_area;
        let convergent = self.convergent;

        let field = match condition {
            WorkingCondition::SubsonicThroughout => {
                let exit_mach = self
                    .isentropic
                    .mach_from_pressure_ratio(pressure_ratio)
                    .map_err(DuctError::relation("subsonic exit Mach number"))?;
                FlowField::Subsonic {
                    critical_area: self.geometry.exit_area() / self.isentropic.area_ratio(exit_mach),
                }
            }
            WorkingCondition::ChokedSubsonic => FlowField::Subsonic { critical_area },
            WorkingCondition::ShockInDivergent => FlowField::Shocked {
                critical_area,
                convergent,
                shock: self.shock_in_divergent(pressure_ratio)?,
            },
            WorkingCondition::ShockAtExit => FlowField::Shocked {
                critical_area,
                convergent,
                shock: self.shock_at(self.geometry.length(), self.design_mach)?,
            },
            WorkingCondition::OverExpanded
            | WorkingCondition::Design
            | WorkingCondition::UnderExpanded => FlowField::Supersonic {
                critical_area,
                convergent,
            },
        };

        Ok(field)
    }

    /// Normal shock standing at the inlet plane, with the entering Mach number
    /// upstream of it.
    pub(super) fn inlet_shock(&self, upstream_mach: f64) -> Result<FlowField, DuctError> {
        Ok(FlowField::Shocked {
            critical_area: self.critical_area,
            convergent: self.convergent,
            shock: self.shock_at(Length::new::<meter>(0.0), upstream_mach)?,
        })
    }

    /// Upstream Mach number and wall area of the shock that brings the exit
    /// pressure up to the back pressure.
    ///
    /// The stagnation pressure behind the shock follows from the subsonic exit
    /// Mach number, which in turn follows from the area-pressure product at
    /// the exit. The shock stands where the supersonic Mach number produces
    /// exactly that stagnation loss.
    pub(super) fn required_shock(&self, pressure_ratio: f64) -> Result<(f64, Area), DuctError> {
        let exit_area_ratio = (self.geometry.exit_area() / self.critical_area).get::<ratio>();

        let exit_mach = self
            .isentropic
            .mach_from_area_pressure_product(exit_area_ratio * pressure_ratio)
            .map_err(DuctError::relation("post-shock exit Mach number"))?;
        let required_loss = pressure_ratio / self.isentropic.pressure_ratio(exit_mach);

        let upstream_mach = self
            .normal_shock
            .mach_from_total_pressure_ratio(required_loss)
            .map_err(DuctError::relation("shock strength"))?;

        Ok((
            upstream_mach,
            self.critical_area * self.isentropic.area_ratio(upstream_mach),
        ))
    }

    fn shock_in_divergent(&self, pressure_ratio: f64) -> Result<NormalShockLocation, DuctError> {
        let (upstream_mach, shock_area) = self.required_shock(pressure_ratio)?;
        let position = self
            .geometry
            .position_from_area(shock_area, Side::Divergent, self.solver)?;

        debug!(
            "normal shock at x = {:.6} m (M1 = {upstream_mach:.6})",
            position.get::<meter>()
        );

        self.shock_at(position, upstream_mach)
    }

    fn shock_at(&self, position: Length, upstream_mach: f64) -> Result<NormalShockLocation, DuctError> {
        let total_pressure_ratio = self
            .normal_shock
            .total_pressure_ratio(upstream_mach)
            .map_err(DuctError::relation("shock stagnation loss"))?;
        let downstream_mach = self
            .normal_shock
            .mach2(upstream_mach)
            .map_err(DuctError::relation("post-shock Mach number"))?;

        Ok(NormalShockLocation {
            position,
            upstream_mach,
            downstream_mach,
            total_pressure_ratio,
            downstream_critical_area: self.critical_area / total_pressure_ratio,
        })
    }
}

/// Mach number with static-to-stagnation ratios at one station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct FlowRatios {
    pub mach: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl FlowRatios {
    /// Density ratio from the equation of state, `ρ/ρ₀ = (p/p₀)/(T/T₀)`.
    pub(super) fn density(&self) -> f64 {
        self.pressure / self.temperature
    }
}

/// Stagnation state a segment's ratios are referenced to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Stagnation {
    pub pressure: Pressure,
    pub temperature: ThermodynamicTemperature,
}

impl Stagnation {
    pub(super) fn local(
        &self,
        position: Length,
        area: Area,
        half_height: Length,
        ratios: FlowRatios,
        gas: &PerfectGas,
    ) -> LocalFlow {
        let pressure = self.pressure * ratios.pressure;
        let temperature = self.temperature * ratios.temperature;
        LocalFlow {
            position,
            area,
            half_height,
            mach: ratios.mach,
            pressure,
            temperature,
            density: gas.density(pressure, temperature),
        }
    }
}

/// Flow state handed from one segment to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inflow {
    pub mach: f64,
    /// Critical area of the flow, carried across constant-stagnation segments.
    pub critical_area: Area,
    pub total_pressure: Pressure,
    pub total_temperature: ThermodynamicTemperature,
}

impl Inflow {
    /// Returns `true` if the flow is supersonic.
    #[must_use]
    pub fn is_supersonic(&self) -> bool {
        self.mach > 1.0
    }

    pub(super) fn stagnation(&self) -> Stagnation {
        Stagnation {
            pressure: self.total_pressure,
            temperature: self.total_temperature,
        }
    }
}

/// Flow properties at one axial station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFlow {
    /// Axial position along the duct that was queried.
    pub position: Length,
    pub area: Area,
    pub half_height: Length,
    pub mach: f64,
    pub pressure: Pressure,
    pub temperature: ThermodynamicTemperature,
    pub density: MassDensity,
}
