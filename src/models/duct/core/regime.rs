//! Working-condition classification for a converging-diverging segment.
//!
//! For a fixed geometry, the regime is set entirely by the ratio of back
//! pressure to inflow total pressure. Three threshold ratios partition the
//! range:
//!
//! - `limit`: Exit pressure when the throat is just sonic and the flow is
//!   subsonic elsewhere.
//! - `shock_at_exit`: Pressure behind a normal shock standing at the exit
//!   plane.
//! - `design`: Exit pressure of shock-free supersonic expansion.
//!
//! Decreasing the back pressure moves the segment through the conditions in
//! order, from [`WorkingCondition::SubsonicThroughout`] to
//! [`WorkingCondition::UnderExpanded`].

use std::fmt;

use crate::support::gas_dynamics::{Branch, Isentropic, NormalShock};

use super::error::DuctError;

/// The seven canonical operating states of a converging-diverging segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkingCondition {
    /// Isentropic and subsonic everywhere; the segment acts as a venturi.
    SubsonicThroughout,
    /// Sonic throat with subsonic flow on both sides.
    ChokedSubsonic,
    /// Normal shock inside the divergent section.
    ShockInDivergent,
    /// Normal shock standing exactly at the exit plane.
    ShockAtExit,
    /// Supersonic exit with exit pressure below the back pressure.
    OverExpanded,
    /// Supersonic exit with exit pressure equal to the back pressure.
    Design,
    /// Supersonic exit with exit pressure above the back pressure.
    UnderExpanded,
}

impl WorkingCondition {
    /// Conventional condition number, from 1 (subsonic) to 7 (under-expanded).
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Self::SubsonicThroughout => 1,
            Self::ChokedSubsonic => 2,
            Self::ShockInDivergent => 3,
            Self::ShockAtExit => 4,
            Self::OverExpanded => 5,
            Self::Design => 6,
            Self::UnderExpanded => 7,
        }
    }

    /// Returns `true` if the flow leaves the segment supersonic.
    #[must_use]
    pub fn is_supersonic_exit(self) -> bool {
        matches!(
            self,
            Self::ShockAtExit | Self::OverExpanded | Self::Design | Self::UnderExpanded
        )
    }
}

impl fmt::Display for WorkingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SubsonicThroughout => "subsonic throughout",
            Self::ChokedSubsonic => "choked, subsonic",
            Self::ShockInDivergent => "normal shock in divergent section",
            Self::ShockAtExit => "normal shock at exit",
            Self::OverExpanded => "over-expanded",
            Self::Design => "design",
            Self::UnderExpanded => "under-expanded",
        };
        write!(f, "condition {} ({name})", self.index())
    }
}

/// Back-pressure ratios `p_b/p₀` separating the working conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub limit: f64,
    pub shock_at_exit: f64,
    pub design: f64,
}

impl Thresholds {
    /// Computes the thresholds for a segment whose exit-to-critical area ratio
    /// is `area_ratio` and whose shock-free supersonic exit Mach number is
    /// `design_mach`.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::RootFinding`] if the subsonic Mach number for
    /// `area_ratio` cannot be found or `design_mach` is subsonic.
    pub fn new(
        design_mach: f64,
        area_ratio: f64,
        isentropic: &Isentropic,
        shock: &NormalShock,
    ) -> Result<Self, DuctError> {
        let limit_mach = isentropic
            .mach_from_area_ratio(area_ratio, Branch::Subsonic)
            .map_err(DuctError::relation("limiting Mach number"))?;

        let design = isentropic.pressure_ratio(design_mach);
        let shock_jump = shock
            .pressure_ratio(design_mach)
            .map_err(DuctError::relation("shock-at-exit pressure"))?;

        Ok(Self {
            limit: isentropic.pressure_ratio(limit_mach),
            shock_at_exit: design * shock_jump,
            design,
        })
    }

    /// Classifies a back-pressure ratio.
    ///
    /// Strict comparisons win over the tolerance bands: a ratio just above a
    /// threshold keeps the interior condition on that side, and only ratios
    /// at or just below it take the boundary condition.
    ///
    /// # Errors
    ///
    /// Returns [`DuctError::UnclassifiedRegime`] if the ratio is `NaN`, or if
    /// it lands exactly on a threshold while `tol` is zero.
    pub fn classify(&self, pressure_ratio: f64, tol: f64) -> Result<WorkingCondition, DuctError> {
        let r = pressure_ratio;
        let near = |threshold: f64| (r - threshold).abs() < tol;

        let condition = if r > self.limit {
            WorkingCondition::SubsonicThroughout
        } else if near(self.limit) {
            WorkingCondition::ChokedSubsonic
        } else if self.shock_at_exit < r && r < self.limit {
            WorkingCondition::ShockInDivergent
        } else if near(self.shock_at_exit) {
            WorkingCondition::ShockAtExit
        } else if self.design < r && r < self.shock_at_exit {
            WorkingCondition::OverExpanded
        } else if near(self.design) {
            WorkingCondition::Design
        } else if r < self.design {
            WorkingCondition::UnderExpanded
        } else {
            return Err(DuctError::UnclassifiedRegime { pressure_ratio });
        };

        Ok(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use crate::support::thermo::PerfectGas;

    const TOL: f64 = 1e-6;

    fn thresholds() -> Thresholds {
        let gas = PerfectGas::air();
        let isentropic = Isentropic::new(&gas);
        let area_ratio = isentropic.area_ratio(2.4);
        Thresholds::new(2.4, area_ratio, &isentropic, &NormalShock::new(&gas)).unwrap()
    }

    #[test]
    fn threshold_values_for_mach_two_point_four() {
        let t = thresholds();
        assert_relative_eq!(t.limit, 0.9575, max_relative = 1e-3);
        assert_relative_eq!(t.design, 0.068_40, max_relative = 1e-3);
        assert_relative_eq!(t.shock_at_exit, 0.448_24, max_relative = 1e-3);
        assert!(t.design < t.shock_at_exit && t.shock_at_exit < t.limit);
    }

    #[test]
    fn every_condition_is_reachable() -> Result<(), DuctError> {
        let t = thresholds();
        let cases = [
            (0.99, WorkingCondition::SubsonicThroughout),
            (t.limit, WorkingCondition::ChokedSubsonic),
            (0.7, WorkingCondition::ShockInDivergent),
            (t.shock_at_exit, WorkingCondition::ShockAtExit),
            (0.2, WorkingCondition::OverExpanded),
            (t.design, WorkingCondition::Design),
            (0.01, WorkingCondition::UnderExpanded),
        ];
        for (ratio, expected) in cases {
            assert_eq!(t.classify(ratio, TOL)?, expected, "ratio = {ratio}");
        }
        Ok(())
    }

    #[test]
    fn boundary_band_only_below_each_threshold() -> Result<(), DuctError> {
        let t = thresholds();
        let cases = [
            (t.limit + 0.5 * TOL, WorkingCondition::SubsonicThroughout),
            (t.limit - 0.5 * TOL, WorkingCondition::ChokedSubsonic),
            (t.shock_at_exit + 0.5 * TOL, WorkingCondition::ShockInDivergent),
            (t.shock_at_exit - 0.5 * TOL, WorkingCondition::ShockAtExit),
            (t.design + 0.5 * TOL, WorkingCondition::OverExpanded),
            (t.design - 0.5 * TOL, WorkingCondition::Design),
            (t.design - 2.0 * TOL, WorkingCondition::UnderExpanded),
        ];
        for (ratio, expected) in cases {
            assert_eq!(t.classify(ratio, TOL)?, expected, "ratio = {ratio}");
        }
        Ok(())
    }

    #[test]
    fn zero_tolerance_leaves_exact_threshold_unclassified() {
        let t = thresholds();
        assert!(matches!(
            t.classify(t.shock_at_exit, 0.0),
            Err(DuctError::UnclassifiedRegime { .. })
        ));
        assert!(t.classify(0.7, 0.0).is_ok());
    }

    #[test]
    fn nan_is_unclassified() {
        assert!(matches!(
            thresholds().classify(f64::NAN, TOL),
            Err(DuctError::UnclassifiedRegime { .. })
        ));
    }

    #[test]
    fn indices_and_display() {
        assert_eq!(WorkingCondition::SubsonicThroughout.index(), 1);
        assert_eq!(WorkingCondition::UnderExpanded.index(), 7);
        assert_eq!(
            WorkingCondition::ShockInDivergent.to_string(),
            "condition 3 (normal shock in divergent section)"
        );
        assert!(WorkingCondition::ShockAtExit.is_supersonic_exit());
        assert!(!WorkingCondition::ShockInDivergent.is_supersonic_exit());
    }

    proptest! {
        #[test]
        fn exactly_one_condition_for_any_ratio(r in 0.0_f64..1.5) {
            prop_assert!(thresholds().classify(r, TOL).is_ok());
        }

        #[test]
        fn lower_ratio_never_lowers_the_index(a in 0.0_f64..1.0, b in 0.0_f64..1.0) {
            let t = thresholds();
            let (high, low) = if a > b { (a, b) } else { (b, a) };
            let high = t.classify(high, TOL).unwrap().index();
            let low = t.classify(low, TOL).unwrap().index();
            prop_assert!(low >= high);
        }
    }
}
