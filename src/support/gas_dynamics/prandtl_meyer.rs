use uom::si::{angle::radian, f64::Angle};

use crate::support::{
    root::{RootConfig, find_root},
    thermo::PerfectGas,
};

use super::{MAX_MACH, RelationError};

/// Prandtl–Meyer expansion relations.
///
/// The Prandtl–Meyer function `ν(M)` is the angle through which a sonic flow
/// must turn, in an isentropic expansion, to reach Mach `M`.
///
/// # Example
///
/// ```
/// use approx::assert_relative_eq;
/// use twine_gasdynamics::support::{gas_dynamics::PrandtlMeyer, thermo::PerfectGas};
/// use uom::si::angle::degree;
///
/// let expansion = PrandtlMeyer::new(&PerfectGas::air());
/// let nu = expansion.expansion_angle(2.0).unwrap();
/// assert_relative_eq!(nu.get::<degree>(), 26.38, max_relative = 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrandtlMeyer {
    gamma: f64,
    solver: RootConfig,
}

impl PrandtlMeyer {
    #[must_use]
    pub fn new(gas: &PerfectGas) -> Self {
        Self {
            gamma: gas.gamma(),
            solver: RootConfig::default(),
        }
    }

    #[must_use]
    pub fn with_solver(mut self, solver: RootConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Prandtl–Meyer angle `ν(M)`; zero at Mach 1.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] for subsonic Mach numbers,
    /// where no expansion fan exists.
    pub fn expansion_angle(&self, mach: f64) -> Result<Angle, RelationError> {
        if mach.is_nan() || mach < 1.0 {
            return Err(RelationError::OutOfDomain {
                quantity: "Mach number",
                value: mach,
                domain: "[1, inf)",
            });
        }
        Ok(Angle::new::<radian>(self.nu(mach)))
    }

    /// Mach number reached after turning through `angle` from sonic flow.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] for negative angles and
    /// [`RelationError::Root`] if the angle exceeds `ν(MAX_MACH)`.
    pub fn mach_from_expansion_angle(&self, angle: Angle) -> Result<f64, RelationError> {
        let target = angle.get::<radian>();
        if target.is_nan() || target < 0.0 {
            return Err(RelationError::OutOfDomain {
                quantity: "expansion angle (rad)",
                value: target,
                domain: "[0, nu_max)",
            });
        }
        if target == 0.0 {
            return Ok(1.0);
        }
        Ok(find_root(|m| self.nu(m) - target, [1.0, MAX_MACH], &self.solver)?)
    }

    fn nu(&self, mach: f64) -> f64 {
        let g = self.gamma;
        let a = (g + 1.0) / (g - 1.0);
        let beta = (mach * mach - 1.0).sqrt();
        a.sqrt() * (beta / a.sqrt()).atan() - beta.atan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::angle::degree;

    fn air() -> PrandtlMeyer {
        PrandtlMeyer::new(&PerfectGas::air())
    }

    #[test]
    fn mach_two() -> Result<(), RelationError> {
        let nu = air().expansion_angle(2.0)?;
        assert_relative_eq!(nu.get::<degree>(), 26.3798, max_relative = 1e-5);
        Ok(())
    }

    #[test]
    fn sonic_flow_has_zero_angle() -> Result<(), RelationError> {
        assert_eq!(air().expansion_angle(1.0)?.get::<radian>(), 0.0);
        assert_eq!(air().mach_from_expansion_angle(Angle::new::<degree>(0.0))?, 1.0);
        Ok(())
    }

    #[test]
    fn subsonic_flow_is_rejected() {
        assert!(matches!(
            air().expansion_angle(0.9),
            Err(RelationError::OutOfDomain { .. })
        ));
        assert!(air().mach_from_expansion_angle(Angle::new::<degree>(-5.0)).is_err());
    }

    #[test]
    fn inverse_recovers_mach() -> Result<(), RelationError> {
        let expansion = air();
        let nu = expansion.expansion_angle(3.2)?;
        assert_relative_eq!(expansion.mach_from_expansion_angle(nu)?, 3.2, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn angle_beyond_maximum_turning_has_no_solution() {
        let err = air()
            .mach_from_expansion_angle(Angle::new::<degree>(140.0))
            .unwrap_err();
        assert!(matches!(err, RelationError::Root(_)));
    }
}
