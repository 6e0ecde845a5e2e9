use crate::support::{
    root::{RootConfig, find_root},
    thermo::PerfectGas,
};

use super::{Branch, MAX_MACH, MIN_MACH, RelationError};

/// Area ratios this close to one are treated as sonic.
const SONIC_AREA_RATIO_TOL: f64 = 1e-10;

/// Isentropic flow relations.
///
/// All ratios are static-to-stagnation (`p/p₀`, `T/T₀`, `ρ/ρ₀`) except the
/// area ratio, which is `A/A*` with `A*` the sonic (critical) area.
///
/// # Example
///
/// ```
/// use approx::assert_relative_eq;
/// use twine_gasdynamics::support::{
///     gas_dynamics::{Branch, Isentropic},
///     thermo::PerfectGas,
/// };
///
/// let flow = Isentropic::new(&PerfectGas::air());
/// assert_relative_eq!(flow.area_ratio(2.0), 1.6875, max_relative = 1e-4);
///
/// let mach = flow.mach_from_area_ratio(1.6875, Branch::Supersonic).unwrap();
/// assert_relative_eq!(mach, 2.0, max_relative = 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isentropic {
    gamma: f64,
    solver: RootConfig,
}

impl Isentropic {
    #[must_use]
    pub fn new(gas: &PerfectGas) -> Self {
        Self {
            gamma: gas.gamma(),
            solver: RootConfig::default(),
        }
    }

    /// Uses `solver` for the inverse relations.
    #[must_use]
    pub fn with_solver(mut self, solver: RootConfig) -> Self {
        self.solver = solver;
        self
    }

    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// `1 + (γ−1)/2·M²`, the stagnation temperature ratio `T₀/T`.
    fn stagnation_factor(&self, mach: f64) -> f64 {
        1.0 + 0.5 * (self.gamma - 1.0) * mach * mach
    }

    /// Static-to-stagnation pressure ratio `p/p₀`.
    #[must_use]
    pub fn pressure_ratio(&self, mach: f64) -> f64 {
        let g = self.gamma;
        self.stagnation_factor(mach).powf(-g / (g - 1.0))
    }

    /// Static-to-stagnation temperature ratio `T/T₀`.
    #[must_use]
    pub fn temperature_ratio(&self, mach: f64) -> f64 {
        self.stagnation_factor(mach).recip()
    }

    /// Static-to-stagnation density ratio `ρ/ρ₀`.
    #[must_use]
    pub fn density_ratio(&self, mach: f64) -> f64 {
        self.stagnation_factor(mach).powf(-1.0 / (self.gamma - 1.0))
    }

    /// Area ratio `A/A*`, with a minimum of one at Mach 1.
    #[must_use]
    pub fn area_ratio(&self, mach: f64) -> f64 {
        let g = self.gamma;
        let exponent = (g + 1.0) / (2.0 * (g - 1.0));
        (2.0 / (g + 1.0) * self.stagnation_factor(mach)).powf(exponent) / mach
    }

    /// Mach number with the given area ratio on the requested branch.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] for ratios below one and
    /// [`RelationError::Root`] if the ratio cannot be reached within
    /// `[MIN_MACH, MAX_MACH]`.
    pub fn mach_from_area_ratio(&self, ratio: f64, branch: Branch) -> Result<f64, RelationError> {
        if (ratio - 1.0).abs() < SONIC_AREA_RATIO_TOL {
            return Ok(1.0);
        }
        if ratio.is_nan() || ratio < 1.0 {
            return Err(RelationError::OutOfDomain {
                quantity: "area ratio",
                value: ratio,
                domain: "[1, inf)",
            });
        }
        let mach = find_root(|m| self.area_ratio(m) - ratio, branch.bracket(), &self.solver)?;
        Ok(mach)
    }

    /// Mach number with the given pressure ratio `p/p₀`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] unless `0 < ratio < 1`.
    pub fn mach_from_pressure_ratio(&self, ratio: f64) -> Result<f64, RelationError> {
        check_unit_interval("pressure ratio", ratio)?;
        self.invert(|m| self.pressure_ratio(m) - ratio)
    }

    /// Mach number with the given temperature ratio `T/T₀`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] unless `0 < ratio < 1`.
    pub fn mach_from_temperature_ratio(&self, ratio: f64) -> Result<f64, RelationError> {
        check_unit_interval("temperature ratio", ratio)?;
        self.invert(|m| self.temperature_ratio(m) - ratio)
    }

    /// Mach number with the given density ratio `ρ/ρ₀`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] unless `0 < ratio < 1`.
    pub fn mach_from_density_ratio(&self, ratio: f64) -> Result<f64, RelationError> {
        check_unit_interval("density ratio", ratio)?;
        self.invert(|m| self.density_ratio(m) - ratio)
    }

    /// Subsonic Mach number from the product `(A/A*)·(p/p₀)`.
    ///
    /// When a normal shock stands in a divergent duct, the exit plane sees
    /// the reservoir `A*` and `p₀` on one side and the (unknown) post-shock
    /// stagnation state on the other. Since `p₀·A*` is conserved across the
    /// shock, this product is known from the geometry and back pressure alone
    /// and determines the subsonic exit Mach number in closed form.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] unless the product is positive and finite.
    pub fn mach_from_area_pressure_product(&self, product: f64) -> Result<f64, RelationError> {
        if !product.is_finite() || product <= 0.0 {
            return Err(RelationError::OutOfDomain {
                quantity: "area-pressure product",
                value: product,
                domain: "(0, inf)",
            });
        }

        let g = self.gamma;
        let a = 1.0 / (g - 1.0);
        let b = 2.0 / (g - 1.0) * (2.0 / (g + 1.0)).powf((g + 1.0) / (g - 1.0));
        let mach_squared = -a + (a * a + b / (product * product)).sqrt();
        Ok(mach_squared.sqrt())
    }

    fn invert(&self, residual: impl Fn(f64) -> f64) -> Result<f64, RelationError> {
        Ok(find_root(residual, [MIN_MACH, MAX_MACH], &self.solver)?)
    }
}

fn check_unit_interval(quantity: &'static str, ratio: f64) -> Result<(), RelationError> {
    if ratio > 0.0 && ratio < 1.0 {
        Ok(())
    } else {
        Err(RelationError::OutOfDomain {
            quantity,
            value: ratio,
            domain: "(0, 1)",
        })
    }
}
