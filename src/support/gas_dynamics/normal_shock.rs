use uom::si::ratio::ratio;

use crate::support::{
    root::{RootConfig, find_root},
    thermo::PerfectGas,
    units::SpecificEntropy,
};

use super::{MAX_MACH, RelationError};

/// Jump conditions across a stationary normal shock.
///
/// Every relation takes the upstream Mach number `m1`, which must be at
/// least one. Static ratios are downstream over upstream (`p₂/p₁`, `T₂/T₁`,
/// `ρ₂/ρ₁`).
///
/// The stagnation pressure ratio is derived from the entropy rise,
/// `p₀₂/p₀₁ = exp(−Δs/R)`, so it stays consistent with [`PerfectGas`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalShock {
    gas: PerfectGas,
    solver: RootConfig,
}

impl NormalShock {
    #[must_use]
    pub fn new(gas: &PerfectGas) -> Self {
        Self {
            gas: *gas,
            solver: RootConfig::default(),
        }
    }

    /// Uses `solver` for [`mach_from_total_pressure_ratio`](Self::mach_from_total_pressure_ratio).
    #[must_use]
    pub fn with_solver(mut self, solver: RootConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Downstream Mach number; equals one for a sonic upstream flow.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] if `m1 < 1`.
    pub fn mach2(&self, m1: f64) -> Result<f64, RelationError> {
        let m1 = check_upstream(m1)?;
        let g = self.gas.gamma();
        let numerator = 1.0 + 0.5 * (g - 1.0) * m1 * m1;
        let denominator = g * m1 * m1 - 0.5 * (g - 1.0);
        Ok((numerator / denominator).sqrt())
    }

    /// Static pressure ratio `p₂/p₁`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] if `m1 < 1`.
    pub fn pressure_ratio(&self, m1: f64) -> Result<f64, RelationError> {
        let m1 = check_upstream(m1)?;
        Ok(self.static_pressure_ratio(m1))
    }

    /// Static temperature ratio `T₂/T₁`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] if `m1 < 1`.
    pub fn temperature_ratio(&self, m1: f64) -> Result<f64, RelationError> {
        let m1 = check_upstream(m1)?;
        Ok(self.static_pressure_ratio(m1) / self.static_density_ratio(m1))
    }

    /// Density ratio `ρ₂/ρ₁`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] if `m1 < 1`.
    pub fn density_ratio(&self, m1: f64) -> Result<f64, RelationError> {
        let m1 = check_upstream(m1)?;
        Ok(self.static_density_ratio(m1))
    }

    /// Entropy rise across the shock, `Δs = cp·ln(T₂⁄T₁) − R·ln(p₂⁄p₁)`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] if `m1 < 1`.
    pub fn entropy_change(&self, m1: f64) -> Result<SpecificEntropy, RelationError> {
        let m1 = check_upstream(m1)?;
        Ok(self.entropy_rise(m1))
    }

    /// Stagnation pressure ratio `p₀₂/p₀₁`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] if `m1 < 1`.
    pub fn total_pressure_ratio(&self, m1: f64) -> Result<f64, RelationError> {
        let m1 = check_upstream(m1)?;
        Ok(self.stagnation_pressure_ratio(m1))
    }

    /// Upstream Mach number of the shock with the given `p₀₂/p₀₁`.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError::OutOfDomain`] unless `0 < target ≤ 1`, and
    /// [`RelationError::Root`] if the loss exceeds that of a Mach
    /// [`MAX_MACH`] shock.
    pub fn mach_from_total_pressure_ratio(&self, target: f64) -> Result<f64, RelationError> {
        if target.is_nan() || target <= 0.0 || target > 1.0 {
            return Err(RelationError::OutOfDomain {
                quantity: "total pressure ratio",
                value: target,
                domain: "(0, 1]",
            });
        }
        if target == 1.0 {
            return Ok(1.0);
        }

        let mach = find_root(
            |m| self.stagnation_pressure_ratio(m) - target,
            [1.0, MAX_MACH],
            &self.solver,
        )?;
        Ok(mach)
    }

    fn static_pressure_ratio(&self, m1: f64) -> f64 {
        let g = self.gas.gamma();
        1.0 + 2.0 * g / (g + 1.0) * (m1 * m1 - 1.0)
    }

    fn static_density_ratio(&self, m1: f64) -> f64 {
        let g = self.gas.gamma();
        (g + 1.0) * m1 * m1 / ((g - 1.0) * m1 * m1 + 2.0)
    }

    fn entropy_rise(&self, m1: f64) -> SpecificEntropy {
        let pressure_ratio = self.static_pressure_ratio(m1);
        let temperature_ratio = pressure_ratio / self.static_density_ratio(m1);
        self.gas.entropy_change(temperature_ratio, pressure_ratio)
    }

    fn stagnation_pressure_ratio(&self, m1: f64) -> f64 {
        let exponent = self.entropy_rise(m1) / self.gas.gas_constant();
        (-exponent.get::<ratio>()).exp()
    }
}

fn check_upstream(m1: f64) -> Result<f64, RelationError> {
    if m1 >= 1.0 {
        Ok(m1)
    } else {
        Err(RelationError::OutOfDomain {
            quantity: "upstream Mach number",
            value: m1,
            domain: "[1, inf)",
        })
    }
}
