use crate::support::{
    gas_dynamics::{Isentropic, NormalShock},
    root::RootConfig,
    thermo::PerfectGas,
};

/// Numerical settings for duct evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuctConfig {
    /// Root-finder settings used by every inverse relation and geometric lookup.
    pub solver: RootConfig,

    /// Absolute tolerance when comparing the back-pressure ratio against the
    /// regime thresholds.
    ///
    /// Pressure ratios within this distance of a threshold are assigned the
    /// boundary condition (choked, shock at exit, or design).
    pub pressure_ratio_tol: f64,
}

impl Default for DuctConfig {
    fn default() -> Self {
        Self {
            solver: RootConfig::default(),
            pressure_ratio_tol: 1e-6,
        }
    }
}

impl DuctConfig {
    pub(super) fn isentropic(&self, gas: &PerfectGas) -> Isentropic {
        Isentropic::new(gas).with_solver(self.solver)
    }

    pub(super) fn normal_shock(&self, gas: &PerfectGas) -> NormalShock {
        NormalShock::new(gas).with_solver(self.solver)
    }
}
