use uom::si::{f64::SpecificHeatCapacity, specific_heat_capacity::joule_per_kilogram_kelvin};

use crate::support::thermo::{PerfectGasFluid, PerfectGasParameters};
use crate::support::units::SpecificGasConstant;

/// Canonical identifier for helium, a monatomic gas with `γ ≈ 5/3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Helium;

impl PerfectGasFluid for Helium {
    fn parameters() -> PerfectGasParameters {
        PerfectGasParameters::new(
            SpecificGasConstant::new::<joule_per_kilogram_kelvin>(2077.1),
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(5193.2),
        )
    }
}
