//! Calorically perfect gas model.
//!
//! `PerfectGas` is the ideal gas equation of state with constant heat
//! capacities. Its heat capacity ratio `γ = cp/cv` is what the isentropic,
//! normal-shock, and Prandtl–Meyer relations are parameterized by.
//!
//! # Assumptions
//!
//! - Ideal gas equation of state: `p = ρ·R·T`
//! - Calorically perfect: `cp` and `cv` are constant (do not vary with temperature)

use thiserror::Error;
use uom::si::{
    f64::{MassDensity, Pressure, SpecificHeatCapacity, ThermodynamicTemperature},
    ratio::ratio,
    specific_heat_capacity::joule_per_kilogram_kelvin,
};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::fluid::Air,
    units::{SpecificEntropy, SpecificGasConstant},
};

use super::ideal_gas_eos;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerfectGasParametersError {
    #[error("invalid gas constant R: {r:?}")]
    GasConstant { r: SpecificGasConstant },
    #[error("invalid cp: {cp:?}")]
    Cp { cp: SpecificHeatCapacity },
    #[error("non-physical heat capacities: cv = cp - R must be > 0; cp={cp:?}, R={r:?}, cv={cv:?}")]
    NonPhysicalCv {
        r: SpecificGasConstant,
        cp: SpecificHeatCapacity,
        cv: SpecificHeatCapacity,
    },
}

/// Constant parameters for the [`PerfectGas`] model.
///
/// These values are typically provided by a fluid's [`PerfectGasFluid`] implementation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGasParameters {
    pub gas_constant: SpecificGasConstant,
    pub cp: SpecificHeatCapacity,
}

impl PerfectGasParameters {
    #[must_use]
    pub fn new(gas_constant: SpecificGasConstant, cp: SpecificHeatCapacity) -> Self {
        Self { gas_constant, cp }
    }
}

/// Fluid constants required by the [`PerfectGas`] model.
pub trait PerfectGasFluid {
    /// Returns the constant parameters for use with [`PerfectGas`].
    fn parameters() -> PerfectGasParameters;
}

/// Perfect gas model (constant `cp`/`cv`) using the ideal gas equation of state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGas {
    r: SpecificGasConstant,
    cp: SpecificHeatCapacity,
    cv: SpecificHeatCapacity,
}

impl PerfectGas {
    /// Creates a perfect gas model from explicit constants.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectGasParametersError`] if any constant is not strictly
    /// positive or if `cv = cp - R` is non-physical.
    pub fn new(parameters: PerfectGasParameters) -> Result<Self, PerfectGasParametersError> {
        let gas_constant = parameters.gas_constant;
        if StrictlyPositive::check(&gas_constant.get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectGasParametersError::GasConstant { r: gas_constant });
        }

        let cp = parameters.cp;
        if StrictlyPositive::check(&cp.get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectGasParametersError::Cp { cp });
        }

        let cv = cp - gas_constant;
        if StrictlyPositive::check(&cv.get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectGasParametersError::NonPhysicalCv {
                r: gas_constant,
                cp,
                cv,
            });
        }

        Ok(Self {
            r: gas_constant,
            cp,
            cv,
        })
    }

    /// Creates a perfect gas model using constants defined by `Fluid`.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectGasParametersError`] if the fluid's constants are invalid.
    pub fn of<Fluid: PerfectGasFluid>() -> Result<Self, PerfectGasParametersError> {
        Self::new(Fluid::parameters())
    }

    /// Dry air with `γ = 1.4`.
    #[must_use]
    pub fn air() -> Self {
        Self::of::<Air>().expect("air constants must be physically valid")
    }

    /// Heat capacity ratio `γ = cp/cv`.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        (self.cp / self.cv).get::<ratio>()
    }

    #[must_use]
    pub fn gas_constant(&self) -> SpecificGasConstant {
        self.r
    }

    #[must_use]
    pub fn cp(&self) -> SpecificHeatCapacity {
        self.cp
    }

    #[must_use]
    pub fn cv(&self) -> SpecificHeatCapacity {
        self.cv
    }

    /// Computes the entropy change `Δs = cp·ln(T₂⁄T₁) − R·ln(p₂⁄p₁)` between
    /// two states given their temperature and pressure ratios.
    #[must_use]
    pub fn entropy_change(&self, temperature_ratio: f64, pressure_ratio: f64) -> SpecificEntropy {
        self.cp * temperature_ratio.ln() - self.r * pressure_ratio.ln()
    }

    /// Computes density with `ρ = p/(R·T)`.
    #[must_use]
    pub fn density(
        &self,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> MassDensity {
        ideal_gas_eos::density(temperature, pressure, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        mass_density::kilogram_per_cubic_meter, pressure::kilopascal,
        thermodynamic_temperature::kelvin,
    };

    use crate::support::thermo::fluid::{Helium, Nitrogen};

    struct MockGas;

    impl PerfectGasFluid for MockGas {
        fn parameters() -> PerfectGasParameters {
            PerfectGasParameters::new(
                SpecificGasConstant::new::<joule_per_kilogram_kelvin>(400.0),
                SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(1000.0),
            )
        }
    }

    #[test]
    fn air_is_diatomic() {
        let air = PerfectGas::air();
        assert_relative_eq!(air.gamma(), 1.4, epsilon = 1e-12);
        assert_relative_eq!(air.cv().get::<joule_per_kilogram_kelvin>(), 717.5);
    }

    #[test]
    fn other_gases() {
        let nitrogen = PerfectGas::of::<Nitrogen>().unwrap();
        assert_relative_eq!(nitrogen.gamma(), 1.4, max_relative = 1e-3);

        let helium = PerfectGas::of::<Helium>().unwrap();
        assert_relative_eq!(helium.gamma(), 5.0 / 3.0, max_relative = 1e-3);
    }

    #[test]
    fn mock_gas_gamma() {
        let gas = PerfectGas::of::<MockGas>().unwrap();
        assert_relative_eq!(gas.gamma(), 1000.0 / 600.0);
    }

    #[test]
    fn rejects_non_physical_constants() {
        let r = SpecificGasConstant::new::<joule_per_kilogram_kelvin>(287.0);

        let zero_cp = PerfectGasParameters::new(
            r,
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(0.0),
        );
        assert!(matches!(
            PerfectGas::new(zero_cp),
            Err(PerfectGasParametersError::Cp { .. })
        ));

        let cp_below_r = PerfectGasParameters::new(
            r,
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(200.0),
        );
        assert!(matches!(
            PerfectGas::new(cp_below_r),
            Err(PerfectGasParametersError::NonPhysicalCv { .. })
        ));

        let negative_r = PerfectGasParameters::new(
            SpecificGasConstant::new::<joule_per_kilogram_kelvin>(-1.0),
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(1000.0),
        );
        assert!(matches!(
            PerfectGas::new(negative_r),
            Err(PerfectGasParametersError::GasConstant { .. })
        ));
    }

    #[test]
    fn isentropic_process_has_no_entropy_change() {
        let air = PerfectGas::air();
        let gamma = air.gamma();

        // T2/T1 = (p2/p1)^((γ-1)/γ) along an isentrope.
        let pressure_ratio: f64 = 4.0;
        let temperature_ratio = pressure_ratio.powf((gamma - 1.0) / gamma);

        let ds = air.entropy_change(temperature_ratio, pressure_ratio);
        assert_relative_eq!(
            ds.get::<joule_per_kilogram_kelvin>(),
            0.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn equation_of_state() {
        let air = PerfectGas::air();
        let t = ThermodynamicTemperature::new::<kelvin>(300.0);
        let p = Pressure::new::<kilopascal>(1000.0);

        let rho = air.density(p, t);
        assert_relative_eq!(
            rho.get::<kilogram_per_cubic_meter>(),
            1.0e6 / (287.0 * 300.0)
        );
    }
}
