//! Working-gas property models.
//!
//! The duct relations only need a calorically perfect gas: a constant heat
//! capacity ratio for the isentropic and shock relations, and the gas constant
//! for the equation of state. Fluids supply their constants through
//! [`PerfectGasFluid`].

mod ideal_gas_eos;
mod perfect_gas;

pub mod fluid;

pub use perfect_gas::{PerfectGas, PerfectGasFluid, PerfectGasParameters, PerfectGasParametersError};
