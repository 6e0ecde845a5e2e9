//! Working gases with perfect-gas constants.
//!
//! Each fluid is a unit-like type implementing
//! [`PerfectGasFluid`](super::PerfectGasFluid).

mod air;
mod helium;
mod nitrogen;

pub use air::Air;
pub use helium::Helium;
pub use nitrogen::Nitrogen;
