//! Supporting utilities used by the duct models.
//!
//! These modules are public because they are useful on their own (for example,
//! the gas relations for hand calculations), but their APIs are not stable.

pub mod constraint;
pub mod gas_dynamics;
pub mod root;
pub mod thermo;
pub mod units;
