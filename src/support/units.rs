//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for all physical units (pressure, area, length,
//! temperature, density). This module provides the gas-dynamics quantities
//! that aren't included in [`uom`].

mod quantities;

pub use quantities::{SpecificEntropy, SpecificGasConstant};
