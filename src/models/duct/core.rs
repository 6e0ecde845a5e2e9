//! Quasi-one-dimensional flow through the segments of a supersonic wind tunnel.
//!
//! A [`Nozzle`] is the only segment fed directly from the reservoir. A
//! [`CompositeDuct`] appends an optional [`TestSection`] and [`Diffuser`],
//! passing each segment's outflow to the next.
//!
//! Every converging-diverging segment goes through the same two steps: the
//! back-pressure ratio is classified against the segment's [`Thresholds`],
//! then the resulting [`WorkingCondition`] is resolved into a [`FlowField`]
//! that can be evaluated at any axial position.

mod composite;
mod config;
mod diffuser;
mod error;
mod field;
mod geometry;
mod nozzle;
mod regime;
mod test_section;

#[cfg(test)]
mod test_support;

pub use composite::{CompositeDuct, SegmentKind};
pub use config::DuctConfig;
pub use diffuser::{Diffuser, DiffuserCondition, DiffuserDesign};
pub use error::DuctError;
pub use field::{FlowField, Inflow, LocalFlow, NormalShockLocation};
pub use geometry::{SegmentGeometry, Side, WallPoint};
pub use nozzle::{BoundaryConditions, Nozzle, NozzleDesign};
pub use regime::{Thresholds, WorkingCondition};
pub use test_section::TestSection;
