//! Wind-tunnel duct models.
//!
//! [`Nozzle`] and [`CompositeDuct`] implement [`twine_core::Model`], mapping an
//! axial position to the [`LocalFlow`] there. The computational core is in the
//! internal `core` module.

mod core;

pub use self::core::{
    BoundaryConditions, CompositeDuct, Diffuser, DiffuserCondition, DiffuserDesign, DuctConfig,
    DuctError, FlowField, Inflow, LocalFlow, NormalShockLocation, Nozzle, NozzleDesign,
    SegmentGeometry, SegmentKind, Side, TestSection, Thresholds, WallPoint, WorkingCondition,
};

use twine_core::Model;
use uom::si::f64::Length;

impl Model for Nozzle {
    type Input = Length;
    type Output = LocalFlow;
    type Error = DuctError;

    fn call(&self, input: &Length) -> Result<LocalFlow, DuctError> {
        self.x_to_state(*input)
    }
}

impl Model for CompositeDuct {
    type Input = Length;
    type Output = LocalFlow;
    type Error = DuctError;

    fn call(&self, input: &Length) -> Result<LocalFlow, DuctError> {
        self.x_to_state(*input)
    }
}
