//! Quasi-one-dimensional gas-dynamic relations for a calorically perfect gas.
//!
//! - [`Isentropic`]: Stagnation-to-static ratios and area ratios versus Mach number.
//! - [`NormalShock`]: Jump conditions across a stationary normal shock.
//! - [`PrandtlMeyer`]: Turning angle of an isentropic supersonic expansion.
//!
//! Forward relations are closed-form. Inverse relations solve for Mach number
//! over a bracket using [`find_root`](crate::support::root::find_root), so every
//! relation type carries a [`RootConfig`](crate::support::root::RootConfig).
//!
//! Mach numbers are plain `f64` values.

mod error;
mod isentropic;
mod normal_shock;
mod prandtl_meyer;

pub use error::RelationError;
pub use isentropic::Isentropic;
pub use normal_shock::NormalShock;
pub use prandtl_meyer::PrandtlMeyer;

/// Smallest Mach number considered by inverse relations.
pub const MIN_MACH: f64 = 1e-5;

/// Largest Mach number considered by inverse relations.
pub const MAX_MACH: f64 = 100.0;

/// Which of the two Mach numbers sharing an area ratio is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Subsonic,
    Supersonic,
}

impl Branch {
    /// Mach number bracket searched on this branch.
    #[must_use]
    pub fn bracket(self) -> [f64; 2] {
        match self {
            Branch::Subsonic => [MIN_MACH, 1.0],
            Branch::Supersonic => [1.0, MAX_MACH],
        }
    }

    /// Returns the branch a Mach number lies on.
    ///
    /// Sonic flow is reported as supersonic.
    #[must_use]
    pub fn of(mach: f64) -> Self {
        if mach < 1.0 {
            Branch::Subsonic
        } else {
            Branch::Supersonic
        }
    }
}
