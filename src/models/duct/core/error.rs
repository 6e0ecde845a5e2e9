use num_traits::Zero;
use thiserror::Error;
use uom::si::f64::{Area, Length};

use crate::support::{
    constraint::{Constrained, ConstraintError, StrictlyPositive},
    gas_dynamics::RelationError,
};

/// Errors that can occur while building or evaluating a duct.
#[derive(Debug, Error)]
pub enum DuctError {
    /// A design parameter or boundary condition violates its numeric constraint.
    #[error("invalid {parameter}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,

        #[source]
        source: ConstraintError,
    },

    /// The diffuser throat would choke below the nozzle mass flow or would
    /// not be a throat at all.
    #[error("diffuser throat area {throat_area:?} must lie in [{min:?}, {max:?})")]
    InvalidThroatArea {
        throat_area: Area,
        /// Nozzle throat area.
        min: Area,
        /// Test-section area.
        max: Area,
    },

    /// A gas-dynamic relation could not be evaluated or inverted.
    #[error("{context} failed")]
    RootFinding {
        /// What was being computed.
        context: &'static str,

        #[source]
        source: RelationError,
    },

    /// The diffuser throat is smaller than the critical area of the subsonic
    /// flow it has to pass, so no steady flow exists behind it.
    #[error("diffuser throat area {throat_area:?} is below the inflow critical area {critical_area:?}")]
    ChokedDiffuser {
        throat_area: Area,
        critical_area: Area,
    },

    /// An axial position lies outside the duct.
    #[error("position {position:?} is outside [0, {length:?}]")]
    OutOfRange { position: Length, length: Length },

    /// The pressure ratio matched none of the working conditions.
    ///
    /// Only a `NaN` pressure ratio, or an exact threshold hit with a zero
    /// classification tolerance, can produce this.
    #[error("pressure ratio {pressure_ratio} matches no working condition")]
    UnclassifiedRegime { pressure_ratio: f64 },
}

impl DuctError {
    /// Returns `true` for errors caused by invalid construction parameters.
    #[must_use]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::InvalidThroatArea { .. }
        )
    }

    /// Wraps a relation failure with context.
    pub(super) fn relation(context: &'static str) -> impl FnOnce(RelationError) -> Self {
        move |source| Self::RootFinding { context, source }
    }
}

/// Checks that `value` is strictly positive, naming it in the error.
pub(super) fn check_positive<T>(parameter: &'static str, value: T) -> Result<T, DuctError>
where
    T: PartialOrd + Zero,
{
    StrictlyPositive::new(value)
        .map(Constrained::into_inner)
        .map_err(|source| DuctError::InvalidParameter { parameter, source })
}
