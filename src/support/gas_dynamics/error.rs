use thiserror::Error;

use crate::support::root::RootError;

/// Errors returned by the gas-dynamic relations.
#[derive(Debug, Error)]
pub enum RelationError {
    /// The argument lies outside the domain where the relation is defined.
    #[error("{quantity} = {value} is outside the valid domain {domain}")]
    OutOfDomain {
        quantity: &'static str,
        value: f64,
        domain: &'static str,
    },

    /// Inverting the relation failed.
    #[error("inverse relation failed")]
    Root(#[from] RootError),
}
