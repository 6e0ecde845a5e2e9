//! Marker types for the numeric invariants of duct inputs.
//!
//! Areas, lengths, pressures and absolute temperatures must be strictly
//! positive, and a design Mach number must be supersonic. Each invariant is a
//! zero-sized marker implementing [`Constraint<T>`]. Wrapping a value in
//! [`Constrained<T, C>`] proves the check ran, so a constructor validates its
//! inputs once and carries the proof from there.
//!
//! - [`StrictlyPositive`]: `x > 0`
//! - [`GreaterThanOne`]: `x > 1`

mod greater_than_one;
mod strictly_positive;

use std::marker::PhantomData;

use thiserror::Error;

pub use greater_than_one::GreaterThanOne;
pub use strictly_positive::StrictlyPositive;

/// A numeric invariant checked by a marker type.
pub trait Constraint<T> {
    /// Checks that `value` satisfies the invariant.
    ///
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] describing how the value fails.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// How a value violates a [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is below the minimum allowed")]
    BelowMinimum,
}

/// A value known to satisfy the constraint `C`.
///
/// ```
/// use twine_gasdynamics::support::constraint::{Constrained, GreaterThanOne};
///
/// let mach = Constrained::<f64, GreaterThanOne>::new(2.4).unwrap();
/// assert_eq!(mach.into_inner(), 2.4);
/// assert!(Constrained::<f64, GreaterThanOne>::new(0.9).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Checks `value` against `C`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] from `C` if the value fails.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Returns the checked value.
    pub fn into_inner(self) -> T {
        self.value
    }
}
