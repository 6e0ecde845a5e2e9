use std::cmp::Ordering;

use num_traits::One;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly greater than one.
///
/// Used for design Mach numbers, which must be supersonic.
///
/// # Examples
///
/// ```
/// use twine_gasdynamics::support::constraint::GreaterThanOne;
///
/// let mach = GreaterThanOne::new(2.4).unwrap();
/// assert_eq!(mach.into_inner(), 2.4);
///
/// assert!(GreaterThanOne::new(1.0).is_err());
/// assert!(GreaterThanOne::new(0.8).is_err());
/// assert!(GreaterThanOne::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GreaterThanOne;

impl GreaterThanOne {
    /// Constructs a [`Constrained<T, GreaterThanOne>`] if the value exceeds one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is less than or equal to one, or `NaN`.
    pub fn new<T: PartialOrd + One>(
        value: T,
    ) -> Result<Constrained<T, GreaterThanOne>, ConstraintError> {
        Constrained::<T, GreaterThanOne>::new(value)
    }
}

impl<T: PartialOrd + One> Constraint<T> for GreaterThanOne {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::one()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal | Ordering::Less) => Err(ConstraintError::BelowMinimum),
            None => Err(ConstraintError::NotANumber),
        }
    }
}
