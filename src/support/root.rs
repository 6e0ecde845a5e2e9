//! Bracketed scalar root finding.
//!
//! Every inverse gas relation and geometric lookup in this crate reduces to
//! finding `x` in `[lo, hi]` such that `f(x) = 0`. [`find_root`] adapts a plain
//! closure to the Twine [`bisection`] solver and reports failures as typed
//! [`RootError`]s: a bracket without a sign change means the request has no
//! solution, while hitting the iteration cap means it has one that could not
//! be resolved to the configured precision.

mod config;
mod error;
mod problem;

pub use config::RootConfig;
pub use error::RootError;

use log::trace;
use twine_solvers::equation::bisection;

use problem::{ScalarFunction, ZeroResidual};

/// Finds a root of `f` inside `bracket`.
///
/// Endpoints that are exact roots are returned without iterating.
///
/// # Errors
///
/// Returns [`RootError::NoSignChange`] if `f` does not change sign over the
/// bracket (or is not finite at an endpoint), [`RootError::NotConverged`] if
/// the iteration limit is reached, and [`RootError::Solver`] for any other
/// solver failure.
pub fn find_root<F>(f: F, bracket: [f64; 2], config: &RootConfig) -> Result<f64, RootError>
where
    F: Fn(f64) -> f64,
{
    let [lo, hi] = bracket;
    let residuals = [f(lo), f(hi)];

    if residuals[0] == 0.0 {
        return Ok(lo);
    }
    if residuals[1] == 0.0 {
        return Ok(hi);
    }

    let straddles = residuals[0] * residuals[1] < 0.0;
    if !straddles {
        return Err(RootError::NoSignChange { bracket, residuals });
    }

    let model = ScalarFunction::new(f);

    let solution = bisection::solve(
        &model,
        &ZeroResidual,
        bracket,
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            trace!("bisection step at x = {}", event.x());
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(RootError::NotConverged {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    Ok(solution.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn square_root_of_two() {
        let root = find_root(|x| x * x - 2.0, [0.0, 2.0], &RootConfig::default()).unwrap();
        assert_relative_eq!(root, 2.0_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn decreasing_function() {
        let root = find_root(|x| 1.0 - x, [0.0, 3.0], &RootConfig::default()).unwrap();
        assert_relative_eq!(root, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn exact_endpoint_root() {
        let root = find_root(|x| x - 1.0, [1.0, 5.0], &RootConfig::default()).unwrap();
        assert_eq!(root, 1.0);
    }

    #[test]
    fn no_sign_change_means_no_solution() {
        let err = find_root(|x| x * x + 1.0, [-1.0, 1.0], &RootConfig::default()).unwrap_err();
        assert!(matches!(err, RootError::NoSignChange { .. }));
    }

    #[test]
    fn non_finite_endpoint_is_rejected() {
        let err = find_root(|_| f64::NAN, [0.0, 1.0], &RootConfig::default()).unwrap_err();
        assert!(matches!(err, RootError::NoSignChange { .. }));
    }

    #[test]
    fn iteration_cap_is_reported() {
        let config = RootConfig {
            max_iters: 3,
            ..RootConfig::default()
        };
        let err = find_root(|x| x * x - 2.0, [0.0, 2.0], &config).unwrap_err();
        assert!(matches!(err, RootError::NotConverged { .. }));
    }
}
