//! Problem formulation for scalar root finding.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};

/// Model adapter evaluating a scalar function.
pub(super) struct ScalarFunction<F> {
    f: F,
}

impl<F: Fn(f64) -> f64> ScalarFunction<F> {
    pub(super) fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F: Fn(f64) -> f64> Model for ScalarFunction<F> {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, input: &f64) -> Result<f64, Infallible> {
        Ok((self.f)(*input))
    }
}

/// Equation problem driving the function value to zero.
pub(super) struct ZeroResidual;

impl EquationProblem<1> for ZeroResidual {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<f64, Infallible> {
        Ok(x[0])
    }

    fn residuals(&self, _input: &f64, output: &f64) -> Result<[f64; 1], Infallible> {
        Ok([*output])
    }
}
