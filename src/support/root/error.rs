use thiserror::Error;
use twine_solvers::equation::bisection;

/// Errors that can occur while finding a bracketed root.
#[derive(Debug, Error)]
pub enum RootError {
    /// The function has the same sign at both ends of the bracket.
    ///
    /// No root exists in the bracket, which for a physical relation means the
    /// requested state is infeasible.
    #[error("no sign change over [{}, {}]: f = ({}, {})", bracket[0], bracket[1], residuals[0], residuals[1])]
    NoSignChange {
        bracket: [f64; 2],
        residuals: [f64; 2],
    },

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual}")]
    NotConverged {
        /// Best residual achieved.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Solver(#[from] bisection::Error),
}
