//! Equation-solving backend for the rocketflow propagation pool.
//!
//! Provides symbols and expression trees, equations between them, the
//! [`EquationSolver`] capability with a Gauss-Newton implementation, and a
//! scalar bisection root finder for inverting closed-form relations.

pub mod backend;
pub mod equation;
pub mod error;
pub mod expr;
pub mod jacobian;
pub mod newton;
pub mod roots;

pub use backend::{Assignment, EquationSolver, NewtonSolver};
pub use equation::Equation;
pub use error::{SolverError, SolverResult};
pub use expr::{Expr, Symbol};
pub use newton::{NewtonConfig, NewtonResult};
pub use roots::{BisectConfig, bisect};
