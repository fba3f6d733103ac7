//! rf-pool: the shared propagation pool.
//!
//! A pool is a [`QuantityRegistry`] (named symbols plus the known-value
//! mapping) together with a [`RelationshipSet`]. Components contribute to it;
//! [`resolve`] substitutes what is known and asks an
//! [`EquationSolver`](rf_solver::EquationSolver) for the rest in a single pass.

pub mod pool;
pub mod registry;
pub mod relations;
pub mod resolve;

pub use pool::Pool;
pub use registry::{KnownValues, QuantityRegistry};
pub use relations::RelationshipSet;
pub use resolve::{Resolution, resolve};
