//! How components contribute knowledge to a propagation pool.

use crate::common::PhysicalProps;
use crate::error::ComponentResult;
use rf_pool::Pool;

/// A physical component that contributes to a shared pool.
///
/// Contributions come in two kinds, run as separate passes over every
/// component in the assembly:
///
/// 1. [`declare`](Contributor::declare): known values and relationships. The
///    solver can run these in any direction.
/// 2. [`evaluate`](Contributor::evaluate): eager closed-form arithmetic over
///    what the pool knows after every declaration. Outputs written here have
///    no relationship back to their inputs, so they can't be inferred in
///    reverse; [`direct_outputs`](Contributor::direct_outputs) lists them.
pub trait Contributor: Send + Sync {
    /// Mass, volume and density.
    fn props(&self) -> &PhysicalProps;

    /// Register known values and relationships.
    fn declare(&self, pool: &mut Pool);

    /// Eager direct evaluation. Default: none.
    fn evaluate(&self, _pool: &mut Pool) {}

    /// Quantities `evaluate` may write.
    fn direct_outputs(&self) -> &'static [&'static str] {
        &[]
    }

    /// Check that parameters are physical.
    fn validate(&self) -> ComponentResult<()> {
        self.props().validate()
    }
}
