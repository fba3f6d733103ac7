//! rf-components: physical engine components.
//!
//! Each component implements [`Contributor`], registering its known values
//! and relationships into an [`rf_pool::Pool`]. Parameters are `uom`
//! quantities; the pool holds their SI values under the names in
//! [`quantities`].

pub mod chamber;
pub mod common;
pub mod component;
pub mod error;
pub mod fuel;
pub mod injector;
pub mod nozzle;
pub mod pump;
pub mod quantities;
pub mod tank;
pub mod traits;

pub use chamber::{Chamber, CombustionProducts, isentropic_exit_velocity};
pub use common::PhysicalProps;
pub use component::Component;
pub use error::{ComponentError, ComponentResult};
pub use fuel::{Fluid, Fuel};
pub use injector::{Injector, Throat};
pub use nozzle::Nozzle;
pub use pump::{PropellantRole, Pump};
pub use tank::Tank;
pub use traits::Contributor;
