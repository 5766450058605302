//! Infrastructure layer: filesystem access and service wiring

pub mod di;
pub mod error;
pub mod traits;

pub use di::ServiceContainer;
pub use error::InfraError;
