pub mod clock;
pub mod collaborators;
pub mod error;
pub mod events;
pub mod ids;
pub mod metrics;
pub mod shutdown;
pub mod telemetry;

pub use error::BoxError;
