pub mod dispatcher;
pub mod error;
pub mod modes;
pub mod rewards;
pub mod settings;
pub mod teleports;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use modes::ModeDef;
pub use settings::{CoordinatorConfig, CoordinatorSettings};
