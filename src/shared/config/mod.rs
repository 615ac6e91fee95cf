pub mod global;
pub mod model;

pub use global::CONFIG;
pub use model::{LoggingConfig, ServerConfig, Settings, StoreConfig, load_settings_from};
