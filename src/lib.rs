pub mod config;
pub mod utils;

pub use config::{load, load_with_dev_server, Config, EnvSnapshot};
pub use utils::error::ConfigError;
