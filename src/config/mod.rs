pub mod reddit;

pub use reddit::{load_default, load_from, ConfigError, MonitorConfig};
