// Configuration loading

pub mod settings;

pub use settings::{ConfigError, EditSettings, Settings};
