//! Configuration management for vipsgen

mod loader;
mod settings;

// Re-export main types
pub use loader::{CONFIG_ENV, ConfigLoader};
pub use settings::{Config, GeneratorConfig, PolicyConfig};
