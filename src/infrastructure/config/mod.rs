//! Configuration loader implementations

mod toml_config;

pub use toml_config::TomlConfigLoader;
