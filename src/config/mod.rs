// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - [`model`] is the serde model of the TOML file.
//! - [`loader`] reads files from disk.
//! - [`validate`] turns a raw file into a validated [`ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_or_default};
pub use model::{ConfigFile, EngineSection, NodeTypeConfig, RawConfigFile};
