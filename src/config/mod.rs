// src/config/mod.rs

//! Run file loading and validation.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a run file from disk.
//! - `validate.rs`: checks that turn a `RawConfigFile` into a `ConfigFile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{BatchSection, ConfigFile, GyreSection, RawConfigFile, RunSection};
