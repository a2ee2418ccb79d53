// src/namelist/mod.rs

//! Namelist editing.
//!
//! - [`patch`] is the generic section/parameter patcher.
//! - [`gyre`] uses it to point a GYRE namelist at one stellar model.

pub mod gyre;
pub mod patch;

pub use gyre::{GyreContext, PreparedGyre};
pub use patch::{patch_document, patch_parameter, PatchOutcome};
