#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative code hierarchy resolution.
//!
//! Parses fixed-width H-Codes into a country → primary → secondary →
//! tertiary tree, keeps parent/child indices for registered regions, and
//! identifies aggregate ("total") labels that must never enter the
//! demographic pipeline.
//!
//! Lookups on unknown codes return `None` or an empty list; code parsing
//! never fails and degrades through padding and truncation instead.

pub mod code;
pub mod hierarchy;
pub mod patterns;

pub use hierarchy::HierarchyResolver;

use thiserror::Error;

/// Errors that can occur while loading region configuration.
#[derive(Debug, Error)]
pub enum RegionError {
    /// Aggregate-pattern TOML could not be parsed.
    #[error("Pattern config error: {0}")]
    Patterns(#[from] toml::de::Error),

    /// I/O error reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
