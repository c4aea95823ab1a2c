//! Shared types, error model, and configuration for Wikiracer.
//!
//! This crate is the foundation depended on by all other Wikiracer crates.
//! It provides:
//! - [`WikiracerError`]: the unified error type
//! - Domain types ([`Title`], [`Coordinates`], [`TraversalResult`], [`RaceSettings`])
//! - Configuration ([`AppConfig`], [`ClientConfig`], config and settings loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ApiConfig, AppConfig, ClientConfig, RaceConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, load_settings,
};
pub use error::{Result, WikiracerError};
pub use types::{Coordinates, RaceSettings, Title, TraversalResult};
