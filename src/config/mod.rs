//! Configuration module for pagemeta
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use pagemeta::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagemeta.toml")).unwrap();
//! println!("Database: {}", config.storage.database_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetcherConfig, LinkCheckConfig, ServerConfig, StorageConfig, DEFAULT_USER_AGENT,
    MAX_LINK_SAMPLE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
