//! Shared types, error model, and configuration for benchbrief.
//!
//! This crate is the foundation depended on by all other benchbrief crates.
//! It provides:
//! - [`BenchbriefError`] — the unified error type
//! - Domain types ([`Category`], [`RawRecord`], [`Record`], [`RankedEntry`])
//! - Configuration ([`AppConfig`], config loading, credential resolution)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, Credentials, KeywordsConfig, SourceConfig, SummaryConfig, TelegramConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from,
    resolve_credentials,
};
pub use error::{BenchbriefError, Result};
pub use types::{Category, CategorySummary, RankedEntry, RawRecord, Record};
