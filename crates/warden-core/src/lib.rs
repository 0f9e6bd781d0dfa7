//! Core types, configuration, and error handling for Warden.
//!
//! This crate provides the shared foundation used by the other Warden crates:
//! - [`WardenError`] — unified error type using `thiserror`
//! - [`WardenConfig`] — configuration loaded from `.warden.toml`
//! - Shared types: [`IssueEvent`], [`EventKind`], [`IssueType`], [`Language`],
//!   [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{GitHubConfig, LlmConfig, WardenConfig};
pub use error::WardenError;
pub use types::{EventKind, IssueEvent, IssueType, Language, OutputFormat};

/// A convenience `Result` type for Warden operations.
pub type Result<T> = std::result::Result<T, WardenError>;
