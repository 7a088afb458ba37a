//! Error types for plugsync operations.
//!
//! This module defines [`PlugsyncError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PlugsyncError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `PlugsyncError::Other`) for unexpected errors
//! - A failure *reported* by the host package manager is not an error: it is
//!   a terminal outcome value (see `host::InstallOutcome`)

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for plugsync operations.
#[derive(Debug, Error)]
pub enum PlugsyncError {
    /// Remote version fetch failed at the transport level.
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// A manifest or response body could not be parsed.
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// The host's local dependency manifest does not exist.
    #[error("Local manifest not found: {path}")]
    ManifestMissing { path: PathBuf },

    /// Unexpected failure while submitting an install request.
    ///
    /// Distinct from a failure the package manager *reports*, which is a
    /// normal terminal outcome and never raised as an error.
    #[error("Install request for '{package}' failed: {message}")]
    Install { package: String, message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for plugsync operations.
pub type Result<T> = std::result::Result<T, PlugsyncError>;
