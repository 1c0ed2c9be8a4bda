//! Error types for model loading and parsing.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Failures while loading or saving a model artifact.
///
/// Any of these is fatal for the load: there is no retry and no degraded
/// fallback model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model file {path}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported model version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// Failures surfaced by the parsing API.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input produced no taggable tokens (empty or pure whitespace),
    /// and the calling API requires at least one component.
    #[error("input contains no taggable tokens")]
    InvalidInput,

    /// The process-wide default model could not be loaded. Every subsequent
    /// call fails the same way; the load is not retried. The underlying
    /// [`ModelError`] is shared so callers can tell Io from Format from
    /// Version failures.
    #[error("address model is not available: {0}")]
    ModelNotLoaded(#[source] Arc<ModelError>),

    /// A label occurred in two disjoint runs while grouping components, so
    /// the address cannot be summarized as one value per label. Carries the
    /// full (token, label) parse so callers can inspect the conflict.
    #[error("label {label} appears in multiple non-adjacent groups")]
    RepeatedLabel {
        label: String,
        /// The complete per-token parse that triggered the conflict.
        parse: Vec<(String, String)>,
    },
}
