//! # Framework Errors
//!
//! This module defines the common error types used throughout the shell framework.
//! By centralizing error definitions, store, action, and registry failures read the same way
//! wherever they surface.

/// Errors that can occur within the shell framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Duplicate id: {0}")]
    DuplicateId(String),
    /// A failure reported by the data source. The message is passed through verbatim so it can
    /// be shown to the user as-is.
    #[error("{0}")]
    DataSource(Box<dyn std::error::Error + Send + Sync>),
    #[error("Unknown module: {0}")]
    UnknownModule(String),
    #[error("Failed to load module {name}: {reason}")]
    ModuleLoad { name: String, reason: String },
}
