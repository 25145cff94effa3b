//! Error types for the user backend.

use crate::model::UserId;
use thiserror::Error;

/// Errors the user API reports.
///
/// The `Display` text is what ends up in the user-facing notification, so it stays short and
/// free of ids.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The requested user was not found.
    #[error("User not found")]
    NotFound(UserId),
}
