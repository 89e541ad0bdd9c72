// ABOUTME: Application error types and result alias for the Trickline engine
// ABOUTME: Classifies failures into recoverable (fetch/mutation) and terminal categories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Trickline Contributors

use thiserror::Error;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type
///
/// Failures fall into two broad categories: recoverable transport failures
/// (`Database`, `ExternalService`) that the sync manager handles by re-fetching
/// the authoritative state, and terminal failures (`InvalidInput`,
/// `AuthRequired`, `Config`) that are rejected before any network call.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Remote service call failed
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Input validation failed before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation requires an authenticated user
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// Configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Database operation failure
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Remote service failure
    pub fn external_service(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    /// Validation failure
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Missing entity
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Missing authentication
    pub fn auth_required(msg: impl Into<String>) -> Self {
        Self::AuthRequired(msg.into())
    }

    /// Configuration failure
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Internal failure
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the failure is a transport-level error the sync manager
    /// recovers from by re-fetching the authoritative remote state
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::ExternalService(_))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e.to_string())
    }
}
