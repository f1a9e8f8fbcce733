// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Why a credential refresh could not produce a new access credential.
///
/// Cloneable so a single outcome can be broadcast to every caller that was
/// queued behind the refresh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    #[error("no refresh credential stored")]
    MissingRefreshToken,
    #[error("refresh request failed: {0}")]
    Network(String),
    #[error("refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The backend answered 2xx but the body carried no usable access credential.
    #[error("refresh protocol error: {0}")]
    Protocol(String),
    #[error("refresh endpoint reported the session as unauthenticated")]
    Unrecoverable,
    #[error("refresh timed out")]
    Timeout,
    #[error("refresh abandoned before it settled")]
    Abandoned,
    /// The session was ended or replaced while the refresh was in flight.
    #[error("session ended while refreshing")]
    Superseded,
}

impl RefreshError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRefreshToken => "MISSING_REFRESH_TOKEN",
            Self::Network(_) => "REFRESH_NETWORK",
            Self::Rejected { .. } => "REFRESH_REJECTED",
            Self::Protocol(_) => "REFRESH_PROTOCOL",
            Self::Unrecoverable => "REFRESH_UNAUTHENTICATED",
            Self::Timeout => "REFRESH_TIMEOUT",
            Self::Abandoned => "REFRESH_ABANDONED",
            Self::Superseded => "REFRESH_SUPERSEDED",
        }
    }
}

/// Errors surfaced to callers of [`crate::ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },
    #[error("request failed ({status}): {message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Refresh(#[from] RefreshError),
    #[error("authentication failed after refresh; session ended")]
    UnrecoverableAuth,
    #[error("{message}")]
    Api { message: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Stable machine-readable code.
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "NETWORK",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::Status { .. } => "STATUS",
            Self::Refresh(e) => e.as_str(),
            Self::UnrecoverableAuth => "UNRECOVERABLE_AUTH",
            Self::Api { .. } => "API",
            Self::Decode(_) => "DECODE",
            Self::Validation(_) => "VALIDATION",
            Self::Config(_) => "CONFIG",
        }
    }

    /// Whether this error means the session was torn down.
    pub fn ended_session(&self) -> bool {
        match self {
            Self::Refresh(RefreshError::Abandoned) => false,
            Self::Refresh(_) | Self::UnrecoverableAuth => true,
            _ => false,
        }
    }

    /// HTTP status carried by a passthrough error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::PermissionDenied { .. } => Some(403),
            Self::Status { status, .. } => Some(*status),
            Self::Refresh(RefreshError::Rejected { status, .. }) => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
