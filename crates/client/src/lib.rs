// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated HTTP client for the organization administration backend.
//!
//! Attaches bearer credentials to outbound calls, refreshes them exactly once
//! under concurrent load, replays the calls that were waiting on the refresh,
//! and tears the session down when recovery is impossible.

pub mod api;
pub mod claims;
pub mod classify;
pub mod config;
pub mod credential;
pub mod error;
pub mod org;
pub mod refresh;
pub mod request;
pub mod session;
pub mod validate;

use std::sync::Once;

pub use crate::api::ApiClient;
pub use crate::config::ClientConfig;
pub use crate::error::{ClientError, RefreshError};

static CRYPTO_INIT: Once = Once::new();

/// Install the ring crypto provider for reqwest/rustls.
/// Only the first call has effect.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
