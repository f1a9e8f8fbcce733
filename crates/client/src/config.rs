// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;
use crate::org::OrgEncoding;

/// Connection and session settings for [`crate::ApiClient`].
#[derive(Debug, Clone, clap::Args)]
pub struct ClientConfig {
    /// Base origin of the administration API.
    #[arg(long, default_value = "http://127.0.0.1:8080", env = "ORGCONSOLE_API_URL")]
    pub api_url: String,

    /// Timeout for ordinary API requests in milliseconds.
    #[arg(long, default_value_t = 30000, env = "ORGCONSOLE_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: u64,

    /// Upper bound on a credential refresh in milliseconds.
    #[arg(long, default_value_t = 10000, env = "ORGCONSOLE_REFRESH_TIMEOUT_MS")]
    pub refresh_timeout_ms: u64,

    /// Upper bound on the login-time organization lookup in milliseconds.
    #[arg(long, default_value_t = 2000, env = "ORGCONSOLE_ORG_LOOKUP_TIMEOUT_MS")]
    pub org_lookup_timeout_ms: u64,

    /// Encoding applied to organization identifiers in URL paths.
    #[arg(long, value_enum, default_value_t = OrgEncoding::Percent, env = "ORGCONSOLE_ORG_ENCODING")]
    pub org_encoding: OrgEncoding,

    /// Entry surface the session is sent back to when it ends.
    #[arg(long, default_value = "/login", env = "ORGCONSOLE_LOGIN_PATH")]
    pub login_path: String,

    /// Directory holding the persisted session.
    #[arg(long, env = "ORGCONSOLE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Accept invalid TLS certificates (debug builds only).
    #[arg(long, env = "ORGCONSOLE_INSECURE_TLS")]
    pub insecure_tls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080".to_owned(),
            request_timeout_ms: 30000,
            refresh_timeout_ms: 10000,
            org_lookup_timeout_ms: 2000,
            org_encoding: OrgEncoding::Percent,
            login_path: "/login".to_owned(),
            state_dir: None,
            insecure_tls: false,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `api_url` with every other field defaulted.
    pub fn for_url(api_url: impl Into<String>) -> Self {
        Self { api_url: api_url.into(), ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("api url {:?}: {e}", self.api_url)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::Config(format!("unsupported api url scheme: {}", url.scheme())));
        }
        if self.request_timeout_ms == 0
            || self.refresh_timeout_ms == 0
            || self.org_lookup_timeout_ms == 0
        {
            return Err(ClientError::Config("timeouts must be greater than zero".to_owned()));
        }
        if !self.login_path.starts_with('/') {
            return Err(ClientError::Config(format!(
                "login path must start with '/': {}",
                self.login_path
            )));
        }
        Ok(())
    }

    /// API origin without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }

    pub fn org_lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.org_lookup_timeout_ms)
    }

    /// Whether certificate validation is relaxed. Always false in release builds.
    pub fn accept_invalid_certs(&self) -> bool {
        if self.insecure_tls && !cfg!(debug_assertions) {
            tracing::warn!("--insecure-tls is ignored in release builds");
            return false;
        }
        self.insecure_tls
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
