// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The managed client: dispatch, classify, refresh-and-replay, teardown.

pub mod auth;
pub mod profile;
pub mod roles;
pub mod users;

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::classify::{classify, Verdict};
use crate::config::ClientConfig;
use crate::credential::normalize::token_fields;
use crate::credential::{CredentialPair, CredentialStore};
use crate::error::{ClientError, RefreshError, Result};
use crate::org::{Area, OrgScope};
use crate::refresh::RefreshCoordinator;
use crate::request::{Attempt, Dispatcher, RequestSpec};
use crate::session::{Navigator, SessionTerminator};

/// Authenticated client for the administration API.
pub struct ApiClient {
    config: ClientConfig,
    store: Arc<dyn CredentialStore>,
    dispatcher: Dispatcher,
    org: OrgScope,
    coordinator: RefreshCoordinator,
    terminator: SessionTerminator,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        config.validate()?;
        crate::ensure_crypto();
        let http = Client::builder()
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs())
            .build()?;

        let terminator =
            SessionTerminator::new(Arc::clone(&store), navigator, config.login_path.clone());
        let coordinator = RefreshCoordinator::new(
            Arc::clone(&store),
            terminator.clone(),
            config.refresh_timeout(),
        );
        Ok(Self {
            dispatcher: Dispatcher::new(http, config.base_url(), Arc::clone(&store)),
            org: OrgScope::new(Arc::clone(&store), config.org_encoding),
            store,
            coordinator,
            terminator,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn org(&self) -> &OrgScope {
        &self.org
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    pub fn terminator(&self) -> &SessionTerminator {
        &self.terminator
    }

    /// Org-scoped path; `org` overrides the current organization context.
    pub fn path(&self, org: Option<&str>, area: Area, action: &str, tail: &[&str]) -> String {
        self.org.path(org, area, action, tail)
    }

    /// Send a request through the managed path.
    ///
    /// Returns the successful response, a passthrough error for anything
    /// that is not an authentication failure, or the terminal error after
    /// the session has been torn down. A 401 is never returned as such.
    pub async fn send(&self, spec: RequestSpec) -> Result<Response> {
        let attempt = Attempt::new(spec);
        let (resp, sent_with) = self.dispatcher.send_with_credential(&attempt).await?;
        if resp.status().is_success() {
            return Ok(resp);
        }

        match classify(resp.status(), &attempt) {
            Verdict::Other => Err(status_error(resp).await),
            Verdict::Unrecoverable => Err(self.unrecoverable(&attempt)),
            Verdict::AuthExpired => {
                tracing::debug!(path = %attempt.request().path, "access credential expired");
                self.replay_after_refresh(attempt, sent_with.as_deref()).await
            }
        }
    }

    /// Wait for a fresh credential, then replay `attempt` once with it.
    /// `sent_with` is the credential the server rejected.
    async fn replay_after_refresh(&self, attempt: Attempt, sent_with: Option<&str>) -> Result<Response> {
        let token = self
            .coordinator
            .ensure_fresh_credential(sent_with, |rt| self.call_refresh(rt))
            .await?;
        let retry = attempt.into_retry(&token);
        let resp = self.dispatcher.send(&retry).await?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        match classify(resp.status(), &retry) {
            Verdict::Unrecoverable => Err(self.unrecoverable(&retry)),
            _ => Err(status_error(resp).await),
        }
    }

    fn unrecoverable(&self, attempt: &Attempt) -> ClientError {
        tracing::warn!(
            path = %attempt.request().path,
            retry = attempt.is_retry(),
            "authentication failed after refresh"
        );
        self.terminator.terminate();
        ClientError::UnrecoverableAuth
    }

    /// Call the refresh endpoint for the current organization context.
    async fn call_refresh(&self, refresh_token: String) -> Result<CredentialPair, RefreshError> {
        let spec =
            RequestSpec::post(self.org.refresh_path()).json(json!({ "refreshToken": refresh_token }));
        let attempt = Attempt::refresh_call(spec);
        let resp =
            self.dispatcher.send(&attempt).await.map_err(|e| RefreshError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            if classify(status, &attempt) == Verdict::Unrecoverable {
                return Err(RefreshError::Unrecoverable);
            }
            let message = error_message(resp).await;
            return Err(RefreshError::Rejected { status: status.as_u16(), message });
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| RefreshError::Protocol(format!("unreadable body: {e}")))?;
        token_fields(&body)
            .into_pair()
            .ok_or_else(|| RefreshError::Protocol("response carried no access token".to_owned()))
    }

    /// Send without refresh handling: non-success statuses become errors
    /// directly. Used by login and logout, where a 401 is not an expiry.
    pub(crate) async fn send_unmanaged(&self, spec: RequestSpec) -> Result<Response> {
        let attempt = Attempt::new(spec);
        let resp = self.dispatcher.send(&attempt).await?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(status_error(resp).await)
        }
    }

    /// Managed send, decoding a JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        let resp = self.send(spec).await?;
        decode(resp).await
    }

    /// Managed send, discarding the body.
    pub async fn send_empty(&self, spec: RequestSpec) -> Result<()> {
        self.send(spec).await?;
        Ok(())
    }
}

pub(crate) async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes().await?;
    let body = if bytes.is_empty() { &b"null"[..] } else { &bytes[..] };
    Ok(serde_json::from_slice(body)?)
}

/// Map a non-success response to the passthrough error for its status.
async fn status_error(resp: Response) -> ClientError {
    let status = resp.status();
    let message = error_message(resp).await;
    if status == StatusCode::FORBIDDEN {
        ClientError::PermissionDenied { message }
    } else {
        ClientError::Status { status: status.as_u16(), message }
    }
}

/// Best human-readable message from an error body.
async fn error_message(resp: Response) -> String {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
        for key in ["message", "description", "title", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                if !msg.is_empty() {
                    return msg.to_owned();
                }
            }
        }
    }
    if text.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_owned()
    } else {
        text
    }
}
