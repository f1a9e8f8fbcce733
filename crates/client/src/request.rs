// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound request descriptions and the dispatcher that sends them.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method};

use crate::credential::CredentialStore;

/// Description of one outbound call, independent of how often it is sent.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, headers: HeaderMap::new() }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach an explicit bearer credential; the dispatcher will not override it.
    pub fn bearer(mut self, token: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    pub fn has_authorization(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    /// Token of an explicit `Authorization: Bearer` header, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
    }
}

/// What an attempt is for, as far as authentication recovery is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Ordinary API call; eligible for refresh-and-replay.
    Managed,
    /// The refresh-endpoint call itself; a 401 here is never refreshable.
    Refresh,
}

/// One send of a [`RequestSpec`].
///
/// Attempts are immutable; a replay is a new attempt built with
/// [`Attempt::into_retry`], so the original request is never mutated.
#[derive(Debug, Clone)]
pub struct Attempt {
    request: Arc<RequestSpec>,
    kind: CallKind,
    retry: bool,
}

impl Attempt {
    pub fn new(request: RequestSpec) -> Self {
        Self { request: Arc::new(request), kind: CallKind::Managed, retry: false }
    }

    pub fn refresh_call(request: RequestSpec) -> Self {
        Self { request: Arc::new(request), kind: CallKind::Refresh, retry: false }
    }

    pub fn request(&self) -> &RequestSpec {
        &self.request
    }

    pub fn kind(&self) -> CallKind {
        self.kind
    }

    pub fn is_retry(&self) -> bool {
        self.retry
    }

    /// The replay of this attempt, carrying `access_token` explicitly.
    pub fn into_retry(self, access_token: &str) -> Self {
        let mut request = (*self.request).clone();
        request.headers.remove(AUTHORIZATION);
        let request = request.bearer(access_token);
        Self { request: Arc::new(request), kind: self.kind, retry: true }
    }
}

/// Sends attempts, attaching the current access credential.
pub struct Dispatcher {
    http: Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
}

impl Dispatcher {
    pub fn new(http: Client, base_url: impl Into<String>, store: Arc<dyn CredentialStore>) -> Self {
        Self { http, base_url: base_url.into(), store }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Access credential a request goes out with, read at call time.
    ///
    /// An explicit bearer wins and is never overridden. Otherwise the stored
    /// access credential is used; with none stored the request is sent bare
    /// and the server decides.
    pub fn credential_for(&self, request: &RequestSpec) -> Option<String> {
        if request.has_authorization() {
            return request.bearer_token().map(str::to_owned);
        }
        self.store.access_token()
    }

    /// Send one attempt. Only transport failures are errors; any HTTP status
    /// comes back as a response for the classifier to inspect.
    pub async fn send(&self, attempt: &Attempt) -> Result<reqwest::Response, reqwest::Error> {
        self.send_with_credential(attempt).await.map(|(resp, _)| resp)
    }

    /// Like [`Dispatcher::send`], also returning the access credential the
    /// request went out with: the explicit bearer if it carried one, else
    /// what the store supplied.
    pub async fn send_with_credential(
        &self,
        attempt: &Attempt,
    ) -> Result<(reqwest::Response, Option<String>), reqwest::Error> {
        let spec = attempt.request();
        let mut req = self.http.request(spec.method.clone(), self.url(&spec.path));
        req = req.headers(spec.headers.clone());
        let credential = self.credential_for(spec);
        if !spec.has_authorization() {
            if let Some(ref token) = credential {
                req = req.bearer_auth(token);
            }
        }
        if let Some(ref body) = spec.body {
            req = req.json(body);
        }
        tracing::debug!(method = %spec.method, path = %spec.path, retry = attempt.is_retry(), "dispatch");
        let resp = req.send().await?;
        Ok((resp, credential))
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
