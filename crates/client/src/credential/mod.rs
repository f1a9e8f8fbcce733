// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential store: the access/refresh pair plus the cached organization
//! context and user info that belong to the same session.
//!
//! Any component may read at any time. Writes come only from login, logout,
//! the refresh coordinator's success path, and the session terminator.

pub mod normalize;
pub mod persist;

use std::path::PathBuf;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// An access credential and, optionally, the refresh credential issued with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Cached identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
}

/// Everything held for one session.
///
/// The two credentials are independent: a refresh credential without an
/// access credential is a valid mid-refresh state, and an access credential
/// without a refresh credential is valid for flows that never refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

impl SessionRecord {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Storage for the current [`SessionRecord`].
///
/// Implementations must be infallible from the caller's point of view: a
/// durable store that fails to persist logs the failure and keeps serving
/// the in-memory value.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> SessionRecord;

    /// Read-modify-write the record as one step. No other writer can
    /// interleave between the read and the write.
    fn update(&self, f: &mut dyn FnMut(&mut SessionRecord));

    fn put(&self, record: SessionRecord) {
        let mut next = Some(record);
        self.update(&mut |current| {
            if let Some(record) = next.take() {
                *current = record;
            }
        });
    }

    fn access_token(&self) -> Option<String> {
        self.get().access_token
    }

    fn refresh_token(&self) -> Option<String> {
        self.get().refresh_token
    }

    /// Replace the access credential. The refresh credential is replaced
    /// when the pair carries one and kept otherwise.
    fn set_credentials(&self, pair: CredentialPair) {
        let mut pair = Some(pair);
        self.update(&mut |record| {
            if let Some(pair) = pair.take() {
                apply_pair(record, pair);
            }
        });
    }

    /// Store a refreshed pair only if the session still holds the refresh
    /// credential it was issued for. Returns `false` and leaves the record
    /// untouched when the session was cleared or replaced in the meantime.
    fn rotate_credentials(&self, issued_for: Option<&str>, pair: CredentialPair) -> bool {
        let mut pair = Some(pair);
        let mut applied = false;
        self.update(&mut |record| {
            if record.refresh_token.as_deref() != issued_for {
                return;
            }
            if let Some(pair) = pair.take() {
                apply_pair(record, pair);
                applied = true;
            }
        });
        applied
    }

    fn current_org(&self) -> Option<String> {
        self.get().current_org
    }

    fn set_current_org(&self, org: Option<String>) {
        let mut org = Some(org);
        self.update(&mut |record| {
            if let Some(org) = org.take() {
                record.current_org = org;
            }
        });
    }

    fn user(&self) -> Option<UserInfo> {
        self.get().user
    }

    fn set_user(&self, user: Option<UserInfo>) {
        let mut user = Some(user);
        self.update(&mut |record| {
            if let Some(user) = user.take() {
                record.user = user;
            }
        });
    }

    /// Drop credentials, organization context and user info.
    fn clear(&self) {
        self.put(SessionRecord::default());
    }
}

fn apply_pair(record: &mut SessionRecord, pair: CredentialPair) {
    record.access_token = Some(pair.access_token);
    if pair.refresh_token.is_some() {
        record.refresh_token = pair.refresh_token;
    }
}

/// Process-local store. Does not survive restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RwLock<SessionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SessionRecord) -> Self {
        Self { record: RwLock::new(record) }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self) -> SessionRecord {
        self.record.read().clone()
    }

    fn update(&self, f: &mut dyn FnMut(&mut SessionRecord)) {
        f(&mut self.record.write());
    }
}

/// Resolve the state directory for the persisted session.
///
/// Checks `ORGCONSOLE_STATE_DIR`, then `$XDG_STATE_HOME/orgconsole`,
/// then `$HOME/.local/state/orgconsole`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ORGCONSOLE_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("orgconsole");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/orgconsole");
    }
    PathBuf::from(".orgconsole")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
