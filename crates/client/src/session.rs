// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session teardown and navigation to the entry surface.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::credential::CredentialStore;

/// Where the user currently is, and how to send them somewhere else.
pub trait Navigator: Send + Sync {
    fn location(&self) -> String;

    fn navigate(&self, to: &str);
}

/// Navigator that tracks the current location and counts redirects.
#[derive(Debug)]
pub struct LocationNavigator {
    location: Mutex<String>,
    redirects: AtomicU32,
}

impl LocationNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self { location: Mutex::new(location.into()), redirects: AtomicU32::new(0) }
    }

    /// Number of navigations performed so far.
    pub fn redirects(&self) -> u32 {
        self.redirects.load(Ordering::Relaxed)
    }
}

impl Navigator for LocationNavigator {
    fn location(&self) -> String {
        self.location.lock().clone()
    }

    fn navigate(&self, to: &str) {
        let mut location = self.location.lock();
        tracing::info!(from = %*location, to, "redirect");
        *location = to.to_owned();
        self.redirects.fetch_add(1, Ordering::Relaxed);
    }
}

/// Clears the session and returns the user to the login surface.
#[derive(Clone)]
pub struct SessionTerminator {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl SessionTerminator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self { store, navigator, login_path: login_path.into() }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Idempotent: a second call finds an empty store and the user already
    /// on the login surface, and changes nothing.
    pub fn terminate(&self) {
        if !self.store.get().is_empty() {
            tracing::info!("ending session");
        }
        self.store.clear();
        if !self.is_at_login(&self.navigator.location()) {
            self.navigator.navigate(&self.login_path);
        }
    }

    fn is_at_login(&self, location: &str) -> bool {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        path.trim_end_matches('/') == self.login_path.trim_end_matches('/')
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
