// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight credential refresh.
//!
//! At most one refresh runs at a time. Callers that hit an expired
//! credential while a refresh is in flight queue behind it and receive the
//! same outcome, settled in the order they queued. A caller whose 401 comes
//! back after a refresh already replaced the credential it was sent with
//! gets the stored credential instead of starting another refresh. The
//! in-flight flag and the queue live under one mutex so check-and-set and
//! drain-and-reset are each a single step.
//!
//! A refresh result is only written back if the session still holds the
//! refresh credential the leader started from. Logout, teardown or a new
//! login while the refresh is in flight wins over the late result.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::credential::{CredentialPair, CredentialStore};
use crate::error::RefreshError;
use crate::session::SessionTerminator;

/// New access credential, or the reason there is none.
pub type Outcome = Result<String, RefreshError>;

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: VecDeque<oneshot::Sender<Outcome>>,
}

pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    store: Arc<dyn CredentialStore>,
    terminator: SessionTerminator,
    timeout: Duration,
}

enum Role {
    Leader { issued_for: Option<String> },
    Waiter(oneshot::Receiver<Outcome>),
    Current(String),
}

impl RefreshCoordinator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        terminator: SessionTerminator,
        timeout: Duration,
    ) -> Self {
        Self { state: Mutex::new(RefreshState::default()), store, terminator, timeout }
    }

    pub fn in_flight(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Number of callers queued behind the in-flight refresh.
    pub fn pending(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Obtain a fresh access credential.
    ///
    /// `stale` is the access credential the failed request was sent with.
    /// If the store already holds a different one and nothing is in flight,
    /// that credential is returned without refreshing.
    ///
    /// Otherwise the first caller becomes the leader: it reads the stored
    /// refresh credential and runs `refresh` with it under the configured
    /// timeout. Everyone arriving while that is in flight waits for the
    /// leader's outcome instead of calling `refresh` themselves.
    ///
    /// On success the new pair is written to the store before any waiter is
    /// released. On failure the session is terminated once, then every
    /// waiter is rejected with the same error.
    pub async fn ensure_fresh_credential<F, Fut>(&self, stale: Option<&str>, refresh: F) -> Outcome
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<CredentialPair, RefreshError>>,
    {
        let role = {
            let mut state = self.state.lock();
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.waiters.push_back(tx);
                Role::Waiter(rx)
            } else {
                match self.store.access_token().filter(|current| Some(current.as_str()) != stale) {
                    Some(current) => Role::Current(current),
                    None => {
                        state.in_flight = true;
                        Role::Leader { issued_for: self.store.refresh_token() }
                    }
                }
            }
        };

        match role {
            Role::Current(token) => {
                tracing::debug!("credential already refreshed");
                Ok(token)
            }
            Role::Waiter(rx) => rx.await.unwrap_or(Err(RefreshError::Abandoned)),
            Role::Leader { issued_for } => {
                let mut guard = LeaderGuard { coordinator: self, armed: true };
                let result = self.run(issued_for.clone(), refresh).await;
                guard.armed = false;
                self.complete(result, issued_for.as_deref())
            }
        }
    }

    async fn run<F, Fut>(
        &self,
        refresh_token: Option<String>,
        refresh: F,
    ) -> Result<CredentialPair, RefreshError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<CredentialPair, RefreshError>>,
    {
        let refresh_token = refresh_token.ok_or(RefreshError::MissingRefreshToken)?;
        tracing::info!("refreshing credentials");
        match tokio::time::timeout(self.timeout, refresh(refresh_token)).await {
            Ok(result) => result,
            Err(_) => Err(RefreshError::Timeout),
        }
    }

    /// Apply the leader's result, reset the flag, and settle the queue.
    ///
    /// `issued_for` is the refresh credential the leader started from. A
    /// session that no longer holds it was ended or replaced during the
    /// refresh and is left as it is.
    fn complete(
        &self,
        result: Result<CredentialPair, RefreshError>,
        issued_for: Option<&str>,
    ) -> Outcome {
        let (outcome, waiters) = {
            let mut state = self.state.lock();
            let outcome = match result {
                Ok(pair) => {
                    let access = pair.access_token.clone();
                    if self.store.rotate_credentials(issued_for, pair) {
                        Ok(access)
                    } else {
                        Err(RefreshError::Superseded)
                    }
                }
                Err(e) => {
                    if self.store.refresh_token().as_deref() == issued_for {
                        self.terminator.terminate();
                    }
                    Err(e)
                }
            };
            state.in_flight = false;
            (outcome, std::mem::take(&mut state.waiters))
        };

        match &outcome {
            Ok(_) => tracing::info!(waiters = waiters.len(), "credentials refreshed"),
            Err(RefreshError::Superseded) => {
                tracing::info!(waiters = waiters.len(), "session changed during refresh; result dropped")
            }
            Err(e) => tracing::warn!(waiters = waiters.len(), err = %e, "credential refresh failed"),
        }
        settle(waiters, &outcome);
        outcome
    }

    /// Leader went away before finishing: free the queue without touching the session.
    fn abandon(&self) {
        let waiters = {
            let mut state = self.state.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        tracing::warn!(waiters = waiters.len(), "credential refresh abandoned");
        settle(waiters, &Err(RefreshError::Abandoned));
    }
}

/// Settle waiters in FIFO order.
fn settle(waiters: VecDeque<oneshot::Sender<Outcome>>, outcome: &Outcome) {
    for tx in waiters {
        let _ = tx.send(outcome.clone());
    }
}

struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    armed: bool,
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.coordinator.abandon();
        }
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
