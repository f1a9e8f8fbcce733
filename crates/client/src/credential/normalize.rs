// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps the token shapes the backend emits onto [`CredentialPair`].
//!
//! Accepted, in order of preference: `token.access_token`,
//! `token.accessToken`, top-level `access_token`, top-level `accessToken`
//! (refresh credential likewise). Empty strings count as absent.

use serde_json::Value;

use crate::credential::CredentialPair;

const ACCESS_KEYS: &[&str] = &["access_token", "accessToken"];
const REFRESH_KEYS: &[&str] = &["refresh_token", "refreshToken"];

/// Canonical view of a token-bearing response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFields {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_name: Option<String>,
}

impl TokenFields {
    /// Convert into a pair, or `None` when no access credential was present.
    pub fn into_pair(self) -> Option<CredentialPair> {
        let access_token = self.access_token?;
        Some(CredentialPair { access_token, refresh_token: self.refresh_token })
    }
}

/// Extract credential fields from a response body.
pub fn token_fields(body: &Value) -> TokenFields {
    let nested = body.get("token").filter(|t| t.is_object());
    let scopes: Vec<&Value> = nested.into_iter().chain(std::iter::once(body)).collect();

    TokenFields {
        access_token: first_string(&scopes, ACCESS_KEYS),
        refresh_token: first_string(&scopes, REFRESH_KEYS),
        user_name: first_string(&scopes, &["userName", "user_name"]),
    }
}

fn first_string(scopes: &[&Value], keys: &[&str]) -> Option<String> {
    scopes.iter().find_map(|scope| {
        keys.iter().find_map(|key| {
            scope.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_owned)
        })
    })
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
