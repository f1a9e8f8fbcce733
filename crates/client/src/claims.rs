// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unverified identity claims read from the access credential.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;

/// Who the access credential says the user is. Empty fields mean unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
    pub user_id: String,
}

impl Identity {
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.user_id.is_empty()
    }
}

/// Decode the payload segment of a JWT without verifying it.
///
/// Returns an empty identity when the token is absent or malformed.
pub fn identity(token: Option<&str>) -> Identity {
    token.and_then(payload).map(|claims| from_claims(&claims)).unwrap_or_default()
}

fn payload(token: &str) -> Option<Value> {
    let segment = token.split('.').nth(1)?;
    // Some issuers pad the segment; the no-pad engine rejects that.
    let bytes = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn from_claims(claims: &Value) -> Identity {
    let text = |key: &str| {
        claims.get(key).and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    };
    Identity {
        username: text("preferred_username").unwrap_or_default(),
        user_id: text("sub").or_else(|| text("id")).or_else(|| text("userId")).unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "claims_tests.rs"]
mod tests;
