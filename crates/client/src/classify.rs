// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure classification for non-success responses.

use reqwest::StatusCode;

use crate::request::{Attempt, CallKind};

/// What to do about a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Access credential expired; refresh and replay.
    AuthExpired,
    /// 401 on a replay or on the refresh call; end the session.
    Unrecoverable,
    /// Anything else, including 403; hand the error to the caller unchanged.
    Other,
}

pub fn classify(status: StatusCode, attempt: &Attempt) -> Verdict {
    if status != StatusCode::UNAUTHORIZED {
        return Verdict::Other;
    }
    if attempt.is_retry() || attempt.kind() == CallKind::Refresh {
        Verdict::Unrecoverable
    } else {
        Verdict::AuthExpired
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
