// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side form rules, checked before a request is sent.
//!
//! Each check reports the first violated rule as [`ClientError::Validation`].

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ClientError, Result};

struct Patterns {
    email: Regex,
    lower: Regex,
    upper: Regex,
    special: Regex,
}

static PATTERNS: LazyLock<Option<Patterns>> = LazyLock::new(|| {
    Some(Patterns {
        email: Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").ok()?,
        lower: Regex::new("[a-z]").ok()?,
        upper: Regex::new("[A-Z]").ok()?,
        special: Regex::new("[#!@]").ok()?,
    })
});

fn patterns() -> Result<&'static Patterns> {
    PATTERNS.as_ref().ok_or_else(|| ClientError::Validation("rule patterns unavailable".into()))
}

fn fail<T>(message: &str) -> Result<T> {
    Err(ClientError::Validation(message.to_owned()))
}

fn required(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return fail(message);
    }
    Ok(())
}

pub fn is_email(value: &str) -> bool {
    patterns().map(|p| p.email.is_match(value)).unwrap_or(false)
}

/// Invite and update user forms.
pub fn user(user_name: &str, email: &str, tags: &str) -> Result<()> {
    required(user_name, "Username is required")?;
    let len = user_name.chars().count();
    if len < 4 {
        return fail("Username must be at least 4 characters");
    }
    if len > 20 {
        return fail("Username must be at most 20 characters");
    }
    required(email, "Email is required")?;
    if !is_email(email) {
        return fail("Invalid email address");
    }
    if email.chars().count() > 80 {
        return fail("Email must be at most 80 characters");
    }
    required(tags, "At least one tag is required")
}

pub fn custom_role(name: &str, description: &str, tags: &str) -> Result<()> {
    required(name, "Role name is required")?;
    required(description, "Description is required")?;
    required(tags, "At least one tag is required")
}

/// Password change: 7 to 15 characters with a lowercase letter, an
/// uppercase letter and one of `#`, `!`, `@`; the confirmation must match.
pub fn new_password(current: &str, new: &str, confirm: &str) -> Result<()> {
    required(current, "Current password is required")?;
    let len = new.chars().count();
    if !(7..=15).contains(&len) {
        return fail("Password must be 7-15 characters");
    }
    let p = patterns()?;
    if !p.lower.is_match(new) {
        return fail("At least 1 lowercase letter required");
    }
    if !p.upper.is_match(new) {
        return fail("At least 1 uppercase letter required");
    }
    if !p.special.is_match(new) {
        return fail("At least 1 special character required (#, !, @)");
    }
    required(confirm, "Please confirm your new password")?;
    if new != confirm {
        return fail("Passwords do not match");
    }
    Ok(())
}

pub fn profile(
    first_name: &str,
    last_name: &str,
    phone: &str,
    secondary_email: Option<&str>,
) -> Result<()> {
    required(first_name, "First name is required")?;
    required(last_name, "Last name is required")?;
    required(phone, "Phone number is required")?;
    match secondary_email {
        Some(email) if !email.is_empty() && !is_email(email) => fail("Invalid email"),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
