// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that spawn the real `orgconsole` binary against
//! the mock backend.

use orgconsole_specs::{Console, MockBackend, RefreshMode, PASSWORD};

async fn logged_in() -> anyhow::Result<(MockBackend, Console)> {
    let backend = MockBackend::start().await?;
    let console = Console::new(&backend)?;
    let out = console.run(&["login", "--username", "alice", "--password", PASSWORD]).await?;
    anyhow::ensure!(out.code == 0, "login failed: {}", out.stderr);
    Ok((backend, console))
}

#[tokio::test]
async fn login_persists_session() -> anyhow::Result<()> {
    let (_backend, console) = logged_in().await?;
    let session = console.session()?;
    assert_eq!(session["current_org"], "acme");
    assert_eq!(session["refresh_token"], "refresh-1");

    let out = console.run(&["whoami", "--json"]).await?;
    assert_eq!(out.code, 0, "{}", out.stderr);
    let who: serde_json::Value = serde_json::from_str(&out.stdout)?;
    assert_eq!(who["username"], "alice");
    assert_eq!(who["org"], "acme");
    Ok(())
}

#[tokio::test]
async fn users_list_json() -> anyhow::Result<()> {
    let (_backend, console) = logged_in().await?;
    let out = console.run(&["users", "list", "--json"]).await?;
    assert_eq!(out.code, 0, "{}", out.stderr);
    let users: Vec<serde_json::Value> = serde_json::from_str(&out.stdout)?;
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["userName"], "alice");
    Ok(())
}

#[tokio::test]
async fn expired_session_refreshes_between_invocations() -> anyhow::Result<()> {
    let (backend, console) = logged_in().await?;
    backend.expire();

    let out = console.run(&["users", "count"]).await?;
    assert_eq!(out.code, 0, "{}", out.stderr);
    assert_eq!(out.stdout.trim(), "2");
    assert_eq!(backend.refresh_calls(), 1);
    assert_eq!(console.session()?["refresh_token"], "refresh-2");
    Ok(())
}

#[tokio::test]
async fn rejected_refresh_exits_with_session_ended() -> anyhow::Result<()> {
    let (backend, console) = logged_in().await?;
    backend.set_refresh_mode(RefreshMode::Reject401);
    backend.expire();

    let out = console.run(&["roles", "list"]).await?;
    assert_eq!(out.code, 3, "{}", out.stderr);
    let session = console.session()?;
    assert!(session.get("access_token").is_none(), "{session}");
    Ok(())
}

#[tokio::test]
async fn invalid_form_exits_with_usage_error() -> anyhow::Result<()> {
    let (backend, console) = logged_in().await?;
    let before = backend.requests().len();
    let out = console
        .run(&["users", "invite", "--username", "ab", "--email", "x@example.com", "--tags", "t"])
        .await?;
    assert_eq!(out.code, 2);
    assert!(out.stderr.contains("Username must be at least 4 characters"), "{}", out.stderr);
    assert_eq!(backend.requests().len(), before);
    Ok(())
}

#[tokio::test]
async fn commands_without_session_fail() -> anyhow::Result<()> {
    let backend = MockBackend::start().await?;
    let console = Console::new(&backend)?;
    let out = console.run(&["users", "list"]).await?;
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("not logged in"));
    assert!(backend.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn logout_wipes_session() -> anyhow::Result<()> {
    let (backend, console) = logged_in().await?;
    let out = console.run(&["logout"]).await?;
    assert_eq!(out.code, 0);
    assert_eq!(backend.logout_calls(), 1);
    assert_eq!(console.session()?, serde_json::json!({}));
    Ok(())
}
