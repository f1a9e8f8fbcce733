// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console subcommands: `login`, `logout`, `whoami`, `orgs`, `users`,
//! `roles`, `profile`.

pub mod profile;
pub mod roles;
pub mod session;
pub mod users;

use std::sync::Arc;

use orgconsole_client::credential::persist::FileStore;
use orgconsole_client::credential::{state_dir, CredentialStore};
use orgconsole_client::session::LocationNavigator;
use orgconsole_client::{ApiClient, ClientConfig, ClientError};

use crate::config::{Command, Config};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_SESSION_ENDED: i32 = 3;

/// Location the console reports while a command runs.
pub const CONSOLE_LOCATION: &str = "/console";

/// Everything a subcommand needs.
pub struct Context {
    pub client: ApiClient,
    pub json: bool,
}

impl Context {
    /// Fail early when there is no stored session.
    pub fn require_session(&self) -> Result<(), ClientError> {
        if self.client.store().access_token().is_none() {
            return Err(ClientError::Api {
                message: "not logged in; run `orgconsole login` first".to_owned(),
            });
        }
        Ok(())
    }
}

/// Client backed by the persisted session file.
pub fn build_client(config: &ClientConfig) -> Result<ApiClient, ClientError> {
    let dir = config.state_dir.clone().unwrap_or_else(state_dir);
    let store: Arc<dyn CredentialStore> = Arc::new(FileStore::open(&dir));
    let navigator = Arc::new(LocationNavigator::new(CONSOLE_LOCATION));
    ApiClient::new(config.clone(), store, navigator)
}

/// Exit code for a failed command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ClientError>() {
        Some(e) if e.ended_session() => EXIT_SESSION_ENDED,
        Some(ClientError::Validation(_) | ClientError::Config(_)) => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

/// Run the selected subcommand. Returns a process exit code.
pub async fn run(config: Config) -> i32 {
    let client = match build_client(&config.client) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };
    let ctx = Context { client, json: config.json };

    let result = match config.command {
        Command::Login(args) => session::login(&ctx, &args).await,
        Command::Logout => session::logout(&ctx).await,
        Command::Whoami => session::whoami(&ctx),
        Command::Orgs(args) => session::orgs(&ctx, &args).await,
        Command::Users(args) => users::run(&ctx, args).await,
        Command::Roles(args) => roles::run(&ctx, args).await,
        Command::Profile(args) => profile::run(&ctx, args).await,
    };

    match result {
        Ok(()) => EXIT_OK,
        Err(e) => {
            let code = exit_code(&e);
            tracing::debug!(code, "command failed");
            eprintln!("error: {e:#}");
            if code == EXIT_SESSION_ENDED {
                eprintln!("session ended; log in again with `orgconsole login`");
            }
            code
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
