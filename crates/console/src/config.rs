// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};

use orgconsole_client::ClientConfig;

use crate::command::profile::ProfileArgs;
use crate::command::roles::RolesArgs;
use crate::command::session::{LoginArgs, OrgsArgs};
use crate::command::users::UsersArgs;

/// Command-line console for the organization administration API.
#[derive(Debug, Parser)]
#[command(name = "orgconsole", version, about)]
pub struct Config {
    /// Log format (json or text).
    #[arg(long, env = "ORGCONSOLE_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "ORGCONSOLE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Print results as pretty JSON instead of a table.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub client: ClientConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and start a session.
    Login(LoginArgs),
    /// End the current session.
    Logout,
    /// Show the signed-in user and organization.
    Whoami,
    /// List the organizations the user may act in.
    Orgs(OrgsArgs),
    /// Manage organization users.
    Users(UsersArgs),
    /// Manage custom roles.
    Roles(RolesArgs),
    /// View or edit your own profile.
    Profile(ProfileArgs),
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.log_format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("invalid log format: {other} (expected json or text)"),
        }
        self.client.validate()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
