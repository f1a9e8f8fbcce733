// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `orgconsole profile`: the signed-in user's own account.

use orgconsole_client::api::profile::ProfileForm;

use crate::command::Context;
use crate::output::{self, Table};

#[derive(Debug, clap::Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum ProfileCommand {
    /// Show a profile (defaults to your own).
    Show {
        #[arg(long)]
        username: Option<String>,
    },
    /// Update your profile.
    Update(UpdateArgs),
    /// Change your password.
    Password(PasswordArgs),
}

#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// Local numbers starting with 0 are sent in +66 form.
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub secondary_email: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct PasswordArgs {
    #[arg(long, env = "ORGCONSOLE_CURRENT_PASSWORD", hide_env_values = true)]
    pub current: String,
    #[arg(long, env = "ORGCONSOLE_NEW_PASSWORD", hide_env_values = true)]
    pub new: String,
    /// Repeat of the new password.
    #[arg(long, env = "ORGCONSOLE_CONFIRM_PASSWORD", hide_env_values = true)]
    pub confirm: String,
}

pub async fn run(ctx: &Context, args: ProfileArgs) -> anyhow::Result<()> {
    ctx.require_session()?;
    let client = &ctx.client;
    match args.command {
        ProfileCommand::Show { username } => {
            let username = match username {
                Some(u) => u,
                None => own_username(ctx)?,
            };
            let profile = client.profile(&username).await?;
            if ctx.json {
                println!("{}", output::json(&profile)?);
                return Ok(());
            }
            let mut table = Table::new(&["FIELD", "VALUE"]);
            if let Some(fields) = profile.as_object() {
                for (key, value) in fields {
                    let text = match value {
                        serde_json::Value::String(s) => s.clone(),
                        serde_json::Value::Null => "-".to_owned(),
                        other => other.to_string(),
                    };
                    table.row([key.clone(), text]);
                }
            }
            println!("{}", table.render());
            Ok(())
        }
        ProfileCommand::Update(update) => {
            let form = ProfileForm {
                email: update.email,
                first_name: update.first_name,
                last_name: update.last_name,
                phone_number: update.phone,
                secondary_email: update.secondary_email,
            };
            client.update_profile(&form).await?;
            if !ctx.json {
                println!("Profile updated.");
            }
            Ok(())
        }
        ProfileCommand::Password(pw) => {
            client.change_password(&pw.current, &pw.new, &pw.confirm).await?;
            if !ctx.json {
                println!("Password changed.");
            }
            Ok(())
        }
    }
}

fn own_username(ctx: &Context) -> anyhow::Result<String> {
    let identity = ctx.client.identity();
    if !identity.username.is_empty() {
        return Ok(identity.username);
    }
    ctx.client
        .store()
        .user()
        .map(|u| u.username)
        .ok_or_else(|| anyhow::anyhow!("no username known for this session; pass --username"))
}
