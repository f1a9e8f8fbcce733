// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `login`, `logout`, `whoami`, `orgs`.

use serde::Serialize;

use orgconsole_client::claims::Identity;

use crate::command::Context;
use crate::output::{self, Table};

#[derive(Debug, clap::Args)]
pub struct LoginArgs {
    /// Account name.
    #[arg(long)]
    pub username: String,
    /// Account password.
    #[arg(long, env = "ORGCONSOLE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, clap::Args)]
pub struct OrgsArgs {
    /// Make this organization the context for later commands.
    #[arg(long, value_name = "ORG_ID")]
    pub switch: Option<String>,
}

#[derive(Debug, Serialize)]
struct Whoami {
    username: Option<String>,
    org: Option<String>,
    identity: Identity,
}

pub async fn login(ctx: &Context, args: &LoginArgs) -> anyhow::Result<()> {
    let outcome = ctx.client.login(&args.username, &args.password).await?;
    if ctx.json {
        let value = serde_json::json!({ "username": outcome.username, "org": outcome.org });
        println!("{}", output::json(&value)?);
    } else {
        println!("Logged in as {} (organization {}).", outcome.username, outcome.org);
    }
    Ok(())
}

pub async fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.client.logout().await;
    if !ctx.json {
        println!("Logged out.");
    }
    Ok(())
}

pub fn whoami(ctx: &Context) -> anyhow::Result<()> {
    ctx.require_session()?;
    let store = ctx.client.store();
    let who = Whoami {
        username: store.user().map(|u| u.username),
        org: store.current_org(),
        identity: ctx.client.identity(),
    };
    if ctx.json {
        println!("{}", output::json(&who)?);
        return Ok(());
    }
    let mut table = Table::new(&["FIELD", "VALUE"]);
    table.row(["username".to_owned(), output::cell(who.username.as_deref())]);
    table.row(["organization".to_owned(), output::cell(who.org.as_deref())]);
    table.row(["user id".to_owned(), output::cell(Some(&who.identity.user_id))]);
    println!("{}", table.render());
    Ok(())
}

pub async fn orgs(ctx: &Context, args: &OrgsArgs) -> anyhow::Result<()> {
    ctx.require_session()?;
    if let Some(ref org) = args.switch {
        ctx.client.switch_org(org);
        if !ctx.json {
            println!("Switched to organization {org}.");
        }
        return Ok(());
    }

    let orgs = ctx.client.allowed_organizations().await?;
    let current = ctx.client.org().current();
    output::emit(ctx.json, &orgs, "No organizations.", || {
        let mut table = Table::new(&["", "ID", "NAME"]);
        for org in &orgs {
            let marker = if org.id == current { "*" } else { "" };
            table.row([marker.to_owned(), org.id.clone(), output::cell(org.name.as_deref())]);
        }
        table
    })
}
