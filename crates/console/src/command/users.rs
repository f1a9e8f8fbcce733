// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `orgconsole users`: organization members.

use orgconsole_client::api::users::{User, UserForm, UserQuery, AVAILABLE_ROLES};

use crate::command::Context;
use crate::output::{self, Table};

#[derive(Debug, clap::Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum UsersCommand {
    /// List users.
    List(ListArgs),
    /// Count users matching a filter.
    Count(FilterArgs),
    /// Show one user.
    Get(IdArg),
    /// Invite a new user.
    Invite(FormArgs),
    /// Update an existing user.
    Update(UpdateArgs),
    /// Delete a user.
    Delete(IdArg),
    /// Re-enable a disabled user.
    Enable(IdArg),
    /// Disable a user.
    Disable(IdArg),
    /// List the built-in roles.
    Roles,
}

#[derive(Debug, clap::Args)]
pub struct FilterArgs {
    /// Free-text search.
    #[arg(long)]
    pub search: Option<String>,
    /// Created on or after this date.
    #[arg(long)]
    pub from: Option<String>,
    /// Created on or before this date.
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
    #[arg(long, default_value_t = 25)]
    pub limit: u32,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, clap::Args)]
pub struct IdArg {
    /// User id.
    pub id: String,
}

#[derive(Debug, clap::Args)]
pub struct FormArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    /// Comma-separated tags.
    #[arg(long)]
    pub tags: String,
    /// Built-in role; repeatable.
    #[arg(long = "role")]
    pub roles: Vec<String>,
    #[arg(long)]
    pub custom_role_id: Option<String>,
    #[arg(long)]
    pub custom_role_name: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    /// User id.
    pub id: String,
    #[command(flatten)]
    pub form: FormArgs,
    /// New account status.
    #[arg(long)]
    pub status: Option<String>,
}

impl FilterArgs {
    fn query(&self) -> UserQuery {
        UserQuery {
            full_text_search: self.search.clone(),
            from_date: self.from.clone(),
            to_date: self.to.clone(),
            ..UserQuery::default()
        }
    }
}

impl FormArgs {
    fn form(&self, status: Option<String>) -> UserForm {
        UserForm {
            user_name: self.username.clone(),
            tmp_user_email: self.email.clone(),
            tags: self.tags.clone(),
            roles: self.roles.clone(),
            custom_role_id: self.custom_role_id.clone(),
            custom_role_name: self.custom_role_name.clone(),
            user_status: status,
        }
    }
}

fn user_table(users: &[User]) -> Table {
    let mut table = Table::new(&["ID", "USERNAME", "EMAIL", "STATUS", "ROLES", "CREATED"]);
    for u in users {
        let roles = if u.roles.is_empty() { u.roles_list.clone() } else { u.roles.join(",") };
        table.row([
            u.user_id.clone(),
            u.user_name.clone(),
            output::cell(Some(u.email())),
            output::cell(Some(&u.user_status)),
            output::cell(Some(&roles)),
            output::cell(Some(&u.created_date)),
        ]);
    }
    table
}

pub async fn run(ctx: &Context, args: UsersArgs) -> anyhow::Result<()> {
    if !matches!(args.command, UsersCommand::Roles) {
        ctx.require_session()?;
    }
    let client = &ctx.client;
    match args.command {
        UsersCommand::List(list) => {
            let query = UserQuery { offset: list.offset, limit: list.limit, ..list.filter.query() };
            let users = client.users(&query).await?;
            output::emit(ctx.json, &users, "No users.", || user_table(&users))
        }
        UsersCommand::Count(filter) => {
            let count = client.user_count(&filter.query()).await?;
            println!("{count}");
            Ok(())
        }
        UsersCommand::Get(IdArg { id }) => {
            let user = client.user(&id).await?;
            output::emit(ctx.json, &user, "", || user_table(std::slice::from_ref(&user)))
        }
        UsersCommand::Invite(form) => {
            let resp = client.invite_user(&form.form(None)).await?;
            if ctx.json {
                let value = serde_json::json!({
                    "status": resp.status,
                    "description": resp.description,
                    "registrationUrl": resp.registration_url,
                });
                println!("{}", output::json(&value)?);
            } else {
                println!("Invited {}: {}", form.username, output::cell(Some(&resp.description)));
                if let Some(url) = resp.registration_url {
                    println!("Registration URL: {url}");
                }
            }
            Ok(())
        }
        UsersCommand::Update(update) => {
            client.update_user(&update.id, &update.form.form(update.status.clone())).await?;
            done(ctx, "Updated", &update.id);
            Ok(())
        }
        UsersCommand::Delete(IdArg { id }) => {
            client.delete_user(&id).await?;
            done(ctx, "Deleted", &id);
            Ok(())
        }
        UsersCommand::Enable(IdArg { id }) => {
            client.enable_user(&id).await?;
            done(ctx, "Enabled", &id);
            Ok(())
        }
        UsersCommand::Disable(IdArg { id }) => {
            client.disable_user(&id).await?;
            done(ctx, "Disabled", &id);
            Ok(())
        }
        UsersCommand::Roles => output::emit(ctx.json, &AVAILABLE_ROLES[..], "No roles.", || {
            let mut table = Table::new(&["ROLE", "DESCRIPTION"]);
            for role in &AVAILABLE_ROLES {
                table.row([role.role_id, role.role_description]);
            }
            table
        }),
    }
}

fn done(ctx: &Context, verb: &str, id: &str) {
    if !ctx.json {
        println!("{verb} user {id}.");
    }
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
