// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `orgconsole roles`: custom roles.

use orgconsole_client::api::roles::{CustomRole, CustomRoleForm, RoleQuery};

use crate::command::Context;
use crate::output::{self, Table};

#[derive(Debug, clap::Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum RolesCommand {
    /// List custom roles.
    List(ListArgs),
    /// Count custom roles.
    Count {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one role with its permissions.
    Get { id: String },
    /// Create a role.
    Add(FormArgs),
    /// Replace a role's definition.
    Update {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete a role.
    Delete { id: String },
    /// Permissions a role can be granted.
    Permissions,
}

#[derive(Debug, clap::Args)]
pub struct ListArgs {
    #[arg(long)]
    pub offset: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct FormArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub tags: String,
    /// Permission id; repeatable.
    #[arg(long = "permission")]
    pub permissions: Vec<String>,
}

impl FormArgs {
    fn form(&self) -> CustomRoleForm {
        CustomRoleForm {
            role_name: self.name.clone(),
            role_description: self.description.clone(),
            permission_ids: self.permissions.clone(),
            tags: self.tags.clone(),
        }
    }
}

fn role_table(roles: &[CustomRole]) -> Table {
    let mut table = Table::new(&["ID", "NAME", "DESCRIPTION", "PERMISSIONS", "TAGS"]);
    for r in roles {
        table.row([
            r.role_id.clone(),
            r.role_name.clone(),
            output::cell(r.role_description.as_deref()),
            r.permissions.len().to_string(),
            output::cell(r.tags.as_deref()),
        ]);
    }
    table
}

pub async fn run(ctx: &Context, args: RolesArgs) -> anyhow::Result<()> {
    ctx.require_session()?;
    let client = &ctx.client;
    match args.command {
        RolesCommand::List(list) => {
            let query =
                RoleQuery { offset: list.offset, limit: list.limit, full_text_search: list.search };
            let roles = client.custom_roles(&query).await?;
            output::emit(ctx.json, &roles, "No custom roles.", || role_table(&roles))
        }
        RolesCommand::Count { search } => {
            let query = RoleQuery { full_text_search: search, ..RoleQuery::default() };
            println!("{}", client.custom_role_count(&query).await?);
            Ok(())
        }
        RolesCommand::Get { id } => {
            let role = client.custom_role(&id).await?;
            if ctx.json {
                println!("{}", output::json(&role)?);
                return Ok(());
            }
            println!("{}", role_table(std::slice::from_ref(&role)).render());
            if !role.permissions.is_empty() {
                let mut table = Table::new(&["PERMISSION", "GROUP", "NAME"]);
                for p in &role.permissions {
                    table.row([
                        p.permission_id.clone(),
                        p.permission_group.clone(),
                        p.permission_name.clone(),
                    ]);
                }
                println!("\n{}", table.render());
            }
            Ok(())
        }
        RolesCommand::Add(form) => {
            client.add_custom_role(&form.form()).await?;
            if !ctx.json {
                println!("Created role {}.", form.name);
            }
            Ok(())
        }
        RolesCommand::Update { id, form } => {
            client.update_custom_role(&id, &form.form()).await?;
            if !ctx.json {
                println!("Updated role {id}.");
            }
            Ok(())
        }
        RolesCommand::Delete { id } => {
            client.delete_custom_role(&id).await?;
            if !ctx.json {
                println!("Deleted role {id}.");
            }
            Ok(())
        }
        RolesCommand::Permissions => {
            let perms = client.initial_permissions().await?;
            output::emit(ctx.json, &perms, "No permissions.", || {
                let mut table = Table::new(&["ID", "GROUP", "NAME", "DESCRIPTION"]);
                for p in &perms {
                    table.row([
                        p.permission_id.clone(),
                        p.permission_group.clone(),
                        p.permission_name.clone(),
                        output::cell(p.description.as_deref()),
                    ]);
                }
                table
            })
        }
    }
}
