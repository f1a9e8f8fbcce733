// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom roles and their permissions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::error::Result;
use crate::org::Area;
use crate::request::RequestSpec;
use crate::validate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Permission {
    pub permission_id: String,
    pub permission_name: String,
    pub permission_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_selected: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomRole {
    pub role_id: String,
    pub org_id: String,
    pub role_name: String,
    pub role_description: Option<String>,
    pub role_definition: Option<String>,
    pub role_created_date: Option<String>,
    pub permissions: Vec<Permission>,
    pub tags: Option<String>,
}

/// Body of the add and update calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRoleForm {
    pub role_name: String,
    pub role_description: String,
    pub permission_ids: Vec<String>,
    pub tags: String,
}

impl CustomRoleForm {
    pub fn validate(&self) -> Result<()> {
        validate::custom_role(&self.role_name, &self.role_description, &self.tags)
    }
}

/// Listing parameters; unset fields take the backend's expected defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub full_text_search: Option<String>,
}

impl RoleQuery {
    fn list_body(&self) -> Value {
        json!({
            "limit": self.limit.unwrap_or(100),
            "offset": self.offset.unwrap_or(0),
            "fullTextSearch": self.full_text_search.as_deref().unwrap_or(""),
            "level": null,
            "fromDate": null,
            "toDate": null,
        })
    }

    fn count_body(&self) -> Value {
        json!({
            "fullTextSearch": self.full_text_search.as_deref().unwrap_or(""),
            "fromDate": null,
            "toDate": null,
        })
    }
}

fn path(client: &ApiClient, action: &str, tail: &[&str]) -> String {
    client.path(None, Area::CustomRole, action, tail)
}

impl ApiClient {
    pub async fn custom_roles(&self, query: &RoleQuery) -> Result<Vec<CustomRole>> {
        let spec = RequestSpec::post(path(self, "GetCustomRoles", &[])).json(query.list_body());
        self.send_json(spec).await
    }

    pub async fn custom_role_count(&self, query: &RoleQuery) -> Result<u64> {
        let spec = RequestSpec::post(path(self, "GetCustomRoleCount", &[])).json(query.count_body());
        self.send_json(spec).await
    }

    pub async fn custom_role(&self, role_id: &str) -> Result<CustomRole> {
        self.send_json(RequestSpec::get(path(self, "GetCustomRoleById", &[role_id]))).await
    }

    pub async fn add_custom_role(&self, form: &CustomRoleForm) -> Result<()> {
        form.validate()?;
        let spec =
            RequestSpec::post(path(self, "AddCustomRole", &[])).json(serde_json::to_value(form)?);
        self.send_empty(spec).await
    }

    pub async fn update_custom_role(&self, role_id: &str, form: &CustomRoleForm) -> Result<()> {
        form.validate()?;
        let spec = RequestSpec::post(path(self, "UpdateCustomRoleById", &[role_id]))
            .json(serde_json::to_value(form)?);
        self.send_empty(spec).await
    }

    pub async fn delete_custom_role(&self, role_id: &str) -> Result<()> {
        self.send_empty(RequestSpec::delete(path(self, "DeleteCustomRoleById", &[role_id]))).await
    }

    /// Permissions a new role can be granted.
    pub async fn initial_permissions(&self) -> Result<Vec<Permission>> {
        self.send_json(RequestSpec::get(path(self, "GetInitialUserRolePermissions", &[]))).await
    }
}

#[cfg(test)]
#[path = "roles_tests.rs"]
mod tests;
