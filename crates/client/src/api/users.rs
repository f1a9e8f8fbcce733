// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organization user management.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::error::Result;
use crate::org::Area;
use crate::request::RequestSpec;
use crate::validate;

/// A member of an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub org_user_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: Option<String>,
    pub tmp_user_email: Option<String>,
    pub user_status: String,
    pub roles: Vec<String>,
    pub roles_list: String,
    pub tags: Option<String>,
    pub created_date: String,
    pub custom_role_id: Option<String>,
    pub custom_role_name: Option<String>,
    pub is_org_initial_user: Option<String>,
}

impl User {
    /// Email to show: the confirmed address, else the pending one.
    pub fn email(&self) -> &str {
        self.user_email.as_deref().or(self.tmp_user_email.as_deref()).unwrap_or("")
    }
}

/// A built-in organization role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub role_id: &'static str,
    pub role_name: &'static str,
    pub role_description: &'static str,
}

const fn role(id: &'static str, description: &'static str) -> UserRole {
    UserRole { role_id: id, role_name: id, role_description: description }
}

/// Built-in roles; the backend offers no endpoint for them.
pub const AVAILABLE_ROLES: [UserRole; 4] = [
    role("OWNER", "Organization Owner"),
    role("EDITOR", "Organization Editor"),
    role("UPLOADER", "Organization File Uploader"),
    role("VIEWER", "Organization Viewer"),
];

/// Paging and filter parameters for user listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub offset: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text_search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self { offset: 0, limit: 25, full_text_search: None, from_date: None, to_date: None }
    }
}

/// Body of the invite and update calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub user_name: String,
    pub tmp_user_email: String,
    pub tags: String,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_role_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_status: Option<String>,
}

impl UserForm {
    pub fn validate(&self) -> Result<()> {
        validate::user(&self.user_name, &self.tmp_user_email, &self.tags)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InviteResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "registrationUrl", alias = "RegistrationUrl")]
    pub registration_url: Option<String>,
}

fn path(client: &ApiClient, action: &str, tail: &[&str]) -> String {
    client.path(None, Area::OrganizationUser, action, tail)
}

impl ApiClient {
    pub async fn users(&self, query: &UserQuery) -> Result<Vec<User>> {
        let spec = RequestSpec::post(path(self, "GetUsers", &[])).json(serde_json::to_value(query)?);
        self.send_json(spec).await
    }

    pub async fn user_count(&self, query: &UserQuery) -> Result<u64> {
        let body = json!({
            "fullTextSearch": query.full_text_search,
            "fromDate": query.from_date,
            "toDate": query.to_date,
        });
        let spec = RequestSpec::post(path(self, "GetUserCount", &[])).json(body);
        self.send_json(spec).await
    }

    pub async fn user(&self, user_id: &str) -> Result<User> {
        self.send_json(RequestSpec::get(path(self, "GetUserById", &[user_id]))).await
    }

    pub async fn invite_user(&self, form: &UserForm) -> Result<InviteResponse> {
        form.validate()?;
        let spec =
            RequestSpec::post(path(self, "InviteUser", &[])).json(serde_json::to_value(form)?);
        self.send_json(spec).await
    }

    pub async fn update_user(&self, user_id: &str, form: &UserForm) -> Result<()> {
        form.validate()?;
        let mut body = serde_json::to_value(form)?;
        if let Value::Object(map) = &mut body {
            map.insert("userId".to_owned(), Value::String(user_id.to_owned()));
        }
        self.send_empty(RequestSpec::post(path(self, "UpdateUser", &[])).json(body)).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.send_empty(RequestSpec::delete(path(self, "DeleteUserById", &[user_id]))).await
    }

    pub async fn enable_user(&self, user_id: &str) -> Result<()> {
        self.send_empty(RequestSpec::post(path(self, "EnableUserById", &[user_id]))).await
    }

    pub async fn disable_user(&self, user_id: &str) -> Result<()> {
        self.send_empty(RequestSpec::post(path(self, "DisableUserById", &[user_id]))).await
    }
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
