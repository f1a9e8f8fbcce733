// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The signed-in user's own profile.

use serde::Serialize;
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::claims;
use crate::error::{ClientError, Result};
use crate::org::Area;
use crate::request::RequestSpec;
use crate::validate;

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub secondary_email: Option<String>,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<()> {
        validate::profile(
            &self.first_name,
            &self.last_name,
            &self.phone_number,
            self.secondary_email.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdate<'a> {
    user_id: &'a str,
    user_name: &'a str,
    user_email: Option<&'a str>,
    name: &'a str,
    last_name: &'a str,
    phone_number: String,
    secondary_email: Option<&'a str>,
}

/// Rewrite a local number (leading `0`) to international form.
pub fn international_phone(phone: &str) -> String {
    match phone.strip_prefix('0') {
        Some(rest) => format!("+66{rest}"),
        None => phone.to_owned(),
    }
}

fn path(client: &ApiClient, action: &str, tail: &[&str]) -> String {
    client.path(None, Area::OnlyUser, action, tail)
}

impl ApiClient {
    /// Identity carried by the stored access credential.
    pub fn identity(&self) -> claims::Identity {
        claims::identity(self.store().access_token().as_deref())
    }

    fn identity_username(&self) -> Result<claims::Identity> {
        let identity = self.identity();
        if identity.username.is_empty() {
            return Err(ClientError::Api {
                message: "access credential carries no username".to_owned(),
            });
        }
        Ok(identity)
    }

    pub async fn profile(&self, username: &str) -> Result<Value> {
        self.send_json(RequestSpec::get(path(self, "GetUserByUserName", &[username]))).await
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> Result<()> {
        form.validate()?;
        let identity = self.identity_username()?;
        let body = ProfileUpdate {
            user_id: &identity.user_id,
            user_name: &identity.username,
            user_email: form.email.as_deref(),
            name: &form.first_name,
            last_name: &form.last_name,
            phone_number: international_phone(&form.phone_number),
            secondary_email: form.secondary_email.as_deref(),
        };
        let spec = RequestSpec::post(path(self, "UpdateUserByUserName", &[&identity.username]))
            .json(serde_json::to_value(&body)?);
        self.send_empty(spec).await
    }

    pub async fn change_password(&self, current: &str, new: &str, confirm: &str) -> Result<()> {
        validate::new_password(current, new, confirm)?;
        let identity = self.identity_username()?;
        let body = json!({
            "userName": identity.username,
            "currentPassword": current,
            "newPassword": new,
        });
        self.send_empty(RequestSpec::post(path(self, "UpdatePassword", &[])).json(body)).await
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
