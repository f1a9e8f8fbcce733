// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Login, organization lookup, and logout.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{decode, ApiClient};
use crate::credential::normalize::token_fields;
use crate::credential::UserInfo;
use crate::error::{ClientError, Result};
use crate::org::{Area, ALLOWED_ORGS_ACTION, DEFAULT_ORG, LOGOUT_ACTION};
use crate::request::RequestSpec;

/// Organization the user may act in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "orgCustomId")]
    pub id: String,
    #[serde(rename = "orgName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub username: String,
    /// Organization context selected for the session.
    pub org: String,
}

impl ApiClient {
    /// Log in and establish a new session.
    ///
    /// Any previous session is dropped first. After the credentials are
    /// stored, the allowed organizations are looked up under a hard timeout;
    /// the first one becomes the organization context, or [`DEFAULT_ORG`]
    /// when the lookup fails, times out, or returns nothing.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        self.store().clear();

        let spec = RequestSpec::post(self.org().login_path())
            .json(json!({ "username": username, "password": password }));
        let body: Value = decode(self.send_unmanaged(spec).await?).await?;

        let status = body.get("status").and_then(Value::as_str).unwrap_or_default();
        if status != "Success" && status != "OK" {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("Login failed");
            return Err(ClientError::Api { message: message.to_owned() });
        }

        let fields = token_fields(&body);
        let display_name = fields.user_name.clone().unwrap_or_else(|| username.to_owned());
        let pair = fields
            .into_pair()
            .ok_or_else(|| ClientError::Api { message: "No access_token found".to_owned() })?;
        let access_token = pair.access_token.clone();
        self.store().set_credentials(pair);
        self.store().set_user(Some(UserInfo { username: display_name.clone() }));

        let org = self.default_org(&access_token).await;
        self.store().set_current_org(Some(org.clone()));
        tracing::info!(user = %display_name, org = %org, "logged in");
        Ok(LoginOutcome { username: display_name, org })
    }

    async fn default_org(&self, access_token: &str) -> String {
        let spec = RequestSpec::get(self.path(None, Area::OnlyUser, ALLOWED_ORGS_ACTION, &[]))
            .bearer(access_token);
        let lookup = async {
            let resp = self.send_unmanaged(spec).await?;
            decode::<Vec<Organization>>(resp).await
        };

        match tokio::time::timeout(self.config().org_lookup_timeout(), lookup).await {
            Ok(Ok(orgs)) => match orgs.into_iter().map(|o| o.id).find(|id| !id.is_empty()) {
                Some(id) => id,
                None => DEFAULT_ORG.to_owned(),
            },
            Ok(Err(e)) => {
                tracing::warn!(err = %e, "organization lookup failed; using default");
                DEFAULT_ORG.to_owned()
            }
            Err(_) => {
                tracing::warn!("organization lookup timed out; using default");
                DEFAULT_ORG.to_owned()
            }
        }
    }

    /// Organizations the current user may act in.
    pub async fn allowed_organizations(&self) -> Result<Vec<Organization>> {
        let spec = RequestSpec::get(self.path(None, Area::OnlyUser, ALLOWED_ORGS_ACTION, &[]));
        self.send_json(spec).await
    }

    /// Switch the organization context for subsequent calls.
    pub fn switch_org(&self, org: &str) {
        self.store().set_current_org(Some(org.to_owned()));
    }

    /// End the session. The backend call is best-effort; local teardown
    /// always happens.
    pub async fn logout(&self) {
        if self.store().access_token().is_some() {
            let spec = RequestSpec::post(self.path(None, Area::OnlyUser, LOGOUT_ACTION, &[]));
            if let Err(e) = self.send_unmanaged(spec).await {
                tracing::warn!(err = %e, "backend logout failed; continuing");
            }
        }
        self.terminator().terminate();
    }
}
