// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organization scoping: resolves which organization a call addresses and
//! builds the org-scoped endpoint paths.

use std::sync::Arc;

use crate::credential::CredentialStore;

/// Value stored as the organization context when no real organization is known.
pub const DEFAULT_ORG: &str = "default";

/// Identifier substituted for an unset or default organization context.
pub const FALLBACK_ORG: &str = "temp";

/// How organization identifiers are encoded into a path segment.
///
/// Decided once per deployment; the same policy applies to every org-scoped
/// call including the refresh call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OrgEncoding {
    /// Embed the identifier as-is.
    Plain,
    /// Percent-encode once.
    #[default]
    Percent,
    /// Percent-encode, then percent-encode the result again.
    DoublePercent,
}

impl OrgEncoding {
    pub fn encode(self, id: &str) -> String {
        match self {
            Self::Plain => id.to_owned(),
            Self::Percent => urlencoding::encode(id).into_owned(),
            Self::DoublePercent => {
                let once = urlencoding::encode(id);
                urlencoding::encode(&once).into_owned()
            }
        }
    }
}

/// Backend API areas an action lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Auth,
    OnlyUser,
    OrganizationUser,
    CustomRole,
}

impl Area {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "Auth",
            Self::OnlyUser => "OnlyUser",
            Self::OrganizationUser => "OrganizationUser",
            Self::CustomRole => "CustomRole",
        }
    }
}

pub const LOGIN_ACTION: &str = "Login";
pub const REFRESH_ACTION: &str = "RefreshToken";
pub const ALLOWED_ORGS_ACTION: &str = "GetUserAllowedOrg";
pub const LOGOUT_ACTION: &str = "Logout";

/// Map an organization context to the identifier actually addressed.
pub fn resolve(org: Option<&str>) -> &str {
    match org {
        Some(id) if !id.is_empty() && id != DEFAULT_ORG => id,
        _ => FALLBACK_ORG,
    }
}

/// Build `/api/{area}/org/{org}/action/{action}[/{tail}...]`.
///
/// `org` must already be encoded; tail segments are percent-encoded once.
pub fn action_path(area: Area, org_segment: &str, action: &str, tail: &[&str]) -> String {
    let mut path = format!("/api/{}/org/{}/action/{}", area.as_str(), org_segment, action);
    for segment in tail {
        path.push('/');
        path.push_str(&urlencoding::encode(segment));
    }
    path
}

/// Reads the process-wide organization context from the credential store.
#[derive(Clone)]
pub struct OrgScope {
    store: Arc<dyn CredentialStore>,
    encoding: OrgEncoding,
}

impl OrgScope {
    pub fn new(store: Arc<dyn CredentialStore>, encoding: OrgEncoding) -> Self {
        Self { store, encoding }
    }

    pub fn encoding(&self) -> OrgEncoding {
        self.encoding
    }

    /// Identifier addressed when no explicit organization is given.
    pub fn current(&self) -> String {
        let org = self.store.current_org();
        resolve(org.as_deref()).to_owned()
    }

    /// Encoded path segment for `org`, or for the current context when `None`.
    pub fn segment(&self, org: Option<&str>) -> String {
        let id = match org {
            Some(id) => resolve(Some(id)).to_owned(),
            None => self.current(),
        };
        self.encoding.encode(&id)
    }

    /// Org-scoped action path.
    pub fn path(&self, org: Option<&str>, area: Area, action: &str, tail: &[&str]) -> String {
        action_path(area, &self.segment(org), action, tail)
    }

    /// Refresh endpoint for the current organization context.
    pub fn refresh_path(&self) -> String {
        self.path(None, Area::Auth, REFRESH_ACTION, &[])
    }

    /// Login endpoint. Login always addresses the fallback organization.
    pub fn login_path(&self) -> String {
        action_path(Area::Auth, &self.encoding.encode(FALLBACK_ORG), LOGIN_ACTION, &[])
    }
}

#[cfg(test)]
#[path = "org_tests.rs"]
mod tests;
