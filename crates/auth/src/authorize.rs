use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use orgauth_core::OrgId;

use crate::view::{AccountSummary, AuthorizationRow, BusinessSummary};
use crate::{Permission, PermissionTable, Role};

/// Effective role and permitted actions for one principal/target pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAuthorization {
    pub role: Role,
    pub actions: Vec<Permission>,
    pub account: AccountSummary,
    pub business: Option<BusinessSummary>,
}

impl ResolvedAuthorization {
    pub fn from_row(row: &AuthorizationRow, actions: Vec<Permission>) -> Self {
        Self {
            role: row.org_membership.clone(),
            actions,
            account: row.account(),
            business: row.business(),
        }
    }

    pub fn has_action(&self, action: &Permission) -> bool {
        self.actions.iter().any(|a| a == action)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no membership grants access to the target")]
    NotAMember,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    #[error("forbidden: role '{actual}' is not one of {allowed:?}")]
    RoleNotAllowed { allowed: Vec<String>, actual: String },
}

/// Pick the authoritative row: lowest precedence rank, then lowest membership id.
///
/// - No IO
/// - No panics
pub fn select_authoritative<'a, I>(rows: I) -> Option<&'a AuthorizationRow>
where
    I: IntoIterator<Item = &'a AuthorizationRow>,
{
    rows.into_iter()
        .min_by(|a, b| a.precedence_key().cmp(&b.precedence_key()))
}

/// The authoritative row for each org, ordered by org id.
pub fn authoritative_per_org<'a, I>(rows: I) -> Vec<&'a AuthorizationRow>
where
    I: IntoIterator<Item = &'a AuthorizationRow>,
{
    let mut best: BTreeMap<OrgId, &'a AuthorizationRow> = BTreeMap::new();
    for row in rows {
        best.entry(row.org_id)
            .and_modify(|current| {
                if row.precedence_key() < current.precedence_key() {
                    *current = row;
                }
            })
            .or_insert(row);
    }
    best.into_values().collect()
}

/// Select the authoritative row and attach its actions from `table`.
pub fn resolve_rows<'a, I>(rows: I, table: &PermissionTable) -> Option<ResolvedAuthorization>
where
    I: IntoIterator<Item = &'a AuthorizationRow>,
{
    let row = select_authoritative(rows)?;
    let actions = table.actions_for(&row.org_membership, &row.org_status);
    Some(ResolvedAuthorization::from_row(row, actions))
}

/// Require `required` among the resolved actions.
pub fn authorize(
    resolved: Option<&ResolvedAuthorization>,
    required: &Permission,
) -> Result<(), AuthzError> {
    let resolved = resolved.ok_or(AuthzError::NotAMember)?;
    if resolved.has_action(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Require the resolved role to be one of `one_of_roles`.
pub fn check_auth(
    resolved: Option<&ResolvedAuthorization>,
    one_of_roles: &[Role],
) -> Result<(), AuthzError> {
    let resolved = resolved.ok_or(AuthzError::NotAMember)?;
    if one_of_roles.contains(&resolved.role) {
        Ok(())
    } else {
        Err(AuthzError::RoleNotAllowed {
            allowed: one_of_roles.iter().map(|r| r.as_str().to_string()).collect(),
            actual: resolved.role.as_str().to_string(),
        })
    }
}
