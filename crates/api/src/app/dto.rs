use serde::{Deserialize, Serialize};

use orgauth_auth::{AccountSummary, BusinessSummary, ResolvedAuthorization};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AuthorizationQuery {
    #[serde(default)]
    pub expanded: bool,
}

// -------------------------
// Response DTOs
// -------------------------

/// `{ "orgMembership", "roles" }`, plus `account`/`business` when expanded.
///
/// An empty `roles` list with no membership means nothing was authorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_membership: Option<String>,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub name: String,
    pub account_type: String,
    pub account_status: String,
    pub payment_preference: PaymentPreference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPreference {
    pub bc_online_user_id: Option<String>,
    pub bc_online_account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponse {
    pub identifier: String,
    pub name: Option<String>,
    pub folio_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAuthorizationsResponse {
    pub authorizations: Vec<AuthorizationResponse>,
}

impl AuthorizationResponse {
    pub fn empty() -> Self {
        Self {
            org_membership: None,
            roles: Vec::new(),
            account: None,
            business: None,
        }
    }

    pub fn from_resolved(resolved: &ResolvedAuthorization, expanded: bool) -> Self {
        Self {
            org_membership: Some(resolved.role.as_str().to_string()),
            roles: resolved.actions.iter().map(|a| a.as_str().to_string()).collect(),
            account: expanded.then(|| AccountResponse::from(&resolved.account)),
            business: if expanded {
                resolved.business.as_ref().map(BusinessResponse::from)
            } else {
                None
            },
        }
    }

    pub fn from_optional(resolved: Option<&ResolvedAuthorization>, expanded: bool) -> Self {
        resolved.map_or_else(Self::empty, |r| Self::from_resolved(r, expanded))
    }
}

impl From<&AccountSummary> for AccountResponse {
    fn from(account: &AccountSummary) -> Self {
        Self {
            id: account.org_id.get(),
            name: account.name.clone(),
            account_type: account.org_type.clone(),
            account_status: account.status.as_str().to_string(),
            payment_preference: PaymentPreference {
                bc_online_user_id: account.bcol_user_id.clone(),
                bc_online_account_id: account.bcol_account_id.clone(),
            },
        }
    }
}

impl From<&BusinessSummary> for BusinessResponse {
    fn from(business: &BusinessSummary) -> Self {
        Self {
            identifier: business.identifier.clone(),
            name: business.name.clone(),
            folio_number: business.folio_number.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgauth_auth::{OrgStatus, Permission, Role};
    use orgauth_core::OrgId;
    use serde_json::json;

    fn resolved() -> ResolvedAuthorization {
        ResolvedAuthorization {
            role: Role::ADMIN,
            actions: vec![Permission::new("edit"), Permission::new("view")],
            account: AccountSummary {
                org_id: OrgId::new(7),
                name: "Acme".to_string(),
                org_type: "PREMIUM".to_string(),
                status: OrgStatus::ACTIVE,
                bcol_user_id: Some("PB25020".to_string()),
                bcol_account_id: None,
            },
            business: Some(BusinessSummary {
                identifier: "BC0000001".to_string(),
                corp_type_code: Some("BC".to_string()),
                name: Some("ACME LTD".to_string()),
                folio_number: None,
            }),
        }
    }

    #[test]
    fn compact_response_has_membership_and_roles_only() {
        let body = serde_json::to_value(AuthorizationResponse::from_resolved(&resolved(), false)).unwrap();
        assert_eq!(body, json!({ "orgMembership": "ADMIN", "roles": ["edit", "view"] }));
    }

    #[test]
    fn expanded_response_carries_account_and_business() {
        let body = serde_json::to_value(AuthorizationResponse::from_resolved(&resolved(), true)).unwrap();
        assert_eq!(body["account"]["id"], 7);
        assert_eq!(body["account"]["accountType"], "PREMIUM");
        assert_eq!(body["account"]["accountStatus"], "ACTIVE");
        assert_eq!(body["account"]["paymentPreference"]["bcOnlineUserId"], "PB25020");
        assert!(body["account"]["paymentPreference"]["bcOnlineAccountId"].is_null());
        assert_eq!(body["business"]["identifier"], "BC0000001");
        assert_eq!(body["business"]["name"], "ACME LTD");
    }

    #[test]
    fn nothing_resolved_is_an_empty_role_list() {
        let body = serde_json::to_value(AuthorizationResponse::from_optional(None, true)).unwrap();
        assert_eq!(body, json!({ "roles": [] }));
    }
}
