use serde::{Deserialize, Serialize};

use orgauth_core::{DomainError, KeycloakGuid, OrgId};

use crate::JwtClaims;

/// Realm role carried by staff tokens.
pub const STAFF_REALM_ROLE: &str = "staff";

/// Realm role carried by service-account tokens.
pub const SYSTEM_REALM_ROLE: &str = "system";

/// Who is asking.
///
/// Built per request from verified claims; never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    /// An end user, authorized through their own memberships.
    User { keycloak_guid: KeycloakGuid },
    /// Staff, authorized by the `STAFF` permission rows without a membership.
    Staff { keycloak_guid: KeycloakGuid },
    /// A service account acting for a product; no user identity applies.
    ServiceAccount {
        keycloak_guid: KeycloakGuid,
        product_code: String,
    },
}

impl Principal {
    pub fn user(keycloak_guid: KeycloakGuid) -> Self {
        Self::User { keycloak_guid }
    }

    /// Derive the principal from verified claims.
    ///
    /// A `system` token must name its product; without one it cannot be
    /// authorized for anything.
    pub fn from_claims(claims: &JwtClaims) -> Result<Self, DomainError> {
        if claims.has_realm_role(SYSTEM_REALM_ROLE) {
            let product_code = claims
                .product_code
                .as_deref()
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .ok_or(DomainError::Unauthorized)?;
            return Ok(Self::ServiceAccount {
                keycloak_guid: claims.sub,
                product_code: product_code.to_string(),
            });
        }

        if claims.has_realm_role(STAFF_REALM_ROLE) {
            return Ok(Self::Staff {
                keycloak_guid: claims.sub,
            });
        }

        Ok(Self::User {
            keycloak_guid: claims.sub,
        })
    }

    pub fn keycloak_guid(&self) -> KeycloakGuid {
        match self {
            Principal::User { keycloak_guid }
            | Principal::Staff { keycloak_guid }
            | Principal::ServiceAccount { keycloak_guid, .. } => *keycloak_guid,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Principal::User { .. } => "user",
            Principal::Staff { .. } => "staff",
            Principal::ServiceAccount { .. } => "service_account",
        }
    }
}

/// What authorization is being asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    Org(OrgId),
    Business(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(roles: &[&str], product_code: Option<&str>) -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: KeycloakGuid::new(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            product_code: product_code.map(str::to_string),
            issued_at: now,
            expires_at: now + Duration::minutes(5),
        }
    }

    #[test]
    fn plain_token_is_a_user() {
        let c = claims(&[], None);
        assert_eq!(Principal::from_claims(&c).unwrap(), Principal::user(c.sub));
    }

    #[test]
    fn staff_role_wins_over_plain_user() {
        let c = claims(&["staff"], None);
        assert!(matches!(Principal::from_claims(&c).unwrap(), Principal::Staff { .. }));
    }

    #[test]
    fn system_token_carries_its_product() {
        let c = claims(&["system"], Some("PPR"));
        match Principal::from_claims(&c).unwrap() {
            Principal::ServiceAccount { product_code, .. } => assert_eq!(product_code, "PPR"),
            other => panic!("expected service account, got {other:?}"),
        }
    }

    #[test]
    fn system_token_without_product_is_unauthorized() {
        let c = claims(&["system"], Some("  "));
        assert_eq!(Principal::from_claims(&c), Err(DomainError::Unauthorized));
    }
}
