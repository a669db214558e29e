use orgauth_auth::Principal;
use orgauth_core::KeycloakGuid;

/// Principal context for a request (the authenticated identity).
///
/// Built by the auth middleware from verified claims and dropped with the
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn keycloak_guid(&self) -> KeycloakGuid {
        self.principal.keycloak_guid()
    }
}
