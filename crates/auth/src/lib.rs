//! `orgauth-auth`: pure authorization boundary.
//!
//! Roles and their precedence, status codes, the permission matrix, the
//! authorization-view row model and the selection rules. No HTTP or
//! storage dependencies.

pub mod authorize;
pub mod claims;
pub mod model;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod status;
pub mod view;

pub use authorize::{
    AuthzError, ResolvedAuthorization, authoritative_per_org, authorize, check_auth, resolve_rows,
    select_authoritative,
};
pub use claims::{Hs256JwtValidator, JwtClaims, JwtValidator, TokenValidationError, validate_claims};
pub use permissions::{Permission, PermissionRule, PermissionTable};
pub use principal::{Principal, Target};
pub use roles::Role;
pub use status::{MembershipStatus, OrgStatus, SubscriptionStatus};
pub use view::{AccountSummary, AuthorizationFilter, AuthorizationRow, BusinessSummary};
