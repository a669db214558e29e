//! Plain records for the tables the authorization view joins.

use serde::{Deserialize, Serialize};

use orgauth_core::{EntityId, KeycloakGuid, MembershipId, OrgId, UserId};

use crate::{MembershipStatus, OrgStatus, Role, SubscriptionStatus};

/// An account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Org {
    pub id: OrgId,
    pub name: String,
    pub type_code: String,
    pub status_code: OrgStatus,
    pub bcol_account_id: Option<String>,
    pub bcol_user_id: Option<String>,
}

impl Org {
    pub fn new(id: OrgId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            type_code: "BASIC".to_string(),
            status_code: OrgStatus::ACTIVE,
            bcol_account_id: None,
            bcol_user_id: None,
        }
    }

    pub fn with_status(mut self, status: OrgStatus) -> Self {
        self.status_code = status;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub keycloak_guid: KeycloakGuid,
    pub username: String,
}

/// A user's role in an org.
///
/// Rows are never deleted; deactivation moves `status` to `Inactive`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub org_id: OrgId,
    pub membership_type_code: Role,
    pub status: MembershipStatus,
}

impl Membership {
    pub fn active(id: MembershipId, user_id: UserId, org_id: OrgId, role: Role) -> Self {
        Self {
            id,
            user_id,
            org_id,
            membership_type_code: role,
            status: MembershipStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }
}

/// A registered business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub business_identifier: String,
    pub corp_type_code: String,
    pub name: Option<String>,
    pub folio_number: Option<String>,
}

/// Grants an org visibility over an entity. Ordered by org, then entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Affiliation {
    pub org_id: OrgId,
    pub entity_id: EntityId,
}

impl Affiliation {
    /// Range covering every affiliation of `org_id` in an ordered set.
    pub fn bounds(org_id: OrgId) -> core::ops::RangeInclusive<Affiliation> {
        Affiliation {
            org_id,
            entity_id: EntityId::new(i64::MIN),
        }..=Affiliation {
            org_id,
            entity_id: EntityId::new(i64::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSubscription {
    pub org_id: OrgId,
    pub product_code: String,
    pub status_code: SubscriptionStatus,
}

impl ProductSubscription {
    pub fn active(org_id: OrgId, product_code: impl Into<String>) -> Self {
        Self {
            org_id,
            product_code: product_code.into(),
            status_code: SubscriptionStatus::Active,
        }
    }
}
