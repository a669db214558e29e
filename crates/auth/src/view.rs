//! The authorization projection: one row per active membership, widened by the
//! org's affiliations and active product subscriptions.

use serde::{Deserialize, Serialize};

use orgauth_core::{KeycloakGuid, MembershipId, OrgId};

use crate::model::{Entity, Membership, Org, User};
use crate::{OrgStatus, Role};

/// A row of the authorization view.
///
/// Entity columns are `None` when the org has no affiliation; `product_code`
/// is `None` when the org has no active subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRow {
    pub business_identifier: Option<String>,
    pub entity_name: Option<String>,
    pub corp_type_code: Option<String>,
    pub folio_number: Option<String>,
    pub org_membership: Role,
    pub keycloak_guid: KeycloakGuid,
    pub org_id: OrgId,
    pub org_name: String,
    pub org_type: String,
    pub org_status: OrgStatus,
    pub bcol_user_id: Option<String>,
    pub bcol_account_id: Option<String>,
    pub product_code: Option<String>,
    pub membership_id: MembershipId,
}

impl AuthorizationRow {
    /// Build a row from its joined parts.
    pub fn join(
        membership: &Membership,
        org: &Org,
        user: &User,
        entity: Option<&Entity>,
        product_code: Option<&str>,
    ) -> Self {
        Self {
            business_identifier: entity.map(|e| e.business_identifier.clone()),
            entity_name: entity.and_then(|e| e.name.clone()),
            corp_type_code: entity.map(|e| e.corp_type_code.clone()),
            folio_number: entity.and_then(|e| e.folio_number.clone()),
            org_membership: membership.membership_type_code.clone(),
            keycloak_guid: user.keycloak_guid,
            org_id: org.id,
            org_name: org.name.clone(),
            org_type: org.type_code.clone(),
            org_status: org.status_code.clone(),
            bcol_user_id: org.bcol_user_id.clone(),
            bcol_account_id: org.bcol_account_id.clone(),
            product_code: product_code.map(str::to_string),
            membership_id: membership.id,
        }
    }

    /// Ordering key for precedence selection: rank, then membership id, then
    /// business identifier (unaffiliated first) so one membership spread over
    /// several entities still picks the same row every time.
    pub fn precedence_key(&self) -> (u8, MembershipId, Option<&str>) {
        (
            self.org_membership.precedence_rank(),
            self.membership_id,
            self.business_identifier.as_deref(),
        )
    }

    pub fn account(&self) -> AccountSummary {
        AccountSummary {
            org_id: self.org_id,
            name: self.org_name.clone(),
            org_type: self.org_type.clone(),
            status: self.org_status.clone(),
            bcol_user_id: self.bcol_user_id.clone(),
            bcol_account_id: self.bcol_account_id.clone(),
        }
    }

    pub fn business(&self) -> Option<BusinessSummary> {
        let identifier = self.business_identifier.clone()?;
        Some(BusinessSummary {
            identifier,
            corp_type_code: self.corp_type_code.clone(),
            name: self.entity_name.clone(),
            folio_number: self.folio_number.clone(),
        })
    }
}

/// Account details surfaced by expanded responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub org_id: OrgId,
    pub name: String,
    pub org_type: String,
    pub status: OrgStatus,
    pub bcol_user_id: Option<String>,
    pub bcol_account_id: Option<String>,
}

impl From<&Org> for AccountSummary {
    fn from(org: &Org) -> Self {
        Self {
            org_id: org.id,
            name: org.name.clone(),
            org_type: org.type_code.clone(),
            status: org.status_code.clone(),
            bcol_user_id: org.bcol_user_id.clone(),
            bcol_account_id: org.bcol_account_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSummary {
    pub identifier: String,
    pub corp_type_code: Option<String>,
    pub name: Option<String>,
    pub folio_number: Option<String>,
}

/// Criteria applied to view rows. Every criterion that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationFilter {
    pub keycloak_guid: Option<KeycloakGuid>,
    pub org_id: Option<OrgId>,
    pub business_identifier: Option<String>,
    pub product_code: Option<String>,
    /// Matches rows whose corp type equals this value *or* is NULL (the org
    /// has no affiliation at all).
    pub corp_type: Option<String>,
}

impl AuthorizationFilter {
    pub fn for_user(keycloak_guid: KeycloakGuid) -> Self {
        Self {
            keycloak_guid: Some(keycloak_guid),
            ..Default::default()
        }
    }

    pub fn for_org(org_id: OrgId) -> Self {
        Self {
            org_id: Some(org_id),
            ..Default::default()
        }
    }

    pub fn for_business(business_identifier: impl Into<String>) -> Self {
        Self {
            business_identifier: Some(business_identifier.into()),
            ..Default::default()
        }
    }

    pub fn with_org(mut self, org_id: OrgId) -> Self {
        self.org_id = Some(org_id);
        self
    }

    pub fn with_business(mut self, business_identifier: impl Into<String>) -> Self {
        self.business_identifier = Some(business_identifier.into());
        self
    }

    pub fn with_product(mut self, product_code: impl Into<String>) -> Self {
        self.product_code = Some(product_code.into());
        self
    }

    pub fn with_corp_type(mut self, corp_type: impl Into<String>) -> Self {
        self.corp_type = Some(corp_type.into());
        self
    }

    pub fn matches(&self, row: &AuthorizationRow) -> bool {
        if self.keycloak_guid.is_some_and(|guid| guid != row.keycloak_guid) {
            return false;
        }
        if self.org_id.is_some_and(|id| id != row.org_id) {
            return false;
        }
        if let Some(identifier) = &self.business_identifier {
            if row.business_identifier.as_deref() != Some(identifier.as_str()) {
                return false;
            }
        }
        if let Some(product) = &self.product_code {
            if row.product_code.as_deref() != Some(product.as_str()) {
                return false;
            }
        }
        if let Some(corp_type) = &self.corp_type {
            if row.corp_type_code.as_deref().is_some_and(|code| code != corp_type) {
                return false;
            }
        }
        true
    }
}
