//! In-memory authorization tables for tests and dev.
//!
//! Holds the six source tables and performs the view join on demand, so a
//! write is visible to the next read with no projection step.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

use orgauth_auth::model::{Affiliation, Entity, Membership, Org, ProductSubscription, User};
use orgauth_auth::{
    AuthorizationFilter, AuthorizationRow, MembershipStatus, OrgStatus, Role, SubscriptionStatus,
    authoritative_per_org, select_authoritative,
};
use orgauth_core::{DomainError, DomainResult, EntityId, MembershipId, OrgId, UserId};

use super::AuthorizationView;
use crate::error::ResolveError;

#[derive(Debug, Default)]
struct Tables {
    orgs: BTreeMap<OrgId, Org>,
    users: BTreeMap<UserId, User>,
    entities: BTreeMap<EntityId, Entity>,
    memberships: BTreeMap<MembershipId, Membership>,
    affiliations: BTreeSet<Affiliation>,
    subscriptions: BTreeMap<(OrgId, String), ProductSubscription>,
}

impl Tables {
    /// The authorization view: active memberships joined to their org and user,
    /// left-joined to affiliated entities and active subscriptions.
    fn rows(&self) -> Vec<AuthorizationRow> {
        let mut rows = Vec::new();

        for membership in self.memberships.values().filter(|m| m.is_active()) {
            let (Some(org), Some(user)) = (
                self.orgs.get(&membership.org_id),
                self.users.get(&membership.user_id),
            ) else {
                continue;
            };

            let mut entities: Vec<Option<&Entity>> = self
                .affiliations
                .range(Affiliation::bounds(org.id))
                .filter_map(|a| self.entities.get(&a.entity_id))
                .map(Some)
                .collect();
            if entities.is_empty() {
                entities.push(None);
            }

            let mut products: Vec<Option<&str>> = self
                .subscriptions
                .values()
                .filter(|s| s.org_id == org.id && s.status_code == SubscriptionStatus::Active)
                .map(|s| Some(s.product_code.as_str()))
                .collect();
            if products.is_empty() {
                products.push(None);
            }

            for entity in &entities {
                for product in &products {
                    rows.push(AuthorizationRow::join(membership, org, user, *entity, *product));
                }
            }
        }

        rows
    }

    fn active_membership_for(&self, user_id: UserId, org_id: OrgId) -> Option<&Membership> {
        self.memberships
            .values()
            .find(|m| m.user_id == user_id && m.org_id == org_id && m.is_active())
    }
}

/// Thread-safe in-memory authorization store.
#[derive(Debug, Default)]
pub struct InMemoryAuthorizationStore {
    inner: RwLock<Tables>,
}

impl InMemoryAuthorizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace an org.
    pub fn upsert_org(&self, org: Org) {
        self.write().orgs.insert(org.id, org);
    }

    /// Insert or replace a user.
    pub fn upsert_user(&self, user: User) {
        self.write().users.insert(user.id, user);
    }

    /// Insert or replace an entity. Business identifiers are unique.
    pub fn upsert_entity(&self, entity: Entity) -> DomainResult<()> {
        let mut tables = self.write();
        let clash = tables
            .entities
            .values()
            .any(|e| e.business_identifier == entity.business_identifier && e.id != entity.id);
        if clash {
            return Err(DomainError::validation(format!(
                "business identifier '{}' is already registered",
                entity.business_identifier
            )));
        }
        tables.entities.insert(entity.id, entity);
        Ok(())
    }

    /// Record a membership.
    ///
    /// The org and user must exist, and a user may hold at most one active
    /// membership per org.
    pub fn add_membership(&self, membership: Membership) -> DomainResult<()> {
        let mut tables = self.write();
        if tables.memberships.contains_key(&membership.id) {
            return Err(DomainError::validation(format!(
                "membership {} already exists",
                membership.id
            )));
        }
        if !tables.orgs.contains_key(&membership.org_id) || !tables.users.contains_key(&membership.user_id) {
            return Err(DomainError::not_found());
        }
        if membership.is_active()
            && tables
                .active_membership_for(membership.user_id, membership.org_id)
                .is_some()
        {
            return Err(DomainError::validation(format!(
                "user {} already holds an active membership in org {}",
                membership.user_id, membership.org_id
            )));
        }
        tables.memberships.insert(membership.id, membership);
        Ok(())
    }

    pub fn change_membership_role(&self, id: MembershipId, role: Role) -> DomainResult<()> {
        let mut tables = self.write();
        let membership = tables.memberships.get_mut(&id).ok_or(DomainError::NotFound)?;
        membership.membership_type_code = role;
        Ok(())
    }

    /// Move a membership to `status`. Re-activation is subject to the
    /// one-active-membership rule.
    pub fn set_membership_status(&self, id: MembershipId, status: MembershipStatus) -> DomainResult<()> {
        let mut tables = self.write();
        let current = tables.memberships.get(&id).ok_or(DomainError::NotFound)?;
        if status == MembershipStatus::Active && !current.is_active() {
            let (user_id, org_id) = (current.user_id, current.org_id);
            if tables.active_membership_for(user_id, org_id).is_some() {
                return Err(DomainError::validation(format!(
                    "user {user_id} already holds an active membership in org {org_id}"
                )));
            }
        }
        if let Some(membership) = tables.memberships.get_mut(&id) {
            membership.status = status;
        }
        Ok(())
    }

    pub fn deactivate_membership(&self, id: MembershipId) -> DomainResult<()> {
        self.set_membership_status(id, MembershipStatus::Inactive)
    }

    pub fn set_org_status(&self, org_id: OrgId, status: OrgStatus) -> DomainResult<()> {
        let mut tables = self.write();
        let org = tables.orgs.get_mut(&org_id).ok_or(DomainError::NotFound)?;
        org.status_code = status;
        Ok(())
    }

    pub fn affiliate(&self, org_id: OrgId, entity_id: EntityId) -> DomainResult<()> {
        let mut tables = self.write();
        if !tables.orgs.contains_key(&org_id) || !tables.entities.contains_key(&entity_id) {
            return Err(DomainError::not_found());
        }
        tables.affiliations.insert(Affiliation { org_id, entity_id });
        Ok(())
    }

    /// Returns whether an affiliation was removed.
    pub fn remove_affiliation(&self, org_id: OrgId, entity_id: EntityId) -> bool {
        self.write().affiliations.remove(&Affiliation { org_id, entity_id })
    }

    /// Insert or replace the org's subscription to a product.
    pub fn subscribe(&self, subscription: ProductSubscription) -> DomainResult<()> {
        let mut tables = self.write();
        if !tables.orgs.contains_key(&subscription.org_id) {
            return Err(DomainError::not_found());
        }
        let key = (subscription.org_id, subscription.product_code.clone());
        tables.subscriptions.insert(key, subscription);
        Ok(())
    }

    /// Materialize the whole view (diagnostics and tests).
    pub fn rows(&self) -> Vec<AuthorizationRow> {
        self.read().rows()
    }
}

#[async_trait::async_trait]
impl AuthorizationView for InMemoryAuthorizationStore {
    async fn fetch_authoritative(
        &self,
        filter: &AuthorizationFilter,
    ) -> Result<Option<AuthorizationRow>, ResolveError> {
        let rows = self.read().rows();
        Ok(select_authoritative(rows.iter().filter(|row| filter.matches(row))).cloned())
    }

    async fn fetch_per_org(
        &self,
        filter: &AuthorizationFilter,
    ) -> Result<Vec<AuthorizationRow>, ResolveError> {
        let rows = self.read().rows();
        Ok(authoritative_per_org(rows.iter().filter(|row| filter.matches(row)))
            .into_iter()
            .cloned()
            .collect())
    }

    async fn find_org(&self, org_id: OrgId) -> Result<Option<Org>, ResolveError> {
        Ok(self.read().orgs.get(&org_id).cloned())
    }
}
