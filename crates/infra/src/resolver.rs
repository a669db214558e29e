//! Authorization resolution service.
//!
//! Composes an [`AuthorizationView`] with a [`PermissionStore`]: pick the
//! authoritative membership row for a target, then attach the actions its role
//! is granted at the org's status. Every call is a pure read (at most two
//! sequential queries), so the resolver is shared behind `Arc` with no locking
//! of its own.

use tracing::{Span, debug, instrument};

use orgauth_auth::{
    AccountSummary, AuthorizationFilter, AuthorizationRow, Principal, ResolvedAuthorization, Role,
    Target,
};
use orgauth_core::{KeycloakGuid, OrgId};

use crate::error::{ResolveError, non_blank};
use crate::permission_store::PermissionStore;
use crate::read_model::AuthorizationView;

/// A request-scoped authorization question.
///
/// Fields are optional because they arrive from transport; [`AuthorizationResolver::resolve`]
/// rejects a request missing its principal or target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub principal: Option<Principal>,
    pub target: Option<Target>,
    /// Corp type supplied alongside the request (the `Product-Code` header).
    pub corp_type: Option<String>,
}

impl AuthorizationRequest {
    pub fn new(principal: Principal, target: Target) -> Self {
        Self {
            principal: Some(principal),
            target: Some(target),
            corp_type: None,
        }
    }

    pub fn with_corp_type(mut self, corp_type: impl Into<String>) -> Self {
        self.corp_type = Some(corp_type.into());
        self
    }
}

pub struct AuthorizationResolver<V, P> {
    view: V,
    permissions: P,
}

impl<V, P> AuthorizationResolver<V, P>
where
    V: AuthorizationView,
    P: PermissionStore,
{
    pub fn new(view: V, permissions: P) -> Self {
        Self { view, permissions }
    }

    /// Role and actions of `user_guid` in `org_id`.
    #[instrument(skip(self), fields(org_id = %org_id, role = tracing::field::Empty), err)]
    pub async fn resolve_by_org(
        &self,
        user_guid: KeycloakGuid,
        org_id: OrgId,
    ) -> Result<Option<ResolvedAuthorization>, ResolveError> {
        let filter = AuthorizationFilter::for_user(user_guid).with_org(org_id);
        self.resolve_filter(&filter).await
    }

    /// Like [`Self::resolve_by_org`], restricted to rows whose corp type is
    /// `corp_type` or NULL.
    #[instrument(skip(self), fields(org_id = %org_id, role = tracing::field::Empty), err)]
    pub async fn resolve_by_org_and_corp_type(
        &self,
        user_guid: KeycloakGuid,
        org_id: OrgId,
        corp_type: &str,
    ) -> Result<Option<ResolvedAuthorization>, ResolveError> {
        let corp_type = non_blank(corp_type, "corp type")?;
        let filter = AuthorizationFilter::for_user(user_guid)
            .with_org(org_id)
            .with_corp_type(corp_type);
        self.resolve_filter(&filter).await
    }

    /// Role and actions of `user_guid` over a business, through whichever of
    /// the user's orgs is affiliated with it.
    #[instrument(skip(self), fields(role = tracing::field::Empty), err)]
    pub async fn resolve_by_business(
        &self,
        user_guid: KeycloakGuid,
        business_identifier: &str,
    ) -> Result<Option<ResolvedAuthorization>, ResolveError> {
        let business_identifier = target_identifier(business_identifier)?;
        let filter = AuthorizationFilter::for_user(user_guid).with_business(business_identifier);
        self.resolve_filter(&filter).await
    }

    /// Service-account variant: the best-ranked membership of any user in an
    /// org subscribed to `product_code`.
    ///
    /// With a `corp_type`, rows for entities of another corp type are excluded,
    /// but an org with no affiliation at all still resolves.
    #[instrument(skip(self), fields(org_id = %org_id, role = tracing::field::Empty), err)]
    pub async fn resolve_by_org_and_product(
        &self,
        org_id: OrgId,
        product_code: &str,
        corp_type: Option<&str>,
    ) -> Result<Option<ResolvedAuthorization>, ResolveError> {
        let product_code = non_blank(product_code, "product code")?;
        let mut filter = AuthorizationFilter::for_org(org_id).with_product(product_code);
        if let Some(corp_type) = corp_type {
            filter = filter.with_corp_type(non_blank(corp_type, "corp type")?);
        }
        self.resolve_filter(&filter).await
    }

    /// Service-account variant for business targets.
    #[instrument(skip(self), fields(role = tracing::field::Empty), err)]
    pub async fn resolve_by_business_for_product(
        &self,
        business_identifier: &str,
        product_code: &str,
    ) -> Result<Option<ResolvedAuthorization>, ResolveError> {
        let business_identifier = target_identifier(business_identifier)?;
        let product_code = non_blank(product_code, "product code")?;
        let filter = AuthorizationFilter::for_business(business_identifier).with_product(product_code);
        self.resolve_filter(&filter).await
    }

    /// Every org the user holds an active membership in, one entry per org,
    /// ordered by org id. Permissions for all of them come from a single read.
    #[instrument(skip(self), fields(orgs = tracing::field::Empty), err)]
    pub async fn resolve_all_for_user(
        &self,
        user_guid: KeycloakGuid,
    ) -> Result<Vec<ResolvedAuthorization>, ResolveError> {
        let rows = self
            .view
            .fetch_per_org(&AuthorizationFilter::for_user(user_guid))
            .await?;
        Span::current().record("orgs", rows.len());
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut roles: Vec<Role> = rows.iter().map(|row| row.org_membership.clone()).collect();
        roles.sort();
        roles.dedup();
        let table = self.permissions.table_for_roles(&roles).await?;

        Ok(rows
            .iter()
            .map(|row| {
                let actions = table.actions_for(&row.org_membership, &row.org_status);
                ResolvedAuthorization::from_row(row, actions)
            })
            .collect())
    }

    /// Staff hold no membership: they get the `STAFF` rows for the target
    /// org's status.
    #[instrument(skip(self), err)]
    pub async fn resolve_for_staff(
        &self,
        target: &Target,
    ) -> Result<Option<ResolvedAuthorization>, ResolveError> {
        let (account, business) = match target {
            Target::Org(org_id) => match self.view.find_org(*org_id).await? {
                Some(org) => (AccountSummary::from(&org), None),
                None => return Ok(None),
            },
            Target::Business(identifier) => {
                let identifier = target_identifier(identifier)?;
                let filter = AuthorizationFilter::for_business(identifier);
                match self.view.fetch_authoritative(&filter).await? {
                    Some(row) => (row.account(), row.business()),
                    None => return Ok(None),
                }
            }
        };

        let actions = self.permissions.actions_for(&Role::STAFF, &account.status).await?;
        Ok(Some(ResolvedAuthorization {
            role: Role::STAFF,
            actions,
            account,
            business,
        }))
    }

    /// Dispatch a transport-level request on its principal kind.
    ///
    /// Users resolve through their own memberships (narrowed by corp type when
    /// one is supplied for an org target); service accounts through their
    /// product; staff through the `STAFF` rows.
    #[instrument(skip(self, request), fields(
        principal = request.principal.as_ref().map(Principal::kind),
    ), err)]
    pub async fn resolve(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<Option<ResolvedAuthorization>, ResolveError> {
        let principal = request.principal.as_ref().ok_or(ResolveError::MissingIdentity)?;
        let target = request.target.as_ref().ok_or(ResolveError::MissingTarget)?;
        let corp_type = request.corp_type.as_deref();

        match (principal, target) {
            (Principal::User { keycloak_guid }, Target::Org(org_id)) => match corp_type {
                Some(corp_type) => {
                    self.resolve_by_org_and_corp_type(*keycloak_guid, *org_id, corp_type)
                        .await
                }
                None => self.resolve_by_org(*keycloak_guid, *org_id).await,
            },
            (Principal::User { keycloak_guid }, Target::Business(identifier)) => {
                self.resolve_by_business(*keycloak_guid, identifier).await
            }
            (Principal::ServiceAccount { product_code, .. }, Target::Org(org_id)) => {
                self.resolve_by_org_and_product(*org_id, product_code, corp_type)
                    .await
            }
            (Principal::ServiceAccount { product_code, .. }, Target::Business(identifier)) => {
                self.resolve_by_business_for_product(identifier, product_code)
                    .await
            }
            (Principal::Staff { .. }, target) => self.resolve_for_staff(target).await,
        }
    }

    async fn resolve_filter(
        &self,
        filter: &AuthorizationFilter,
    ) -> Result<Option<ResolvedAuthorization>, ResolveError> {
        let Some(row) = self.view.fetch_authoritative(filter).await? else {
            debug!(?filter, "no authorization row");
            return Ok(None);
        };

        Span::current().record("role", row.org_membership.as_str());
        self.attach_actions(&row).await.map(Some)
    }

    async fn attach_actions(&self, row: &AuthorizationRow) -> Result<ResolvedAuthorization, ResolveError> {
        let actions = self
            .permissions
            .actions_for(&row.org_membership, &row.org_status)
            .await?;
        Ok(ResolvedAuthorization::from_row(row, actions))
    }
}

fn target_identifier(business_identifier: &str) -> Result<&str, ResolveError> {
    let trimmed = business_identifier.trim();
    if trimmed.is_empty() {
        return Err(ResolveError::MissingTarget);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use orgauth_auth::model::{Entity, Membership, Org, ProductSubscription, User};
    use orgauth_auth::{OrgStatus, Permission};
    use orgauth_core::{EntityId, MembershipId, UserId};
    use proptest::prelude::*;

    use crate::permission_store::InMemoryPermissionStore;
    use crate::read_model::InMemoryAuthorizationStore;

    type TestResolver =
        AuthorizationResolver<Arc<InMemoryAuthorizationStore>, Arc<InMemoryPermissionStore>>;

    struct Fixture {
        store: Arc<InMemoryAuthorizationStore>,
        resolver: TestResolver,
        next_membership: i64,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(InMemoryAuthorizationStore::new());
            let resolver =
                AuthorizationResolver::new(store.clone(), Arc::new(InMemoryPermissionStore::default()));
            Self {
                store,
                resolver,
                next_membership: 1,
            }
        }

        fn org(&self, id: i64) -> OrgId {
            self.store.upsert_org(Org::new(OrgId::new(id), format!("Org {id}")));
            OrgId::new(id)
        }

        fn user(&self, id: i64) -> KeycloakGuid {
            let guid = KeycloakGuid::new();
            self.store.upsert_user(User {
                id: UserId::new(id),
                keycloak_guid: guid,
                username: format!("user-{id}"),
            });
            guid
        }

        fn member(&mut self, user: i64, org: OrgId, role: Role) -> MembershipId {
            let id = MembershipId::new(self.next_membership);
            self.next_membership += 1;
            self.store
                .add_membership(Membership::active(id, UserId::new(user), org, role))
                .unwrap();
            id
        }

        fn business(&self, id: i64, identifier: &str, corp_type: &str, org: OrgId) {
            self.store
                .upsert_entity(Entity {
                    id: EntityId::new(id),
                    business_identifier: identifier.to_string(),
                    corp_type_code: corp_type.to_string(),
                    name: Some(format!("{identifier} LTD")),
                    folio_number: Some("F-1".to_string()),
                })
                .unwrap();
            self.store.affiliate(org, EntityId::new(id)).unwrap();
        }
    }

    fn has(resolved: &ResolvedAuthorization, action: &str) -> bool {
        resolved.has_action(&Permission::new(action.to_string()))
    }

    #[tokio::test]
    async fn single_membership_resolves_to_its_role() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        let alice = fx.user(1);
        fx.member(1, org, Role::COORDINATOR);

        let resolved = fx.resolver.resolve_by_org(alice, org).await.unwrap().unwrap();
        assert_eq!(resolved.role, Role::COORDINATOR);
        assert_eq!(resolved.account.org_id, org);
    }

    #[tokio::test]
    async fn user_without_membership_resolves_to_none() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        fx.user(1);
        let stranger = fx.user(2);
        fx.member(1, org, Role::OWNER);

        assert!(fx.resolver.resolve_by_org(stranger, org).await.unwrap().is_none());
        assert!(fx.resolver.resolve_by_org(stranger, OrgId::new(77)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn admin_actions_follow_org_status() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        let alice = fx.user(1);
        fx.member(1, org, Role::ADMIN);

        let active = fx.resolver.resolve_by_org(alice, org).await.unwrap().unwrap();
        for action in ["edit", "view", "make-payment", "generate-invoice"] {
            assert!(has(&active, action), "ACTIVE admin missing {action}");
        }
        assert!(!has(&active, "transaction_history"));

        fx.store.set_org_status(org, OrgStatus::NSF_SUSPENDED).unwrap();

        let suspended = fx.resolver.resolve_by_org(alice, org).await.unwrap().unwrap();
        assert!(has(&suspended, "transaction_history"));
        for action in &active.actions {
            assert!(suspended.has_action(action), "suspension dropped {action}");
        }
        assert_eq!(suspended.account.status, OrgStatus::NSF_SUSPENDED);
    }

    #[tokio::test]
    async fn unaffiliated_org_resolves_by_org_but_not_by_business() {
        let mut fx = Fixture::new();
        let claimed = fx.org(1);
        let unclaimed = fx.org(2);
        let alice = fx.user(1);
        fx.member(1, unclaimed, Role::OWNER);
        fx.business(1, "BC0000001", "BC", claimed);

        let by_org = fx.resolver.resolve_by_org(alice, unclaimed).await.unwrap().unwrap();
        assert_eq!(by_org.role, Role::OWNER);
        assert!(by_org.business.is_none());

        for identifier in ["BC0000001", "CP0000002"] {
            assert!(fx.resolver.resolve_by_business(alice, identifier).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn business_resolution_picks_best_role_across_affiliated_orgs() {
        let mut fx = Fixture::new();
        let org_a = fx.org(1);
        let org_b = fx.org(2);
        let alice = fx.user(1);
        fx.member(1, org_a, Role::USER);
        fx.member(1, org_b, Role::ADMIN);
        fx.business(1, "BC0000001", "BC", org_a);
        fx.store.affiliate(org_b, EntityId::new(1)).unwrap();

        let resolved = fx.resolver.resolve_by_business(alice, "BC0000001").await.unwrap().unwrap();
        assert_eq!(resolved.role, Role::ADMIN);
        assert_eq!(resolved.account.org_id, org_b);
        let business = resolved.business.unwrap();
        assert_eq!(business.identifier, "BC0000001");
        assert_eq!(business.folio_number.as_deref(), Some("F-1"));

        assert!(fx.store.remove_affiliation(org_b, EntityId::new(1)));
        let fallback = fx.resolver.resolve_by_business(alice, "BC0000001").await.unwrap().unwrap();
        assert_eq!(fallback.role, Role::USER);
        assert_eq!(fallback.account.org_id, org_a);
    }

    #[tokio::test]
    async fn product_variant_picks_lowest_rank_across_users() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        fx.user(1);
        fx.user(2);
        fx.user(3);
        fx.member(1, org, Role::USER);
        fx.member(2, org, Role::OWNER);
        fx.member(3, org, Role::ADMIN);
        fx.store.subscribe(ProductSubscription::active(org, "PPR")).unwrap();

        let resolved = fx
            .resolver
            .resolve_by_org_and_product(org, "PPR", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.role, Role::OWNER);
    }

    #[tokio::test]
    async fn product_variant_requires_an_active_subscription() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        fx.user(1);
        fx.member(1, org, Role::OWNER);

        assert!(fx
            .resolver
            .resolve_by_org_and_product(org, "PPR", None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn corp_type_filter_distinguishes_no_entity_from_wrong_entity() {
        let mut fx = Fixture::new();
        let unaffiliated = fx.org(1);
        let affiliated = fx.org(2);
        fx.user(1);
        fx.member(1, unaffiliated, Role::ADMIN);
        fx.member(1, affiliated, Role::ADMIN);
        fx.business(1, "BC0000001", "BC", affiliated);
        for org in [unaffiliated, affiliated] {
            fx.store.subscribe(ProductSubscription::active(org, "BUSINESS")).unwrap();
        }

        let no_entity = fx
            .resolver
            .resolve_by_org_and_product(unaffiliated, "BUSINESS", Some("CP"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(no_entity.role, Role::ADMIN);
        assert!(no_entity.business.is_none());

        let wrong_entity = fx
            .resolver
            .resolve_by_org_and_product(affiliated, "BUSINESS", Some("CP"))
            .await
            .unwrap();
        assert!(wrong_entity.is_none());

        let right_entity = fx
            .resolver
            .resolve_by_org_and_product(affiliated, "BUSINESS", Some("BC"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(right_entity.business.unwrap().corp_type_code.as_deref(), Some("BC"));
    }

    #[tokio::test]
    async fn repeated_resolution_is_identical() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        let alice = fx.user(1);
        fx.member(1, org, Role::ADMIN);
        fx.business(1, "BC0000001", "BC", org);

        let first = fx.resolver.resolve_by_business(alice, "BC0000001").await.unwrap();
        let second = fx.resolver.resolve_by_business(alice, "BC0000001").await.unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn role_changes_and_deactivation_show_on_the_next_call() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        let alice = fx.user(1);
        let membership = fx.member(1, org, Role::USER);

        fx.store.change_membership_role(membership, Role::ADMIN).unwrap();
        let promoted = fx.resolver.resolve_by_org(alice, org).await.unwrap().unwrap();
        assert_eq!(promoted.role, Role::ADMIN);

        fx.store.deactivate_membership(membership).unwrap();
        assert!(fx.resolver.resolve_by_org(alice, org).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn all_authorizations_for_user_lists_one_entry_per_org() {
        let mut fx = Fixture::new();
        let org_a = fx.org(1);
        let org_b = fx.org(2);
        fx.org(3);
        let alice = fx.user(1);
        fx.member(1, org_b, Role::USER);
        fx.member(1, org_a, Role::OWNER);
        fx.business(1, "BC0000001", "BC", org_a);
        fx.business(2, "BC0000002", "BC", org_a);

        let all = fx.resolver.resolve_all_for_user(alice).await.unwrap();
        let summary: Vec<(OrgId, Role)> = all.iter().map(|r| (r.account.org_id, r.role.clone())).collect();
        assert_eq!(summary, vec![(org_a, Role::OWNER), (org_b, Role::USER)]);
    }

    /// Counts reads against the permission matrix.
    #[derive(Default)]
    struct CountingPermissions {
        inner: InMemoryPermissionStore,
        reads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl PermissionStore for CountingPermissions {
        async fn actions_for(
            &self,
            role: &Role,
            org_status: &OrgStatus,
        ) -> Result<Vec<Permission>, ResolveError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.actions_for(role, org_status).await
        }

        async fn table_for_roles(
            &self,
            roles: &[Role],
        ) -> Result<orgauth_auth::PermissionTable, ResolveError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.table_for_roles(roles).await
        }
    }

    #[tokio::test]
    async fn listing_many_orgs_reads_permissions_once() {
        let mut fx = Fixture::new();
        let alice = fx.user(1);
        let roles = [Role::OWNER, Role::ADMIN, Role::COORDINATOR, Role::USER, Role::MEMBER];
        for id in 1..=10 {
            let org = fx.org(id);
            fx.member(1, org, roles[id as usize % roles.len()].clone());
        }
        fx.store.set_org_status(OrgId::new(3), OrgStatus::NSF_SUSPENDED).unwrap();

        let permissions = Arc::new(CountingPermissions::default());
        let counted = AuthorizationResolver::new(fx.store.clone(), permissions.clone());

        let all = counted.resolve_all_for_user(alice).await.unwrap();
        assert_eq!(all.len(), 10);
        assert_eq!(permissions.reads.load(Ordering::SeqCst), 1);

        for listed in &all {
            let single = fx
                .resolver
                .resolve_by_org(alice, listed.account.org_id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(&single, listed);
        }

        let nobody = fx.user(2);
        assert!(counted.resolve_all_for_user(nobody).await.unwrap().is_empty());
        assert_eq!(permissions.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn staff_get_staff_rows_without_membership() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        fx.user(1);
        fx.member(1, org, Role::OWNER);
        fx.business(1, "BC0000001", "BC", org);

        let staff = Principal::Staff {
            keycloak_guid: KeycloakGuid::new(),
        };

        let by_org = fx
            .resolver
            .resolve(&AuthorizationRequest::new(staff.clone(), Target::Org(org)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_org.role, Role::STAFF);
        assert!(has(&by_org, "transaction_history"));

        let by_business = fx
            .resolver
            .resolve(&AuthorizationRequest::new(
                staff.clone(),
                Target::Business("BC0000001".to_string()),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_business.account.org_id, org);

        let unknown = fx
            .resolver
            .resolve(&AuthorizationRequest::new(staff, Target::Org(OrgId::new(50))))
            .await
            .unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn service_account_requests_route_through_the_product() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        fx.user(1);
        fx.member(1, org, Role::COORDINATOR);
        fx.business(1, "BC0000001", "BC", org);
        fx.store.subscribe(ProductSubscription::active(org, "BUSINESS")).unwrap();

        let service = |product: &str| Principal::ServiceAccount {
            keycloak_guid: KeycloakGuid::new(),
            product_code: product.to_string(),
        };

        let resolved = fx
            .resolver
            .resolve(&AuthorizationRequest::new(
                service("BUSINESS"),
                Target::Business("BC0000001".to_string()),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.role, Role::COORDINATOR);

        let other_product = fx
            .resolver
            .resolve(&AuthorizationRequest::new(service("PPR"), Target::Org(org)))
            .await
            .unwrap();
        assert!(other_product.is_none());
    }

    #[tokio::test]
    async fn user_request_with_corp_type_narrows_org_resolution() {
        let mut fx = Fixture::new();
        let org = fx.org(1);
        let alice = fx.user(1);
        fx.member(1, org, Role::ADMIN);
        fx.business(1, "BC0000001", "BC", org);

        let request = AuthorizationRequest::new(Principal::user(alice), Target::Org(org));
        assert!(fx.resolver.resolve(&request.clone().with_corp_type("BC")).await.unwrap().is_some());
        assert!(fx.resolver.resolve(&request.with_corp_type("CP")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_requests_are_errors_not_empty_results() {
        let fx = Fixture::new();
        let alice = KeycloakGuid::new();

        let no_identity = AuthorizationRequest {
            target: Some(Target::Org(OrgId::new(1))),
            ..Default::default()
        };
        assert_eq!(fx.resolver.resolve(&no_identity).await, Err(ResolveError::MissingIdentity));

        let no_target = AuthorizationRequest {
            principal: Some(Principal::user(alice)),
            ..Default::default()
        };
        assert_eq!(fx.resolver.resolve(&no_target).await, Err(ResolveError::MissingTarget));

        assert_eq!(
            fx.resolver.resolve_by_business(alice, "   ").await,
            Err(ResolveError::MissingTarget)
        );
        assert!(matches!(
            fx.resolver.resolve_by_org_and_product(OrgId::new(1), "PPR", Some("")).await,
            Err(ResolveError::InvalidInput(_))
        ));
        assert!(matches!(
            fx.resolver.resolve_by_org_and_corp_type(alice, OrgId::new(1), " ").await,
            Err(ResolveError::InvalidInput(_))
        ));
    }

    fn arb_role() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::OWNER),
            Just(Role::ADMIN),
            Just(Role::COORDINATOR),
            Just(Role::MEMBER),
            Just(Role::USER),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: for one org with memberships held by distinct users, the
        /// product variant returns the role with the lowest precedence rank, and
        /// each user resolves to their own role.
        #[test]
        fn resolution_honours_precedence(roles in prop::collection::vec(arb_role(), 1..8)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let mut fx = Fixture::new();
            let org = fx.org(1);
            fx.store.subscribe(ProductSubscription::active(org, "BUSINESS")).unwrap();

            let mut users = Vec::new();
            for (i, role) in roles.iter().enumerate() {
                let user_id = i as i64 + 1;
                users.push(fx.user(user_id));
                fx.member(user_id, org, role.clone());
            }

            let best = rt
                .block_on(fx.resolver.resolve_by_org_and_product(org, "BUSINESS", None))
                .unwrap()
                .unwrap();
            let min_rank = roles.iter().map(Role::precedence_rank).min().unwrap();
            prop_assert_eq!(best.role.precedence_rank(), min_rank);

            for (guid, role) in users.iter().zip(&roles) {
                let own = rt.block_on(fx.resolver.resolve_by_org(*guid, org)).unwrap().unwrap();
                prop_assert_eq!(&own.role, role);
            }
        }
    }
}
