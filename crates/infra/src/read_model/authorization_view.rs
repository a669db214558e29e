use std::sync::Arc;

use orgauth_auth::model::Org;
use orgauth_auth::{AuthorizationFilter, AuthorizationRow};
use orgauth_core::OrgId;

use crate::error::ResolveError;

/// Read access to the authorization projection.
///
/// Implementations apply the filter, then the precedence ordering (rank, then
/// membership id). They never mutate anything.
#[async_trait::async_trait]
pub trait AuthorizationView: Send + Sync {
    /// The single best-ranked row matching `filter`.
    async fn fetch_authoritative(
        &self,
        filter: &AuthorizationFilter,
    ) -> Result<Option<AuthorizationRow>, ResolveError>;

    /// The best-ranked row per org matching `filter`, ordered by org id.
    async fn fetch_per_org(
        &self,
        filter: &AuthorizationFilter,
    ) -> Result<Vec<AuthorizationRow>, ResolveError>;

    /// Org lookup for principals that hold no membership (staff).
    async fn find_org(&self, org_id: OrgId) -> Result<Option<Org>, ResolveError>;
}

#[async_trait::async_trait]
impl<T> AuthorizationView for Arc<T>
where
    T: AuthorizationView + ?Sized,
{
    async fn fetch_authoritative(
        &self,
        filter: &AuthorizationFilter,
    ) -> Result<Option<AuthorizationRow>, ResolveError> {
        (**self).fetch_authoritative(filter).await
    }

    async fn fetch_per_org(
        &self,
        filter: &AuthorizationFilter,
    ) -> Result<Vec<AuthorizationRow>, ResolveError> {
        (**self).fetch_per_org(filter).await
    }

    async fn find_org(&self, org_id: OrgId) -> Result<Option<Org>, ResolveError> {
        (**self).find_org(org_id).await
    }
}
