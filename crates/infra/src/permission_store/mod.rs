//! Permission matrix lookups.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryPermissionStore;
pub use postgres::PostgresPermissionStore;

use std::sync::Arc;

use orgauth_auth::{OrgStatus, Permission, PermissionTable, Role};

use crate::error::ResolveError;

/// Source of the (role, org status, action) matrix.
///
/// `actions_for` returns the union of the rows with no org status and the rows
/// for `org_status`, deduplicated and sorted.
#[async_trait::async_trait]
pub trait PermissionStore: Send + Sync {
    async fn actions_for(
        &self,
        role: &Role,
        org_status: &OrgStatus,
    ) -> Result<Vec<Permission>, ResolveError>;

    /// Every row for any of `roles`, in one read. Callers resolving several
    /// (role, status) pairs at once union through the returned table.
    async fn table_for_roles(&self, roles: &[Role]) -> Result<PermissionTable, ResolveError>;
}

#[async_trait::async_trait]
impl<T> PermissionStore for Arc<T>
where
    T: PermissionStore + ?Sized,
{
    async fn actions_for(
        &self,
        role: &Role,
        org_status: &OrgStatus,
    ) -> Result<Vec<Permission>, ResolveError> {
        (**self).actions_for(role, org_status).await
    }

    async fn table_for_roles(&self, roles: &[Role]) -> Result<PermissionTable, ResolveError> {
        (**self).table_for_roles(roles).await
    }
}
