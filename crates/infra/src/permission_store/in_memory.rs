use std::sync::{PoisonError, RwLock};

use orgauth_auth::{OrgStatus, Permission, PermissionRule, PermissionTable, Role};

use super::PermissionStore;
use crate::error::ResolveError;

/// In-memory permission matrix, seeded with the same rows as the SQL schema.
#[derive(Debug)]
pub struct InMemoryPermissionStore {
    table: RwLock<PermissionTable>,
}

impl InMemoryPermissionStore {
    pub fn new(table: PermissionTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }

    /// Append a row. Existing rows are never changed or removed.
    pub fn append(&self, rule: PermissionRule) {
        self.table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(rule);
    }
}

impl Default for InMemoryPermissionStore {
    fn default() -> Self {
        Self::new(PermissionTable::seed())
    }
}

#[async_trait::async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn actions_for(
        &self,
        role: &Role,
        org_status: &OrgStatus,
    ) -> Result<Vec<Permission>, ResolveError> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Ok(table.actions_for(role, org_status))
    }

    async fn table_for_roles(&self, roles: &[Role]) -> Result<PermissionTable, ResolveError> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Ok(table.restricted_to(roles))
    }
}
