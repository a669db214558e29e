use std::collections::BTreeSet;
use std::sync::Arc;

use sqlx::{PgPool, Row};
use tracing::instrument;

use orgauth_auth::{OrgStatus, Permission, PermissionRule, PermissionTable, Role};

use super::PermissionStore;
use crate::error::{ResolveError, map_sqlx_error};

/// Reads the `permissions` table.
#[derive(Debug, Clone)]
pub struct PostgresPermissionStore {
    pool: Arc<PgPool>,
}

impl PostgresPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl PermissionStore for PostgresPermissionStore {
    #[instrument(skip(self), fields(role = %role, org_status = %org_status), err)]
    async fn actions_for(
        &self,
        role: &Role,
        org_status: &OrgStatus,
    ) -> Result<Vec<Permission>, ResolveError> {
        let rows = sqlx::query(
            r#"
            SELECT actions
            FROM permissions
            WHERE membership_type_code = $1
                AND (org_status_code IS NULL OR org_status_code = $2)
            "#,
        )
        .bind(role.as_str())
        .bind(org_status.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("actions_for", e))?;

        // Ordering must not depend on the database collation.
        let actions = rows
            .iter()
            .map(|row| row.try_get::<String, _>("actions").map(Permission::from))
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|e| map_sqlx_error("actions_for", e))?;

        Ok(actions.into_iter().collect())
    }

    #[instrument(skip(self), fields(roles = roles.len()), err)]
    async fn table_for_roles(&self, roles: &[Role]) -> Result<PermissionTable, ResolveError> {
        let codes: Vec<&str> = roles.iter().map(Role::as_str).collect();
        let rows = sqlx::query(
            r#"
            SELECT membership_type_code, org_status_code, actions
            FROM permissions
            WHERE membership_type_code = ANY($1)
            "#,
        )
        .bind(codes)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("table_for_roles", e))?;

        let rules = rows
            .iter()
            .map(|row| {
                Ok(PermissionRule {
                    membership_type: Role::from(row.try_get::<String, _>("membership_type_code")?),
                    org_status: row
                        .try_get::<Option<String>, _>("org_status_code")?
                        .map(OrgStatus::from),
                    action: Permission::from(row.try_get::<String, _>("actions")?),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| map_sqlx_error("table_for_roles", e))?;

        Ok(PermissionTable::new(rules))
    }
}
