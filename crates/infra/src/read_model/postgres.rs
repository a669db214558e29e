//! Postgres-backed authorization view.
//!
//! Reads `authorizations_view` (see `migrations/0001_authorization_schema.sql`).
//! The precedence ordering is pushed into SQL with a `CASE` generated from the
//! same rank table the in-memory store uses.
//!
//! ## Filters
//!
//! Every optional criterion is bound as a nullable parameter and guarded with
//! `$n IS NULL OR ...`, so one statement covers every filter combination. The
//! corp type criterion also admits rows whose `corp_type_code` is NULL (orgs
//! with no affiliation).

use std::sync::Arc;

use sqlx::{PgPool, Row};
use tracing::instrument;

use orgauth_auth::model::Org;
use orgauth_auth::roles::precedence_case_sql;
use orgauth_auth::{AuthorizationFilter, AuthorizationRow, OrgStatus, Role};
use orgauth_core::{KeycloakGuid, MembershipId, OrgId};

use super::AuthorizationView;
use crate::error::{ResolveError, map_sqlx_error};

const VIEW_COLUMNS: &str = r#"
    business_identifier,
    entity_name,
    corp_type_code,
    folio_number,
    org_membership,
    keycloak_guid,
    org_id,
    org_name,
    org_type,
    org_status,
    bcol_user_id,
    bcol_account_id,
    product_code,
    membership_id
"#;

const VIEW_PREDICATE: &str = r#"
    ($1::uuid IS NULL OR keycloak_guid = $1)
    AND ($2::bigint IS NULL OR org_id = $2)
    AND ($3::text IS NULL OR business_identifier = $3)
    AND ($4::text IS NULL OR product_code = $4)
    AND ($5::text IS NULL OR corp_type_code = $5 OR corp_type_code IS NULL)
"#;

/// Postgres read access to `authorizations_view`.
#[derive(Debug, Clone)]
pub struct PostgresAuthorizationView {
    pool: Arc<PgPool>,
    authoritative_sql: Arc<str>,
    per_org_sql: Arc<str>,
}

impl PostgresAuthorizationView {
    pub fn new(pool: PgPool) -> Self {
        let rank = precedence_case_sql("org_membership");

        let authoritative_sql = format!(
            "SELECT {VIEW_COLUMNS} FROM authorizations_view WHERE {VIEW_PREDICATE} \
             ORDER BY {rank}, membership_id ASC, business_identifier COLLATE \"C\" ASC NULLS FIRST LIMIT 1"
        );
        let per_org_sql = format!(
            "SELECT DISTINCT ON (org_id) {VIEW_COLUMNS} FROM authorizations_view WHERE {VIEW_PREDICATE} \
             ORDER BY org_id ASC, {rank}, membership_id ASC, business_identifier COLLATE \"C\" ASC NULLS FIRST"
        );

        Self {
            pool: Arc::new(pool),
            authoritative_sql: authoritative_sql.into(),
            per_org_sql: per_org_sql.into(),
        }
    }

    fn bind<'q>(
        sql: &'q str,
        filter: &'q AuthorizationFilter,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        sqlx::query(sql)
            .bind(filter.keycloak_guid.map(|guid| *guid.as_uuid()))
            .bind(filter.org_id.map(|id| id.get()))
            .bind(filter.business_identifier.as_deref())
            .bind(filter.product_code.as_deref())
            .bind(filter.corp_type.as_deref())
    }
}

#[async_trait::async_trait]
impl AuthorizationView for PostgresAuthorizationView {
    #[instrument(skip(self), err)]
    async fn fetch_authoritative(
        &self,
        filter: &AuthorizationFilter,
    ) -> Result<Option<AuthorizationRow>, ResolveError> {
        let row = Self::bind(&self.authoritative_sql, filter)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch_authoritative", e))?;

        row.map(|r| decode_row(&r))
            .transpose()
            .map_err(|e| map_sqlx_error("fetch_authoritative", e))
    }

    #[instrument(skip(self), err)]
    async fn fetch_per_org(
        &self,
        filter: &AuthorizationFilter,
    ) -> Result<Vec<AuthorizationRow>, ResolveError> {
        let rows = Self::bind(&self.per_org_sql, filter)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch_per_org", e))?;

        rows.iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("fetch_per_org", e))
    }

    #[instrument(skip(self), fields(org_id = %org_id), err)]
    async fn find_org(&self, org_id: OrgId) -> Result<Option<Org>, ResolveError> {
        let row = sqlx::query(
            r#"
            SELECT
                id,
                name,
                type_code,
                status_code,
                bcol_account_id,
                bcol_user_id
            FROM orgs
            WHERE id = $1
            "#,
        )
        .bind(org_id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_org", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = || -> Result<Org, sqlx::Error> {
            Ok(Org {
                id: OrgId::new(row.try_get("id")?),
                name: row.try_get("name")?,
                type_code: row.try_get("type_code")?,
                status_code: OrgStatus::from(row.try_get::<String, _>("status_code")?),
                bcol_account_id: row.try_get("bcol_account_id")?,
                bcol_user_id: row.try_get("bcol_user_id")?,
            })
        };
        decode().map(Some).map_err(|e| map_sqlx_error("find_org", e))
    }
}

// SQLx row decoding

fn decode_row(row: &sqlx::postgres::PgRow) -> Result<AuthorizationRow, sqlx::Error> {
    Ok(AuthorizationRow {
        business_identifier: row.try_get("business_identifier")?,
        entity_name: row.try_get("entity_name")?,
        corp_type_code: row.try_get("corp_type_code")?,
        folio_number: row.try_get("folio_number")?,
        org_membership: Role::from(row.try_get::<String, _>("org_membership")?),
        keycloak_guid: KeycloakGuid::from_uuid(row.try_get("keycloak_guid")?),
        org_id: OrgId::new(row.try_get("org_id")?),
        org_name: row.try_get("org_name")?,
        org_type: row.try_get("org_type")?,
        org_status: OrgStatus::from(row.try_get::<String, _>("org_status")?),
        bcol_user_id: row.try_get("bcol_user_id")?,
        bcol_account_id: row.try_get("bcol_account_id")?,
        product_code: row.try_get("product_code")?,
        membership_id: MembershipId::new(row.try_get("membership_id")?),
    })
}
