//! Resolver wiring for the HTTP layer.

use std::sync::Arc;

use sqlx::PgPool;

use orgauth_auth::PermissionTable;
use orgauth_infra::{
    AuthorizationResolver, ResolveError,
    config::ServiceConfig,
    db,
    permission_store::{InMemoryPermissionStore, PermissionStore, PostgresPermissionStore},
    read_model::{AuthorizationView, InMemoryAuthorizationStore, PostgresAuthorizationView},
};

pub type DynResolver = AuthorizationResolver<Arc<dyn AuthorizationView>, Arc<dyn PermissionStore>>;

/// Everything the handlers need, shared behind `Arc`.
pub struct AppServices {
    resolver: DynResolver,
    backend: &'static str,
}

impl AppServices {
    /// In-memory back end over `store`, with the built-in permission seed.
    pub fn in_memory(store: Arc<InMemoryAuthorizationStore>) -> Self {
        let view: Arc<dyn AuthorizationView> = store;
        let permissions: Arc<dyn PermissionStore> =
            Arc::new(InMemoryPermissionStore::new(PermissionTable::seed()));
        Self {
            resolver: AuthorizationResolver::new(view, permissions),
            backend: "in_memory",
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let view: Arc<dyn AuthorizationView> = Arc::new(PostgresAuthorizationView::new(pool.clone()));
        let permissions: Arc<dyn PermissionStore> = Arc::new(PostgresPermissionStore::new(pool));
        Self {
            resolver: AuthorizationResolver::new(view, permissions),
            backend: "postgres",
        }
    }

    /// Postgres when `DATABASE_URL` is configured (schema applied on start),
    /// otherwise an empty in-memory store.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, ResolveError> {
        match db::connect(config).await? {
            Some(pool) => {
                db::apply_schema(&pool).await?;
                Ok(Self::postgres(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; serving from an empty in-memory store");
                Ok(Self::in_memory(Arc::new(InMemoryAuthorizationStore::new())))
            }
        }
    }

    pub fn resolver(&self) -> &DynResolver {
        &self.resolver
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }
}
