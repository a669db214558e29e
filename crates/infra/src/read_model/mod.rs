//! Authorization read models: the view trait and its back ends.

pub mod authorization_view;
pub mod in_memory;
pub mod postgres;

pub use authorization_view::AuthorizationView;
pub use in_memory::InMemoryAuthorizationStore;
pub use postgres::PostgresAuthorizationView;
