//! Infrastructure layer: authorization stores, the resolver service, Postgres
//! wiring and configuration.

pub mod config;
pub mod db;
pub mod error;
pub mod permission_store;
pub mod read_model;
pub mod resolver;

pub use error::ResolveError;
pub use resolver::{AuthorizationRequest, AuthorizationResolver};
