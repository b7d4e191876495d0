//! `db` crate: LightBnB persistence layer.
//!
//! Provides a connection pool, typed row structs, the property-search query
//! builder, and repository functions for users, reservations and properties.
//! Every repository function runs through an injected [`Store`].

pub mod error;
pub mod pool;
pub mod query;
pub mod store;
pub mod mock;
pub mod repository;
pub mod models;

pub use pool::DbPool;
pub use error::DbError;
pub use query::{PropertyFilters, QueryFragment, SqlParam, DEFAULT_LIMIT};
pub use store::{PgStore, Store};
