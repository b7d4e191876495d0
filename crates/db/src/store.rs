//! The `Store` trait: the query-execution capability every repository
//! function is handed.
//!
//! A store takes a [`QueryFragment`] and returns its rows as JSON objects
//! keyed by column name. [`PgStore`] is the Postgres implementation;
//! [`crate::mock::MockStore`] is an in-process double for tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    pool::DbPool,
    query::{QueryFragment, SqlParam},
    DbError,
};

/// Executes parameterised statements against some backing store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Run `query` and return every resulting row, in order.
    async fn query(&self, query: &QueryFragment) -> Result<Vec<Value>, DbError>;
}

// ---------------------------------------------------------------------------
// Typed helpers
// ---------------------------------------------------------------------------

/// Run `query` and decode every row into `T`.
pub async fn fetch_all<T, S>(store: &S, query: &QueryFragment) -> Result<Vec<T>, DbError>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    store
        .query(query)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(DbError::from))
        .collect()
}

/// Run `query` and decode the first row, if there is one.
pub async fn fetch_optional<T, S>(store: &S, query: &QueryFragment) -> Result<Option<T>, DbError>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    store
        .query(query)
        .await?
        .into_iter()
        .next()
        .map(serde_json::from_value)
        .transpose()
        .map_err(DbError::from)
}

/// Run `query` and decode the first row; no row at all is `DbError::NotFound`.
pub async fn fetch_one<T, S>(store: &S, query: &QueryFragment) -> Result<T, DbError>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    fetch_optional(store, query).await?.ok_or(DbError::NotFound)
}

// ---------------------------------------------------------------------------
// PgStore
// ---------------------------------------------------------------------------

/// [`Store`] backed by a Postgres connection pool.
///
/// Each statement is wrapped in a CTE and every row is projected through
/// `to_jsonb`, so the same path serves `SELECT` and `INSERT ... RETURNING`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn query(&self, query: &QueryFragment) -> Result<Vec<Value>, DbError> {
        let sql = format!(
            "WITH result AS ({}) SELECT to_jsonb(result) AS data FROM result",
            query.sql()
        );
        debug!(sql = %query.sql(), params = query.params().len(), "executing statement");

        let mut statement = sqlx::query_scalar::<_, Value>(&sql);
        for param in query.params() {
            statement = match param {
                SqlParam::Int(v) => statement.bind(*v),
                SqlParam::Float(v) => statement.bind(*v),
                SqlParam::Text(v) => statement.bind(v.clone()),
            };
        }

        statement.fetch_all(&self.pool).await.map_err(classify)
    }
}

/// Split unique-constraint violations out of the generic query failure.
fn classify(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DbError::UniqueViolation {
                constraint: db_err.constraint().map(str::to_owned),
            };
        }
    }
    DbError::Query(err)
}
