//! `MockStore`: a test double for [`Store`].
//!
//! Records every statement it receives and replies with programmer-scripted
//! responses, so repository logic can be exercised without Postgres.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::{query::QueryFragment, DbError, Store};

/// A scripted store. Responses are consumed in FIFO order; once the script
/// runs dry every statement returns an empty row set.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    responses: Arc<Mutex<VecDeque<Result<Vec<Value>, DbError>>>>,
    /// All statements seen by this store (in call order).
    calls: Arc<Mutex<Vec<QueryFragment>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response carrying `rows`.
    pub fn with_rows(self, rows: Vec<Value>) -> Self {
        self.push(Ok(rows));
        self
    }

    /// Queue a failing response.
    pub fn with_error(self, err: DbError) -> Self {
        self.push(Err(err));
        self
    }

    fn push(&self, response: Result<Vec<Value>, DbError>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Statements received so far.
    pub fn calls(&self) -> Vec<QueryFragment> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of statements executed against this store.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Store for MockStore {
    async fn query(&self, query: &QueryFragment) -> Result<Vec<Value>, DbError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
