//! Per-user solve store
//!
//! Map from user id to that user's log. The map lock is held only long enough
//! to find (or lazily create) a log; each log has its own mutex, so mutations
//! by one user serialise without blocking other users.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use crate::MAX_SOLVES_PER_USER;
use crate::core::log::{Appended, SolveLog};
use crate::types::{IndexError, SolveRecord};

type SharedLog = Arc<Mutex<SolveLog>>;

/// Volatile in-memory solve store keyed by user id
#[derive(Debug)]
pub struct SolveStore {
    logs: RwLock<HashMap<String, SharedLog>>,
    capacity: usize,
}

impl Default for SolveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SolveStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_SOLVES_PER_USER)
    }

    /// Store whose logs hold at most `capacity` solves each
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    async fn existing(&self, user: &str) -> Option<SharedLog> {
        self.logs.read().await.get(user).cloned()
    }

    /// Log for `user`, created on first use
    async fn log_for(&self, user: &str) -> SharedLog {
        if let Some(log) = self.existing(user).await {
            return log;
        }
        let mut logs = self.logs.write().await;
        logs.entry(user.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SolveLog::with_capacity(self.capacity))))
            .clone()
    }

    pub async fn append(&self, user: &str, record: SolveRecord) -> Appended {
        let log = self.log_for(user).await;
        let mut log = log.lock().await;
        log.append(record)
    }

    /// Delete by position; with `expected_id`, only if that solve is still there
    pub async fn delete_at(
        &self,
        user: &str,
        index: usize,
        expected_id: Option<u64>,
    ) -> Result<SolveRecord, IndexError> {
        let log = self
            .existing(user)
            .await
            .ok_or(IndexError::OutOfRange { index, len: 0 })?;
        let mut log = log.lock().await;
        match expected_id {
            Some(id) => log.delete_at_checked(index, id),
            None => log.delete_at(index),
        }
    }

    pub async fn delete_many(&self, user: &str, indices: &[usize]) -> Result<usize, IndexError> {
        match self.existing(user).await {
            Some(log) => log.lock().await.delete_many(indices),
            None => match indices.iter().min() {
                Some(&index) => Err(IndexError::OutOfRange { index, len: 0 }),
                None => Ok(0),
            },
        }
    }

    pub async fn clear(&self, user: &str) -> usize {
        match self.existing(user).await {
            Some(log) => log.lock().await.clear(),
            None => 0,
        }
    }

    pub async fn set_penalty(
        &self,
        user: &str,
        index: usize,
        is_dnf: bool,
        has_plus_two: bool,
    ) -> Result<SolveRecord, IndexError> {
        let log = self
            .existing(user)
            .await
            .ok_or(IndexError::OutOfRange { index, len: 0 })?;
        let mut log = log.lock().await;
        log.set_penalty(index, is_dnf, has_plus_two).cloned()
    }

    /// Consistent point-in-time copy of a user's log (empty if none)
    pub async fn snapshot(&self, user: &str) -> Vec<SolveRecord> {
        match self.existing(user).await {
            Some(log) => log.lock().await.snapshot(),
            None => Vec::new(),
        }
    }

    /// Number of users with a log
    pub async fn user_count(&self) -> usize {
        self.logs.read().await.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================
