//! Per-project mutual exclusion.

use foundry_core::ProjectId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = Arc<Mutex<HashMap<ProjectId, Arc<AsyncMutex<()>>>>>;

/// One async lock per project identifier.
///
/// Entries exist only while someone holds or waits on them.
#[derive(Debug, Clone, Default)]
pub struct ProjectLocks {
    table: LockTable,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: &ProjectId) -> ProjectGuard {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            table.entry(id.clone()).or_default().clone()
        };

        let guard = lock.lock_owned().await;

        ProjectGuard {
            table: self.table.clone(),
            id: id.clone(),
            _guard: guard,
        }
    }

    /// Number of projects currently locked or awaited.
    pub fn active(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held for the duration of one operation on a project.
#[derive(Debug)]
pub struct ProjectGuard {
    table: LockTable,
    id: ProjectId,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for ProjectGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // Two references left means only the table and this guard know the lock.
        if table
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 2)
        {
            table.remove(&self.id);
        }
    }
}
