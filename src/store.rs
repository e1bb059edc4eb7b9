use crate::error::CtResult;
use crate::solve::{Solve, SolveId};
use crate::storage::KvStore;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Key the serialized history lives under
pub const SOLVES_KEY: &str = "solves";

/// Outcome of the most recent write to the backing store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PersistenceStatus {
    #[default]
    Healthy,
    /// Last write failed; in-memory history is ahead of what is on disk
    Degraded(String),
}

/// Newest-first solve history backed by a [`KvStore`]
#[derive(Debug)]
pub struct SolveStore<K: KvStore> {
    kv: K,
    solves: Vec<Solve>,
    last_id: u64,
    status: PersistenceStatus,
}

impl<K: KvStore> SolveStore<K> {
    /// Read persisted history. Missing, unreadable or malformed data yields
    /// an empty history.
    pub fn load(kv: K) -> Self {
        let solves = match kv.get(SOLVES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Solve>>(&raw) {
                Ok(solves) => dedupe(solves),
                Err(e) => {
                    warn!("ignoring malformed solve history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("could not read solve history: {}", e);
                Vec::new()
            }
        };

        let last_id = solves.iter().map(|s| s.id.0).max().unwrap_or(0);
        info!(count = solves.len(), "loaded solve history");

        Self {
            kv,
            solves,
            last_id,
            status: PersistenceStatus::Healthy,
        }
    }

    pub fn all(&self) -> &[Solve] {
        &self.solves
    }

    pub fn len(&self) -> usize {
        self.solves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solves.is_empty()
    }

    pub fn get(&self, id: SolveId) -> Option<&Solve> {
        self.solves.iter().find(|s| s.id == id)
    }

    pub fn status(&self) -> &PersistenceStatus {
        &self.status
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut K {
        &mut self.kv
    }

    /// Record a solve at the front of the history and persist immediately
    pub fn append(&mut self, duration_ms: u64, scramble: &str, now: DateTime<Utc>) -> Solve {
        let solve = Solve {
            id: self.next_id(now),
            duration_ms,
            created_at: now,
            scramble: scramble.to_string(),
        };
        self.solves.insert(0, solve.clone());
        info!(id = %solve.id, duration_ms, "solve recorded");
        self.persist();
        solve
    }

    /// Delete a solve by id. Unknown ids leave the history unchanged, but
    /// the history is written either way.
    pub fn remove(&mut self, id: SolveId) -> bool {
        let before = self.solves.len();
        self.solves.retain(|s| s.id != id);
        let removed = self.solves.len() != before;
        if removed {
            info!(%id, "solve removed");
        } else {
            debug!(%id, "remove found no such solve");
        }
        self.persist();
        removed
    }

    pub fn clear(&mut self) {
        if self.solves.is_empty() {
            return;
        }
        info!(count = self.solves.len(), "clearing solve history");
        self.solves.clear();
        self.persist();
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> SolveId {
        let now_ms = now.timestamp_millis().max(0) as u64;
        match self.last_id.checked_add(1) {
            Some(next) => {
                self.last_id = now_ms.max(next);
                SolveId(self.last_id)
            }
            // id space exhausted by imported data; stay unique, give up ordering
            None => {
                let free = (1..=u64::MAX)
                    .map(SolveId)
                    .find(|id| self.get(*id).is_none())
                    .unwrap_or(SolveId(0));
                warn!(%free, "solve ids exhausted, reusing lowest free id");
                free
            }
        }
    }

    fn persist(&mut self) {
        match self.write_all() {
            Ok(()) => {
                if self.status != PersistenceStatus::Healthy {
                    info!("solve history persisted again");
                }
                self.status = PersistenceStatus::Healthy;
            }
            Err(e) => {
                warn!("failed to persist solve history: {}", e);
                self.status = PersistenceStatus::Degraded(e.to_string());
            }
        }
    }

    fn write_all(&mut self) -> CtResult<()> {
        let data = serde_json::to_string(&self.solves)?;
        self.kv.set(SOLVES_KEY, &data)
    }
}

fn dedupe(solves: Vec<Solve>) -> Vec<Solve> {
    let mut seen = HashSet::new();
    let total = solves.len();
    let unique: Vec<Solve> = solves.into_iter().filter(|s| seen.insert(s.id)).collect();
    if unique.len() != total {
        warn!(dropped = total - unique.len(), "dropped solves with duplicate ids");
    }
    unique
}
