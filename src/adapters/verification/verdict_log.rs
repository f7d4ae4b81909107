//! Bounded in-memory log of audit outcomes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

use crate::domain::foundation::MatchId;
use crate::domain::matching::AuditOutcome;
use crate::ports::AuditVerdictLog;

#[derive(Default)]
struct Entries {
    by_match: HashMap<MatchId, AuditOutcome>,
    order: VecDeque<MatchId>,
}

/// Keeps the latest `capacity` outcomes, evicting the oldest first.
pub struct InMemoryAuditVerdictLog {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl InMemoryAuditVerdictLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.by_match.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.by_match.is_empty()
    }
}

#[async_trait]
impl AuditVerdictLog for InMemoryAuditVerdictLog {
    async fn record(&self, outcome: AuditOutcome) {
        let mut entries = self.entries.lock().await;
        let match_id = outcome.match_id;

        if entries.by_match.insert(match_id, outcome).is_none() {
            entries.order.push_back(match_id);
        }

        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.by_match.remove(&oldest);
            }
        }
    }

    async fn find(&self, match_id: &MatchId) -> Option<AuditOutcome> {
        self.entries.lock().await.by_match.get(match_id).cloned()
    }
}
