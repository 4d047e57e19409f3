use async_trait::async_trait;
use audit_log_sdk::AuditRecord;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repo::AuditRepository;

struct Entry {
    seq: u64,
    record: AuditRecord,
}

#[derive(Default)]
struct State {
    next_seq: u64,
    entries: Vec<Entry>,
}

/// Process-local audit store.
///
/// Each append takes the write lock once and is assigned the next sequence
/// number, which breaks timestamp ties when listing newest first.
#[derive(Default)]
pub struct InMemoryAuditRepository {
    state: RwLock<State>,
}

impl InMemoryAuditRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collect(&self, keep: impl Fn(&AuditRecord) -> bool) -> Vec<AuditRecord> {
        let state = self.state.read();
        let mut hits: Vec<&Entry> = state.entries.iter().filter(|e| keep(&e.record)).collect();
        hits.sort_by(|a, b| (b.record.timestamp, b.seq).cmp(&(a.record.timestamp, a.seq)));
        hits.into_iter().map(|e| e.record.clone()).collect()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append(&self, record: AuditRecord) -> Result<(), DomainError> {
        let mut state = self.state.write();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.push(Entry { seq, record });
        Ok(())
    }

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        Ok(self.collect(|r| r.organization_id == organization_id))
    }

    async fn list_by_actor(
        &self,
        organization_id: Uuid,
        actor_subject_id: Uuid,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        Ok(self.collect(|r| {
            r.organization_id == organization_id && r.actor_subject_id == actor_subject_id
        }))
    }
}
