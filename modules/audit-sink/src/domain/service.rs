use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use cc_security::AccessScope;

use super::error::DomainError;
use super::model::{AuditEntry, NewAuditEntry};
use crate::infra::repository::Repository;

const MAX_BATCH: usize = 100;
const FLUSH_INTERVAL: Duration = Duration::from_millis(200);

struct PendingWrite {
    entry: NewAuditEntry,
    ack: oneshot::Sender<Result<(), String>>,
}

/// The append-only sink. `record` enqueues the entry and waits for the
/// batch containing it to land, so a caller that gets `Ok` back knows
/// the entry survived a process crash from that point on.
#[derive(Clone)]
pub struct Service {
    sender: mpsc::Sender<PendingWrite>,
    repository: Repository,
}

impl Service {
    #[must_use]
    pub fn new(repository: Repository) -> Self {
        let (sender, receiver) = mpsc::channel(1024);
        tokio::spawn(run_worker(repository.clone(), receiver));
        Self { sender, repository }
    }

    #[tracing::instrument(skip(self, entry))]
    pub async fn record(&self, entry: NewAuditEntry) -> Result<(), DomainError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.sender.send(PendingWrite { entry, ack: ack_tx }).await.map_err(|_| DomainError::Closed)?;
        ack_rx
            .await
            .map_err(|_| DomainError::Closed)?
            .map_err(|msg| DomainError::Database(sea_orm::DbErr::Custom(msg)))
    }

    pub async fn list(&self, scope: &AccessScope, skip: u64, limit: u64) -> Result<Vec<AuditEntry>, DomainError> {
        Ok(self.repository.list(scope, skip, limit).await?)
    }
}

async fn run_worker(repository: Repository, mut receiver: mpsc::Receiver<PendingWrite>) {
    let sequences: Arc<DashMap<(Uuid, String), i64>> = Arc::new(DashMap::new());
    let mut batch = Vec::with_capacity(MAX_BATCH);
    let mut acks = Vec::with_capacity(MAX_BATCH);
    let mut ticker = tokio::time::interval(FLUSH_INTERVAL);

    loop {
        tokio::select! {
            maybe_item = receiver.recv() => {
                let Some(item) = maybe_item else {
                    flush(&repository, &sequences, std::mem::take(&mut batch), std::mem::take(&mut acks)).await;
                    return;
                };
                batch.push(item.entry);
                acks.push(item.ack);
                if batch.len() >= MAX_BATCH {
                    flush(&repository, &sequences, std::mem::take(&mut batch), std::mem::take(&mut acks)).await;
                }
            }
            _ = ticker.tick() => {
                if !batch.is_empty() {
                    flush(&repository, &sequences, std::mem::take(&mut batch), std::mem::take(&mut acks)).await;
                }
            }
        }
    }
}

async fn flush(
    repository: &Repository,
    sequences: &DashMap<(Uuid, String), i64>,
    entries: Vec<NewAuditEntry>,
    acks: Vec<oneshot::Sender<Result<(), String>>>,
) {
    let stamped: Vec<AuditEntry> = entries
        .into_iter()
        .map(|entry| {
            let key = (entry.tenant_id, entry.producer.clone());
            let mut seq = sequences.entry(key).or_insert(0);
            *seq += 1;
            AuditEntry {
                id: Uuid::new_v4(),
                tenant_id: entry.tenant_id,
                producer: entry.producer,
                sequence: *seq,
                kind: entry.kind,
                payload: entry.payload,
                request_id: entry.request_id,
                recorded_at: chrono::Utc::now(),
            }
        })
        .collect();

    let outcome: Result<(), String> = repository.insert_batch(&stamped).await.map_err(|e| e.to_string());
    for ack in acks {
        let _ = ack.send(outcome.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn repository_with_mock() -> Repository {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();
        Repository::new(cc_db::DbConn::from_connection(db))
    }

    #[tokio::test]
    async fn flush_assigns_monotonic_sequence_per_producer_and_acks_every_waiter() {
        let repository = repository_with_mock();
        let sequences = DashMap::new();
        let tenant_id = Uuid::new_v4();
        let entries = vec![
            NewAuditEntry {
                tenant_id,
                producer: "decision-engine".to_owned(),
                kind: "decision".to_owned(),
                payload: serde_json::json!({}),
                request_id: None,
            },
            NewAuditEntry {
                tenant_id,
                producer: "decision-engine".to_owned(),
                kind: "decision".to_owned(),
                payload: serde_json::json!({}),
                request_id: None,
            },
        ];
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        flush(&repository, &sequences, entries, vec![tx1, tx2]).await;

        assert!(rx1.await.unwrap().is_ok());
        assert!(rx2.await.unwrap().is_ok());
        assert_eq!(*sequences.get(&(tenant_id, "decision-engine".to_owned())).unwrap(), 2);
    }

    #[tokio::test]
    async fn record_reports_closed_once_worker_is_dropped() {
        let repository = repository_with_mock();
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let service = Service { sender, repository };
        let entry = NewAuditEntry {
            tenant_id: Uuid::new_v4(),
            producer: "git-sync".to_owned(),
            kind: "config-change".to_owned(),
            payload: serde_json::json!({}),
            request_id: None,
        };
        let err = service.record(entry).await.unwrap_err();
        assert!(matches!(err, DomainError::Closed));
    }
}
