use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tenant_solvability::applications::{
    ApplicationId, AuditEntry, AuditError, AuditPublisher, RepositoryError, ScoreRecord,
    ScoreRepository,
};
use tenant_solvability::config::{load_policy, ConfigError};
use tenant_solvability::scoring::ScoringPolicy;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreRepository {
    records: Arc<Mutex<HashMap<ApplicationId, ScoreRecord>>>,
}

impl ScoreRepository for InMemoryScoreRepository {
    fn insert(&self, record: ScoreRecord) -> Result<ScoreRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ScoreRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            guard.insert(record.application_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ScoreRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ScoreRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<ScoreRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| {
            b.scored_at
                .cmp(&a.scored_at)
                .then_with(|| b.application_id.cmp(&a.application_id))
        });
        records.truncate(limit);
        Ok(records)
    }
}

/// Keeps audit entries in memory and mirrors them to the log.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditTrail {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl AuditPublisher for InMemoryAuditTrail {
    fn publish(&self, entry: AuditEntry) -> Result<(), AuditError> {
        info!(
            event = %entry.event,
            application_id = %entry.application_id.0,
            details = ?entry.details,
            "audit entry recorded"
        );
        let mut guard = self.entries.lock().expect("audit mutex poisoned");
        guard.push(entry);
        Ok(())
    }
}

impl InMemoryAuditTrail {
    pub(crate) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

/// Policy from an explicit file, falling back to the built-in defaults.
pub(crate) fn resolve_policy(path: Option<&Path>) -> Result<ScoringPolicy, ConfigError> {
    match path {
        Some(path) => load_policy(path),
        None => Ok(ScoringPolicy::default()),
    }
}
