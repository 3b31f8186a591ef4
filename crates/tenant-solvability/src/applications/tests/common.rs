use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::applications::repository::{
    ApplicationId, AuditEntry, AuditError, AuditPublisher, RepositoryError, ScoreRecord,
    ScoreRepository,
};
use crate::applications::SolvabilityService;
use crate::scoring::{
    ApplicantIdentity, DocumentsProvided, EmploymentType, IncomeType, RentHistory,
    ScoringPolicy, TenantScoreInput,
};

pub(super) fn score_input() -> TenantScoreInput {
    TenantScoreInput {
        applicant: ApplicantIdentity {
            first_name: "Camille".to_string(),
            last_name: "Martin".to_string(),
            date_of_birth: None,
        },
        monthly_income: Some(3200.0),
        income_type: IncomeType::Salary,
        employment_type: EmploymentType::PermanentContract,
        rent_amount: Some(850.0),
        charges_amount: 90.0,
        documents_provided: DocumentsProvided::all(),
        has_guarantor: false,
        guarantor_income: None,
        guarantor_type: None,
        previous_rent_history: RentHistory::Good,
        has_unpaid_rent_history: false,
        ocr: None,
    }
}

pub(super) fn invalid_input() -> TenantScoreInput {
    TenantScoreInput {
        monthly_income: Some(-1.0),
        ..score_input()
    }
}

pub(super) fn build_service() -> (
    SolvabilityService<MemoryRepository, MemoryAudit>,
    Arc<MemoryRepository>,
    Arc<MemoryAudit>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let audit = Arc::new(MemoryAudit::default());
    let service =
        SolvabilityService::new(repository.clone(), audit.clone(), ScoringPolicy::default());
    (service, repository, audit)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, ScoreRecord>>>,
}

impl ScoreRepository for MemoryRepository {
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
        if !guard.contains_key(&record.application_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.application_id.clone(), record);
        Ok(())
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

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditPublisher for MemoryAudit {
    fn publish(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ScoreRepository for UnavailableRepository {
    fn insert(&self, _record: ScoreRecord) -> Result<ScoreRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ScoreRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ScoreRecord>, RepositoryError> {
        Ok(None)
    }

    fn recent(&self, _limit: usize) -> Result<Vec<ScoreRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct FailingAudit;

impl AuditPublisher for FailingAudit {
    fn publish(&self, _entry: AuditEntry) -> Result<(), AuditError> {
        Err(AuditError::Transport("audit queue full".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}

pub(super) fn router_with_service(
    service: SolvabilityService<MemoryRepository, MemoryAudit>,
) -> axum::Router {
    crate::applications::solvability_router(Arc::new(service))
}
