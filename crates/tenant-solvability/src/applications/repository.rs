use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{SolvabilityScore, TenantScoreInput};

/// Identifier wrapper for the rental application being scored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Stored score alongside the profile it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub application_id: ApplicationId,
    pub input: TenantScoreInput,
    pub score: SolvabilityScore,
    pub scored_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn view(&self) -> ScoreView {
        ScoreView {
            application_id: self.application_id.clone(),
            applicant: self.input.applicant.display_name(),
            scored_at: self.scored_at,
            summary: self.score.summary(),
            warning_messages: self.score.warning_messages(),
            score: self.score.clone(),
        }
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait ScoreRepository: Send + Sync {
    fn insert(&self, record: ScoreRecord) -> Result<ScoreRecord, RepositoryError>;
    fn update(&self, record: ScoreRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ScoreRecord>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<ScoreRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound audit-trail hook recording that a score was computed.
pub trait AuditPublisher: Send + Sync {
    fn publish(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub event: String,
    pub application_id: ApplicationId,
    pub details: BTreeMap<String, String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Transport(String),
}

/// Response body for a stored score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreView {
    pub application_id: ApplicationId,
    pub applicant: String,
    pub scored_at: DateTime<Utc>,
    pub summary: String,
    pub warning_messages: Vec<String>,
    pub score: SolvabilityScore,
}
