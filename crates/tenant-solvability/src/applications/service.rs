use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::repository::{
    ApplicationId, AuditEntry, AuditError, AuditPublisher, RepositoryError, ScoreRecord,
    ScoreRepository,
};
use super::validation::{InputViolation, ScoreInputGuard};
use crate::scoring::{ScoringPolicy, SolvabilityScore, SolvabilityScorer, TenantScoreInput};

/// Service composing input validation, the scorer, persistence and the audit trail.
pub struct SolvabilityService<R, A> {
    guard: ScoreInputGuard,
    scorer: Arc<SolvabilityScorer>,
    repository: Arc<R>,
    audit: Arc<A>,
}

impl<R, A> SolvabilityService<R, A>
where
    R: ScoreRepository + 'static,
    A: AuditPublisher + 'static,
{
    pub fn new(repository: Arc<R>, audit: Arc<A>, policy: ScoringPolicy) -> Self {
        Self {
            guard: ScoreInputGuard,
            scorer: Arc::new(SolvabilityScorer::new(policy)),
            repository,
            audit,
        }
    }

    pub fn scorer(&self) -> &SolvabilityScorer {
        &self.scorer
    }

    /// Score a profile without persisting anything.
    pub fn preview(
        &self,
        input: TenantScoreInput,
    ) -> Result<SolvabilityScore, SolvabilityServiceError> {
        let input = self.guard.validate(input)?;
        Ok(self.scorer.score(&input))
    }

    /// Score an application, store the result (replacing any earlier score) and audit it.
    pub fn evaluate(
        &self,
        application_id: ApplicationId,
        input: TenantScoreInput,
    ) -> Result<ScoreRecord, SolvabilityServiceError> {
        let input = self.guard.validate(input).inspect_err(|violation| {
            warn!(application_id = %application_id.0, %violation, "rejected scoring input");
        })?;
        let score = self.scorer.score(&input);

        let record = ScoreRecord {
            application_id: application_id.clone(),
            input,
            score,
            scored_at: Utc::now(),
        };

        let rescored = self.repository.fetch(&application_id)?.is_some();
        if rescored {
            self.repository.update(record.clone())?;
        } else {
            self.repository.insert(record.clone())?;
        }

        let mut details = BTreeMap::new();
        details.insert(
            "total_score".to_string(),
            record.score.total_score.to_string(),
        );
        details.insert(
            "recommendation".to_string(),
            record.score.recommendation.label().to_string(),
        );
        details.insert(
            "risk_level".to_string(),
            record.score.risk_level.label().to_string(),
        );
        details.insert("rescored".to_string(), rescored.to_string());
        self.audit.publish(AuditEntry {
            event: "solvability_scored".to_string(),
            application_id: application_id.clone(),
            details,
            recorded_at: record.scored_at,
        })?;

        info!(
            application_id = %application_id.0,
            total_score = record.score.total_score,
            recommendation = record.score.recommendation.label(),
            rescored,
            "solvability score stored"
        );

        Ok(record)
    }

    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ScoreRecord, SolvabilityServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Most recently scored applications, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<ScoreRecord>, SolvabilityServiceError> {
        let limit = limit.clamp(1, MAX_RECENT);
        Ok(self.repository.recent(limit)?)
    }
}

/// Upper bound on a single recent-scores listing.
pub const MAX_RECENT: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum SolvabilityServiceError {
    #[error(transparent)]
    Validation(#[from] InputViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}
