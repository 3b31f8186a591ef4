//! Caller-side collaborators around the scorer: input validation, persistence and audit
//! traits, the service facade, and its HTTP router.

pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use repository::{
    ApplicationId, AuditEntry, AuditError, AuditPublisher, RepositoryError, ScoreRecord,
    ScoreRepository, ScoreView,
};
pub use router::solvability_router;
pub use service::{SolvabilityService, SolvabilityServiceError, MAX_RECENT};
pub use validation::{InputViolation, ScoreInputGuard};
