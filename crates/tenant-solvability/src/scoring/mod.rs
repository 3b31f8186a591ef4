//! Solvability scoring for rental applications.
//!
//! The scorer is a pure function of a [`TenantScoreInput`] and a [`ScoringPolicy`]. It never
//! fails for validated input: shortcomings surface as lower sub-scores, a capped
//! recommendation and [`ScoreWarning`]s.

pub mod batch;
mod config;
mod domain;
mod policy;
mod rules;
mod warnings;

#[cfg(test)]
mod tests;

pub use config::{
    PolicyError, RecommendationBands, RiskBands, ScoringPolicy, SubScoreWeights,
    EMPLOYMENT_STABILITY, INCOME_TYPE_CEILING, RENT_HISTORY_POINTS, SCORE_MAX,
};
pub use domain::{
    ApplicantIdentity, DocumentKind, DocumentsProvided, EmploymentType, GuarantorType,
    IncomeType, OcrExtraction, RentHistory, TenantScoreInput,
};
pub use policy::{Recommendation, RiskLevel};
pub use warnings::ScoreWarning;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless scorer applying a policy to tenant profiles.
#[derive(Debug, Clone, Default)]
pub struct SolvabilityScorer {
    policy: ScoringPolicy,
}

impl SolvabilityScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn score(&self, input: &TenantScoreInput) -> SolvabilityScore {
        let (scores, signals, warnings) = rules::score_input(input, &self.policy);
        let total_score = rules::weighted_total(&scores, &self.policy);
        let (risk_level, recommendation) =
            policy::decide_outcome(total_score, &self.policy, &signals);

        debug!(
            total_score,
            risk_level = risk_level.label(),
            recommendation = recommendation.label(),
            warnings = warnings.len(),
            "solvability scored"
        );

        SolvabilityScore {
            total_score,
            income_ratio: signals.income_ratio,
            income_ratio_score: scores.income_ratio,
            employment_stability_score: scores.employment_stability,
            document_completeness_score: scores.document_completeness,
            guarantor_score: scores.guarantor,
            rental_history_score: scores.rental_history,
            ocr_consistency_score: scores.ocr_consistency,
            risk_level,
            recommendation,
            warnings,
        }
    }
}

/// Score a profile with the default policy.
pub fn calculate_solvability_score(input: &TenantScoreInput) -> SolvabilityScore {
    SolvabilityScorer::default().score(input)
}

/// Scoring output. Every sub-score lies in `0..=SCORE_MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvabilityScore {
    pub total_score: u8,
    pub income_ratio: Option<f64>,
    pub income_ratio_score: u8,
    pub employment_stability_score: u8,
    pub document_completeness_score: u8,
    pub guarantor_score: u8,
    pub rental_history_score: u8,
    pub ocr_consistency_score: u8,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    pub warnings: Vec<ScoreWarning>,
}

impl SolvabilityScore {
    pub fn sub_scores(&self) -> [(&'static str, u8); 6] {
        [
            ("income_ratio", self.income_ratio_score),
            ("employment_stability", self.employment_stability_score),
            ("document_completeness", self.document_completeness_score),
            ("guarantor", self.guarantor_score),
            ("rental_history", self.rental_history_score),
            ("ocr_consistency", self.ocr_consistency_score),
        ]
    }

    /// True when the applicant's own income does not clear the ratio on its own.
    pub fn is_guarantor_reliant(&self) -> bool {
        self.income_ratio_score < SCORE_MAX
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    pub fn summary(&self) -> String {
        let headline = format!(
            "{} ({}/100, {} risk)",
            self.recommendation.label(),
            self.total_score,
            self.risk_level.label()
        );
        if self.warnings.is_empty() {
            headline
        } else {
            format!("{headline}: {}", self.warning_messages().join("; "))
        }
    }
}
