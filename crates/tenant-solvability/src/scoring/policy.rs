use serde::{Deserialize, Serialize};

use super::config::ScoringPolicy;
use super::domain::DocumentKind;
use super::rules::ScoreSignals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }
}

/// Ordered from least to most favourable so overrides can cap with `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Reject,
    Review,
    AcceptWithGuarantor,
    Accept,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::Reject => "reject",
            Recommendation::Review => "review",
            Recommendation::AcceptWithGuarantor => "accept_with_guarantor",
            Recommendation::Accept => "accept",
        }
    }
}

/// Maps the total onto a recommendation, then applies the hard overrides.
pub(crate) fn decide_outcome(
    total_score: u8,
    policy: &ScoringPolicy,
    signals: &ScoreSignals,
) -> (RiskLevel, Recommendation) {
    let risk_level = policy.risk_bands.classify(total_score);
    let mut recommendation = policy.recommendation_bands.classify(total_score);

    if recommendation == Recommendation::Accept && signals.guarantor_needed {
        recommendation = Recommendation::AcceptWithGuarantor;
    }

    if signals.unpaid_rent {
        recommendation = recommendation.min(Recommendation::Review);
    }

    // Neither identity nor income can be verified.
    let unverifiable = [DocumentKind::Identity, DocumentKind::IncomeProof]
        .iter()
        .all(|document| signals.missing_critical.contains(document));
    if unverifiable {
        recommendation = Recommendation::Reject;
    }

    (risk_level, recommendation)
}
