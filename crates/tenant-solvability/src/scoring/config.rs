use serde::{Deserialize, Serialize};

use super::domain::{EmploymentType, IncomeType, RentHistory};
use super::policy::{Recommendation, RiskLevel};

/// Upper bound shared by every sub-score and by the total.
pub const SCORE_MAX: u8 = 100;

/// Stability points per employment situation.
pub const EMPLOYMENT_STABILITY: [(EmploymentType, u8); 8] = [
    (EmploymentType::PermanentContract, 100),
    (EmploymentType::Retired, 100),
    (EmploymentType::FixedTermContract, 70),
    (EmploymentType::Freelance, 50),
    (EmploymentType::TempAgency, 45),
    (EmploymentType::Other, 40),
    (EmploymentType::Student, 35),
    (EmploymentType::Unemployed, 5),
];

/// Ceiling applied to the employment points depending on how income is earned.
pub const INCOME_TYPE_CEILING: [(IncomeType, u8); 4] = [
    (IncomeType::Salary, 100),
    (IncomeType::Pension, 100),
    (IncomeType::SelfEmployed, 70),
    (IncomeType::Other, 60),
];

/// Points per declared rental history. Confirmed unpaid rent overrides this to zero.
pub const RENT_HISTORY_POINTS: [(RentHistory, u8); 3] = [
    (RentHistory::Good, 100),
    (RentHistory::Unknown, 50),
    (RentHistory::LatePayments, 20),
];

pub(crate) fn rent_history_points(history: RentHistory) -> u8 {
    RENT_HISTORY_POINTS
        .iter()
        .find(|(kind, _)| *kind == history)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

pub(crate) fn employment_points(employment: EmploymentType) -> u8 {
    EMPLOYMENT_STABILITY
        .iter()
        .find(|(kind, _)| *kind == employment)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

pub(crate) fn income_type_ceiling(income: IncomeType) -> u8 {
    INCOME_TYPE_CEILING
        .iter()
        .find(|(kind, _)| *kind == income)
        .map(|(_, ceiling)| *ceiling)
        .unwrap_or(0)
}

/// Tunable scoring policy. Defaults encode the usual French "three times the rent" rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Income ratio at or above which the ratio sub-score is full.
    pub full_marks_ratio: f64,
    /// Income ratio at or below which the ratio sub-score is zero.
    pub zero_marks_ratio: f64,
    /// Relative deviation between declared and extracted income still treated as consistent.
    pub ocr_tolerance: f64,
    /// Extra points removed for each missing identity or income document.
    pub critical_document_penalty: u8,
    /// Guarantor sub-score awarded to a guarantor whose income does not clear the ratio.
    pub partial_guarantor_floor: u8,
    pub weights: SubScoreWeights,
    pub risk_bands: RiskBands,
    pub recommendation_bands: RecommendationBands,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            full_marks_ratio: 3.0,
            zero_marks_ratio: 1.0,
            ocr_tolerance: 0.15,
            critical_document_penalty: 20,
            partial_guarantor_floor: 30,
            weights: SubScoreWeights::default(),
            risk_bands: RiskBands::default(),
            recommendation_bands: RecommendationBands::default(),
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(self.zero_marks_ratio.is_finite() && self.full_marks_ratio.is_finite())
            || self.zero_marks_ratio < 0.0
            || self.full_marks_ratio <= self.zero_marks_ratio
        {
            return Err(PolicyError::RatioThresholds {
                full: self.full_marks_ratio,
                zero: self.zero_marks_ratio,
            });
        }

        if !(self.ocr_tolerance > 0.0 && self.ocr_tolerance < 1.0) {
            return Err(PolicyError::OcrTolerance(self.ocr_tolerance));
        }

        if self.critical_document_penalty > SCORE_MAX {
            return Err(PolicyError::OutOfRange {
                field: "critical_document_penalty",
                value: self.critical_document_penalty,
            });
        }
        if self.partial_guarantor_floor > SCORE_MAX {
            return Err(PolicyError::OutOfRange {
                field: "partial_guarantor_floor",
                value: self.partial_guarantor_floor,
            });
        }

        self.weights.validate()?;
        self.risk_bands.validate()?;
        self.recommendation_bands.validate()
    }
}

/// Weight of each sub-score in the total. Must sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScoreWeights {
    pub income_ratio: f64,
    pub document_completeness: f64,
    pub employment_stability: f64,
    pub rental_history: f64,
    pub guarantor: f64,
    pub ocr_consistency: f64,
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self {
            income_ratio: 0.30,
            document_completeness: 0.25,
            employment_stability: 0.15,
            rental_history: 0.15,
            guarantor: 0.10,
            ocr_consistency: 0.05,
        }
    }
}

impl SubScoreWeights {
    fn as_array(&self) -> [f64; 6] {
        [
            self.income_ratio,
            self.document_completeness,
            self.employment_stability,
            self.rental_history,
            self.guarantor,
            self.ocr_consistency,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let weights = self.as_array();
        if weights.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(PolicyError::NegativeWeight);
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(PolicyError::WeightSum(sum));
        }
        Ok(())
    }
}

/// Lower bounds (inclusive) of the risk bands; anything under `high` is very high risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBands {
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            low: 75,
            medium: 50,
            high: 30,
        }
    }
}

impl RiskBands {
    pub fn classify(&self, total_score: u8) -> RiskLevel {
        if total_score >= self.low {
            RiskLevel::Low
        } else if total_score >= self.medium {
            RiskLevel::Medium
        } else if total_score >= self.high {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if self.low > SCORE_MAX || self.low < self.medium || self.medium < self.high {
            return Err(PolicyError::Bands("risk"));
        }
        Ok(())
    }
}

/// Lower bounds (inclusive) of the score-driven recommendation; under `review` is a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationBands {
    pub accept: u8,
    pub accept_with_guarantor: u8,
    pub review: u8,
}

impl Default for RecommendationBands {
    fn default() -> Self {
        Self {
            accept: 75,
            accept_with_guarantor: 55,
            review: 35,
        }
    }
}

impl RecommendationBands {
    pub fn classify(&self, total_score: u8) -> Recommendation {
        if total_score >= self.accept {
            Recommendation::Accept
        } else if total_score >= self.accept_with_guarantor {
            Recommendation::AcceptWithGuarantor
        } else if total_score >= self.review {
            Recommendation::Review
        } else {
            Recommendation::Reject
        }
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if self.accept > SCORE_MAX
            || self.accept < self.accept_with_guarantor
            || self.accept_with_guarantor < self.review
        {
            return Err(PolicyError::Bands("recommendation"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("income ratio thresholds must satisfy 0 <= zero ({zero}) < full ({full})")]
    RatioThresholds { full: f64, zero: f64 },
    #[error("OCR tolerance must lie strictly between 0 and 1 (found {0})")]
    OcrTolerance(f64),
    #[error("{field} must not exceed 100 (found {value})")]
    OutOfRange { field: &'static str, value: u8 },
    #[error("sub-score weights must be finite and non-negative")]
    NegativeWeight,
    #[error("sub-score weights must sum to 1.0 (found {0:.4})")]
    WeightSum(f64),
    #[error("{0} bands must be descending and within 0..=100")]
    Bands(&'static str),
}
