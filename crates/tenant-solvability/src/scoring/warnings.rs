use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::DocumentKind;

/// Flags raised while scoring. Emitted in declaration order so callers can assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ScoreWarning {
    IncomeRatioBelowThreshold {
        ratio: Option<f64>,
        required: f64,
    },
    MissingCriticalDocument {
        document: DocumentKind,
    },
    OcrIncomeMismatch {
        declared: f64,
        extracted: f64,
        deviation: f64,
        confidence: f64,
    },
    UnpaidRentHistory,
    GuarantorInsufficient {
        ratio: Option<f64>,
        required: f64,
    },
}

impl ScoreWarning {
    pub const fn code(&self) -> &'static str {
        match self {
            ScoreWarning::IncomeRatioBelowThreshold { .. } => "income_ratio_below_threshold",
            ScoreWarning::MissingCriticalDocument { .. } => "missing_critical_document",
            ScoreWarning::OcrIncomeMismatch { .. } => "ocr_income_mismatch",
            ScoreWarning::UnpaidRentHistory => "unpaid_rent_history",
            ScoreWarning::GuarantorInsufficient { .. } => "guarantor_insufficient",
        }
    }
}

impl fmt::Display for ScoreWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreWarning::IncomeRatioBelowThreshold {
                ratio: Some(ratio),
                required,
            } => write!(
                f,
                "income covers {ratio:.2}x the housing cost, below the required {required:.2}x"
            ),
            ScoreWarning::IncomeRatioBelowThreshold {
                ratio: None,
                required,
            } => write!(
                f,
                "income ratio could not be computed (required {required:.2}x the housing cost)"
            ),
            ScoreWarning::MissingCriticalDocument { document } => {
                write!(f, "missing {}", document.label())
            }
            ScoreWarning::OcrIncomeMismatch {
                declared,
                extracted,
                deviation,
                confidence,
            } => write!(
                f,
                "declared income {declared:.2} does not match extracted document income {extracted:.2} ({:.0}% apart, OCR confidence {:.0}%)",
                deviation * 100.0,
                confidence * 100.0
            ),
            ScoreWarning::UnpaidRentHistory => write!(f, "confirmed history of unpaid rent"),
            ScoreWarning::GuarantorInsufficient {
                ratio: Some(ratio),
                required,
            } => write!(
                f,
                "guarantor income covers {ratio:.2}x the housing cost, below the required {required:.2}x"
            ),
            ScoreWarning::GuarantorInsufficient {
                ratio: None,
                required,
            } => write!(
                f,
                "guarantor income not provided (required {required:.2}x the housing cost)"
            ),
        }
    }
}
