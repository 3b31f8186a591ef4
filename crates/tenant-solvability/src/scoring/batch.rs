//! CSV batch scoring, one applicant per row.
//!
//! Headers mirror the [`TenantScoreInput`] fields with the nested blocks flattened
//! (`first_name`, `identity_document`, `ocr_confidence`, ...). Empty cells read as absent
//! (or `false` for flags).

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{
    ApplicantIdentity, DocumentsProvided, EmploymentType, GuarantorType, IncomeType,
    OcrExtraction, RentHistory, TenantScoreInput,
};
use super::{SolvabilityScore, SolvabilityScorer};
use crate::applications::validation::{InputViolation, ScoreInputGuard};

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read applicant batch: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid applicant CSV data: {}", err),
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Result for one CSV row. Rows failing validation carry the reason instead of a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchScore {
    /// 1-based data row number, header excluded.
    pub row: usize,
    pub applicant: String,
    pub outcome: Result<SolvabilityScore, String>,
}

pub fn score_path<P: AsRef<Path>>(
    path: P,
    scorer: &SolvabilityScorer,
) -> Result<Vec<BatchScore>, BatchImportError> {
    let file = std::fs::File::open(path)?;
    score_reader(file, scorer)
}

pub fn score_reader<R: Read>(
    reader: R,
    scorer: &SolvabilityScorer,
) -> Result<Vec<BatchScore>, BatchImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let guard = ScoreInputGuard;
    let mut results = Vec::new();

    for (index, record) in csv_reader.deserialize::<ApplicantRow>().enumerate() {
        let row = record?;
        let applicant = format!("{} {}", row.first_name, row.last_name)
            .trim()
            .to_string();
        let outcome = TenantScoreInput::try_from(row)
            .and_then(|input| guard.validate(input))
            .map(|input| scorer.score(&input))
            .map_err(|violation| violation.to_string());

        results.push(BatchScore {
            row: index + 1,
            applicant,
            outcome,
        });
    }

    Ok(results)
}

#[derive(Debug, Deserialize)]
struct ApplicantRow {
    first_name: String,
    last_name: String,
    #[serde(default)]
    date_of_birth: Option<chrono::NaiveDate>,
    #[serde(default)]
    monthly_income: Option<f64>,
    income_type: IncomeType,
    employment_type: EmploymentType,
    #[serde(default)]
    rent_amount: Option<f64>,
    #[serde(default)]
    charges_amount: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    identity_document: bool,
    #[serde(default, deserialize_with = "flag")]
    income_proof: bool,
    #[serde(default, deserialize_with = "flag")]
    tax_notice: bool,
    #[serde(default, deserialize_with = "flag")]
    employment_contract: bool,
    #[serde(default, deserialize_with = "flag")]
    rent_receipts: bool,
    #[serde(default, deserialize_with = "flag")]
    has_guarantor: bool,
    #[serde(default)]
    guarantor_income: Option<f64>,
    #[serde(default)]
    guarantor_type: Option<GuarantorType>,
    #[serde(default)]
    previous_rent_history: Option<RentHistory>,
    #[serde(default, deserialize_with = "flag")]
    has_unpaid_rent_history: bool,
    #[serde(default)]
    extracted_income: Option<f64>,
    #[serde(default)]
    extracted_employer: Option<String>,
    #[serde(default)]
    ocr_confidence: Option<f64>,
}

impl TryFrom<ApplicantRow> for TenantScoreInput {
    type Error = InputViolation;

    /// Extracted OCR values without a confidence cell are refused rather than dropped.
    fn try_from(row: ApplicantRow) -> Result<Self, Self::Error> {
        let extracted = row.extracted_income.is_some() || row.extracted_employer.is_some();
        let ocr = match row.ocr_confidence {
            Some(confidence) => Some(OcrExtraction {
                extracted_income: row.extracted_income,
                extracted_employer: row.extracted_employer,
                confidence,
            }),
            None if extracted => return Err(InputViolation::MissingOcrConfidence),
            None => None,
        };

        Ok(TenantScoreInput {
            applicant: ApplicantIdentity {
                first_name: row.first_name,
                last_name: row.last_name,
                date_of_birth: row.date_of_birth,
            },
            monthly_income: row.monthly_income,
            income_type: row.income_type,
            employment_type: row.employment_type,
            rent_amount: row.rent_amount,
            charges_amount: row.charges_amount.unwrap_or(0.0),
            documents_provided: DocumentsProvided {
                identity: row.identity_document,
                income_proof: row.income_proof,
                tax_notice: row.tax_notice,
                employment_contract: row.employment_contract,
                rent_receipts: row.rent_receipts,
            },
            has_guarantor: row.has_guarantor,
            guarantor_income: row.guarantor_income,
            guarantor_type: row.guarantor_type,
            previous_rent_history: row.previous_rent_history.unwrap_or_default(),
            has_unpaid_rent_history: row.has_unpaid_rent_history,
            ocr,
        })
    }
}

/// Blank cells read as `false`; accepts true/false, yes/no and 1/0.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "0" => Ok(false),
        "true" | "yes" | "1" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean flag, found '{other}'"
        ))),
    }
}
