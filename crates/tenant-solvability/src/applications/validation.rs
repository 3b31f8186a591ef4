use crate::scoring::TenantScoreInput;

/// Validation errors raised before a profile reaches the scorer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputViolation {
    #[error("{field} must be a finite, non-negative amount (found {value})")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("OCR confidence must lie within [0, 1] (found {0})")]
    ConfidenceOutOfRange(f64),
    #[error("applicant {0} is required")]
    MissingIdentity(&'static str),
    #[error("guarantor details supplied without a guarantor")]
    UnexpectedGuarantorDetails,
    #[error("OCR extraction supplied without a confidence")]
    MissingOcrConfidence,
}

/// Guard enforcing the input contract the scorer relies on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputGuard;

impl ScoreInputGuard {
    pub fn validate(&self, input: TenantScoreInput) -> Result<TenantScoreInput, InputViolation> {
        if input.applicant.first_name.trim().is_empty() {
            return Err(InputViolation::MissingIdentity("first name"));
        }
        if input.applicant.last_name.trim().is_empty() {
            return Err(InputViolation::MissingIdentity("last name"));
        }

        check_amount("monthly_income", input.monthly_income)?;
        check_amount("rent_amount", input.rent_amount)?;
        check_amount("charges_amount", Some(input.charges_amount))?;
        check_amount("guarantor_income", input.guarantor_income)?;

        if !input.has_guarantor
            && (input.guarantor_income.is_some() || input.guarantor_type.is_some())
        {
            return Err(InputViolation::UnexpectedGuarantorDetails);
        }

        if let Some(ocr) = &input.ocr {
            check_amount("extracted_income", ocr.extracted_income)?;
            if !(0.0..=1.0).contains(&ocr.confidence) {
                return Err(InputViolation::ConfidenceOutOfRange(ocr.confidence));
            }
        }

        Ok(input)
    }
}

fn check_amount(field: &'static str, value: Option<f64>) -> Result<(), InputViolation> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => {
            Err(InputViolation::InvalidAmount {
                field,
                value: amount,
            })
        }
        _ => Ok(()),
    }
}
