use chrono::NaiveDate;

use crate::scoring::{
    ApplicantIdentity, DocumentsProvided, EmploymentType, GuarantorType, IncomeType,
    OcrExtraction, RentHistory, TenantScoreInput,
};

/// Salaried permanent employee earning exactly three times rent plus charges.
pub(super) fn strong_applicant() -> TenantScoreInput {
    TenantScoreInput {
        applicant: ApplicantIdentity {
            first_name: "Camille".to_string(),
            last_name: "Martin".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12),
        },
        monthly_income: Some(3000.0),
        income_type: IncomeType::Salary,
        employment_type: EmploymentType::PermanentContract,
        rent_amount: Some(900.0),
        charges_amount: 100.0,
        documents_provided: DocumentsProvided::all(),
        has_guarantor: false,
        guarantor_income: None,
        guarantor_type: None,
        previous_rent_history: RentHistory::Good,
        has_unpaid_rent_history: false,
        ocr: None,
    }
}

/// Unemployed applicant at a 1.0 ratio with no documents and confirmed unpaid rent.
pub(super) fn weak_applicant() -> TenantScoreInput {
    TenantScoreInput {
        monthly_income: Some(1000.0),
        income_type: IncomeType::Other,
        employment_type: EmploymentType::Unemployed,
        documents_provided: DocumentsProvided::default(),
        previous_rent_history: RentHistory::Unknown,
        has_unpaid_rent_history: true,
        ..strong_applicant()
    }
}

/// Strong profile whose own income only covers 1.5x the housing cost.
pub(super) fn stretched_applicant() -> TenantScoreInput {
    TenantScoreInput {
        monthly_income: Some(1500.0),
        ..strong_applicant()
    }
}

pub(super) fn with_guarantor(
    input: TenantScoreInput,
    guarantor_type: GuarantorType,
    guarantor_income: Option<f64>,
) -> TenantScoreInput {
    TenantScoreInput {
        has_guarantor: true,
        guarantor_type: Some(guarantor_type),
        guarantor_income,
        ..input
    }
}

pub(super) fn with_ocr(
    input: TenantScoreInput,
    extracted_income: f64,
    confidence: f64,
) -> TenantScoreInput {
    TenantScoreInput {
        ocr: Some(OcrExtraction {
            extracted_income: Some(extracted_income),
            extracted_employer: Some("Boulangerie Dupont".to_string()),
            confidence,
        }),
        ..input
    }
}
