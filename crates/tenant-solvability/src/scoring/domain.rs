use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Applicant identity carried alongside the financial profile for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantIdentity {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

impl ApplicantIdentity {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Financial profile assembled by the caller for a single scoring request.
///
/// Currency amounts are monthly figures in euros. `monthly_income` and `rent_amount` are
/// optional so that "not provided" stays distinguishable from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantScoreInput {
    pub applicant: ApplicantIdentity,
    pub monthly_income: Option<f64>,
    pub income_type: IncomeType,
    pub employment_type: EmploymentType,
    pub rent_amount: Option<f64>,
    #[serde(default)]
    pub charges_amount: f64,
    #[serde(default)]
    pub documents_provided: DocumentsProvided,
    #[serde(default)]
    pub has_guarantor: bool,
    #[serde(default)]
    pub guarantor_income: Option<f64>,
    #[serde(default)]
    pub guarantor_type: Option<GuarantorType>,
    #[serde(default)]
    pub previous_rent_history: RentHistory,
    #[serde(default)]
    pub has_unpaid_rent_history: bool,
    #[serde(default)]
    pub ocr: Option<OcrExtraction>,
}

impl TenantScoreInput {
    /// Rent plus charges, when the rent is known.
    pub fn housing_cost(&self) -> Option<f64> {
        self.rent_amount.map(|rent| rent + self.charges_amount)
    }

    /// Income over housing cost. `None` when either side is unknown or the cost is zero.
    pub fn income_ratio(&self) -> Option<f64> {
        let income = self.monthly_income?;
        ratio_against(income, self.housing_cost()?)
    }

    /// Guarantor income over the same housing cost the applicant is measured against.
    pub fn guarantor_ratio(&self) -> Option<f64> {
        let income = self.guarantor_income?;
        ratio_against(income, self.housing_cost()?)
    }
}

/// Ratios are kept to six decimals so cent amounts landing exactly on a threshold compare equal.
const RATIO_PRECISION: f64 = 1e6;

fn ratio_against(income: f64, housing_cost: f64) -> Option<f64> {
    if housing_cost > 0.0 {
        Some((income / housing_cost * RATIO_PRECISION).round() / RATIO_PRECISION)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    Salary,
    SelfEmployed,
    Pension,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    PermanentContract,
    FixedTermContract,
    TempAgency,
    Freelance,
    Retired,
    Student,
    Unemployed,
    Other,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 8] = [
        EmploymentType::PermanentContract,
        EmploymentType::FixedTermContract,
        EmploymentType::TempAgency,
        EmploymentType::Freelance,
        EmploymentType::Retired,
        EmploymentType::Student,
        EmploymentType::Unemployed,
        EmploymentType::Other,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuarantorType {
    Person,
    Company,
    /// Institutional schemes such as Visale.
    StateBackedGuarantee,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentHistory {
    Good,
    LatePayments,
    #[default]
    Unknown,
}

/// Supporting document categories recognised by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Identity,
    IncomeProof,
    TaxNotice,
    EmploymentContract,
    RentReceipts,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Identity,
        DocumentKind::IncomeProof,
        DocumentKind::TaxNotice,
        DocumentKind::EmploymentContract,
        DocumentKind::RentReceipts,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DocumentKind::Identity => "identity document",
            DocumentKind::IncomeProof => "proof of income",
            DocumentKind::TaxNotice => "tax notice",
            DocumentKind::EmploymentContract => "employment contract",
            DocumentKind::RentReceipts => "previous rent receipts",
        }
    }

    /// Identity and income proof are required for any approval.
    pub const fn is_critical(self) -> bool {
        matches!(self, DocumentKind::Identity | DocumentKind::IncomeProof)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentsProvided {
    #[serde(default)]
    pub identity: bool,
    #[serde(default)]
    pub income_proof: bool,
    #[serde(default)]
    pub tax_notice: bool,
    #[serde(default)]
    pub employment_contract: bool,
    #[serde(default)]
    pub rent_receipts: bool,
}

impl DocumentsProvided {
    pub fn all() -> Self {
        Self {
            identity: true,
            income_proof: true,
            tax_notice: true,
            employment_contract: true,
            rent_receipts: true,
        }
    }

    pub fn has(&self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::Identity => self.identity,
            DocumentKind::IncomeProof => self.income_proof,
            DocumentKind::TaxNotice => self.tax_notice,
            DocumentKind::EmploymentContract => self.employment_contract,
            DocumentKind::RentReceipts => self.rent_receipts,
        }
    }

    pub fn provided_count(&self) -> usize {
        DocumentKind::ALL
            .iter()
            .filter(|kind| self.has(**kind))
            .count()
    }

    pub fn missing_critical(&self) -> Vec<DocumentKind> {
        DocumentKind::ALL
            .into_iter()
            .filter(|kind| kind.is_critical() && !self.has(*kind))
            .collect()
    }
}

/// Figures extracted from uploaded documents, used to cross-check the declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrExtraction {
    #[serde(default)]
    pub extracted_income: Option<f64>,
    #[serde(default)]
    pub extracted_employer: Option<String>,
    pub confidence: f64,
}
