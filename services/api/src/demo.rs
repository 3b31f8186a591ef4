use crate::infra::{resolve_policy, InMemoryAuditTrail, InMemoryScoreRepository};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tenant_solvability::applications::{ApplicationId, SolvabilityService};
use tenant_solvability::error::AppError;
use tenant_solvability::scoring::batch::score_path;
use tenant_solvability::scoring::{
    ApplicantIdentity, DocumentsProvided, EmploymentType, GuarantorType, IncomeType,
    OcrExtraction, RentHistory, SolvabilityScore, SolvabilityScorer, TenantScoreInput,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding a single applicant profile
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Optional JSON scoring policy overriding the defaults
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the raw JSON score instead of a readable summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with one applicant per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Optional JSON scoring policy overriding the defaults
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional JSON scoring policy overriding the defaults
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print every sub-score rather than the headline only
    #[arg(long)]
    pub(crate) detailed: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        input,
        policy,
        json,
    } = args;

    let policy = resolve_policy(policy.as_deref())?;
    let raw = std::fs::read_to_string(&input)?;
    let profile: TenantScoreInput = serde_json::from_str(&raw)?;

    let service = SolvabilityService::new(
        Arc::new(InMemoryScoreRepository::default()),
        Arc::new(InMemoryAuditTrail::default()),
        policy,
    );

    let applicant = profile.applicant.display_name();
    let score = service.preview(profile).inspect_err(|err| {
        warn!(applicant = %applicant, error = %err, "profile not scored");
    })?;
    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else {
        render_score(&applicant, &score, true);
    }

    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let policy = resolve_policy(args.policy.as_deref())?;
    let scorer = SolvabilityScorer::new(policy);
    let results = score_path(&args.csv, &scorer)?;

    println!(
        "Scored {} applicant(s) from {}",
        results.len(),
        args.csv.display()
    );
    for result in &results {
        match &result.outcome {
            Ok(score) => println!(
                "  #{:<3} {:<28} {:>3}/100  {:<10} {}",
                result.row,
                result.applicant,
                score.total_score,
                score.risk_level.label(),
                score.recommendation.label()
            ),
            Err(reason) => println!(
                "  #{:<3} {:<28} skipped: {}",
                result.row, result.applicant, reason
            ),
        }
    }

    Ok(())
}

const RECENT_SHOWN: usize = 3;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policy = resolve_policy(args.policy.as_deref())?;
    let audit = Arc::new(InMemoryAuditTrail::default());
    let service = SolvabilityService::new(
        Arc::new(InMemoryScoreRepository::default()),
        audit.clone(),
        policy,
    );

    println!("Solvability demo");
    println!("================");
    for (index, profile) in sample_profiles().into_iter().enumerate() {
        let application_id = ApplicationId(format!("demo-{:03}", index + 1));
        let applicant = profile.applicant.display_name();
        match service.evaluate(application_id.clone(), profile) {
            Ok(record) => {
                println!();
                println!("[{}]", application_id.0);
                render_score(&applicant, &record.score, args.detailed);
            }
            Err(err) => println!("[{}] {applicant}: not scored ({err})", application_id.0),
        }
    }

    println!();
    println!("Most recent scores");
    for record in service.recent(RECENT_SHOWN)? {
        println!(
            "  {:<10} {:<20} {}",
            record.application_id.0,
            record.input.applicant.display_name(),
            record.score.summary()
        );
    }

    println!();
    println!("Audit trail: {} entr(ies)", audit.entries().len());
    Ok(())
}

fn render_score(applicant: &str, score: &SolvabilityScore, detailed: bool) {
    println!(
        "{applicant}: {}/100, {} risk, recommendation {}",
        score.total_score,
        score.risk_level.label(),
        score.recommendation.label()
    );
    if detailed {
        for (name, value) in score.sub_scores() {
            println!("  {name:<22} {value:>3}");
        }
    }
    for message in score.warning_messages() {
        println!("  ! {message}");
    }
}

fn applicant(first_name: &str, last_name: &str, born: (i32, u32, u32)) -> ApplicantIdentity {
    ApplicantIdentity {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(born.0, born.1, born.2),
    }
}

fn sample_profiles() -> Vec<TenantScoreInput> {
    let salaried = TenantScoreInput {
        applicant: applicant("Camille", "Martin", (1990, 4, 12)),
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
        ocr: Some(OcrExtraction {
            extracted_income: Some(2950.0),
            extracted_employer: Some("Atelier Lumière".to_string()),
            confidence: 0.93,
        }),
    };

    let student = TenantScoreInput {
        applicant: applicant("Lucas", "Petit", (2003, 9, 2)),
        monthly_income: Some(750.0),
        income_type: IncomeType::Other,
        employment_type: EmploymentType::Student,
        rent_amount: Some(520.0),
        charges_amount: 40.0,
        documents_provided: DocumentsProvided {
            employment_contract: false,
            rent_receipts: false,
            ..DocumentsProvided::all()
        },
        has_guarantor: true,
        guarantor_income: None,
        guarantor_type: Some(GuarantorType::StateBackedGuarantee),
        previous_rent_history: RentHistory::Unknown,
        ocr: None,
        ..salaried.clone()
    };

    let freelancer = TenantScoreInput {
        applicant: applicant("Inès", "Moreau", (1985, 1, 30)),
        monthly_income: Some(2600.0),
        income_type: IncomeType::SelfEmployed,
        employment_type: EmploymentType::Freelance,
        rent_amount: Some(1100.0),
        charges_amount: 80.0,
        has_guarantor: true,
        guarantor_income: Some(2400.0),
        guarantor_type: Some(GuarantorType::Person),
        previous_rent_history: RentHistory::LatePayments,
        ocr: Some(OcrExtraction {
            extracted_income: Some(1700.0),
            extracted_employer: None,
            confidence: 0.81,
        }),
        ..salaried.clone()
    };

    let evicted = TenantScoreInput {
        applicant: applicant("Hugo", "Lefèvre", (1978, 6, 18)),
        monthly_income: Some(1200.0),
        income_type: IncomeType::Other,
        employment_type: EmploymentType::Unemployed,
        documents_provided: DocumentsProvided::default(),
        previous_rent_history: RentHistory::LatePayments,
        has_unpaid_rent_history: true,
        ocr: None,
        ..salaried.clone()
    };

    vec![salaried, student, freelancer, evicted]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_solvability::applications::SolvabilityServiceError;

    fn profile_file(name: &str, profile: &TenantScoreInput) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tenant-solvability-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, serde_json::to_vec(profile).expect("serialize profile"))
            .expect("write profile");
        path
    }

    #[test]
    fn score_command_fails_when_the_profile_is_refused() {
        let mut profile = sample_profiles().remove(0);
        profile.monthly_income = Some(-250.0);
        let input = profile_file("refused", &profile);

        let result = run_score(ScoreArgs {
            input: input.clone(),
            policy: None,
            json: true,
        });
        std::fs::remove_file(&input).ok();

        assert!(matches!(
            result,
            Err(AppError::Scoring(SolvabilityServiceError::Validation(_)))
        ));
    }

    #[test]
    fn score_command_succeeds_for_a_valid_profile() {
        let input = profile_file("valid", &sample_profiles().remove(0));

        let result = run_score(ScoreArgs {
            input: input.clone(),
            policy: None,
            json: false,
        });
        std::fs::remove_file(&input).ok();

        assert!(result.is_ok());
    }
}
