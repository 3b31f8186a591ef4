use proptest::prelude::*;
use proptest::test_runner::Config;

use crate::scoring::{
    calculate_solvability_score, ApplicantIdentity, DocumentsProvided, EmploymentType,
    GuarantorType, IncomeType, OcrExtraction, Recommendation, RentHistory, RiskBands, RiskLevel,
    TenantScoreInput, SCORE_MAX,
};

fn employment_type() -> impl Strategy<Value = EmploymentType> {
    prop::sample::select(EmploymentType::ALL.to_vec())
}

fn income_type() -> impl Strategy<Value = IncomeType> {
    prop::sample::select(vec![
        IncomeType::Salary,
        IncomeType::SelfEmployed,
        IncomeType::Pension,
        IncomeType::Other,
    ])
}

fn rent_history() -> impl Strategy<Value = RentHistory> {
    prop::sample::select(vec![
        RentHistory::Good,
        RentHistory::LatePayments,
        RentHistory::Unknown,
    ])
}

fn documents() -> impl Strategy<Value = DocumentsProvided> {
    any::<[bool; 5]>().prop_map(|flags| DocumentsProvided {
        identity: flags[0],
        income_proof: flags[1],
        tax_notice: flags[2],
        employment_contract: flags[3],
        rent_receipts: flags[4],
    })
}

fn guarantor() -> impl Strategy<Value = (bool, Option<f64>, Option<GuarantorType>)> {
    let kind = prop::sample::select(vec![
        GuarantorType::Person,
        GuarantorType::Company,
        GuarantorType::StateBackedGuarantee,
    ]);
    prop_oneof![
        Just((false, None::<f64>, None::<GuarantorType>)),
        (
            prop::option::of(0.0f64..15_000.0),
            prop::option::of(kind)
        )
            .prop_map(|(income, kind)| (true, income, kind)),
    ]
}

fn ocr() -> impl Strategy<Value = Option<OcrExtraction>> {
    prop::option::of(
        (prop::option::of(0.0f64..15_000.0), 0.0f64..=1.0).prop_map(
            |(extracted_income, confidence)| OcrExtraction {
                extracted_income,
                extracted_employer: None,
                confidence,
            },
        ),
    )
}

prop_compose! {
    fn tenant_input()(
        monthly_income in prop::option::of(0.0f64..15_000.0),
        rent_amount in prop::option::of(0.0f64..4_000.0),
        charges_amount in 0.0f64..400.0,
        income_type in income_type(),
        employment_type in employment_type(),
        documents_provided in documents(),
        (has_guarantor, guarantor_income, guarantor_type) in guarantor(),
        previous_rent_history in rent_history(),
        has_unpaid_rent_history in any::<bool>(),
        ocr in ocr(),
    ) -> TenantScoreInput {
        TenantScoreInput {
            applicant: ApplicantIdentity {
                first_name: "Alex".to_string(),
                last_name: "Bernard".to_string(),
                date_of_birth: None,
            },
            monthly_income,
            income_type,
            employment_type,
            rent_amount,
            charges_amount,
            documents_provided,
            has_guarantor,
            guarantor_income,
            guarantor_type,
            previous_rent_history,
            has_unpaid_rent_history,
            ocr,
        }
    }
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn scoring_is_deterministic(input in tenant_input()) {
        let first = calculate_solvability_score(&input);
        let second = calculate_solvability_score(&input);
        prop_assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn scores_stay_within_bounds(input in tenant_input()) {
        let score = calculate_solvability_score(&input);
        prop_assert!(score.total_score <= SCORE_MAX);
        for (name, value) in score.sub_scores() {
            prop_assert!(value <= SCORE_MAX, "{} = {}", name, value);
        }
    }

    #[test]
    fn more_income_never_lowers_ratio_score(
        input in tenant_input(),
        income in 0.0f64..15_000.0,
        raise in 0.0f64..5_000.0,
    ) {
        let lower = TenantScoreInput { monthly_income: Some(income), ..input.clone() };
        let higher = TenantScoreInput { monthly_income: Some(income + raise), ..input };
        prop_assert!(
            calculate_solvability_score(&lower).income_ratio_score
                <= calculate_solvability_score(&higher).income_ratio_score
        );
    }

    #[test]
    fn cheaper_rent_never_lowers_ratio_score(
        input in tenant_input(),
        rent in 1.0f64..4_000.0,
        discount in 0.0f64..1.0,
    ) {
        let expensive = TenantScoreInput { rent_amount: Some(rent), ..input.clone() };
        let cheaper = TenantScoreInput { rent_amount: Some(rent * (1.0 - discount) + 0.5), ..input };
        prop_assume!(cheaper.rent_amount <= expensive.rent_amount);
        prop_assert!(
            calculate_solvability_score(&expensive).income_ratio_score
                <= calculate_solvability_score(&cheaper).income_ratio_score
        );
    }

    #[test]
    fn unpaid_rent_is_never_accepted(input in tenant_input()) {
        let input = TenantScoreInput { has_unpaid_rent_history: true, ..input };
        let score = calculate_solvability_score(&input);
        prop_assert!(score.recommendation <= Recommendation::Review);
    }

    #[test]
    fn no_documents_is_always_rejected(input in tenant_input()) {
        let input = TenantScoreInput { documents_provided: DocumentsProvided::default(), ..input };
        let score = calculate_solvability_score(&input);
        prop_assert_eq!(score.recommendation, Recommendation::Reject);
    }
}

fn risk_rank(level: RiskLevel) -> u8 {
    match level {
        RiskLevel::Low => 0,
        RiskLevel::Medium => 1,
        RiskLevel::High => 2,
        RiskLevel::VeryHigh => 3,
    }
}

#[test]
fn risk_bands_partition_the_score_range() {
    let bands = RiskBands::default();
    let levels: Vec<RiskLevel> = (0..=SCORE_MAX).map(|score| bands.classify(score)).collect();

    assert_eq!(levels[0], RiskLevel::VeryHigh);
    assert_eq!(levels[usize::from(SCORE_MAX)], RiskLevel::Low);
    for pair in levels.windows(2) {
        assert!(risk_rank(pair[1]) <= risk_rank(pair[0]));
    }
    assert_eq!(bands.classify(29), RiskLevel::VeryHigh);
    assert_eq!(bands.classify(30), RiskLevel::High);
    assert_eq!(bands.classify(50), RiskLevel::Medium);
    assert_eq!(bands.classify(75), RiskLevel::Low);
}
