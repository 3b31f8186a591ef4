use super::config::{
    employment_points, income_type_ceiling, rent_history_points, ScoringPolicy, SCORE_MAX,
};
use super::domain::{DocumentKind, GuarantorType, TenantScoreInput};
use super::warnings::ScoreWarning;

/// Sub-scores on the shared 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubScores {
    pub income_ratio: u8,
    pub employment_stability: u8,
    pub document_completeness: u8,
    pub guarantor: u8,
    pub rental_history: u8,
    pub ocr_consistency: u8,
}

/// Facts the decision step needs beyond the numbers.
pub(crate) struct ScoreSignals {
    pub income_ratio: Option<f64>,
    pub guarantor_needed: bool,
    pub missing_critical: Vec<DocumentKind>,
    pub unpaid_rent: bool,
}

pub(crate) fn score_input(
    input: &TenantScoreInput,
    policy: &ScoringPolicy,
) -> (SubScores, ScoreSignals, Vec<ScoreWarning>) {
    let mut warnings = Vec::new();

    let income_ratio = input.income_ratio();
    let income_ratio_score = ratio_points(income_ratio, policy);
    let guarantor_needed = income_ratio_score < SCORE_MAX;
    if guarantor_needed {
        warnings.push(ScoreWarning::IncomeRatioBelowThreshold {
            ratio: income_ratio,
            required: policy.full_marks_ratio,
        });
    }

    let missing_critical = input.documents_provided.missing_critical();
    warnings.extend(
        missing_critical
            .iter()
            .map(|document| ScoreWarning::MissingCriticalDocument {
                document: *document,
            }),
    );

    let (ocr_consistency, ocr_warning) = ocr_consistency(input, policy);
    warnings.extend(ocr_warning);

    if input.has_unpaid_rent_history {
        warnings.push(ScoreWarning::UnpaidRentHistory);
    }

    let (guarantor, guarantor_warning) = guarantor_strength(input, guarantor_needed, policy);
    warnings.extend(guarantor_warning);

    let scores = SubScores {
        income_ratio: income_ratio_score,
        employment_stability: employment_stability(input),
        document_completeness: document_completeness(input, &missing_critical, policy),
        guarantor,
        rental_history: rental_history(input),
        ocr_consistency,
    };

    let signals = ScoreSignals {
        income_ratio,
        guarantor_needed,
        missing_critical,
        unpaid_rent: input.has_unpaid_rent_history,
    };

    (scores, signals, warnings)
}

pub(crate) fn weighted_total(scores: &SubScores, policy: &ScoringPolicy) -> u8 {
    let weights = &policy.weights;
    let total = weights.income_ratio * f64::from(scores.income_ratio)
        + weights.document_completeness * f64::from(scores.document_completeness)
        + weights.employment_stability * f64::from(scores.employment_stability)
        + weights.rental_history * f64::from(scores.rental_history)
        + weights.guarantor * f64::from(scores.guarantor)
        + weights.ocr_consistency * f64::from(scores.ocr_consistency);

    to_points(total)
}

/// Linear between the zero and full-marks ratios. An unknown ratio scores zero.
pub(crate) fn ratio_points(ratio: Option<f64>, policy: &ScoringPolicy) -> u8 {
    let Some(ratio) = ratio.filter(|ratio| !ratio.is_nan()) else {
        return 0;
    };

    if ratio >= policy.full_marks_ratio {
        return SCORE_MAX;
    }
    if ratio <= policy.zero_marks_ratio {
        return 0;
    }

    let span = policy.full_marks_ratio - policy.zero_marks_ratio;
    let fraction = (ratio - policy.zero_marks_ratio) / span;
    // Only the full-marks branch may reach the maximum.
    to_points(fraction * f64::from(SCORE_MAX)).min(SCORE_MAX - 1)
}

fn employment_stability(input: &TenantScoreInput) -> u8 {
    employment_points(input.employment_type).min(income_type_ceiling(input.income_type))
}

fn document_completeness(
    input: &TenantScoreInput,
    missing_critical: &[DocumentKind],
    policy: &ScoringPolicy,
) -> u8 {
    let recognised = DocumentKind::ALL.len() as f64;
    let provided = input.documents_provided.provided_count() as f64;
    let proportional = provided / recognised * f64::from(SCORE_MAX);
    let penalty = f64::from(policy.critical_document_penalty) * missing_critical.len() as f64;

    to_points(proportional - penalty)
}

fn guarantor_strength(
    input: &TenantScoreInput,
    guarantor_needed: bool,
    policy: &ScoringPolicy,
) -> (u8, Option<ScoreWarning>) {
    if !guarantor_needed {
        return (SCORE_MAX, None);
    }
    if !input.has_guarantor {
        return (0, None);
    }

    if input.guarantor_type == Some(GuarantorType::StateBackedGuarantee) {
        return (SCORE_MAX, None);
    }

    let ratio = input.guarantor_ratio();
    let points = ratio_points(ratio, policy);
    if points == SCORE_MAX {
        return (SCORE_MAX, None);
    }

    let warning = ScoreWarning::GuarantorInsufficient {
        ratio,
        required: policy.full_marks_ratio,
    };
    (points.max(policy.partial_guarantor_floor), Some(warning))
}

fn rental_history(input: &TenantScoreInput) -> u8 {
    if input.has_unpaid_rent_history {
        return 0;
    }
    rent_history_points(input.previous_rent_history)
}

fn ocr_consistency(
    input: &TenantScoreInput,
    policy: &ScoringPolicy,
) -> (u8, Option<ScoreWarning>) {
    let Some(ocr) = input.ocr.as_ref() else {
        return (SCORE_MAX, None);
    };
    let (Some(declared), Some(extracted)) = (input.monthly_income, ocr.extracted_income) else {
        return (SCORE_MAX, None);
    };

    let deviation = relative_deviation(declared, extracted);
    if deviation <= policy.ocr_tolerance {
        return (SCORE_MAX, None);
    }

    let excess = (deviation - policy.ocr_tolerance) / (1.0 - policy.ocr_tolerance);
    let mismatch_penalty = excess.clamp(0.0, 1.0) * f64::from(SCORE_MAX);
    let confidence = ocr.confidence.clamp(0.0, 1.0);
    let score = to_points(f64::from(SCORE_MAX) - mismatch_penalty * confidence);

    let warning = ScoreWarning::OcrIncomeMismatch {
        declared,
        extracted,
        deviation,
        confidence,
    };
    (score, Some(warning))
}

/// Relative gap between declared and extracted income, capped at 1.
fn relative_deviation(declared: f64, extracted: f64) -> f64 {
    if declared > 0.0 {
        ((extracted - declared).abs() / declared).min(1.0)
    } else if extracted == 0.0 {
        0.0
    } else {
        1.0
    }
}

fn to_points(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(SCORE_MAX)) as u8
}

#[cfg(test)]
pub(crate) fn relative_deviation_for_tests(declared: f64, extracted: f64) -> f64 {
    relative_deviation(declared, extracted)
}
