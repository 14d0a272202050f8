//! Break-even patient counts for a fixed campaign cost.
//!
//! A figure is `campaign_cost / sum(per-patient revenue sources)`. A zero
//! divisor yields [`BreakEven::NotApplicable`] rather than zero or an error,
//! while a sum or quotient past `f64` range is an input error.
//! Fractional patients are returned as-is.

use campaign_core::types::{ensure_finite_result, ensure_non_negative};
use campaign_core::{
    BreakEven, BreakEvenBasis, BreakEvenEntry, BreakEvenResult, CalcResult, CampaignError,
    VaccineFee,
};
use tracing::debug;

/// Break-even for one caller-chosen set of per-patient revenue sources.
pub fn break_even_for(campaign_cost: f64, divisors: &[f64]) -> CalcResult<BreakEven> {
    ensure_non_negative("campaign_cost", campaign_cost)?;
    if divisors.is_empty() {
        return Err(CampaignError::invalid(
            "break-even needs at least one per-patient revenue source",
        ));
    }
    for value in divisors {
        ensure_non_negative("break-even divisor", *value)?;
    }

    let per_patient =
        ensure_finite_result("break-even revenue per patient", divisors.iter().sum())?;
    if per_patient == 0.0 {
        return Ok(BreakEven::NotApplicable);
    }
    let patients = ensure_finite_result("break-even patients", campaign_cost / per_patient)?;
    Ok(BreakEven::Patients(patients))
}

/// Compute the standard break-even set: avg spend alone, each fee alone,
/// all fees combined (two or more fees), and all fees plus avg spend.
pub fn compute_break_even(
    campaign_cost: f64,
    avg_spend_per_patient: f64,
    fees: &[VaccineFee],
) -> CalcResult<BreakEvenResult> {
    ensure_non_negative("avg_spend_per_patient", avg_spend_per_patient)?;

    let mut entries = Vec::with_capacity(fees.len() + 3);
    entries.push(BreakEvenEntry {
        basis: BreakEvenBasis::AvgSpend,
        label: "Avg spend only".to_string(),
        value: break_even_for(campaign_cost, &[avg_spend_per_patient])?,
    });

    for (index, fee) in fees.iter().enumerate() {
        entries.push(BreakEvenEntry {
            basis: BreakEvenBasis::Fee(index),
            label: format!("{} fee only", fee.name),
            value: break_even_for(campaign_cost, &[fee.fee])?,
        });
    }

    let fee_values: Vec<f64> = fees.iter().map(|f| f.fee).collect();

    if fees.len() >= 2 {
        entries.push(BreakEvenEntry {
            basis: BreakEvenBasis::AllFees,
            label: "All fees combined".to_string(),
            value: break_even_for(campaign_cost, &fee_values)?,
        });
    }

    if !fees.is_empty() {
        let mut with_spend = fee_values;
        with_spend.push(avg_spend_per_patient);
        entries.push(BreakEvenEntry {
            basis: BreakEvenBasis::AllFeesWithAvgSpend,
            label: "All fees + avg spend".to_string(),
            value: break_even_for(campaign_cost, &with_spend)?,
        });
    }

    debug!(
        campaign_cost,
        fees = fees.len(),
        not_applicable = entries.iter().filter(|e| !e.value.is_applicable()).count(),
        "Break-even computed"
    );

    Ok(BreakEvenResult { entries })
}
