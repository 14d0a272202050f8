//! ROI calculation for a vaccination campaign.

use campaign_core::types::ensure_finite_result;
use campaign_core::{CalcResult, CampaignError, CampaignParameters, CampaignResult};
use tracing::{debug, warn};

use crate::break_even::compute_break_even;
use crate::earnings::projected_total;

/// Compute revenue, retention, break-even and ROI for a campaign.
///
/// Figures are returned at full precision; call
/// [`CampaignResult::rounded`] for display. A zero campaign cost is rejected
/// because ROI is undefined for it, and so is any figure that overflows `f64`.
pub fn compute_roi(params: &CampaignParameters) -> CalcResult<CampaignResult> {
    if let Err(e) = params.validate() {
        warn!(error = %e, "Rejected campaign parameters");
        return Err(e);
    }
    if params.campaign_cost == 0.0 {
        warn!("Rejected zero-cost campaign");
        return Err(CampaignError::invalid(
            "campaign_cost must be greater than zero: ROI is undefined for a zero-cost campaign",
        ));
    }

    let patients = params.expected_patients as f64;
    let expected_revenue = patients * params.avg_spend_per_patient;
    let boost_per_patient: f64 = params.add_on_boosts.values().sum();
    let add_on_revenue = patients * boost_per_patient;
    let total_revenue = expected_revenue + add_on_revenue;
    let retained_customers = patients * (params.retention_rate_percent / 100.0);
    let roi_percent = ((total_revenue - params.campaign_cost) / params.campaign_cost) * 100.0;

    let fee_sum: f64 = params.vaccine_fees.iter().map(|f| f.fee).sum();
    let total_earnings = projected_total(
        fee_sum,
        params.expected_patients,
        params.program_cost,
        params.basket_size,
    );

    for (field, value) in [
        ("expected_revenue", expected_revenue),
        ("add_on_revenue", add_on_revenue),
        ("total_revenue", total_revenue),
        ("roi_percent", roi_percent),
        ("total_earnings", total_earnings),
    ] {
        if let Err(e) = ensure_finite_result(field, value) {
            warn!(error = %e, "Rejected campaign with overflowing result");
            return Err(e);
        }
    }

    let break_even = compute_break_even(
        params.campaign_cost,
        params.avg_spend_per_patient,
        &params.vaccine_fees,
    )?;

    debug!(
        expected_patients = params.expected_patients,
        total_revenue,
        roi_percent,
        "ROI computed"
    );

    Ok(CampaignResult {
        expected_revenue,
        add_on_revenue,
        total_revenue,
        break_even,
        retained_customers,
        roi_percent,
        total_earnings,
    })
}
