//! Earnings projections from a vaccine price table.

use campaign_core::types::{ensure_finite_result, ensure_non_negative};
use campaign_core::{CalcResult, CampaignError, CoAdministrationRevenue, PriceTable};
use tracing::debug;

/// `per_patient * target + program_cost + basket_size * target`
pub(crate) fn projected_total(
    per_patient: f64,
    target_count: u64,
    program_cost: f64,
    basket_size: f64,
) -> f64 {
    let target = target_count as f64;
    per_patient * target + program_cost + basket_size * target
}

/// Total potential earnings for one or two selected vaccines over
/// `target_count` patients, plus a flat program cost and a per-patient
/// basket.
pub fn compute_potential_earnings<S: AsRef<str>>(
    prices: &PriceTable,
    selected: &[S],
    target_count: u64,
    program_cost: f64,
    basket_size: f64,
) -> CalcResult<f64> {
    if selected.is_empty() || selected.len() > 2 {
        return Err(CampaignError::invalid(format!(
            "select one or two vaccines, got {}",
            selected.len()
        )));
    }
    ensure_non_negative("program_cost", program_cost)?;
    ensure_non_negative("basket_size", basket_size)?;

    let mut per_patient = 0.0;
    for name in selected {
        per_patient += prices.price_of(name.as_ref())?;
    }

    let total = ensure_finite_result(
        "potential earnings",
        projected_total(per_patient, target_count, program_cost, basket_size),
    )?;
    debug!(
        vaccines = selected.len(),
        target_count,
        per_patient,
        total,
        "Potential earnings computed"
    );
    Ok(total)
}

/// Revenue for `people` patients receiving `base_vaccine`, optionally
/// co-administered with a second vaccine.
pub fn compute_coadministration_revenue(
    prices: &PriceTable,
    base_vaccine: &str,
    co_vaccine: Option<&str>,
    people: u64,
) -> CalcResult<CoAdministrationRevenue> {
    let count = people as f64;
    let base_revenue = prices.price_of(base_vaccine)? * count;
    let add_on_revenue = match co_vaccine {
        Some(name) => prices.price_of(name)? * count,
        None => 0.0,
    };
    let total_revenue = ensure_finite_result(
        "co-administration revenue",
        base_revenue + add_on_revenue,
    )?;

    Ok(CoAdministrationRevenue {
        base_vaccine: base_vaccine.to_string(),
        co_vaccine: co_vaccine.map(str::to_string),
        people,
        base_revenue,
        add_on_revenue,
        total_revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_prices() -> PriceTable {
        PriceTable::from_prices([("Influenza", 19.32), ("COVID-19", 27.35)]).unwrap()
    }

    #[test]
    fn test_single_vaccine_earnings() {
        let total =
            compute_potential_earnings(&scenario_prices(), &["Influenza"], 10, 0.0, 0.0).unwrap();
        assert!((total - 193.2).abs() < 1e-9);
    }

    #[test]
    fn test_program_cost_added_once_basket_per_patient() {
        let prices = PriceTable::from_prices([("Flu", 20.0)]).unwrap();
        let total = compute_potential_earnings(&prices, &["Flu"], 50, 250.0, 4.0).unwrap();
        assert!((total - (20.0 * 50.0 + 250.0 + 4.0 * 50.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_target_leaves_program_cost() {
        let total =
            compute_potential_earnings(&scenario_prices(), &["Influenza"], 0, 100.0, 10.0).unwrap();
        assert!((total - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_selection_size_is_validated() {
        let prices = scenario_prices();
        let none: [&str; 0] = [];
        assert!(compute_potential_earnings(&prices, &none, 10, 0.0, 0.0).is_err());
        let three = ["Influenza", "COVID-19", "Influenza"];
        assert!(compute_potential_earnings(&prices, &three, 10, 0.0, 0.0)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_unknown_vaccine_rejected() {
        let err = compute_potential_earnings(&scenario_prices(), &["Shingles"], 10, 0.0, 0.0)
            .unwrap_err();
        assert!(err.to_string().contains("Shingles"));
    }

    #[test]
    fn test_negative_flat_additions_rejected() {
        let prices = scenario_prices();
        assert!(compute_potential_earnings(&prices, &["Influenza"], 10, -1.0, 0.0).is_err());
        assert!(compute_potential_earnings(&prices, &["Influenza"], 10, 0.0, -1.0).is_err());
    }

    #[test]
    fn test_deserialized_negative_price_never_reaches_earnings() {
        assert!(serde_json::from_str::<PriceTable>(r#"{"Flu": -20.0}"#).is_err());
        let prices: PriceTable = serde_json::from_str(r#"{"Flu": 20.0}"#).unwrap();
        let total = compute_potential_earnings(&prices, &["Flu"], 10, 0.0, 0.0).unwrap();
        assert!((total - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overflowing_earnings_rejected() {
        let prices = PriceTable::from_prices([("Flu", f64::MAX), ("RSV", f64::MAX)]).unwrap();
        assert!(compute_potential_earnings(&prices, &["Flu"], 2, 0.0, 0.0)
            .unwrap_err()
            .is_invalid_input());
        assert!(compute_coadministration_revenue(&prices, "Flu", Some("RSV"), 1).is_err());
    }

    #[test]
    fn test_coadministration_revenue() {
        let prices = PriceTable::default();
        let revenue =
            compute_coadministration_revenue(&prices, "Influenza", Some("Pneumococcal"), 3)
                .unwrap();
        assert!((revenue.base_revenue - 75.0).abs() < f64::EPSILON);
        assert!((revenue.add_on_revenue - 360.0).abs() < f64::EPSILON);
        assert!((revenue.total_revenue - 435.0).abs() < f64::EPSILON);
        assert_eq!(revenue.co_vaccine.as_deref(), Some("Pneumococcal"));
    }

    #[test]
    fn test_coadministration_without_add_on() {
        let prices = PriceTable::default();
        let revenue = compute_coadministration_revenue(&prices, "RSV", None, 2).unwrap();
        assert!((revenue.add_on_revenue).abs() < f64::EPSILON);
        assert!((revenue.total_revenue - 700.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coadministration_unknown_vaccine() {
        let prices = PriceTable::default();
        assert!(compute_coadministration_revenue(&prices, "Influenza", Some("Shingles"), 1)
            .unwrap_err()
            .is_invalid_input());
    }
}
