//! End-to-end calculator scenarios using the published example figures.

use campaign_core::{round_to_cents, BreakEven, CampaignParameters, PriceTable, VaccineFee};
use campaign_economics::{compute_break_even, compute_potential_earnings, compute_roi};

#[test]
fn test_roi_for_default_form_values() {
    let params = CampaignParameters::new(500.0, 200, 40.0, 30.0);
    let result = compute_roi(&params).unwrap().rounded();

    assert!((result.expected_revenue - 8_000.0).abs() < f64::EPSILON);
    assert!((result.retained_customers - 60.0).abs() < f64::EPSILON);
    // (8000 - 500) / 500 * 100
    assert!((result.roi_percent - 1_500.0).abs() < f64::EPSILON);
}

#[test]
fn test_roi_matches_formula_at_two_decimals() {
    let params = CampaignParameters::new(733.0, 91, 37.5, 12.0).with_boost("SMS", 0.85);
    let result = compute_roi(&params).unwrap();

    let total = 91.0 * 37.5 + 91.0 * 0.85;
    let expected = ((total - 733.0) / 733.0) * 100.0;
    assert!((round_to_cents(result.roi_percent) - round_to_cents(expected)).abs() < f64::EPSILON);
    assert!((result.expected_revenue - 91.0 * 37.5).abs() < f64::EPSILON);
}

#[test]
fn test_combined_fee_break_even() {
    let fees = [
        VaccineFee::new("Primary", 22.0),
        VaccineFee::new("Secondary", 251.0),
    ];
    let result = compute_break_even(500.0, 40.0, &fees).unwrap().rounded();

    assert_eq!(result.all_fees(), Some(BreakEven::Patients(1.83)));
    assert_eq!(result.overall(), Some(BreakEven::Patients(12.5)));
}

#[test]
fn test_zero_cost_campaign_has_no_roi() {
    let params = CampaignParameters::new(0.0, 200, 40.0, 30.0);
    let err = compute_roi(&params).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn test_zero_fee_break_even_is_not_applicable() {
    let fees = [VaccineFee::new("None", 0.0), VaccineFee::new("Other", 0.0)];
    let result = compute_break_even(500.0, 40.0, &fees).unwrap();

    assert_eq!(result.fee(0), Some(BreakEven::NotApplicable));
    assert_eq!(result.fee(1), Some(BreakEven::NotApplicable));
    assert_eq!(result.all_fees(), Some(BreakEven::NotApplicable));
}

#[test]
fn test_potential_earnings_for_two_vaccines() {
    let prices = PriceTable::from_prices([("Influenza", 19.32), ("COVID-19", 27.35)]).unwrap();
    let total =
        compute_potential_earnings(&prices, &["Influenza", "COVID-19"], 100, 100.0, 10.0).unwrap();

    assert!((round_to_cents(total) - 5_767.0).abs() < f64::EPSILON);
}

#[test]
fn test_result_serializes_to_json() {
    let params = CampaignParameters::new(500.0, 200, 40.0, 30.0).with_fee("Flu", 0.0);
    let result = compute_roi(&params).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["expected_revenue"], 8000.0);
    assert_eq!(json["break_even"]["entries"][1]["value"]["status"], "not_applicable");
}
