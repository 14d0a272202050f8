use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CalcResult, CampaignError};

// ─── Inputs ─────────────────────────────────────────────────────────────────

/// A co-administered vaccine fee collected per patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineFee {
    pub name: String,
    pub fee: f64,
}

impl VaccineFee {
    pub fn new(name: impl Into<String>, fee: f64) -> Self {
        Self {
            name: name.into(),
            fee,
        }
    }
}

/// Everything a campaign calculation needs, fully known up front.
///
/// Optional revenue sources (fees, boosts, basket, program cost) default to
/// empty/zero so a single parameter set covers every calculator variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignParameters {
    pub campaign_cost: f64,
    pub expected_patients: u64,
    pub avg_spend_per_patient: f64,
    pub retention_rate_percent: f64,
    /// Primary and secondary slots; an unused slot is simply left out.
    #[serde(default)]
    pub vaccine_fees: Vec<VaccineFee>,
    /// Per-patient revenue boosts keyed by add-on name (SMS, digital ad, ...).
    #[serde(default)]
    pub add_on_boosts: BTreeMap<String, f64>,
    #[serde(default)]
    pub basket_size: f64,
    #[serde(default)]
    pub program_cost: f64,
}

impl CampaignParameters {
    pub fn new(
        campaign_cost: f64,
        expected_patients: u64,
        avg_spend_per_patient: f64,
        retention_rate_percent: f64,
    ) -> Self {
        Self {
            campaign_cost,
            expected_patients,
            avg_spend_per_patient,
            retention_rate_percent,
            vaccine_fees: Vec::new(),
            add_on_boosts: BTreeMap::new(),
            basket_size: 0.0,
            program_cost: 0.0,
        }
    }

    pub fn with_fee(mut self, name: impl Into<String>, fee: f64) -> Self {
        self.vaccine_fees.push(VaccineFee::new(name, fee));
        self
    }

    pub fn with_boost(mut self, name: impl Into<String>, boost: f64) -> Self {
        self.add_on_boosts.insert(name.into(), boost);
        self
    }

    /// Reject negative or non-finite amounts and out-of-range retention.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_non_negative("campaign_cost", self.campaign_cost)?;
        ensure_non_negative("avg_spend_per_patient", self.avg_spend_per_patient)?;
        ensure_percentage("retention_rate_percent", self.retention_rate_percent)?;
        ensure_non_negative("basket_size", self.basket_size)?;
        ensure_non_negative("program_cost", self.program_cost)?;
        if self.vaccine_fees.len() > 2 {
            return Err(CampaignError::invalid(format!(
                "at most two vaccine fees are supported, got {}",
                self.vaccine_fees.len()
            )));
        }
        for fee in &self.vaccine_fees {
            ensure_non_negative(&format!("vaccine fee '{}'", fee.name), fee.fee)?;
        }
        for (name, boost) in &self.add_on_boosts {
            ensure_non_negative(&format!("add-on boost '{}'", name), *boost)?;
        }
        Ok(())
    }
}

// ─── Outputs ────────────────────────────────────────────────────────────────

/// Which revenue sources a break-even figure divides the campaign cost by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum BreakEvenBasis {
    AvgSpend,
    /// A single fee, by position in the fee list.
    Fee(usize),
    AllFees,
    AllFeesWithAvgSpend,
}

/// Break-even patient count, or an explicit marker that the divisor was zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "patients", rename_all = "snake_case")]
pub enum BreakEven {
    Patients(f64),
    NotApplicable,
}

impl BreakEven {
    pub fn patients(&self) -> Option<f64> {
        match self {
            BreakEven::Patients(p) => Some(*p),
            BreakEven::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, BreakEven::Patients(_))
    }

    fn rounded(self) -> Self {
        match self {
            BreakEven::Patients(p) => BreakEven::Patients(round_to_cents(p)),
            BreakEven::NotApplicable => BreakEven::NotApplicable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenEntry {
    pub basis: BreakEvenBasis,
    pub label: String,
    pub value: BreakEven,
}

/// Break-even figures in a fixed order: avg spend, each fee, all fees,
/// all fees plus avg spend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    pub entries: Vec<BreakEvenEntry>,
}

impl BreakEvenResult {
    pub fn get(&self, basis: BreakEvenBasis) -> Option<BreakEven> {
        self.entries
            .iter()
            .find(|e| e.basis == basis)
            .map(|e| e.value)
    }

    /// The overall figure: campaign cost over average spend alone.
    pub fn overall(&self) -> Option<BreakEven> {
        self.get(BreakEvenBasis::AvgSpend)
    }

    pub fn fee(&self, index: usize) -> Option<BreakEven> {
        self.get(BreakEvenBasis::Fee(index))
    }

    pub fn all_fees(&self) -> Option<BreakEven> {
        self.get(BreakEvenBasis::AllFees)
    }

    pub fn all_fees_with_avg_spend(&self) -> Option<BreakEven> {
        self.get(BreakEvenBasis::AllFeesWithAvgSpend)
    }

    pub fn rounded(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|e| BreakEvenEntry {
                    basis: e.basis,
                    label: e.label.clone(),
                    value: e.value.rounded(),
                })
                .collect(),
        }
    }
}

/// Result of an ROI calculation at full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignResult {
    pub expected_revenue: f64,
    pub add_on_revenue: f64,
    pub total_revenue: f64,
    pub break_even: BreakEvenResult,
    pub retained_customers: f64,
    pub roi_percent: f64,
    /// Fees × patients plus program cost and basket, for earnings projections.
    pub total_earnings: f64,
}

impl CampaignResult {
    /// Copy with every figure rounded to two decimals, for display.
    pub fn rounded(&self) -> Self {
        Self {
            expected_revenue: round_to_cents(self.expected_revenue),
            add_on_revenue: round_to_cents(self.add_on_revenue),
            total_revenue: round_to_cents(self.total_revenue),
            break_even: self.break_even.rounded(),
            retained_customers: round_to_cents(self.retained_customers),
            roi_percent: round_to_cents(self.roi_percent),
            total_earnings: round_to_cents(self.total_earnings),
        }
    }
}

/// Revenue from a base vaccine plus an optional co-administered one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoAdministrationRevenue {
    pub base_vaccine: String,
    pub co_vaccine: Option<String>,
    pub people: u64,
    pub base_revenue: f64,
    pub add_on_revenue: f64,
    pub total_revenue: f64,
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Round half away from zero to two fractional digits.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn ensure_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CampaignError::invalid(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(CampaignError::invalid(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Computed figures must stay finite; valid inputs can still overflow.
pub fn ensure_finite_result(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CampaignError::invalid(format!(
            "{field} overflows: result is not a finite number"
        )))
    }
}

pub fn ensure_percentage(field: &str, value: f64) -> CalcResult<()> {
    ensure_non_negative(field, value)?;
    if value > 100.0 {
        return Err(CampaignError::invalid(format!(
            "{field} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert!((round_to_cents(1.831_501_8) - 1.83).abs() < f64::EPSILON);
        assert!((round_to_cents(2.005_1) - 2.01).abs() < f64::EPSILON);
        assert!((round_to_cents(-3.456) - (-3.46)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let mut params = CampaignParameters::new(500.0, 200, 40.0, 30.0);
        assert!(params.validate().is_ok());

        params.avg_spend_per_patient = -1.0;
        assert!(params.validate().unwrap_err().is_invalid_input());

        params.avg_spend_per_patient = f64::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_ensure_finite_result() {
        assert!((ensure_finite_result("roi_percent", 12.5).unwrap() - 12.5).abs() < f64::EPSILON);
        let err = ensure_finite_result("roi_percent", f64::INFINITY).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("roi_percent overflows"));
        assert!(ensure_finite_result("total", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_retention_range() {
        let params = CampaignParameters::new(500.0, 200, 40.0, 100.5);
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("retention_rate_percent"));
    }

    #[test]
    fn test_validate_fee_slots_and_boosts() {
        let params = CampaignParameters::new(500.0, 200, 40.0, 30.0)
            .with_fee("Influenza", 22.0)
            .with_fee("COVID-19", 25.0)
            .with_fee("RSV", 30.0);
        assert!(params.validate().is_err());

        let params = CampaignParameters::new(500.0, 200, 40.0, 30.0).with_boost("SMS", -2.0);
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("SMS"));
    }

    #[test]
    fn test_break_even_serializes_tagged() {
        let json = serde_json::to_string(&BreakEven::NotApplicable).unwrap();
        assert_eq!(json, r#"{"status":"not_applicable"}"#);
        let json = serde_json::to_string(&BreakEven::Patients(12.5)).unwrap();
        assert_eq!(json, r#"{"status":"patients","patients":12.5}"#);
    }

    #[test]
    fn test_rounded_keeps_not_applicable() {
        let result = BreakEvenResult {
            entries: vec![
                BreakEvenEntry {
                    basis: BreakEvenBasis::AvgSpend,
                    label: "Avg spend".into(),
                    value: BreakEven::Patients(12.346),
                },
                BreakEvenEntry {
                    basis: BreakEvenBasis::Fee(0),
                    label: "None".into(),
                    value: BreakEven::NotApplicable,
                },
            ],
        };
        let rounded = result.rounded();
        assert_eq!(rounded.overall(), Some(BreakEven::Patients(12.35)));
        assert_eq!(rounded.fee(0), Some(BreakEven::NotApplicable));
        assert_eq!(rounded.all_fees(), None);
    }
}
