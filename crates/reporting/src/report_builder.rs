//! Calculation reports — turn calculator output into a metric/value table
//! and export it as text, CSV or JSON.
//!
//! This is the only place figures are rounded to two decimals and formatted
//! as currency or percentages.

use campaign_core::config::ReportConfig;
use campaign_core::{
    round_to_cents, BreakEven, BreakEvenBasis, BreakEvenResult, CalcResult, CampaignResult,
    CoAdministrationRevenue,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

// ─── Types ──────────────────────────────────────────────────────────────────

/// A displayable value, already rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "snake_case")]
pub enum ReportValue {
    Currency(f64),
    Count(f64),
    Percentage(f64),
    Patients(f64),
    NotApplicable,
}

impl ReportValue {
    fn currency(value: f64) -> Self {
        ReportValue::Currency(round_to_cents(value))
    }

    fn count(value: f64) -> Self {
        ReportValue::Count(round_to_cents(value))
    }

    fn percentage(value: f64) -> Self {
        ReportValue::Percentage(round_to_cents(value))
    }

    fn break_even(value: BreakEven) -> Self {
        match value {
            BreakEven::Patients(p) => ReportValue::Patients(round_to_cents(p)),
            BreakEven::NotApplicable => ReportValue::NotApplicable,
        }
    }

    /// The numeric value, or `None` for not-applicable rows.
    pub fn number(&self) -> Option<f64> {
        match self {
            ReportValue::Currency(v)
            | ReportValue::Count(v)
            | ReportValue::Percentage(v)
            | ReportValue::Patients(v) => Some(*v),
            ReportValue::NotApplicable => None,
        }
    }

    pub fn display(&self, currency_symbol: &str) -> String {
        match self {
            ReportValue::Currency(v) if *v < 0.0 => {
                format!("-{}{}", currency_symbol, format_amount(v.abs()))
            }
            ReportValue::Currency(v) => format!("{}{}", currency_symbol, format_amount(*v)),
            ReportValue::Percentage(v) => format!("{}%", format_amount(*v)),
            ReportValue::Count(v) | ReportValue::Patients(v) => format_amount(*v),
            ReportValue::NotApplicable => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub metric: String,
    pub value: ReportValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationReport {
    pub report_id: Uuid,
    pub title: String,
    pub currency_symbol: String,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
}

// ─── Report Builder ─────────────────────────────────────────────────────────

/// Builds reports for each calculator operation.
pub struct ReportBuilder {
    currency_symbol: String,
}

impl ReportBuilder {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.currency_symbol.clone())
    }

    /// The ROI table: revenue, break-even figures, retention and ROI.
    pub fn roi(&self, result: &CampaignResult) -> CalculationReport {
        let mut rows = vec![row("Expected Revenue", ReportValue::currency(result.expected_revenue))];
        if result.add_on_revenue != 0.0 {
            rows.push(row(
                "Add-on Revenue",
                ReportValue::currency(result.add_on_revenue),
            ));
            rows.push(row(
                "Total Revenue",
                ReportValue::currency(result.total_revenue),
            ));
        }
        rows.extend(break_even_rows(&result.break_even));
        rows.push(row(
            "Retained Customers",
            ReportValue::count(result.retained_customers),
        ));
        rows.push(row("ROI (%)", ReportValue::percentage(result.roi_percent)));
        if result.total_earnings != 0.0 {
            rows.push(row(
                "Total Earnings",
                ReportValue::currency(result.total_earnings),
            ));
        }
        self.finish("Pharmacy Campaign ROI", rows)
    }

    pub fn break_even(&self, campaign_cost: f64, result: &BreakEvenResult) -> CalculationReport {
        let mut rows = vec![row("Campaign Cost", ReportValue::currency(campaign_cost))];
        rows.extend(break_even_rows(result));
        self.finish("Break-Even Analysis", rows)
    }

    pub fn earnings<S: AsRef<str>>(
        &self,
        vaccines: &[S],
        target_count: u64,
        total: f64,
    ) -> CalculationReport {
        let names: Vec<&str> = vaccines.iter().map(|v| v.as_ref()).collect();
        let rows = vec![
            row("Vaccines", ReportValue::count(names.len() as f64)),
            row("Target Patients", ReportValue::count(target_count as f64)),
            row("Total Potential Earnings", ReportValue::currency(total)),
        ];
        self.finish(&format!("Potential Earnings: {}", names.join(" + ")), rows)
    }

    pub fn coadministration(&self, revenue: &CoAdministrationRevenue) -> CalculationReport {
        let rows = vec![
            row("People", ReportValue::count(revenue.people as f64)),
            row(
                &format!("{} Revenue", revenue.base_vaccine),
                ReportValue::currency(revenue.base_revenue),
            ),
            row(
                "Revenue from Add-ons",
                ReportValue::currency(revenue.add_on_revenue),
            ),
            row("Total Revenue", ReportValue::currency(revenue.total_revenue)),
        ];
        self.finish("Vaccine Add-on Revenue", rows)
    }

    fn finish(&self, title: &str, rows: Vec<ReportRow>) -> CalculationReport {
        let report = CalculationReport {
            report_id: Uuid::new_v4(),
            title: title.to_string(),
            currency_symbol: self.currency_symbol.clone(),
            generated_at: Utc::now(),
            rows,
        };
        debug!(report_id = %report.report_id, rows = report.rows.len(), "Report built");
        report
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

fn row(metric: &str, value: ReportValue) -> ReportRow {
    ReportRow {
        metric: metric.to_string(),
        value,
    }
}

fn break_even_rows(result: &BreakEvenResult) -> Vec<ReportRow> {
    result
        .entries
        .iter()
        .map(|entry| {
            let metric = match entry.basis {
                BreakEvenBasis::AvgSpend => "Break-Even Patients Needed".to_string(),
                _ => format!("Break-Even Patients ({})", entry.label),
            };
            ReportRow {
                metric,
                value: ReportValue::break_even(entry.value),
            }
        })
        .collect()
}

// ─── Export ─────────────────────────────────────────────────────────────────

impl CalculationReport {
    pub fn get(&self, metric: &str) -> Option<ReportValue> {
        self.rows
            .iter()
            .find(|r| r.metric == metric)
            .map(|r| r.value)
    }

    /// Two-column plain-text table, also used as the email body.
    pub fn render_text(&self) -> String {
        let cells: Vec<(String, String)> = self
            .rows
            .iter()
            .map(|r| (r.metric.clone(), r.value.display(&self.currency_symbol)))
            .collect();
        let metric_width = cells
            .iter()
            .map(|(m, _)| m.chars().count())
            .max()
            .unwrap_or(0)
            .max("Metric".len());

        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.title.chars().count()));
        out.push('\n');
        out.push_str(&format!("{:<width$}  Value\n", "Metric", width = metric_width));
        for (metric, value) in &cells {
            out.push_str(&format!("{:<width$}  {}\n", metric, value, width = metric_width));
        }
        out
    }

    pub fn export_csv(&self) -> String {
        let mut csv = String::from("metric,value\n");
        for r in &self.rows {
            let value = r.value.number().map(|v| v.to_string()).unwrap_or_default();
            csv.push_str(&format!("\"{}\",{}\n", r.metric.replace('"', "\"\""), value));
        }
        csv
    }

    pub fn export_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Two decimals with thousands separators, e.g. `8,000.00`.
pub fn format_amount(value: f64) -> String {
    let rounded = round_to_cents(value);
    let formatted = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
