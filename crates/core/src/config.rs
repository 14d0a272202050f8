use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::CalcResult;
use crate::pricing::PriceTable;
use crate::types::{ensure_non_negative, ensure_percentage};

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `CAMPAIGN_CALC__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: CalculatorDefaults,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Form values used when the caller does not supply one.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorDefaults {
    #[serde(default = "default_campaign_cost")]
    pub campaign_cost: f64,
    #[serde(default = "default_expected_patients")]
    pub expected_patients: u64,
    #[serde(default = "default_avg_spend")]
    pub avg_spend_per_patient: f64,
    #[serde(default = "default_retention_rate")]
    pub retention_rate_percent: f64,
    #[serde(default = "default_coadmin_fee")]
    pub coadmin_fee: f64,
    #[serde(default)]
    pub basket_size: f64,
    #[serde(default)]
    pub program_cost: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_vaccine_prices")]
    pub vaccine_prices: BTreeMap<String, f64>,
    #[serde(default)]
    pub add_on_boosts: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub recipient: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

// Default functions
fn default_campaign_cost() -> f64 {
    500.0
}
fn default_expected_patients() -> u64 {
    200
}
fn default_avg_spend() -> f64 {
    40.0
}
fn default_retention_rate() -> f64 {
    30.0
}
fn default_coadmin_fee() -> f64 {
    20.0
}
fn default_vaccine_prices() -> BTreeMap<String, f64> {
    PriceTable::default().into()
}
fn default_subject() -> String {
    "Pharmacy Campaign ROI Results".to_string()
}
fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        Self {
            campaign_cost: default_campaign_cost(),
            expected_patients: default_expected_patients(),
            avg_spend_per_patient: default_avg_spend(),
            retention_rate_percent: default_retention_rate(),
            coadmin_fee: default_coadmin_fee(),
            basket_size: 0.0,
            program_cost: 0.0,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            vaccine_prices: default_vaccine_prices(),
            add_on_boosts: BTreeMap::new(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            recipient: String::new(),
            subject: default_subject(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables only.
    pub fn load() -> CalcResult<Self> {
        Self::load_from(None::<&Path>)
    }

    /// Load configuration from an optional TOML file, overridden by
    /// environment variables.
    pub fn load_from<P: AsRef<Path>>(path: Option<P>) -> CalcResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()).required(true));
        }

        let builder = builder.add_source(
            config::Environment::with_prefix("CAMPAIGN_CALC")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        tracing::debug!(
            vaccines = config.pricing.vaccine_prices.len(),
            add_ons = config.pricing.add_on_boosts.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reject configured defaults and prices the calculator would refuse.
    pub fn validate(&self) -> CalcResult<()> {
        let d = &self.defaults;
        ensure_non_negative("defaults.campaign_cost", d.campaign_cost)?;
        ensure_non_negative("defaults.avg_spend_per_patient", d.avg_spend_per_patient)?;
        ensure_percentage("defaults.retention_rate_percent", d.retention_rate_percent)?;
        ensure_non_negative("defaults.coadmin_fee", d.coadmin_fee)?;
        ensure_non_negative("defaults.basket_size", d.basket_size)?;
        ensure_non_negative("defaults.program_cost", d.program_cost)?;
        for (name, boost) in &self.pricing.add_on_boosts {
            ensure_non_negative(&format!("pricing.add_on_boosts.{name}"), *boost)?;
        }
        self.price_table().map(|_| ())
    }

    /// The configured vaccine prices as a validated table.
    pub fn price_table(&self) -> CalcResult<PriceTable> {
        PriceTable::from_prices(
            self.pricing
                .vaccine_prices
                .iter()
                .map(|(name, price)| (name.clone(), *price)),
        )
    }
}
