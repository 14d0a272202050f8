//! Vaccine price table injected into the calculator at call time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CalcResult, CampaignError};
use crate::types::ensure_non_negative;

/// Name → per-dose price. Lookups try an exact match first, then ignore case.
///
/// Deserializes from a plain `{name: price}` map through
/// [`from_prices`](Self::from_prices), so negative prices never get in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct PriceTable {
    prices: BTreeMap<String, f64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self {
            prices: BTreeMap::new(),
        }
    }

    /// Build a table, rejecting negative or non-finite prices.
    pub fn from_prices<I, S>(prices: I) -> CalcResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, price) in prices {
            table.insert(name, price)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, name: impl Into<String>, price: f64) -> CalcResult<()> {
        let name = name.into();
        ensure_non_negative(&format!("price of '{name}'"), price)?;
        self.prices.insert(name, price);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        if let Some(price) = self.prices.get(name) {
            return Some(*price);
        }
        self.prices
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    /// Like [`get`](Self::get) but an unknown vaccine is an input error.
    pub fn price_of(&self, name: &str) -> CalcResult<f64> {
        self.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.names().collect();
            CampaignError::invalid(format!(
                "unknown vaccine '{name}' (known: {})",
                known.join(", ")
            ))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prices.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.prices.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// AUD prices used by the pharmacy add-on calculator.
impl Default for PriceTable {
    fn default() -> Self {
        let prices = [
            ("Influenza", 25.0),
            ("COVID-19", 0.0),
            ("DTPa (Diphtheria, Tetanus, Pertussis)", 43.0),
            ("Pneumococcal", 120.0),
            ("RSV", 350.0),
        ];
        Self {
            prices: prices
                .into_iter()
                .map(|(name, price)| (name.to_string(), price))
                .collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, f64>> for PriceTable {
    type Error = CampaignError;

    fn try_from(prices: BTreeMap<String, f64>) -> CalcResult<Self> {
        Self::from_prices(prices)
    }
}

impl From<PriceTable> for BTreeMap<String, f64> {
    fn from(table: PriceTable) -> Self {
        table.prices
    }
}
