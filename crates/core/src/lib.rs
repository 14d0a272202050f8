//! Shared types, error taxonomy, price tables and configuration for the
//! pharmacy campaign calculator.

pub mod config;
pub mod error;
pub mod pricing;
pub mod types;

pub use config::AppConfig;
pub use error::{CalcResult, CampaignError};
pub use pricing::PriceTable;
pub use types::{
    round_to_cents, BreakEven, BreakEvenBasis, BreakEvenEntry, BreakEvenResult,
    CampaignParameters, CampaignResult, CoAdministrationRevenue, VaccineFee,
};
