//! Campaign economics calculator — revenue, break-even patient counts, ROI
//! and earnings projections for pharmacy vaccination campaigns.
//!
//! Every function is pure: identical inputs give bit-identical outputs and
//! nothing outlives a call.

pub mod break_even;
pub mod earnings;
pub mod roi;

pub use break_even::{break_even_for, compute_break_even};
pub use earnings::{compute_coadministration_revenue, compute_potential_earnings};
pub use roi::compute_roi;
