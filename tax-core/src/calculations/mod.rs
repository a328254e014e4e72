//! Tax calculations for the new and old regimes.
//!
//! The [`TaxEngine`] applies the [`DeductionPolicy`] and a slab table to one
//! regime; [`TaxEngine::compare`] runs both regimes and recommends one.

pub mod common;
pub mod comparison;
pub mod deduction;
pub mod engine;

pub use comparison::{RegimeComparison, RegimeSummary, Recommendation, compare_results};
pub use deduction::DeductionPolicy;
pub use engine::{TaxEngine, TaxInput};
