pub mod calculations;
pub mod models;

pub use calculations::{RegimeComparison, Recommendation, TaxEngine, TaxInput};
pub use models::*;
