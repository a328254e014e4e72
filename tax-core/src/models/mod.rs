mod deduction_inputs;
mod regime;
mod slab;
mod slab_table;
mod tax_result;
mod tax_year_config;

pub use deduction_inputs::DeductionInputs;
pub use regime::{AgeBracket, ParseAgeBracketError, ParseRegimeError, Regime};
pub use slab::Slab;
pub use slab_table::{AgeSchedules, SlabTable, SlabTableError};
pub use tax_result::{TaxBreakdownEntry, TaxComputationResult};
pub use tax_year_config::TaxYearConfig;
