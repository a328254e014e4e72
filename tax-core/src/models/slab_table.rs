use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::regime::{AgeBracket, Regime};
use super::slab::Slab;

/// Errors raised when a slab table does not describe a valid progressive schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabTableError {
    #[error("{regime}/{age_bracket}: schedule has no slabs")]
    EmptySchedule {
        regime: Regime,
        age_bracket: AgeBracket,
    },

    #[error("{regime}/{age_bracket}: first slab must start at 0, starts at {min_income}")]
    FirstSlabNotZero {
        regime: Regime,
        age_bracket: AgeBracket,
        min_income: Decimal,
    },

    #[error("{regime}/{age_bracket}: slab {index} starts at {found}, expected {expected}")]
    NotContiguous {
        regime: Regime,
        age_bracket: AgeBracket,
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("{regime}/{age_bracket}: slab {index} has upper bound {max_income} not above {min_income}")]
    EmptyRange {
        regime: Regime,
        age_bracket: AgeBracket,
        index: usize,
        min_income: Decimal,
        max_income: Decimal,
    },

    #[error("{regime}/{age_bracket}: slab {index} is unbounded but is not the last slab")]
    UnboundedBeforeEnd {
        regime: Regime,
        age_bracket: AgeBracket,
        index: usize,
    },

    #[error("{regime}/{age_bracket}: top slab must be unbounded")]
    TopSlabBounded {
        regime: Regime,
        age_bracket: AgeBracket,
    },

    #[error("{regime}/{age_bracket}: slab {index} rate {rate} is outside 0..=100")]
    RateOutOfRange {
        regime: Regime,
        age_bracket: AgeBracket,
        index: usize,
        rate: Decimal,
    },
}

/// Slab schedules for one regime, one per age bracket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgeSchedules {
    pub below_60: Vec<Slab>,
    pub from_60_to_80: Vec<Slab>,
    pub above_80: Vec<Slab>,
}

impl AgeSchedules {
    pub fn get(
        &self,
        age_bracket: AgeBracket,
    ) -> &[Slab] {
        match age_bracket {
            AgeBracket::Below60 => &self.below_60,
            AgeBracket::From60To80 => &self.from_60_to_80,
            AgeBracket::Above80 => &self.above_80,
        }
    }
}

/// Progressive slabs for every (regime, age bracket) pair of one fiscal year.
///
/// A table is always complete and validated, so [`SlabTable::slabs`] never
/// fails. Replacing the law means building a whole new table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlabTable {
    fiscal_year: String,
    new_regime: AgeSchedules,
    old_regime: AgeSchedules,
}

static FY_2024_25: LazyLock<SlabTable> = LazyLock::new(|| SlabTable {
    fiscal_year: "2024-25".to_string(),
    new_regime: AgeSchedules {
        below_60: new_regime_slabs(dec!(300000)),
        from_60_to_80: new_regime_slabs(dec!(300000)),
        above_80: new_regime_slabs(dec!(500000)),
    },
    old_regime: AgeSchedules {
        below_60: vec![
            Slab::new(dec!(0), Some(dec!(250000)), dec!(0)),
            Slab::new(dec!(250000), Some(dec!(500000)), dec!(5)),
            Slab::new(dec!(500000), Some(dec!(1000000)), dec!(20)),
            Slab::new(dec!(1000000), None, dec!(30)),
        ],
        from_60_to_80: vec![
            Slab::new(dec!(0), Some(dec!(300000)), dec!(0)),
            Slab::new(dec!(300000), Some(dec!(500000)), dec!(5)),
            Slab::new(dec!(500000), Some(dec!(1000000)), dec!(20)),
            Slab::new(dec!(1000000), None, dec!(30)),
        ],
        above_80: vec![
            Slab::new(dec!(0), Some(dec!(500000)), dec!(0)),
            Slab::new(dec!(500000), Some(dec!(1000000)), dec!(20)),
            Slab::new(dec!(1000000), None, dec!(30)),
        ],
    },
});

/// New-regime schedule; only the zero-rate floor differs between age brackets.
fn new_regime_slabs(exempt_limit: Decimal) -> Vec<Slab> {
    vec![
        Slab::new(dec!(0), Some(exempt_limit), dec!(0)),
        Slab::new(exempt_limit, Some(dec!(700000)), dec!(5)),
        Slab::new(dec!(700000), Some(dec!(1000000)), dec!(10)),
        Slab::new(dec!(1000000), Some(dec!(1200000)), dec!(15)),
        Slab::new(dec!(1200000), Some(dec!(1500000)), dec!(20)),
        Slab::new(dec!(1500000), None, dec!(30)),
    ]
}

impl SlabTable {
    /// Builds a table from complete schedules, validating every schedule.
    ///
    /// # Errors
    ///
    /// Returns the first [`SlabTableError`] found, in regime then age order.
    pub fn new(
        fiscal_year: impl Into<String>,
        new_regime: AgeSchedules,
        old_regime: AgeSchedules,
    ) -> Result<Self, SlabTableError> {
        let table = Self {
            fiscal_year: fiscal_year.into(),
            new_regime,
            old_regime,
        };
        table.validate()?;
        Ok(table)
    }

    /// The built-in table for fiscal year 2024-25.
    pub fn fy_2024_25() -> &'static SlabTable {
        &FY_2024_25
    }

    pub fn fiscal_year(&self) -> &str {
        &self.fiscal_year
    }

    /// Ordered slabs for the given regime and age bracket.
    pub fn slabs(
        &self,
        regime: Regime,
        age_bracket: AgeBracket,
    ) -> &[Slab] {
        match regime {
            Regime::New => self.new_regime.get(age_bracket),
            Regime::Old => self.old_regime.get(age_bracket),
        }
    }

    /// Every schedule in the table, in regime then age order.
    pub fn schedules(&self) -> impl Iterator<Item = (Regime, AgeBracket, &[Slab])> + '_ {
        Regime::ALL.into_iter().flat_map(move |regime| {
            AgeBracket::ALL
                .into_iter()
                .map(move |age| (regime, age, self.slabs(regime, age)))
        })
    }

    fn validate(&self) -> Result<(), SlabTableError> {
        for (regime, age_bracket, slabs) in self.schedules() {
            validate_schedule(regime, age_bracket, slabs)?;
        }
        Ok(())
    }
}

fn validate_schedule(
    regime: Regime,
    age_bracket: AgeBracket,
    slabs: &[Slab],
) -> Result<(), SlabTableError> {
    let first = slabs.first().ok_or(SlabTableError::EmptySchedule {
        regime,
        age_bracket,
    })?;
    if first.min_income != Decimal::ZERO {
        return Err(SlabTableError::FirstSlabNotZero {
            regime,
            age_bracket,
            min_income: first.min_income,
        });
    }

    let last_index = slabs.len() - 1;
    let mut expected_min = Decimal::ZERO;

    for (index, slab) in slabs.iter().enumerate() {
        if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE_HUNDRED {
            return Err(SlabTableError::RateOutOfRange {
                regime,
                age_bracket,
                index,
                rate: slab.rate,
            });
        }
        if slab.min_income != expected_min {
            return Err(SlabTableError::NotContiguous {
                regime,
                age_bracket,
                index,
                expected: expected_min,
                found: slab.min_income,
            });
        }
        match slab.max_income {
            Some(max_income) if max_income <= slab.min_income => {
                return Err(SlabTableError::EmptyRange {
                    regime,
                    age_bracket,
                    index,
                    min_income: slab.min_income,
                    max_income,
                });
            }
            Some(max_income) => expected_min = max_income,
            None if index != last_index => {
                return Err(SlabTableError::UnboundedBeforeEnd {
                    regime,
                    age_bracket,
                    index,
                });
            }
            None => {}
        }
    }

    if !slabs[last_index].is_unbounded() {
        return Err(SlabTableError::TopSlabBounded {
            regime,
            age_bracket,
        });
    }
    Ok(())
}
