use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{AgeBracket, AgeSchedules, Regime, Slab, SlabTable, SlabTableError};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading slab table data.
#[derive(Debug, Error)]
pub enum SlabTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown regime '{value}' on row {row}")]
    InvalidRegime { value: String, row: usize },

    #[error("unknown age bracket '{value}' on row {row}")]
    InvalidAgeBracket { value: String, row: usize },

    #[error("row {row} is for fiscal year '{found}', expected '{expected}' (a file holds exactly one year)")]
    MixedFiscalYears {
        expected: String,
        found: String,
        row: usize,
    },

    #[error("no slab records found")]
    Empty,

    #[error("no slabs for {regime}/{age_bracket}; every regime and age bracket must be present")]
    MissingSchedule {
        regime: Regime,
        age_bracket: AgeBracket,
    },

    #[error("invalid slab table: {0}")]
    InvalidTable(#[from] SlabTableError),
}

impl From<csv::Error> for SlabTableLoaderError {
    fn from(err: csv::Error) -> Self {
        SlabTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a slab table CSV file.
///
/// - `fiscal_year`: The fiscal year label (e.g., 2024-25)
/// - `regime`: `new` or `old`
/// - `age_bracket`: `below60`, `60to80` or `above80`
/// - `min_income`: The lower edge of the slab
/// - `max_income`: The upper edge of the slab (empty for unbounded)
/// - `rate`: The slab rate as a percentage (e.g., 5 for 5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SlabRecord {
    pub fiscal_year: String,
    pub regime: String,
    pub age_bracket: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

type Groups = HashMap<(Regime, AgeBracket), Vec<Slab>>;

fn take_schedules(
    groups: &mut Groups,
    regime: Regime,
) -> Result<AgeSchedules, SlabTableLoaderError> {
    let mut take = |age_bracket: AgeBracket| {
        let mut slabs = groups
            .remove(&(regime, age_bracket))
            .ok_or(SlabTableLoaderError::MissingSchedule {
                regime,
                age_bracket,
            })?;
        slabs.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        Ok::<_, SlabTableLoaderError>(slabs)
    };

    Ok(AgeSchedules {
        below_60: take(AgeBracket::Below60)?,
        from_60_to_80: take(AgeBracket::From60To80)?,
        above_80: take(AgeBracket::Above80)?,
    })
}

/// Loader for complete slab tables from CSV files.
///
/// A file replaces the whole table: it must hold exactly one fiscal year and
/// a schedule for every (regime, age bracket) pair.
pub struct SlabTableLoader;

impl SlabTableLoader {
    /// Parse slab records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SlabRecord>, SlabTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: SlabRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build a validated [`SlabTable`] from parsed records.
    ///
    /// Records are grouped by (regime, age bracket) and sorted by
    /// `min_income` within each group, so file order does not matter.
    pub fn build(records: &[SlabRecord]) -> Result<SlabTable, SlabTableLoaderError> {
        let first = records.first().ok_or(SlabTableLoaderError::Empty)?;
        let fiscal_year = first.fiscal_year.clone();

        let mut groups = Groups::new();

        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;

            if record.fiscal_year != fiscal_year {
                return Err(SlabTableLoaderError::MixedFiscalYears {
                    expected: fiscal_year,
                    found: record.fiscal_year.clone(),
                    row,
                });
            }
            let regime = Regime::parse(&record.regime).ok_or_else(|| {
                SlabTableLoaderError::InvalidRegime {
                    value: record.regime.clone(),
                    row,
                }
            })?;
            let age_bracket = AgeBracket::parse(&record.age_bracket).ok_or_else(|| {
                SlabTableLoaderError::InvalidAgeBracket {
                    value: record.age_bracket.clone(),
                    row,
                }
            })?;

            groups
                .entry((regime, age_bracket))
                .or_default()
                .push(Slab::new(record.min_income, record.max_income, record.rate));
        }

        let new_regime = take_schedules(&mut groups, Regime::New)?;
        let old_regime = take_schedules(&mut groups, Regime::Old)?;

        let table = SlabTable::new(fiscal_year, new_regime, old_regime)?;
        debug!(
            fiscal_year = table.fiscal_year(),
            records = records.len(),
            "slab table built"
        );
        Ok(table)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<SlabTable, SlabTableLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }

    /// Convenience wrapper: open a file and delegate to [`SlabTableLoader::load`].
    pub fn load_from_path(path: &Path) -> Result<SlabTable, SlabTableLoaderError> {
        let file = File::open(path).map_err(|source| SlabTableLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load(file)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "fiscal_year,regime,age_bracket,min_income,max_income,rate";

    /// One flat two-slab schedule for every combination.
    fn flat_csv() -> String {
        let mut csv = format!("{HEADER}\n");
        for regime in ["new", "old"] {
            for age in ["below60", "60to80", "above80"] {
                csv.push_str(&format!("2025-26,{regime},{age},0,400000,0\n"));
                csv.push_str(&format!("2025-26,{regime},{age},400000,,10\n"));
            }
        }
        csv
    }

    // =========================================================================
    // parse tests
    // =========================================================================

    #[test]
    fn test_parse_csv_single_slab() {
        let csv = format!("{HEADER}\n2024-25,new,below60,300000,700000,5");

        let records = SlabTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![SlabRecord {
                fiscal_year: "2024-25".to_string(),
                regime: "new".to_string(),
                age_bracket: "below60".to_string(),
                min_income: dec!(300000),
                max_income: Some(dec!(700000)),
                rate: dec!(5),
            }]
        );
    }

    #[test]
    fn test_parse_csv_unbounded_max_income() {
        let csv = format!("{HEADER}\n2024-25,old,above80,1000000,,30");

        let records = SlabTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].max_income, None);
        assert_eq!(records[0].rate, dec!(30));
    }

    #[test]
    fn test_parse_csv_tolerates_whitespace() {
        let csv = format!("{HEADER}\n 2024-25 , new , below60 , 0 , 300000 , 0 ");

        let records = SlabTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].regime, "new");
        assert_eq!(records[0].max_income, Some(dec!(300000)));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "fiscal_year,regime,age_bracket\n2024-25,new,below60";

        let err = SlabTableLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");

        let SlabTableLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "got: {}", msg);
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = format!("{HEADER}\n2024-25,new,below60,abc,300000,0");

        let result = SlabTableLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(SlabTableLoaderError::CsvParse(_))));
    }

    // =========================================================================
    // build tests
    // =========================================================================

    #[test]
    fn test_build_complete_table() {
        let table = SlabTableLoader::load(flat_csv().as_bytes()).expect("Failed to build table");

        assert_eq!(table.fiscal_year(), "2025-26");
        assert_eq!(
            table.slabs(Regime::Old, AgeBracket::From60To80),
            &[
                Slab::new(dec!(0), Some(dec!(400000)), dec!(0)),
                Slab::new(dec!(400000), None, dec!(10)),
            ]
        );
    }

    #[test]
    fn test_build_sorts_each_schedule() {
        let csv = flat_csv();
        let mut lines: Vec<&str> = csv.lines().collect();
        lines[1..].reverse();
        let reversed = lines.join("\n");

        let table = SlabTableLoader::load(reversed.as_bytes()).expect("Failed to build table");

        assert_eq!(table.slabs(Regime::New, AgeBracket::Below60)[0].min_income, dec!(0));
    }

    #[test]
    fn test_build_empty_file() {
        let result = SlabTableLoader::load(format!("{HEADER}\n").as_bytes());

        assert!(matches!(result, Err(SlabTableLoaderError::Empty)));
    }

    #[test]
    fn test_build_rejects_unknown_regime() {
        let csv = flat_csv().replacen("2025-26,old,60to80", "2025-26,flat,60to80", 1);

        let result = SlabTableLoader::load(csv.as_bytes());

        match result {
            Err(SlabTableLoaderError::InvalidRegime { value, row }) => {
                assert_eq!(value, "flat");
                assert_eq!(row, 9);
            }
            other => panic!("expected InvalidRegime, got {other:?}"),
        }
    }

    #[test]
    fn test_build_rejects_unknown_age_bracket() {
        let csv = flat_csv().replacen("above80", "over90", 1);

        let result = SlabTableLoader::load(csv.as_bytes());

        assert!(matches!(
            result,
            Err(SlabTableLoaderError::InvalidAgeBracket { ref value, row: 5 }) if value == "over90"
        ));
    }

    #[test]
    fn test_build_rejects_mixed_fiscal_years() {
        let mut csv = flat_csv();
        csv.push_str("2024-25,new,below60,0,1,0\n");

        let result = SlabTableLoader::load(csv.as_bytes());

        assert!(matches!(
            result,
            Err(SlabTableLoaderError::MixedFiscalYears { row: 13, .. })
        ));
    }

    #[test]
    fn test_build_rejects_missing_schedule() {
        let csv: String = flat_csv()
            .lines()
            .filter(|line| !line.contains(",old,above80,"))
            .map(|line| format!("{line}\n"))
            .collect();

        let result = SlabTableLoader::load(csv.as_bytes());

        assert!(matches!(
            result,
            Err(SlabTableLoaderError::MissingSchedule {
                regime: Regime::Old,
                age_bracket: AgeBracket::Above80,
            })
        ));
    }

    #[test]
    fn test_build_rejects_gap_in_schedule() {
        let csv = flat_csv().replacen("2025-26,new,below60,400000,,10", "2025-26,new,below60,450000,,10", 1);

        let result = SlabTableLoader::load(csv.as_bytes());

        assert!(matches!(
            result,
            Err(SlabTableLoaderError::InvalidTable(SlabTableError::NotContiguous { .. }))
        ));
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = SlabTableLoader::load_from_path(Path::new("/this/path/does/not/exist.csv"));

        assert!(matches!(result, Err(SlabTableLoaderError::Io { .. })));
    }
}
