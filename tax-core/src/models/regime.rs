use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two complete tax-law variants a taxpayer can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Lower rates, a fixed standard deduction and no itemized deductions.
    #[default]
    New,
    /// Higher rates with itemized deductions (80C, 80D, HRA, ...).
    Old,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::New, Regime::Old];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Old => "old",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New Regime",
            Self::Old => "Old Regime",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(Self::New),
            "old" => Some(Self::Old),
            _ => None,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown regime '{0}' (expected 'new' or 'old')")]
pub struct ParseRegimeError(pub String);

impl FromStr for Regime {
    type Err = ParseRegimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseRegimeError(s.to_string()))
    }
}

/// Senior-citizen classification. Older brackets get a higher zero-rate floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgeBracket {
    #[default]
    #[serde(rename = "below60")]
    Below60,
    #[serde(rename = "60to80")]
    From60To80,
    #[serde(rename = "above80")]
    Above80,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 3] = [
        AgeBracket::Below60,
        AgeBracket::From60To80,
        AgeBracket::Above80,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Below60 => "below60",
            Self::From60To80 => "60to80",
            Self::Above80 => "above80",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Below60 => "Below 60 years",
            Self::From60To80 => "60 to 80 years",
            Self::Above80 => "Above 80 years",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "below60" => Some(Self::Below60),
            "60to80" => Some(Self::From60To80),
            "above80" => Some(Self::Above80),
            _ => None,
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown age bracket '{0}' (expected 'below60', '60to80' or 'above80')")]
pub struct ParseAgeBracketError(pub String);

impl FromStr for AgeBracket {
    type Err = ParseAgeBracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseAgeBracketError(s.to_string()))
    }
}
