//! Citation style selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Supported bibliographic styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationFormat {
    Apa,
    Mla,
    Ieee,
    Harvard,
    Chicago,
}

impl CitationFormat {
    pub const ALL: [CitationFormat; 5] = [
        CitationFormat::Apa,
        CitationFormat::Mla,
        CitationFormat::Ieee,
        CitationFormat::Harvard,
        CitationFormat::Chicago,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CitationFormat::Apa => "apa",
            CitationFormat::Mla => "mla",
            CitationFormat::Ieee => "ieee",
            CitationFormat::Harvard => "harvard",
            CitationFormat::Chicago => "chicago",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CitationFormat::Apa => "APA",
            CitationFormat::Mla => "MLA",
            CitationFormat::Ieee => "IEEE",
            CitationFormat::Harvard => "Harvard",
            CitationFormat::Chicago => "Chicago",
        }
    }
}

impl FromStr for CitationFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("unknown citation format '{s}'")))
    }
}

impl fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
