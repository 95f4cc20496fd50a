use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy shared by ingestion and analysis
// ---------------------------------------------------------------------------

/// Which half of the column classification an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Continuous,
    Categorical,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Continuous => write!(f, "continuous"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Every failure here is local: the session survives and the user can
/// re-select input.
#[derive(Debug, Error, PartialEq)]
pub enum EdaError {
    /// The upload could not be decoded into a dataset.
    #[error("failed to parse dataset: {0}")]
    Parse(String),

    /// The dataset has no column of the requested kind.
    #[error("dataset has no {kind} columns")]
    EmptySelection { kind: ColumnKind },

    /// A requested column is unknown or belongs to the wrong set.
    #[error("invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// Writing an exported report failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl EdaError {
    pub fn unknown_column(column: &str) -> Self {
        EdaError::InvalidColumn {
            column: column.to_string(),
            reason: "no such column in the dataset".to_string(),
        }
    }

    pub fn wrong_kind(column: &str, expected: ColumnKind) -> Self {
        EdaError::InvalidColumn {
            column: column.to_string(),
            reason: format!("not a {expected} column"),
        }
    }
}

pub type EdaResult<T> = Result<T, EdaError>;
