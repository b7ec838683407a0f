// Report error taxonomy
use thiserror::Error;

/// Every failure that aborts a render pass.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("warehouse query failed: {0}")]
    Warehouse(#[from] anyhow::Error),

    #[error("{query}: expected columns [{}], warehouse returned [{}]", .expected.join(", "), .found.join(", "))]
    SchemaMismatch {
        query: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("month code {0} is outside 1-12")]
    MonthOutOfRange(i64),

    #[error("column {column} holds an invalid value: {value}")]
    InvalidValue { column: &'static str, value: String },

    #[error("year {0} is not present in the yearly KPI data")]
    UnknownYear(i32),

    #[error("view name {0:?} is not a valid SQL identifier")]
    InvalidIdentifier(String),

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),
}

impl ReportError {
    pub fn invalid_value(column: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            column,
            value: value.into(),
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
