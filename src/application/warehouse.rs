// Warehouse capability and the row sets it returns
use crate::domain::error::{ReportError, ReportResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Fixed(i64),
}

/// Read-only SQL text plus its positional bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Short name used in logs and schema errors.
    pub name: &'static str,
    pub sql: String,
    pub bindings: Vec<BindValue>,
}

impl Statement {
    pub fn new(name: &'static str, sql: String) -> Self {
        Self {
            name,
            sql,
            bindings: Vec::new(),
        }
    }

    pub fn bind(mut self, value: BindValue) -> Self {
        self.bindings.push(value);
        self
    }
}

/// Fully materialized result of one statement. Cells arrive as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Execute a statement and return every row.
    async fn execute(&self, statement: &Statement) -> anyhow::Result<RowSet>;
}

/// A typed row with a declared column schema.
pub trait FromRow: Sized {
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> ReportResult<Self>;
}

impl RowSet {
    /// Check the declared schema, then decode every row.
    pub fn decode<T: FromRow>(&self, query: &'static str) -> ReportResult<Vec<T>> {
        self.conform(query, T::COLUMNS)?;
        self.rows
            .iter()
            .map(|cells| {
                if cells.len() != T::COLUMNS.len() {
                    return Err(self.mismatch(query, T::COLUMNS));
                }
                T::from_row(&Row {
                    columns: T::COLUMNS,
                    cells,
                })
            })
            .collect()
    }

    fn conform(&self, query: &'static str, expected: &[&str]) -> ReportResult<()> {
        let matches = self.columns.len() == expected.len()
            && self
                .columns
                .iter()
                .zip(expected)
                .all(|(found, want)| found.eq_ignore_ascii_case(want));

        if matches {
            Ok(())
        } else {
            Err(self.mismatch(query, expected))
        }
    }

    fn mismatch(&self, query: &'static str, expected: &[&str]) -> ReportError {
        ReportError::SchemaMismatch {
            query,
            expected: expected.iter().map(|c| c.to_string()).collect(),
            found: self.columns.clone(),
        }
    }
}

/// Positional view over one row, already checked against a schema.
pub struct Row<'a> {
    columns: &'static [&'static str],
    cells: &'a [Option<String>],
}

impl<'a> Row<'a> {
    pub fn opt_text(&self, index: usize) -> Option<&'a str> {
        self.cells[index].as_deref()
    }

    pub fn text(&self, index: usize) -> ReportResult<&'a str> {
        self.opt_text(index)
            .ok_or_else(|| ReportError::invalid_value(self.columns[index], "NULL"))
    }

    pub fn int(&self, index: usize) -> ReportResult<i64> {
        let raw = self.text(index)?;
        // NUMBER(38,0) columns may still come back as "12.0" through some views.
        raw.parse::<i64>()
            .ok()
            .or_else(|| {
                parse_decimal(raw)
                    .filter(|d| d.fract().is_zero())
                    .and_then(|d| i64::try_from(d).ok())
            })
            .ok_or_else(|| ReportError::invalid_value(self.columns[index], raw))
    }

    pub fn decimal(&self, index: usize) -> ReportResult<Decimal> {
        let raw = self.text(index)?;
        parse_decimal(raw).ok_or_else(|| ReportError::invalid_value(self.columns[index], raw))
    }

    pub fn opt_decimal(&self, index: usize) -> ReportResult<Option<Decimal>> {
        match self.opt_text(index) {
            None => Ok(None),
            Some(raw) if raw.eq_ignore_ascii_case("nan") => Ok(None),
            Some(raw) => parse_decimal(raw)
                .map(Some)
                .ok_or_else(|| ReportError::invalid_value(self.columns[index], raw)),
        }
    }
}

/// Fixed-point text ("1234.50") or float text ("1.2345e+03").
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
