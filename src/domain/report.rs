// Report page model
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::{ReportError, ReportResult};
use super::revenue::{DayTypeRevenueRow, MonthlyKpiRow};

/// The five report sections in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    AllYearsKpis,
    YearScorecard,
    MonthlyTrend,
    DayTypeSplit,
    TopRestaurants,
}

impl Section {
    pub const ORDER: [Section; 5] = [
        Section::AllYearsKpis,
        Section::YearScorecard,
        Section::MonthlyTrend,
        Section::DayTypeSplit,
        Section::TopRestaurants,
    ];

    /// Sections that must be recomputed when the year selection changes.
    pub fn is_year_scoped(self) -> bool {
        matches!(self, Section::YearScorecard | Section::MonthlyTrend)
    }

    pub fn anchor(self) -> &'static str {
        match self {
            Section::AllYearsKpis => "all-years",
            Section::YearScorecard => "year-scorecard",
            Section::MonthlyTrend => "monthly-trend",
            Section::DayTypeSplit => "day-type-split",
            Section::TopRestaurants => "top-restaurants",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeltaDirection {
    Up,
    Down,
    Flat,
}

impl DeltaDirection {
    pub fn of(value: Decimal) -> Self {
        if value.is_sign_positive() && !value.is_zero() {
            DeltaDirection::Up
        } else if value.is_sign_negative() && !value.is_zero() {
            DeltaDirection::Down
        } else {
            DeltaDirection::Flat
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delta {
    pub text: String,
    pub direction: DeltaDirection,
}

/// A summary-metric widget: label, formatted value, optional delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub delta: Option<Delta>,
}

impl Metric {
    pub fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
            delta: None,
        }
    }

    pub fn with_delta(mut self, delta: Option<Delta>) -> Self {
        self.delta = delta;
        self
    }
}

/// The year selector: distinct years ascending, selection always a member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSelector {
    years: Vec<i32>,
    selected: Option<i32>,
}

impl YearSelector {
    /// Builds the selector from the years present in the yearly KPI data.
    /// `requested` defaults to the latest year and must be one of `years`.
    pub fn new(years: impl IntoIterator<Item = i32>, requested: Option<i32>) -> ReportResult<Self> {
        let mut years: Vec<i32> = years.into_iter().collect();
        years.sort_unstable();
        years.dedup();

        let selected = match requested {
            Some(year) if years.binary_search(&year).is_ok() => Some(year),
            Some(year) => return Err(ReportError::UnknownYear(year)),
            None => years.last().copied(),
        };

        Ok(Self { years, selected })
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn selected(&self) -> Option<i32> {
        self.selected
    }
}

/// Background for a table row, keyed only by its display position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Shaded,
    Plain,
}

impl Shade {
    pub fn for_position(index: usize) -> Self {
        if index % 2 == 0 { Shade::Shaded } else { Shade::Plain }
    }

    pub fn background(self) -> &'static str {
        match self {
            Shade::Shaded => "#f2f2f2",
            Shade::Plain => "white",
        }
    }
}

/// Headers plus display strings, shared by the HTML table and the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl LabeledTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows paired with their shading, derived from the current order.
    pub fn shaded_rows(&self) -> impl Iterator<Item = (Shade, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| (Shade::for_position(index), row.as_slice()))
    }
}

#[derive(Debug, Clone)]
pub struct AllYearsSection {
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone)]
pub struct YearDetail {
    pub year: i32,
    pub scorecard: Vec<Metric>,
    /// Sorted by month, January first.
    pub monthly: Vec<MonthlyKpiRow>,
}

#[derive(Debug, Clone)]
pub struct YearSections {
    pub selector: YearSelector,
    /// `None` only when the warehouse has no yearly data at all.
    pub detail: Option<YearDetail>,
}

#[derive(Debug, Clone)]
pub struct DayTypeSection {
    pub rows: Vec<DayTypeRevenueRow>,
}

#[derive(Debug, Clone)]
pub struct TopRestaurantsSection {
    pub table: LabeledTable,
    pub csv: String,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub all_years: AllYearsSection,
    pub year: YearSections,
    pub day_types: DayTypeSection,
    pub top_restaurants: TopRestaurantsSection,
}
