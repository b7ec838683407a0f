// Revenue domain models, one struct per warehouse view shape
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use super::error::ReportError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyKpiRow {
    pub year: i32,
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub avg_revenue_per_order: Decimal,
    pub avg_revenue_per_item: Decimal,
    pub max_order_value: Decimal,
    /// Missing for the first year on record.
    pub revenue_growth_pct: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyKpiRow {
    pub month: Month,
    pub total_revenue: Decimal,
}

/// Top-10 shape from the monthly-by-restaurant view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantMonthlyRevenueRow {
    pub restaurant_name: String,
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub avg_revenue_per_order: Decimal,
    pub avg_revenue_per_item: Decimal,
    pub max_order_value: Decimal,
}

/// Top-5 shape from the all-time restaurant view. Narrower than
/// [`RestaurantMonthlyRevenueRow`] and kept separate on purpose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRestaurantRow {
    pub restaurant_name: String,
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub avg_revenue_per_order: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTypeRevenueRow {
    pub day_type: DayType,
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub avg_revenue_per_order: Decimal,
    pub avg_revenue_per_item: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn label(self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

impl FromStr for DayType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekday" => Ok(DayType::Weekday),
            "weekend" => Ok(DayType::Weekend),
            _ => Err(ReportError::invalid_value("DAY_TYPE", s)),
        }
    }
}

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar month, guaranteed to be in 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "&'static str")]
pub struct Month(u8);

impl Month {
    pub fn from_code(code: i64) -> Result<Self, ReportError> {
        match code {
            1..=12 => Ok(Month(code as u8)),
            other => Err(ReportError::MonthOutOfRange(other)),
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        MONTH_LABELS[usize::from(self.0 - 1)]
    }

    /// Labels in calendar order, used as the explicit chart axis sort.
    pub fn all_labels() -> &'static [&'static str; 12] {
        &MONTH_LABELS
    }
}

impl From<Month> for &'static str {
    fn from(month: Month) -> Self {
        month.label()
    }
}
