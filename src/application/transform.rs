// Transform layer - Typed rows, labels and display formatting
use crate::application::warehouse::{FromRow, Row};
use crate::domain::error::{ReportError, ReportResult};
use crate::domain::report::{Delta, DeltaDirection, LabeledTable, Metric};
use crate::domain::revenue::{
    DayTypeRevenueRow, Month, MonthlyKpiRow, RestaurantMonthlyRevenueRow, TopRestaurantRow,
    YearlyKpiRow,
};
use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY_SYMBOL: &str = "₹";

impl FromRow for YearlyKpiRow {
    const COLUMNS: &'static [&'static str] = &[
        "YEAR",
        "TOTAL_REVENUE",
        "TOTAL_ORDERS",
        "AVG_REVENUE_PER_ORDER",
        "AVG_REVENUE_PER_ITEM",
        "MAX_ORDER_VALUE",
        "REVENUE_GROWTH_PCT",
    ];

    fn from_row(row: &Row<'_>) -> ReportResult<Self> {
        let year = row.int(0)?;
        Ok(Self {
            year: i32::try_from(year)
                .map_err(|_| ReportError::invalid_value("YEAR", year.to_string()))?,
            total_revenue: row.decimal(1)?,
            total_orders: row.int(2)?,
            avg_revenue_per_order: row.decimal(3)?,
            avg_revenue_per_item: row.decimal(4)?,
            max_order_value: row.decimal(5)?,
            revenue_growth_pct: row.opt_decimal(6)?,
        })
    }
}

impl FromRow for MonthlyKpiRow {
    const COLUMNS: &'static [&'static str] = &["MONTH", "TOTAL_REVENUE"];

    fn from_row(row: &Row<'_>) -> ReportResult<Self> {
        Ok(Self {
            month: Month::from_code(row.int(0)?)?,
            total_revenue: row.decimal(1)?,
        })
    }
}

impl FromRow for RestaurantMonthlyRevenueRow {
    const COLUMNS: &'static [&'static str] = &[
        "RESTAURANT_NAME",
        "TOTAL_REVENUE",
        "TOTAL_ORDERS",
        "AVG_REVENUE_PER_ORDER",
        "AVG_REVENUE_PER_ITEM",
        "MAX_ORDER_VALUE",
    ];

    fn from_row(row: &Row<'_>) -> ReportResult<Self> {
        Ok(Self {
            restaurant_name: row.text(0)?.to_string(),
            total_revenue: row.decimal(1)?,
            total_orders: row.int(2)?,
            avg_revenue_per_order: row.decimal(3)?,
            avg_revenue_per_item: row.decimal(4)?,
            max_order_value: row.decimal(5)?,
        })
    }
}

impl FromRow for TopRestaurantRow {
    const COLUMNS: &'static [&'static str] = &[
        "RESTAURANT_NAME",
        "TOTAL_REVENUE",
        "TOTAL_ORDERS",
        "AVG_REVENUE_PER_ORDER",
    ];

    fn from_row(row: &Row<'_>) -> ReportResult<Self> {
        Ok(Self {
            restaurant_name: row.text(0)?.to_string(),
            total_revenue: row.decimal(1)?,
            total_orders: row.int(2)?,
            avg_revenue_per_order: row.decimal(3)?,
        })
    }
}

impl FromRow for DayTypeRevenueRow {
    const COLUMNS: &'static [&'static str] = &[
        "DAY_TYPE",
        "TOTAL_REVENUE",
        "TOTAL_ORDERS",
        "AVG_REVENUE_PER_ORDER",
        "AVG_REVENUE_PER_ITEM",
    ];

    fn from_row(row: &Row<'_>) -> ReportResult<Self> {
        Ok(Self {
            day_type: row.text(0)?.parse()?,
            total_revenue: row.decimal(1)?,
            total_orders: row.int(2)?,
            avg_revenue_per_order: row.decimal(3)?,
            avg_revenue_per_item: row.decimal(4)?,
        })
    }
}

/// Currency symbol, sign, thousands separators, no decimals
/// (half-to-even rounding): `1234567` -> `₹1,234,567`, `-500` -> `₹-500`.
pub fn format_revenue(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .trunc();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{CURRENCY_SYMBOL}{sign}{}",
        group_thousands(&rounded.abs().to_string())
    )
}

pub fn format_count(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(&value.unsigned_abs().to_string()))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn growth_delta(growth_pct: Option<Decimal>) -> Option<Delta> {
    growth_pct.map(|pct| Delta {
        text: format!("{}% growth", pct),
        direction: DeltaDirection::of(pct),
    })
}

/// Totals across every fiscal year: revenue sum, order sum, largest order.
pub fn all_years_metrics(yearly: &[YearlyKpiRow]) -> Vec<Metric> {
    let total_revenue: Decimal = yearly.iter().map(|r| r.total_revenue).sum();
    let total_orders: i64 = yearly.iter().map(|r| r.total_orders).sum();
    let max_order_value = yearly
        .iter()
        .map(|r| r.max_order_value)
        .max()
        .unwrap_or(Decimal::ZERO);

    vec![
        Metric::new("Total Revenue", format_revenue(total_revenue)),
        Metric::new("Total Orders", format_count(total_orders)),
        Metric::new("Max Order Value", format_revenue(max_order_value)),
    ]
}

pub fn year_scorecard(row: &YearlyKpiRow) -> Vec<Metric> {
    vec![
        Metric::new("Total Revenue", format_revenue(row.total_revenue))
            .with_delta(growth_delta(row.revenue_growth_pct)),
        Metric::new(
            "Avg Revenue per Order",
            format_revenue(row.avg_revenue_per_order),
        ),
        Metric::new(
            "Avg Revenue per Item",
            format_revenue(row.avg_revenue_per_item),
        ),
    ]
}

/// Calendar order, independent of the order rows arrived in.
pub fn order_by_month(mut rows: Vec<MonthlyKpiRow>) -> Vec<MonthlyKpiRow> {
    rows.sort_by_key(|r| r.month);
    rows
}

pub fn top5_table(rows: &[TopRestaurantRow]) -> LabeledTable {
    LabeledTable {
        headers: vec![
            "Restaurant Name",
            "Total Revenue",
            "Total Orders",
            "Avg Revenue per Order",
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.restaurant_name.clone(),
                    r.total_revenue.to_string(),
                    r.total_orders.to_string(),
                    r.avg_revenue_per_order.to_string(),
                ]
            })
            .collect(),
    }
}
