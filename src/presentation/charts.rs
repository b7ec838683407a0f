// Vega-Lite chart specs, embedded in the page and drawn by vega-embed
use crate::application::transform::CURRENCY_SYMBOL;
use crate::domain::revenue::{DayTypeRevenueRow, Month, MonthlyKpiRow};
use serde_json::{json, Value};

pub const ACCENT_COLOR: &str = "#ff5200";
const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

const MONTH_FIELD: &str = "Month";
const MONTHLY_REVENUE_FIELD: &str = "Total Monthly Revenue";
const DAY_TYPE_FIELD: &str = "Day Type";
const REVENUE_FIELD: &str = "Total Revenue";
const ORDERS_FIELD: &str = "Total Orders";

/// A chart ready to be placed on the page under `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: &'static str,
    pub spec: Value,
}

pub fn monthly_bar_chart(rows: &[MonthlyKpiRow]) -> ChartSpec {
    ChartSpec {
        id: "monthly-revenue-bar",
        spec: monthly_chart(json!({ "type": "bar", "color": ACCENT_COLOR }), rows),
    }
}

pub fn monthly_line_chart(rows: &[MonthlyKpiRow]) -> ChartSpec {
    ChartSpec {
        id: "monthly-revenue-line",
        spec: monthly_chart(
            json!({ "type": "line", "color": ACCENT_COLOR, "point": { "color": ACCENT_COLOR } }),
            rows,
        ),
    }
}

pub fn day_type_arc_chart(rows: &[DayTypeRevenueRow]) -> ChartSpec {
    let values: Vec<Value> = rows
        .iter()
        .map(|r| {
            json!({
                DAY_TYPE_FIELD: r.day_type.label(),
                REVENUE_FIELD: r.total_revenue,
                ORDERS_FIELD: r.total_orders,
            })
        })
        .collect();

    ChartSpec {
        id: "day-type-arc",
        spec: json!({
            "$schema": VEGA_LITE_SCHEMA,
            "width": "container",
            "data": { "values": values },
            "mark": { "type": "arc" },
            "encoding": {
                "theta": { "field": REVENUE_FIELD, "type": "quantitative" },
                "color": { "field": DAY_TYPE_FIELD, "type": "nominal" },
                "tooltip": [
                    { "field": DAY_TYPE_FIELD, "type": "nominal" },
                    { "field": REVENUE_FIELD, "type": "quantitative", "format": ",.2f" },
                    { "field": ORDERS_FIELD, "type": "quantitative", "format": "," }
                ]
            }
        }),
    }
}

/// Month on x with the calendar as explicit sort, revenue on y.
fn monthly_chart(mark: Value, rows: &[MonthlyKpiRow]) -> Value {
    let values: Vec<Value> = rows
        .iter()
        .map(|r| json!({ MONTH_FIELD: r.month.label(), MONTHLY_REVENUE_FIELD: r.total_revenue }))
        .collect();

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": "container",
        "data": { "values": values },
        "mark": mark,
        "encoding": {
            "x": {
                "field": MONTH_FIELD,
                "type": "ordinal",
                "sort": Month::all_labels(),
                "title": MONTH_FIELD
            },
            "y": {
                "field": MONTHLY_REVENUE_FIELD,
                "type": "quantitative",
                "title": format!("Revenue ({CURRENCY_SYMBOL})")
            },
            "tooltip": [
                { "field": MONTH_FIELD, "type": "ordinal" },
                { "field": MONTHLY_REVENUE_FIELD, "type": "quantitative", "format": ",.2f" }
            ]
        }
    })
}
