// In-memory warehouse for service and handler tests
use crate::application::revenue_queries::{
    MONTHLY_KPIS, TOP5_RESTAURANTS, TOP_RESTAURANTS, WEEKDAY_VS_WEEKEND, YEARLY_KPIS,
};
use crate::application::warehouse::{BindValue, RowSet, Statement, Warehouse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeWarehouse {
    tables: HashMap<&'static str, RowSet>,
    fail: bool,
    executed: Mutex<Vec<Statement>>,
}

pub fn rows(columns: &[&str], data: &[&[Option<&str>]]) -> RowSet {
    RowSet {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: data
            .iter()
            .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
            .collect(),
    }
}

impl FakeWarehouse {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Three fiscal years, monthly rows for 2023 (out of order) and 2022,
    /// a weekday/weekend split and five restaurants, one name with a comma.
    pub fn sample() -> Self {
        Self::default()
            .with(
                YEARLY_KPIS,
                rows(
                    &[
                        "YEAR",
                        "TOTAL_REVENUE",
                        "TOTAL_ORDERS",
                        "AVG_REVENUE_PER_ORDER",
                        "AVG_REVENUE_PER_ITEM",
                        "MAX_ORDER_VALUE",
                        "REVENUE_GROWTH_PCT",
                    ],
                    &[
                        &[Some("2021"), Some("1000000.00"), Some("5000"), Some("200.00"), Some("80.50"), Some("4500.00"), None],
                        &[Some("2022"), Some("1500000.50"), Some("7000"), Some("214.29"), Some("85.10"), Some("5200.00"), Some("50.00")],
                        &[Some("2023"), Some("1800000.25"), Some("8000"), Some("225.00"), Some("90.00"), Some("6100.75"), Some("20.00")],
                    ],
                ),
            )
            .with(
                MONTHLY_KPIS,
                rows(
                    &["MONTH", "TOTAL_REVENUE", "YEAR"],
                    &[
                        &[Some("3"), Some("150000.00"), Some("2023")],
                        &[Some("1"), Some("120000.00"), Some("2023")],
                        &[Some("2"), Some("130000.50"), Some("2023")],
                        &[Some("1"), Some("100000.00"), Some("2022")],
                    ],
                ),
            )
            .with(
                TOP_RESTAURANTS,
                rows(
                    &[
                        "RESTAURANT_NAME",
                        "TOTAL_REVENUE",
                        "TOTAL_ORDERS",
                        "AVG_REVENUE_PER_ORDER",
                        "AVG_REVENUE_PER_ITEM",
                        "MAX_ORDER_VALUE",
                        "YEAR",
                        "MONTH",
                    ],
                    &[
                        &[Some("Spice Route"), Some("50000.00"), Some("200"), Some("250.00"), Some("95.00"), Some("900.00"), Some("2023"), Some("1")],
                        &[Some("Curry Leaf"), Some("42000.00"), Some("180"), Some("233.33"), Some("90.00"), Some("850.00"), Some("2023"), Some("1")],
                    ],
                ),
            )
            .with(
                WEEKDAY_VS_WEEKEND,
                rows(
                    &[
                        "DAY_TYPE",
                        "TOTAL_REVENUE",
                        "TOTAL_ORDERS",
                        "AVG_REVENUE_PER_ORDER",
                        "AVG_REVENUE_PER_ITEM",
                    ],
                    &[
                        &[Some("weekday"), Some("3000000.00"), Some("14000"), Some("214.29"), Some("85.00")],
                        &[Some("weekend"), Some("1300000.75"), Some("6000"), Some("216.67"), Some("88.00")],
                    ],
                ),
            )
            .with(
                TOP5_RESTAURANTS,
                rows(
                    &[
                        "RESTAURANT_NAME",
                        "TOTAL_REVENUE",
                        "TOTAL_ORDERS",
                        "AVG_REVENUE_PER_ORDER",
                    ],
                    &[
                        &[Some("Biryani House, Downtown"), Some("420000.00"), Some("1500"), Some("280.00")],
                        &[Some("Joe's \"Famous\" Grill"), Some("390000.50"), Some("1400"), Some("278.57")],
                        &[Some("Spice Route"), Some("350000.00"), Some("1300"), Some("269.23")],
                        &[Some("Curry Leaf"), Some("300000.00"), Some("1250"), Some("240.00")],
                        &[Some("Tandoor Nights"), Some("250000.00"), Some("1000"), Some("250.00")],
                    ],
                ),
            )
    }

    /// Canned rows for one statement. Trailing `YEAR`/`MONTH` columns act as
    /// filters against the statement's bindings and are stripped from results.
    pub fn with(mut self, statement: &'static str, rows: RowSet) -> Self {
        self.tables.insert(statement, rows);
        self
    }

    pub fn executed(&self) -> Vec<&'static str> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.name)
            .collect()
    }

    fn filter(table: &RowSet, bindings: &[BindValue]) -> RowSet {
        let filters: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() == "YEAR" || c.as_str() == "MONTH")
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .collect();
        if filters.is_empty() {
            return table.clone();
        }

        let keep = filters[0];
        let wanted: Vec<String> = bindings
            .iter()
            .map(|b| match b {
                BindValue::Fixed(v) => v.to_string(),
            })
            .collect();

        RowSet {
            columns: table.columns[..keep].to_vec(),
            rows: table
                .rows
                .iter()
                .filter(|row| {
                    filters
                        .iter()
                        .zip(&wanted)
                        .all(|(&i, want)| row[i].as_deref() == Some(want.as_str()))
                })
                .map(|row| row[..keep].to_vec())
                .collect(),
        }
    }
}

#[async_trait]
impl Warehouse for FakeWarehouse {
    async fn execute(&self, statement: &Statement) -> anyhow::Result<RowSet> {
        self.executed.lock().unwrap().push(statement.clone());
        if self.fail {
            anyhow::bail!("connection refused");
        }
        self.tables
            .get(statement.name)
            .map(|table| Self::filter(table, &statement.bindings))
            .ok_or_else(|| anyhow::anyhow!("no canned rows for {}", statement.name))
    }
}
