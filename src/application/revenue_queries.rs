// Query layer - Read-only statements against the revenue views
use crate::application::warehouse::{BindValue, RowSet, Statement, Warehouse};
use crate::domain::error::{ReportError, ReportResult};
use crate::domain::revenue::{
    DayTypeRevenueRow, MonthlyKpiRow, RestaurantMonthlyRevenueRow, TopRestaurantRow, YearlyKpiRow,
};
use crate::infrastructure::config::ViewsConfig;
use std::sync::Arc;

pub const YEARLY_KPIS: &str = "yearly_kpis";
pub const MONTHLY_KPIS: &str = "monthly_kpis";
pub const TOP_RESTAURANTS: &str = "top_restaurants";
pub const WEEKDAY_VS_WEEKEND: &str = "weekday_vs_weekend";
pub const TOP5_RESTAURANTS: &str = "top5_restaurants";

#[derive(Clone)]
pub struct RevenueQueries {
    warehouse: Arc<dyn Warehouse>,
    views: ViewsConfig,
}

impl RevenueQueries {
    /// View names are checked once here; statements only ever splice in
    /// validated identifiers, never values.
    pub fn new(warehouse: Arc<dyn Warehouse>, views: ViewsConfig) -> ReportResult<Self> {
        for name in [
            &views.yearly_kpis,
            &views.monthly_kpis,
            &views.monthly_by_restaurant,
            &views.weekday_vs_weekend,
            &views.top5_restaurants,
        ] {
            validate_identifier(name)?;
        }
        Ok(Self { warehouse, views })
    }

    pub async fn fetch_yearly_kpis(&self) -> ReportResult<Vec<YearlyKpiRow>> {
        self.run(self.yearly_kpis_statement()).await?.decode(YEARLY_KPIS)
    }

    /// Years missing from the view simply produce no rows.
    pub async fn fetch_monthly_kpis(&self, year: i32) -> ReportResult<Vec<MonthlyKpiRow>> {
        self.run(self.monthly_kpis_statement(year))
            .await?
            .decode(MONTHLY_KPIS)
    }

    pub async fn fetch_top_restaurants(
        &self,
        year: i32,
        month: u32,
    ) -> ReportResult<Vec<RestaurantMonthlyRevenueRow>> {
        self.run(self.top_restaurants_statement(year, month))
            .await?
            .decode(TOP_RESTAURANTS)
    }

    pub async fn fetch_weekday_vs_weekend(&self) -> ReportResult<Vec<DayTypeRevenueRow>> {
        self.run(self.weekday_vs_weekend_statement())
            .await?
            .decode(WEEKDAY_VS_WEEKEND)
    }

    pub async fn fetch_top5_restaurants(&self) -> ReportResult<Vec<TopRestaurantRow>> {
        self.run(self.top5_restaurants_statement())
            .await?
            .decode(TOP5_RESTAURANTS)
    }

    async fn run(&self, statement: Statement) -> ReportResult<RowSet> {
        tracing::debug!(
            "Executing {} with {} binding(s)",
            statement.name,
            statement.bindings.len()
        );
        let rows = self.warehouse.execute(&statement).await?;
        tracing::debug!("{} returned {} row(s)", statement.name, rows.rows.len());
        Ok(rows)
    }

    fn yearly_kpis_statement(&self) -> Statement {
        Statement::new(
            YEARLY_KPIS,
            format!(
                "SELECT year, total_revenue, total_orders, avg_revenue_per_order, \
                 avg_revenue_per_item, max_order_value, revenue_growth_pct \
                 FROM {} ORDER BY year",
                self.views.yearly_kpis
            ),
        )
    }

    fn monthly_kpis_statement(&self, year: i32) -> Statement {
        Statement::new(
            MONTHLY_KPIS,
            format!(
                "SELECT month, total_revenue FROM {} WHERE year = ? ORDER BY month",
                self.views.monthly_kpis
            ),
        )
        .bind(BindValue::Fixed(i64::from(year)))
    }

    fn top_restaurants_statement(&self, year: i32, month: u32) -> Statement {
        Statement::new(
            TOP_RESTAURANTS,
            format!(
                "SELECT restaurant_name, total_revenue, total_orders, avg_revenue_per_order, \
                 avg_revenue_per_item, max_order_value \
                 FROM {} WHERE year = ? AND month = ? \
                 ORDER BY total_revenue DESC LIMIT 10",
                self.views.monthly_by_restaurant
            ),
        )
        .bind(BindValue::Fixed(i64::from(year)))
        .bind(BindValue::Fixed(i64::from(month)))
    }

    fn weekday_vs_weekend_statement(&self) -> Statement {
        Statement::new(
            WEEKDAY_VS_WEEKEND,
            format!(
                "SELECT day_type, total_revenue, total_orders, avg_revenue_per_order, \
                 avg_revenue_per_item FROM {} ORDER BY day_type",
                self.views.weekday_vs_weekend
            ),
        )
    }

    fn top5_restaurants_statement(&self) -> Statement {
        Statement::new(
            TOP5_RESTAURANTS,
            format!(
                "SELECT restaurant_name, total_revenue, total_orders, avg_revenue_per_order \
                 FROM {} ORDER BY total_revenue DESC LIMIT 5",
                self.views.top5_restaurants
            ),
        )
    }
}

/// Accepts `view`, `schema.view` or `db.schema.view` made of
/// letters, digits, `_` and `$`, not starting with a digit.
fn validate_identifier(name: &str) -> ReportResult<()> {
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    };

    let parts: Vec<&str> = name.split('.').collect();
    if (1..=3).contains(&parts.len()) && parts.iter().all(|p| valid_part(p)) {
        Ok(())
    } else {
        Err(ReportError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeWarehouse;

    fn queries() -> RevenueQueries {
        RevenueQueries::new(Arc::new(FakeWarehouse::default()), ViewsConfig::default()).unwrap()
    }

    #[test]
    fn test_parameters_are_bound_not_interpolated() {
        let q = queries();

        let monthly = q.monthly_kpis_statement(2023);
        assert!(!monthly.sql.contains("2023"));
        assert!(monthly.sql.contains("WHERE year = ?"));
        assert_eq!(monthly.bindings, vec![BindValue::Fixed(2023)]);

        let top = q.top_restaurants_statement(2022, 7);
        assert!(!top.sql.contains("2022"));
        assert!(top.sql.contains("year = ? AND month = ?"));
        assert!(top.sql.ends_with("LIMIT 10"));
        assert_eq!(top.bindings, vec![BindValue::Fixed(2022), BindValue::Fixed(7)]);
    }

    #[test]
    fn test_unparameterized_statements_have_no_bindings() {
        let q = queries();
        for statement in [
            q.yearly_kpis_statement(),
            q.weekday_vs_weekend_statement(),
            q.top5_restaurants_statement(),
        ] {
            assert!(statement.bindings.is_empty(), "{}", statement.name);
            assert!(!statement.sql.contains('?'), "{}", statement.name);
        }
        assert!(q.yearly_kpis_statement().sql.ends_with("ORDER BY year"));
        assert!(q.top5_restaurants_statement().sql.ends_with("ORDER BY total_revenue DESC LIMIT 5"));
    }

    #[test]
    fn test_statements_use_configured_views() {
        let q = queries();
        let defaults = ViewsConfig::default();
        assert!(q.yearly_kpis_statement().sql.contains(&defaults.yearly_kpis));
        assert!(q.monthly_kpis_statement(2020).sql.contains(&defaults.monthly_kpis));
    }

    #[test]
    fn test_view_names_are_validated() {
        assert!(validate_identifier("foodpanda_db.enriched.vw_yearly_revenue_kpis").is_ok());
        assert!(validate_identifier("vw_top5$").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("a.b.c.d").is_err());
        assert!(validate_identifier("db..view").is_err());
        assert!(validate_identifier("1view").is_err());
        assert!(validate_identifier("views; DROP TABLE x").is_err());

        let views = ViewsConfig {
            top5_restaurants: "top5 --".to_string(),
            ..ViewsConfig::default()
        };
        assert!(matches!(
            RevenueQueries::new(Arc::new(FakeWarehouse::default()), views),
            Err(ReportError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_year_yields_empty_result() {
        let warehouse = Arc::new(FakeWarehouse::sample());
        let q = RevenueQueries::new(warehouse, ViewsConfig::default()).unwrap();
        assert!(q.fetch_monthly_kpis(1999).await.unwrap().is_empty());
        assert_eq!(q.fetch_monthly_kpis(2023).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_warehouse_failure_propagates() {
        let q = RevenueQueries::new(Arc::new(FakeWarehouse::failing()), ViewsConfig::default())
            .unwrap();
        assert!(matches!(
            q.fetch_yearly_kpis().await,
            Err(ReportError::Warehouse(_))
        ));
    }

    #[tokio::test]
    async fn test_top_restaurants_decode_the_wide_shape() {
        let q = RevenueQueries::new(Arc::new(FakeWarehouse::sample()), ViewsConfig::default())
            .unwrap();
        let rows = q.fetch_top_restaurants(2023, 1).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].restaurant_name, "Spice Route");
        assert!(rows[0].total_revenue >= rows[1].total_revenue);
    }
}
