// Report service - Runs the query/transform pipeline per section
use crate::application::export::table_to_csv;
use crate::application::revenue_queries::RevenueQueries;
use crate::application::transform::{all_years_metrics, order_by_month, top5_table, year_scorecard};
use crate::domain::error::ReportResult;
use crate::domain::report::{
    AllYearsSection, DayTypeSection, Report, TopRestaurantsSection, YearDetail, YearSections,
    YearSelector,
};
use crate::domain::revenue::{RestaurantMonthlyRevenueRow, YearlyKpiRow};
use std::time::Instant;

#[derive(Clone)]
pub struct ReportService {
    queries: RevenueQueries,
    title: String,
}

impl ReportService {
    pub fn new(queries: RevenueQueries, title: String) -> Self {
        Self { queries, title }
    }

    /// Every section, top to bottom. `requested_year` defaults to the latest.
    pub async fn full_report(&self, requested_year: Option<i32>) -> ReportResult<Report> {
        let start_time = Instant::now();

        let yearly = self.queries.fetch_yearly_kpis().await?;
        let all_years = AllYearsSection {
            metrics: all_years_metrics(&yearly),
        };
        let year = self.build_year_sections(&yearly, requested_year).await?;
        let day_types = self.day_type_split().await?;
        let top_restaurants = self.top_restaurants().await?;

        tracing::info!(
            "Built full report for year {:?} in {} ms",
            year.selector.selected(),
            start_time.elapsed().as_millis()
        );

        Ok(Report {
            title: self.title.clone(),
            generated_at: chrono::Utc::now(),
            all_years,
            year,
            day_types,
            top_restaurants,
        })
    }

    /// Only the year-scoped sections. Runs the yearly and monthly queries
    /// and nothing else.
    pub async fn year_sections(&self, year: i32) -> ReportResult<YearSections> {
        let start_time = Instant::now();
        let yearly = self.queries.fetch_yearly_kpis().await?;
        let sections = self.build_year_sections(&yearly, Some(year)).await?;
        tracing::info!(
            "Rebuilt year sections for {} in {} ms",
            year,
            start_time.elapsed().as_millis()
        );
        Ok(sections)
    }

    pub async fn day_type_split(&self) -> ReportResult<DayTypeSection> {
        let rows = self.queries.fetch_weekday_vs_weekend().await?;
        Ok(DayTypeSection { rows })
    }

    /// The top-5 table together with its CSV rendering.
    pub async fn top_restaurants(&self) -> ReportResult<TopRestaurantsSection> {
        let rows = self.queries.fetch_top5_restaurants().await?;
        let table = top5_table(&rows);
        let csv = table_to_csv(&table)?;
        Ok(TopRestaurantsSection { table, csv })
    }

    pub async fn monthly_top_restaurants(
        &self,
        year: i32,
        month: u32,
    ) -> ReportResult<Vec<RestaurantMonthlyRevenueRow>> {
        self.queries.fetch_top_restaurants(year, month).await
    }

    async fn build_year_sections(
        &self,
        yearly: &[YearlyKpiRow],
        requested_year: Option<i32>,
    ) -> ReportResult<YearSections> {
        let selector = YearSelector::new(yearly.iter().map(|r| r.year), requested_year)?;

        let selected_row = selector
            .selected()
            .and_then(|year| yearly.iter().find(|r| r.year == year));

        let detail = match selected_row {
            Some(row) => {
                let monthly = order_by_month(self.queries.fetch_monthly_kpis(row.year).await?);
                if monthly.is_empty() {
                    tracing::debug!("No monthly revenue rows for {}", row.year);
                }
                Some(YearDetail {
                    year: row.year,
                    scorecard: year_scorecard(row),
                    monthly,
                })
            }
            None => {
                tracing::warn!("Yearly KPI view returned no rows");
                None
            }
        };

        Ok(YearSections { selector, detail })
    }
}
