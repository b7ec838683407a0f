// HTTP request handlers
use crate::application::export::{CSV_CONTENT_TYPE, TOP5_FILE_NAME};
use crate::domain::error::ReportError;
use crate::domain::revenue::{Month, RestaurantMonthlyRevenueRow};
use crate::infrastructure::http_response::{csv_attachment, html_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::FragmentError;
use crate::presentation::page::{render_report, render_year_sections};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct PageQuery {
    pub year: Option<i32>,
}

#[derive(Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

#[derive(Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// The whole dashboard, defaulting to the latest year on record.
pub async fn index(
    Query(query): Query<PageQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ReportError> {
    let report = state.report_service.full_report(query.year).await?;
    Ok(html_response(StatusCode::OK, render_report(&report)))
}

/// Only the year-scoped sections, swapped in when the selector changes.
pub async fn year_sections(
    Query(query): Query<YearQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, FragmentError> {
    let sections = state.report_service.year_sections(query.year).await?;
    Ok(html_response(StatusCode::OK, render_year_sections(&sections)))
}

/// The top-5 table as a CSV download.
pub async fn export_top5_csv(State(state): State<Arc<AppState>>) -> Result<Response, ReportError> {
    let section = state.report_service.top_restaurants().await?;
    tracing::info!("Exporting {} top restaurants as CSV", section.table.rows.len());

    Ok(
        match csv_attachment(TOP5_FILE_NAME, CSV_CONTENT_TYPE, section.csv) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
    )
}

/// Top ten restaurants by revenue for one month, as JSON.
pub async fn monthly_top_restaurants(
    Query(query): Query<MonthQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RestaurantMonthlyRevenueRow>>, Response> {
    let month = Month::from_code(i64::from(query.month))
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())?;

    state
        .report_service
        .monthly_top_restaurants(query.year, u32::from(month.number()))
        .await
        .map(Json)
        .map_err(IntoResponse::into_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::report_service::ReportService;
    use crate::application::revenue_queries::{
        RevenueQueries, MONTHLY_KPIS, TOP5_RESTAURANTS, YEARLY_KPIS,
    };
    use crate::application::test_support::FakeWarehouse;
    use crate::infrastructure::config::ViewsConfig;
    use axum::body::to_bytes;
    use axum::http::header;

    fn state_with(warehouse: Arc<FakeWarehouse>) -> Arc<AppState> {
        let queries = RevenueQueries::new(warehouse, ViewsConfig::default()).unwrap();
        Arc::new(AppState {
            report_service: ReportService::new(queries, "Foodpanda Revenue Dashboard".to_string()),
        })
    }

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_every_section() {
        let state = state_with(Arc::new(FakeWarehouse::sample()));
        let response = index(Query(PageQuery { year: None }), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert!(body.contains("📈 Aggregate KPIs Across All Years"));
        assert!(body.contains("₹4,300,001"));
        assert!(body.contains(r#"<option value="2023" selected>2023</option>"#));
        assert!(body.contains("📅 2023 Monthly Revenue Trend"));
        assert!(body.contains("📆 Weekday vs Weekend Revenue Split"));
        assert!(body.contains("Biryani House, Downtown"));
        assert!(body.contains("Download Top 5 Restaurants CSV"));
    }

    #[tokio::test]
    async fn test_index_with_unknown_year_is_a_bad_request() {
        let state = state_with(Arc::new(FakeWarehouse::sample()));
        let response = index(Query(PageQuery { year: Some(1999) }), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_of(response).await.contains("year 1999 is not present"));
    }

    #[tokio::test]
    async fn test_warehouse_outage_shows_an_error_page() {
        let state = state_with(Arc::new(FakeWarehouse::failing()));
        let response = index(Query(PageQuery { year: None }), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_of(response).await;
        assert!(body.contains("Report unavailable."));
        assert!(body.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_year_fragment_only_touches_year_queries() {
        let warehouse = Arc::new(FakeWarehouse::sample());
        let response = year_sections(Query(YearQuery { year: 2022 }), State(state_with(warehouse.clone())))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert!(!body.contains("<html"));
        assert!(body.contains("📊 KPI Scorecard for 2022"));
        assert!(!body.contains("Top 5 Restaurants"));
        assert_eq!(warehouse.executed(), vec![YEARLY_KPIS, MONTHLY_KPIS]);
    }

    #[tokio::test]
    async fn test_year_fragment_failure_is_a_visible_error_block() {
        let state = state_with(Arc::new(FakeWarehouse::failing()));
        let response = year_sections(Query(YearQuery { year: 2022 }), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_of(response).await;
        assert!(body.starts_with(r#"<div class="error" role="alert">"#));
        assert!(body.contains("connection refused"));
        assert!(!body.contains("KPI Scorecard"));
    }

    #[tokio::test]
    async fn test_csv_export_is_a_download() {
        let warehouse = Arc::new(FakeWarehouse::sample());
        let response = export_top5_csv(State(state_with(warehouse.clone())))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"top5_restaurants.csv\""
        );
        let body = body_of(response).await;
        assert!(body.starts_with("Restaurant Name,Total Revenue,Total Orders,Avg Revenue per Order\n"));
        assert_eq!(body.lines().count(), 6);
        assert_eq!(warehouse.executed(), vec![TOP5_RESTAURANTS]);
    }

    #[tokio::test]
    async fn test_monthly_top_restaurants_json() {
        let state = state_with(Arc::new(FakeWarehouse::sample()));
        let response = monthly_top_restaurants(
            Query(MonthQuery { year: 2023, month: 1 }),
            State(state.clone()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let rows: serde_json::Value = serde_json::from_str(&body_of(response).await).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 2);
        assert_eq!(rows[0]["restaurant_name"], "Spice Route");

        let response = monthly_top_restaurants(
            Query(MonthQuery { year: 2023, month: 13 }),
            State(state),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "ok");
    }
}
