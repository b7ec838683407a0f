use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub warehouse: WarehouseSettings,
    #[serde(default)]
    pub views: ViewsConfig,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Connection settings for the Snowflake SQL API.
#[derive(Debug, Deserialize, Clone)]
pub struct WarehouseSettings {
    /// e.g. `https://myorg-myaccount.snowflakecomputing.com`
    pub account_url: String,
    pub token: String,
    /// `OAUTH` or `KEYPAIR_JWT`
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub warehouse: Option<String>,
    pub role: Option<String>,
    pub database: Option<String>,
    pub schema: Option<String>,
    /// Delay between status checks while a statement is still running.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_token_type() -> String {
    "OAUTH".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

/// Fully qualified names of the revenue views.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ViewsConfig {
    pub yearly_kpis: String,
    pub monthly_kpis: String,
    pub monthly_by_restaurant: String,
    pub weekday_vs_weekend: String,
    pub top5_restaurants: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            yearly_kpis: "foodpanda_db.enriched.vw_yearly_revenue_kpis".to_string(),
            monthly_kpis: "sandbox.enriched.vw_monthly_revenue_kpis".to_string(),
            monthly_by_restaurant: "sandbox.enriched.vw_monthly_revenue_by_restaurant".to_string(),
            weekday_vs_weekend: "enriched.vw_weekday_vs_weekend_revenue".to_string(),
            top5_restaurants: "enriched.vw_top5_restaurants_revenue".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "Foodpanda Revenue Dashboard".to_string(),
        }
    }
}

/// `config/dashboard.{toml,yaml,json}` overlaid with `DASHBOARD__*`
/// environment variables, e.g. `DASHBOARD__WAREHOUSE__TOKEN`.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> DashboardConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let cfg = parse(
            r#"
            [warehouse]
            account_url = "https://acme.snowflakecomputing.com"
            token = "secret"
            "#,
        );

        assert_eq!(cfg.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.warehouse.token_type, "OAUTH");
        assert_eq!(cfg.warehouse.poll_interval_ms, 500);
        assert_eq!(cfg.warehouse.warehouse, None);
        assert_eq!(cfg.views, ViewsConfig::default());
        assert_eq!(cfg.report.title, "Foodpanda Revenue Dashboard");
    }

    #[test]
    fn test_view_overrides_keep_other_defaults() {
        let cfg = parse(
            r#"
            [warehouse]
            account_url = "https://acme.snowflakecomputing.com"
            token = "secret"
            warehouse = "REPORTING_WH"

            [views]
            top5_restaurants = "analytics.gold.top5"
            "#,
        );

        assert_eq!(cfg.warehouse.warehouse.as_deref(), Some("REPORTING_WH"));
        assert_eq!(cfg.views.top5_restaurants, "analytics.gold.top5");
        assert_eq!(cfg.views.yearly_kpis, ViewsConfig::default().yearly_kpis);
    }
}
