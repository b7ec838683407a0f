// Snowflake SQL API session implementing the warehouse capability
use crate::application::warehouse::{BindValue, RowSet, Statement, Warehouse};
use crate::infrastructure::config::WarehouseSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const STATEMENTS_PATH: &str = "/api/v2/statements";

/// One warehouse session: HTTP client, credentials and execution context.
/// Opened at startup, shared by every request, released on drop.
pub struct SnowflakeSession {
    client: reqwest::Client,
    base_url: String,
    token: String,
    token_type: String,
    context: ExecutionContext,
    poll_interval: Duration,
    executed: AtomicU64,
}

#[derive(Debug, Clone, Default, Serialize)]
struct ExecutionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    warehouse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    bindings: BTreeMap<String, Binding>,
    #[serde(flatten)]
    context: &'a ExecutionContext,
}

#[derive(Debug, Serialize, PartialEq)]
struct Binding {
    #[serde(rename = "type")]
    kind: &'static str,
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    statement_handle: Option<String>,
    #[serde(default)]
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Option<Vec<Vec<Option<String>>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    row_type: Vec<ColumnType>,
    #[serde(default)]
    partition_info: Vec<serde::de::IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct ColumnType {
    name: String,
}

#[derive(Debug)]
enum Outcome {
    Complete(StatementResponse),
    Running(String),
}

/// The first partition of a finished statement and what is left to fetch.
#[derive(Debug)]
struct FirstPartition {
    rows: RowSet,
    handle: Option<String>,
    partitions: usize,
}

impl SnowflakeSession {
    pub fn open(settings: &WarehouseSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .build()
            .context("Failed to build Snowflake HTTP client")?;

        let base_url = settings.account_url.trim_end_matches('/').to_string();
        tracing::info!(
            "Opened warehouse session against {} (warehouse: {:?}, role: {:?})",
            base_url,
            settings.warehouse,
            settings.role
        );

        Ok(Self {
            client,
            base_url,
            token: settings.token.clone(),
            token_type: settings.token_type.clone(),
            context: ExecutionContext {
                warehouse: settings.warehouse.clone(),
                role: settings.role.clone(),
                database: settings.database.clone(),
                schema: settings.schema.clone(),
            },
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            executed: AtomicU64::new(0),
        })
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("X-Snowflake-Authorization-Token-Type", &self.token_type)
            .header("Accept", "application/json")
    }

    async fn submit(&self, statement: &Statement) -> Result<Outcome> {
        let request = StatementRequest {
            statement: &statement.sql,
            bindings: bindings(&statement.bindings),
            context: &self.context,
        };

        let response = self
            .authorized(self.client.post(format!("{}{}", self.base_url, STATEMENTS_PATH)))
            .json(&request)
            .send()
            .await
            .context("Failed to send statement to Snowflake")?;

        Self::read(response).await
    }

    async fn fetch(&self, handle: &str, partition: Option<usize>) -> Result<Outcome> {
        let mut url = format!("{}{}/{}", self.base_url, STATEMENTS_PATH, handle);
        if let Some(partition) = partition {
            url.push_str(&format!("?partition={}", partition));
        }

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .context("Failed to fetch statement status from Snowflake")?;

        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> Result<Outcome> {
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Snowflake response")?;
        parse_response(status, &body)
    }
}

impl Drop for SnowflakeSession {
    fn drop(&mut self) {
        tracing::info!(
            "Released warehouse session against {} after {} statement(s)",
            self.base_url,
            self.executed.load(Ordering::Relaxed)
        );
    }
}

#[async_trait]
impl Warehouse for SnowflakeSession {
    async fn execute(&self, statement: &Statement) -> Result<RowSet> {
        self.executed.fetch_add(1, Ordering::Relaxed);

        let mut outcome = self
            .submit(statement)
            .await
            .with_context(|| format!("Statement {} failed", statement.name))?;

        // 202 means still running; poll the handle until the result is ready.
        let response = loop {
            match outcome {
                Outcome::Complete(response) => break response,
                Outcome::Running(handle) => {
                    tracing::debug!("{} still running as {}, polling", statement.name, handle);
                    tokio::time::sleep(self.poll_interval).await;
                    outcome = self.fetch(&handle, None).await?;
                }
            }
        };

        let FirstPartition {
            mut rows,
            handle,
            partitions,
        } = first_partition(response)?;

        if partitions > 1 {
            let handle = handle.context("Partitioned Snowflake result without a statement handle")?;
            for partition in 1..partitions {
                match self.fetch(&handle, Some(partition)).await? {
                    Outcome::Complete(next) => rows.rows.extend(next.data.unwrap_or_default()),
                    Outcome::Running(_) => {
                        anyhow::bail!("Partition {} of {} is not ready", partition, handle)
                    }
                }
            }
        }

        Ok(rows)
    }
}

/// Positional `?` bindings keyed "1", "2", ... as the SQL API expects.
fn bindings(values: &[BindValue]) -> BTreeMap<String, Binding> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let binding = match value {
                BindValue::Fixed(n) => Binding {
                    kind: "FIXED",
                    value: n.to_string(),
                },
            };
            ((index + 1).to_string(), binding)
        })
        .collect()
}

fn parse_response(status: StatusCode, body: &str) -> Result<Outcome> {
    match status {
        StatusCode::OK => Ok(Outcome::Complete(
            serde_json::from_str(body).context("Failed to parse Snowflake result")?,
        )),
        StatusCode::ACCEPTED => {
            let response: StatementResponse =
                serde_json::from_str(body).context("Failed to parse Snowflake status")?;
            let handle = response
                .statement_handle
                .context("Snowflake accepted the statement without a handle")?;
            Ok(Outcome::Running(handle))
        }
        _ => {
            let detail = serde_json::from_str::<StatementResponse>(body)
                .ok()
                .and_then(|r| match (r.code, r.message) {
                    (Some(code), Some(message)) => Some(format!("{} ({})", message, code)),
                    (None, Some(message)) => Some(message),
                    _ => None,
                })
                .unwrap_or_else(|| body.to_string());
            anyhow::bail!("Snowflake statement failed with status {}: {}", status, detail)
        }
    }
}

fn first_partition(response: StatementResponse) -> Result<FirstPartition> {
    let meta = response
        .result_set_meta_data
        .context("Snowflake result is missing resultSetMetaData")?;

    Ok(FirstPartition {
        rows: RowSet {
            columns: meta.row_type.into_iter().map(|c| c.name).collect(),
            rows: response.data.unwrap_or_default(),
        },
        handle: response.statement_handle,
        partitions: meta.partition_info.len().max(1),
    })
}
