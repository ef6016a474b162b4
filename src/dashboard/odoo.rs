//! JSON-RPC client for the Odoo backend.
//!
//! All reads go through `execute_kw` on the `object` service, either as
//! `search_read` (row level, bounded by a limit) or `read_group`
//! (server-side aggregation, no record limit). Every call runs in the Dutch
//! language context; archived records can be included so transactions booked
//! on archived contacts still show up.

use crate::config::dashboard_config::DashboardConfig;
use crate::domain::model::Record;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::validate_required_field;
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub limit: Option<usize>,
    pub include_archived: bool,
}

impl CallOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn archived(mut self) -> Self {
        self.include_archived = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OdooClient {
    client: Client,
    url: String,
    database: String,
    uid: i64,
    api_key: String,
}

impl OdooClient {
    pub fn new(
        url: impl Into<String>,
        database: impl Into<String>,
        uid: i64,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            database: database.into(),
            uid,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let api_key = validate_required_field("odoo.api_key", &config.odoo.api_key)?;
        Self::new(
            config.odoo.url.clone(),
            config.odoo.database.clone(),
            config.odoo.uid,
            api_key.clone(),
            Duration::from_secs(config.odoo.timeout_seconds),
        )
    }

    fn context(include_archived: bool) -> Value {
        let mut context = json!({ "lang": "nl_NL" });
        if include_archived {
            context["active_test"] = json!(false);
        }
        context
    }

    async fn execute_kw(&self, model: &str, method: &str, tail: Vec<Value>) -> Result<Value> {
        let mut args = vec![
            json!(self.database),
            json!(self.uid),
            json!(self.api_key),
            json!(model),
            json!(method),
        ];
        args.extend(tail);

        let payload = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": {
                "service": "object",
                "method": "execute_kw",
                "args": args,
            },
            "id": 1,
        });

        tracing::debug!("Odoo call: {} {}", model, method);
        let response = self.client.post(&self.url).json(&payload).send().await?;
        let body: Value = response.json().await?;

        if let Some(error) = body.get("error") {
            let message = error
                .pointer("/data/message")
                .or_else(|| error.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(ReportError::rpc(message));
        }

        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Row-level read. `domain` is an Odoo domain expression as JSON.
    pub async fn search_read(
        &self,
        model: &str,
        domain: Value,
        fields: &[&str],
        options: CallOptions,
    ) -> Result<Vec<Record>> {
        let mut kwargs = json!({
            "fields": fields,
            "context": Self::context(options.include_archived),
        });
        if let Some(limit) = options.limit {
            kwargs["limit"] = json!(limit);
        }

        let result = self
            .execute_kw(model, "search_read", vec![json!([domain]), kwargs])
            .await?;
        Ok(rows_to_records(result))
    }

    /// Server-side aggregation; `lazy: false` expands every groupby level so
    /// no record limit applies.
    pub async fn read_group(
        &self,
        model: &str,
        domain: Value,
        fields: &[&str],
        groupby: &[&str],
    ) -> Result<Vec<Record>> {
        let kwargs = json!({
            "fields": fields,
            "groupby": groupby,
            "lazy": false,
            "context": Self::context(true),
        });

        let result = self
            .execute_kw(model, "read_group", vec![json!([domain]), kwargs])
            .await?;
        Ok(rows_to_records(result))
    }
}

fn rows_to_records(result: Value) -> Vec<Record> {
    match result {
        Value::Array(rows) => rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => {
                    let mut data = HashMap::new();
                    for (key, value) in map {
                        data.insert(key, value);
                    }
                    Some(Record::new(data))
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
