//! Request plumbing shared by every provider client

use std::sync::Arc;
use std::time::Duration;

use coresuite_core::IntegrationLog;
use coresuite_domain::constants::ID_PLACEHOLDER;
use coresuite_domain::{OperationOutcome, ProviderConfig, Record, Result};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::http::{HttpClient, RequestBody, RequestOptions};

/// Fixed per-provider call settings.
pub(crate) struct ProviderProfile {
    pub timeout: Duration,
    pub retries: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub success_message: &'static str,
    pub failure_message: &'static str,
}

/// Authenticated access to one provider's API.
pub(crate) struct ProviderTransport {
    http: HttpClient,
    log: Arc<dyn IntegrationLog>,
    config: ProviderConfig,
    profile: ProviderProfile,
    extra_headers: Vec<(&'static str, String)>,
}

impl ProviderTransport {
    pub fn new(
        config: &ProviderConfig,
        profile: ProviderProfile,
        log: Arc<dyn IntegrationLog>,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .base_url(config.base_url.trim())
            .timeout(profile.timeout)
            .log_sink(Arc::clone(&log))
            .build()?;

        Ok(Self { http, log, config: config.clone(), profile, extra_headers: Vec::new() })
    }

    /// Header sent with every call of this provider.
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.extra_headers.push((name, value.to_string()));
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Resolved path for `operation`, with `{id}` expanded when given.
    pub fn path(&self, operation: &str, default: &str, id: Option<&str>) -> String {
        let template = self.config.endpoint(operation, default);
        match id {
            Some(id) => template.replace(ID_PLACEHOLDER, &urlencoding::encode(id)),
            None => template.to_string(),
        }
    }

    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        payload: &Record,
        operation: &'static str,
    ) -> OperationOutcome {
        self.send(method, path, RequestBody::Json(Value::Object(payload.clone())), operation).await
    }

    /// Perform the call and log its outcome under `operation`.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        operation: &'static str,
    ) -> OperationOutcome {
        let mut options = RequestOptions::new()
            .header("Authorization", format!("Bearer {}", self.config.api_key.trim()))
            .header("Accept", "application/json")
            .body(body)
            .timeout(self.profile.timeout);
        for (name, value) in &self.extra_headers {
            options = options.header(*name, value.as_str());
        }
        if let Some(retries) = self.profile.retries {
            options = options.retries(retries);
        }
        if let Some(delay) = self.profile.retry_delay {
            options = options.retry_delay(delay);
        }

        let outcome = OperationOutcome::from(self.http.execute(method, path, options).await);

        let mut context = Map::new();
        context.insert("operation".into(), Value::from(operation));
        context.insert("status".into(), Value::from(outcome.status));
        if outcome.success {
            self.log.info(self.profile.success_message, context);
        } else {
            context.insert("error".into(), outcome.error.as_deref().map_or(Value::Null, Value::from));
            self.log.error(self.profile.failure_message, context);
        }

        outcome
    }
}
