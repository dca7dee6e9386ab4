use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use invoicey_core::config::BackendConfig;
use invoicey_core::domain::catalog::{ClientRecord, ProductRecord};
use invoicey_core::domain::invoice::{InvoicePayload, InvoiceRecord};
use invoicey_core::domain::tenant::TenantId;

use crate::stores::{BackendError, CatalogStore, InvoiceStore};

/// Auth header the backend expects on every request.
const TOKEN_HEADER: &str = "token";

/// Every backend response wraps its payload in a `data` field.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Reqwest-backed client for the invoicing backend API.
#[derive(Clone)]
pub struct HttpBackendClient {
    http: reqwest::Client,
    base_url: String,
    api_token: SecretString,
}

impl HttpBackendClient {
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// Probe the backend without interpreting the response body. Any HTTP
    /// answer counts as reachable; only transport failures are errors.
    pub async fn ping(&self) -> Result<StatusCode, BackendError> {
        let response = self
            .http
            .get(&self.base_url)
            .header(TOKEN_HEADER, self.api_token.expose_secret())
            .send()
            .await?;
        Ok(response.status())
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}/{path}", self.base_url))
            .header(TOKEN_HEADER, self.api_token.expose_secret())
    }

    async fn fetch_data<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(BackendError::Status { status: response.status() });
        }

        let envelope = response
            .json::<DataEnvelope<T>>()
            .await
            .map_err(|err| BackendError::UnexpectedPayload { detail: err.to_string() })?;
        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl CatalogStore for HttpBackendClient {
    async fn fetch_clients(&self, tenant: &TenantId) -> Result<Vec<ClientRecord>, BackendError> {
        Self::fetch_data(self.get(&format!("client/{}", tenant.as_str()))).await
    }

    async fn fetch_products(&self, tenant: &TenantId) -> Result<Vec<ProductRecord>, BackendError> {
        Self::fetch_data(self.get(&format!("product/{}", tenant.as_str()))).await
    }
}

#[async_trait::async_trait]
impl InvoiceStore for HttpBackendClient {
    async fn submit_invoice(&self, payload: &InvoicePayload) -> Result<bool, BackendError> {
        let response = self
            .http
            .post(format!("{}/quotation", self.base_url))
            .header(TOKEN_HEADER, self.api_token.expose_secret())
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Status { status: response.status() });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|err| BackendError::UnexpectedPayload { detail: err.to_string() })?;
        Ok(is_truthy(body.get("data").unwrap_or(&Value::Null)))
    }

    async fn fetch_recent_invoices(
        &self,
        tenant: &TenantId,
        limit: u32,
    ) -> Result<Vec<InvoiceRecord>, BackendError> {
        let request =
            self.get(&format!("invoices/{}", tenant.as_str())).query(&[("last", limit)]);
        Self::fetch_data(request).await
    }

    async fn fetch_client_invoices(
        &self,
        tenant: &TenantId,
        client_id: &str,
    ) -> Result<Vec<InvoiceRecord>, BackendError> {
        Self::fetch_data(self.get(&format!("invoices/{}/{client_id}", tenant.as_str()))).await
    }
}

/// Truthiness the backend's ack contract relies on: empty strings, empty
/// collections, zero, `false`, and `null` all count as a missing ack.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
