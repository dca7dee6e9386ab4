use async_trait::async_trait;
use thiserror::Error;

use invoicey_core::domain::catalog::{ClientRecord, ProductRecord};
use invoicey_core::domain::invoice::{InvoicePayload, InvoiceRecord};
use invoicey_core::domain::tenant::TenantId;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned status {status}")]
    Status { status: reqwest::StatusCode },
    #[error("unexpected backend payload: {detail}")]
    UnexpectedPayload { detail: String },
}

/// Read access to a tenant's client and product catalogs.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn fetch_clients(&self, tenant: &TenantId) -> Result<Vec<ClientRecord>, BackendError>;
    async fn fetch_products(&self, tenant: &TenantId) -> Result<Vec<ProductRecord>, BackendError>;
}

/// Invoice submission and lookups against the backend.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Submit a finished invoice. `Ok(false)` means the backend answered
    /// but did not acknowledge the invoice.
    async fn submit_invoice(&self, payload: &InvoicePayload) -> Result<bool, BackendError>;

    async fn fetch_recent_invoices(
        &self,
        tenant: &TenantId,
        limit: u32,
    ) -> Result<Vec<InvoiceRecord>, BackendError>;

    async fn fetch_client_invoices(
        &self,
        tenant: &TenantId,
        client_id: &str,
    ) -> Result<Vec<InvoiceRecord>, BackendError>;
}
