//! In-memory backend for engine and handler tests.

use std::collections::HashMap;

use tokio::sync::Mutex;

use invoicey_core::domain::catalog::{ClientRecord, ProductRecord};
use invoicey_core::domain::invoice::{InvoicePayload, InvoiceRecord};
use invoicey_core::domain::tenant::TenantId;

use crate::stores::{BackendError, CatalogStore, InvoiceStore};

/// Which backend operation a scripted failure should hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendCall {
    Clients,
    Products,
    SubmitInvoice,
    RecentInvoices,
    ClientInvoices,
}

/// Canned backend that serves fixed catalogs and records submissions.
#[derive(Default)]
pub struct InMemoryBackend {
    clients: Vec<ClientRecord>,
    products: Vec<ProductRecord>,
    recent_invoices: Vec<InvoiceRecord>,
    client_invoices: HashMap<String, Vec<InvoiceRecord>>,
    failures: Vec<BackendCall>,
    submissions: Mutex<Vec<InvoicePayload>>,
    reject_submissions: bool,
}

impl InMemoryBackend {
    pub fn with_clients(mut self, clients: Vec<ClientRecord>) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_products(mut self, products: Vec<ProductRecord>) -> Self {
        self.products = products;
        self
    }

    pub fn with_recent_invoices(mut self, invoices: Vec<InvoiceRecord>) -> Self {
        self.recent_invoices = invoices;
        self
    }

    pub fn with_client_invoices(
        mut self,
        client_id: &str,
        invoices: Vec<InvoiceRecord>,
    ) -> Self {
        self.client_invoices.insert(client_id.to_string(), invoices);
        self
    }

    /// Make the given operation fail with a 500 status.
    pub fn failing(mut self, call: BackendCall) -> Self {
        self.failures.push(call);
        self
    }

    /// Accept submissions over the wire but answer without an ack.
    pub fn rejecting_submissions(mut self) -> Self {
        self.reject_submissions = true;
        self
    }

    /// Every payload submitted so far, in order.
    pub async fn submissions(&self) -> Vec<InvoicePayload> {
        self.submissions.lock().await.clone()
    }

    fn fail_on(&self, call: BackendCall) -> Result<(), BackendError> {
        if self.failures.contains(&call) {
            return Err(BackendError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryBackend {
    async fn fetch_clients(&self, _tenant: &TenantId) -> Result<Vec<ClientRecord>, BackendError> {
        self.fail_on(BackendCall::Clients)?;
        Ok(self.clients.clone())
    }

    async fn fetch_products(
        &self,
        _tenant: &TenantId,
    ) -> Result<Vec<ProductRecord>, BackendError> {
        self.fail_on(BackendCall::Products)?;
        Ok(self.products.clone())
    }
}

#[async_trait::async_trait]
impl InvoiceStore for InMemoryBackend {
    async fn submit_invoice(&self, payload: &InvoicePayload) -> Result<bool, BackendError> {
        self.fail_on(BackendCall::SubmitInvoice)?;
        self.submissions.lock().await.push(payload.clone());
        Ok(!self.reject_submissions)
    }

    async fn fetch_recent_invoices(
        &self,
        _tenant: &TenantId,
        limit: u32,
    ) -> Result<Vec<InvoiceRecord>, BackendError> {
        self.fail_on(BackendCall::RecentInvoices)?;
        Ok(self.recent_invoices.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_client_invoices(
        &self,
        _tenant: &TenantId,
        client_id: &str,
    ) -> Result<Vec<InvoiceRecord>, BackendError> {
        self.fail_on(BackendCall::ClientInvoices)?;
        Ok(self.client_invoices.get(client_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use invoicey_core::domain::catalog::ClientRecord;
    use invoicey_core::domain::invoice::InvoicePayload;
    use invoicey_core::domain::tenant::TenantId;

    use crate::stores::{BackendError, CatalogStore, InvoiceStore};

    use super::{BackendCall, InMemoryBackend};

    fn sample_payload() -> InvoicePayload {
        InvoicePayload {
            title: "created using Whatsapp".to_string(),
            tenant: TenantId::new("t1"),
            client_id: "c1".to_string(),
            client_match_score: 100,
            items: Vec::new(),
            total_amount: Decimal::ZERO,
        }
    }

    #[tokio::test]
    async fn scripted_failures_only_hit_their_operation() {
        let backend = InMemoryBackend::default()
            .with_clients(vec![ClientRecord {
                id: "c1".to_string(),
                name: "Acme Corp".to_string(),
                email: None,
                contact: None,
                address: None,
            }])
            .failing(BackendCall::Products);
        let tenant = TenantId::new("t1");

        let clients = backend.fetch_clients(&tenant).await.expect("clients fetch");
        assert_eq!(clients.len(), 1);

        let error = backend.fetch_products(&tenant).await.expect_err("products fetch");
        assert!(matches!(error, BackendError::Status { .. }));
    }

    #[tokio::test]
    async fn submissions_are_recorded_in_order() {
        let backend = InMemoryBackend::default();
        let accepted =
            backend.submit_invoice(&sample_payload()).await.expect("submit");
        assert!(accepted);
        assert_eq!(backend.submissions().await.len(), 1);

        let rejecting = InMemoryBackend::default().rejecting_submissions();
        let accepted = rejecting.submit_invoice(&sample_payload()).await.expect("submit");
        assert!(!accepted);
        assert_eq!(rejecting.submissions().await.len(), 1);
    }
}
