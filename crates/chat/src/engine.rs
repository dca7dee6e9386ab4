use std::collections::HashMap;

use tracing::warn;

use invoicey_backend::stores::{CatalogStore, InvoiceStore};
use invoicey_core::config::AppConfig;
use invoicey_core::domain::catalog::ClientRecord;
use invoicey_core::domain::tenant::TenantId;
use invoicey_core::errors::UserInputError;
use invoicey_core::intent::{IntentTable, IntentTag};
use invoicey_core::invoicing::{build_invoice, parse_invoice_text};
use invoicey_core::matching::{best_match, MatchPolicy};

use crate::responses::{ChatReply, ClientInvoiceRow, ClientRow, ProductRow, RecentInvoiceRow};

/// Tunables the engine needs from the application config.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    pub policy: MatchPolicy,
    pub invoice_title: String,
    pub recent_limit: u32,
}

impl EngineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            policy: config.matching.policy(),
            invoice_title: config.invoice.title.clone(),
            recent_limit: config.invoice.recent_limit,
        }
    }
}

/// Stateless chat front end: classifies a message, runs the matching
/// backend operation, and renders a reply. Every user-facing failure is a
/// normal reply; backend errors are logged and translated, never surfaced
/// raw.
pub struct ChatEngine<B> {
    backend: B,
    intents: IntentTable,
    settings: EngineSettings,
}

impl<B> ChatEngine<B>
where
    B: CatalogStore + InvoiceStore,
{
    pub fn new(backend: B, settings: EngineSettings) -> Self {
        Self { backend, intents: IntentTable::default(), settings }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn resolve_intent(&self, text: &str) -> IntentTag {
        self.intents.classify(text)
    }

    pub async fn handle_message(&self, text: &str, tenant: &TenantId) -> ChatReply {
        match self.intents.classify(text) {
            IntentTag::Greet => ChatReply::greeting(),
            IntentTag::CreateInvoicePrompt => ChatReply::invoice_format_prompt(),
            IntentTag::ListProducts => self.list_products(tenant).await,
            IntentTag::ListClients => self.list_clients(tenant).await,
            IntentTag::ListRecentInvoices => self.recent_invoices(tenant).await,
            IntentTag::GetInvoiceByClient => match client_query(text) {
                Some(query) => self.invoices_for_client(tenant, &query).await,
                None => ChatReply::user_error(&UserInputError::MissingClientQuery),
            },
            IntentTag::FreeformInvoice => self.create_invoice_from_text(tenant, text).await,
            IntentTag::Unknown => ChatReply::unknown_command(),
        }
    }

    async fn list_products(&self, tenant: &TenantId) -> ChatReply {
        match self.backend.fetch_products(tenant).await {
            Ok(products) => {
                ChatReply::product_listing(products.iter().map(ProductRow::from_record).collect())
            }
            Err(error) => {
                warn!(error = %error, "product listing failed against the backend");
                ChatReply::catalog_unavailable()
            }
        }
    }

    async fn list_clients(&self, tenant: &TenantId) -> ChatReply {
        match self.backend.fetch_clients(tenant).await {
            Ok(clients) => {
                ChatReply::client_listing(clients.iter().map(ClientRow::from_record).collect())
            }
            Err(error) => {
                warn!(error = %error, "client listing failed against the backend");
                ChatReply::catalog_unavailable()
            }
        }
    }

    async fn recent_invoices(&self, tenant: &TenantId) -> ChatReply {
        let limit = self.settings.recent_limit;
        let invoices = match self.backend.fetch_recent_invoices(tenant, limit).await {
            Ok(invoices) => invoices,
            Err(error) => {
                warn!(error = %error, "recent invoice fetch failed");
                return ChatReply::recent_invoices_unavailable();
            }
        };
        if invoices.is_empty() {
            return ChatReply::recent_invoices(limit, Vec::new());
        }

        // The client-name join is best effort: a failed catalog fetch
        // degrades to blank names instead of an error reply.
        let client_names: HashMap<String, String> =
            match self.backend.fetch_clients(tenant).await {
                Ok(clients) => {
                    clients.into_iter().map(|client| (client.id, client.name)).collect()
                }
                Err(error) => {
                    warn!(error = %error, "client-name join failed; rendering blank names");
                    HashMap::new()
                }
            };

        let rows = invoices
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let client_name = record
                    .client
                    .as_ref()
                    .and_then(|id| client_names.get(id))
                    .cloned()
                    .unwrap_or_default();
                RecentInvoiceRow::from_record(index as u32 + 1, record, client_name)
            })
            .collect();
        ChatReply::recent_invoices(limit, rows)
    }

    async fn invoices_for_client(&self, tenant: &TenantId, query: &str) -> ChatReply {
        let clients = match self.backend.fetch_clients(tenant).await {
            Ok(clients) => clients,
            Err(error) => {
                warn!(error = %error, "client catalog fetch failed");
                return ChatReply::catalog_unavailable();
            }
        };

        let outcome = best_match(
            query,
            &clients,
            ClientRecord::match_key,
            self.settings.policy.acceptance_threshold,
        );
        let Some(client) = outcome.entity else {
            return ChatReply::user_error(&UserInputError::UnknownClient {
                query: query.to_string(),
            });
        };

        let invoices = match self.backend.fetch_client_invoices(tenant, &client.id).await {
            Ok(invoices) => invoices,
            Err(error) => {
                warn!(error = %error, client_id = %client.id, "client invoice fetch failed");
                return ChatReply::client_invoices_unavailable();
            }
        };

        let rows = invoices
            .iter()
            .enumerate()
            .map(|(index, record)| ClientInvoiceRow::from_record(index as u32 + 1, record))
            .collect();
        ChatReply::client_invoices(&client.name, rows)
    }

    async fn create_invoice_from_text(&self, tenant: &TenantId, text: &str) -> ChatReply {
        let parsed = match parse_invoice_text(text) {
            Ok(parsed) => parsed,
            Err(error) => return ChatReply::user_error(&error.into()),
        };

        let clients = match self.backend.fetch_clients(tenant).await {
            Ok(clients) => clients,
            Err(error) => {
                warn!(error = %error, "client catalog fetch failed during invoice build");
                return ChatReply::catalog_unavailable();
            }
        };
        let products = match self.backend.fetch_products(tenant).await {
            Ok(products) => products,
            Err(error) => {
                warn!(error = %error, "product catalog fetch failed during invoice build");
                return ChatReply::catalog_unavailable();
            }
        };

        let build = match build_invoice(
            &parsed,
            &clients,
            &products,
            &self.settings.policy,
            tenant,
            &self.settings.invoice_title,
        ) {
            Ok(build) => build,
            Err(error) => return ChatReply::user_error(&error.into()),
        };

        for skip in &build.skipped {
            warn!(line_no = skip.line_no, reason = %skip.reason, "invoice line skipped");
        }

        match self.backend.submit_invoice(&build.payload).await {
            Ok(true) => ChatReply::invoice_created(build.payload),
            Ok(false) => {
                warn!("backend answered the invoice submission without an ack");
                ChatReply::submission_failed()
            }
            Err(error) => {
                warn!(error = %error, "invoice submission failed");
                ChatReply::submission_failed()
            }
        }
    }
}

/// Extract the client name after the first `:` in a by-client lookup.
fn client_query(text: &str) -> Option<String> {
    let (_, after) = text.split_once(':')?;
    let query = after.trim();
    if query.is_empty() {
        return None;
    }
    Some(query.to_string())
}
