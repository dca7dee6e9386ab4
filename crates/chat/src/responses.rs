//! Chat reply envelope and its row shapes.
//!
//! Field declaration order is the wire order. Optional sections are omitted
//! entirely when absent, so a plain text reply serializes as `{"bot": ...}`
//! and nothing else.

use rust_decimal::Decimal;
use serde::Serialize;

use invoicey_core::domain::catalog::{ClientRecord, ProductRecord};
use invoicey_core::domain::invoice::{InvoicePayload, InvoiceRecord};
use invoicey_core::errors::UserInputError;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatReply {
    pub bot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clients: Option<Vec<ClientRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoices: Option<InvoiceRows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoicePayload>,
}

/// Invoice listings come in two row shapes depending on the lookup.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InvoiceRows {
    Recent(Vec<RecentInvoiceRow>),
    ByClient(Vec<ClientInvoiceRow>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductRow {
    pub name: String,
    pub product_id: String,
    pub price: Decimal,
}

impl ProductRow {
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            name: record.name.clone(),
            product_id: record.id.clone(),
            price: record.price.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientRow {
    pub name: String,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ClientRow {
    pub fn from_record(record: &ClientRecord) -> Self {
        Self {
            name: record.name.clone(),
            client_id: record.id.clone(),
            email: record.email.clone(),
            contact: record.contact.clone(),
            address: record.address.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecentInvoiceRow {
    pub sequence: u32,
    pub client_name: String,
    pub client_id: String,
    pub date: String,
    #[serde(rename = "totalAmount")]
    pub total_amount: Decimal,
    #[serde(rename = "amountReceived")]
    pub amount_received: Decimal,
    #[serde(rename = "paymentStatus")]
    pub payment_status: String,
}

impl RecentInvoiceRow {
    pub fn from_record(sequence: u32, record: &InvoiceRecord, client_name: String) -> Self {
        Self {
            sequence,
            client_name,
            client_id: record.client.clone().unwrap_or_default(),
            date: record.date_or_created(),
            total_amount: record.total_amount.unwrap_or_default(),
            amount_received: record.amount_received.unwrap_or_default(),
            payment_status: record.payment_status.clone().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientInvoiceRow {
    pub sequence: u32,
    pub invoice_title: String,
    pub date: String,
    #[serde(rename = "totalAmount")]
    pub total_amount: Decimal,
    #[serde(rename = "paymentStatus")]
    pub payment_status: String,
}

impl ClientInvoiceRow {
    pub fn from_record(sequence: u32, record: &InvoiceRecord) -> Self {
        Self {
            sequence,
            invoice_title: record.title.clone().unwrap_or_default(),
            date: record.date_or_created(),
            total_amount: record.total_amount.unwrap_or_default(),
            payment_status: record.payment_status.clone().unwrap_or_default(),
        }
    }
}

impl ChatReply {
    fn text(bot: impl Into<String>) -> Self {
        Self {
            bot: bot.into(),
            commands: None,
            products: None,
            clients: None,
            invoices: None,
            invoice: None,
        }
    }

    pub fn greeting() -> Self {
        Self {
            commands: Some(vec![
                "Type 'get all products' to see all products.".to_string(),
                "Type 'get all clients' to see all clients.".to_string(),
                "Type 'create invoice' to make a new invoice.".to_string(),
                "Type 'get invoice by client: ClientName' to fetch invoices.".to_string(),
                "Type 'get last 5 invoices' to fetch last 5 invoices.".to_string(),
            ]),
            ..Self::text("Hello! I’m your assistant bot.")
        }
    }

    pub fn invoice_format_prompt() -> Self {
        Self::text(
            "Please send invoice details in this format:\n\n\
             ClientName\n\
             Product1, Quantity, Price\n\
             Product2, Quantity, Price",
        )
    }

    pub fn unknown_command() -> Self {
        Self::text("Sorry, I didn't understand that. Type 'hello' to see what I can do.")
    }

    pub fn product_listing(rows: Vec<ProductRow>) -> Self {
        if rows.is_empty() {
            return Self::text("No products found.");
        }
        let count = rows.len();
        Self { products: Some(rows), ..Self::text(format!("Found {count} products.")) }
    }

    pub fn client_listing(rows: Vec<ClientRow>) -> Self {
        if rows.is_empty() {
            return Self::text("No clients found.");
        }
        let count = rows.len();
        Self { clients: Some(rows), ..Self::text(format!("Found {count} clients.")) }
    }

    pub fn recent_invoices(limit: u32, rows: Vec<RecentInvoiceRow>) -> Self {
        if rows.is_empty() {
            return Self::text("No invoices found.");
        }
        Self {
            invoices: Some(InvoiceRows::Recent(rows)),
            ..Self::text(format!("Last {limit} invoices:"))
        }
    }

    pub fn client_invoices(client_name: &str, rows: Vec<ClientInvoiceRow>) -> Self {
        if rows.is_empty() {
            return Self::text(format!("No invoices found for client '{client_name}'."));
        }
        Self {
            invoices: Some(InvoiceRows::ByClient(rows)),
            ..Self::text(format!("Invoices for {client_name}:"))
        }
    }

    pub fn invoice_created(payload: InvoicePayload) -> Self {
        Self { invoice: Some(payload), ..Self::text("Invoice created successfully!") }
    }

    pub fn user_error(error: &UserInputError) -> Self {
        Self::text(error.user_message())
    }

    pub fn catalog_unavailable() -> Self {
        Self::text("Error talking to server.")
    }

    pub fn recent_invoices_unavailable() -> Self {
        Self::text("Error fetching invoices from server.")
    }

    pub fn client_invoices_unavailable() -> Self {
        Self::text("Error fetching client invoices from server.")
    }

    pub fn submission_failed() -> Self {
        Self::text("Error creating invoice.")
    }
}
