use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::tenant::TenantId;

/// Invoice summary row as the backend returns it. Every field is optional
/// on the wire; rendering falls back to blanks and zero amounts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "totalAmount", default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    #[serde(rename = "amountReceived", default, skip_serializing_if = "Option::is_none")]
    pub amount_received: Option<Decimal>,
    #[serde(rename = "paymentStatus", default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

impl InvoiceRecord {
    /// Issue date, falling back to the backend's `createdAt` stamp.
    pub fn date_or_created(&self) -> String {
        self.date.clone().or_else(|| self.created_at.clone()).unwrap_or_default()
    }
}

/// Kind recorded on a resolved invoice line. `Service` marks matches that
/// cleared acceptance but fell short of the strong-match threshold; with
/// both thresholds equal the band is empty and every line is a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Product,
    Service,
}

/// One resolved invoice line. Field declaration order is the wire order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub product_id: String,
    pub product: String,
    pub quantity: u32,
    pub price: Decimal,
    pub match_score: u8,
}

/// Complete invoice submission. Field declaration order is the wire order,
/// and `total_amount` always equals the sum of `quantity * price` over
/// exactly the items present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoicePayload {
    pub title: String,
    pub tenant: TenantId,
    pub client_id: String,
    pub client_match_score: u8,
    pub items: Vec<InvoiceItem>,
    pub total_amount: Decimal,
}
