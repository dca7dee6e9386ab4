use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Client entity as the backend returns it. Only `_id` and `name` are
/// guaranteed; the contact fields are enrichment data some tenants fill in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ClientRecord {
    /// Fuzzy-match key. Records without a usable name are excluded from
    /// scoring entirely rather than compared as empty strings.
    pub fn match_key(&self) -> Option<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(name.to_lowercase())
    }
}

/// Size qualifier nested under a product ("XL", "500ml", ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSize {
    #[serde(default)]
    pub name: String,
}

/// Product entity as the backend returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ProductSize>,
}

impl ProductRecord {
    /// Display key used for fuzzy matching and on built invoice lines:
    /// casefolded name plus the size qualifier, e.g. "shirt xl". `None`
    /// when the record carries no usable name at all.
    pub fn display_key(&self) -> Option<String> {
        let size = self.size.as_ref().map(|size| size.name.as_str()).unwrap_or("");
        let combined = format!("{} {}", self.name, size);
        let key = combined.trim();
        if key.is_empty() {
            return None;
        }
        Some(key.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientRecord, ProductRecord};

    #[test]
    fn decodes_backend_client_shape() {
        let json = r#"{
            "_id": "66f1a2",
            "name": "Acme Corp",
            "email": "billing@acme.example",
            "createdAt": "2024-01-05T10:00:00Z"
        }"#;

        let client: ClientRecord = serde_json::from_str(json).expect("decode client");
        assert_eq!(client.id, "66f1a2");
        assert_eq!(client.name, "Acme Corp");
        assert_eq!(client.email.as_deref(), Some("billing@acme.example"));
        assert!(client.contact.is_none());
    }

    #[test]
    fn decodes_product_with_numeric_and_string_prices() {
        let numeric: ProductRecord =
            serde_json::from_str(r#"{"_id": "p1", "name": "Widget", "price": 12.5}"#)
                .expect("decode numeric price");
        let stringy: ProductRecord =
            serde_json::from_str(r#"{"_id": "p2", "name": "Widget", "price": "12.5"}"#)
                .expect("decode string price");

        assert_eq!(numeric.price, stringy.price);
    }

    #[test]
    fn display_key_joins_name_and_size() {
        let product: ProductRecord = serde_json::from_str(
            r#"{"_id": "p1", "name": "Shirt", "size": {"name": "XL"}}"#,
        )
        .expect("decode product");
        assert_eq!(product.display_key().as_deref(), Some("shirt xl"));
    }

    #[test]
    fn display_key_without_size_is_just_the_name() {
        let product = ProductRecord {
            id: "p1".to_string(),
            name: "Widget".to_string(),
            price: None,
            size: None,
        };
        assert_eq!(product.display_key().as_deref(), Some("widget"));
    }

    #[test]
    fn blank_names_yield_no_keys() {
        let product = ProductRecord {
            id: "p1".to_string(),
            name: "  ".to_string(),
            price: None,
            size: None,
        };
        assert!(product.display_key().is_none());

        let client = ClientRecord {
            id: "c1".to_string(),
            name: String::new(),
            email: None,
            contact: None,
            address: None,
        };
        assert!(client.match_key().is_none());
    }
}
