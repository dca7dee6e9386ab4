use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier scoping every catalog and invoice query to one
/// customer organization. The core never persists or interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::TenantId;

    #[test]
    fn serializes_as_bare_string() {
        let tenant = TenantId::new("68dfd3eceee9d45175067cbd");
        let json = serde_json::to_string(&tenant).expect("serialize tenant");
        assert_eq!(json, "\"68dfd3eceee9d45175067cbd\"");
    }

    #[test]
    fn displays_inner_value() {
        assert_eq!(TenantId::new("acme").to_string(), "acme");
    }
}
