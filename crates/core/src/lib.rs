pub mod config;
pub mod domain;
pub mod errors;
pub mod intent;
pub mod invoicing;
pub mod matching;

pub use config::{
    AppConfig, BackendConfig, ConfigError, ConfigOverrides, InvoiceConfig, LoadOptions, LogFormat,
    LoggingConfig, MatchingConfig, ServerConfig, DEFAULT_BACKEND_BASE_URL,
};
pub use domain::catalog::{ClientRecord, ProductRecord, ProductSize};
pub use domain::invoice::{InvoiceItem, InvoicePayload, InvoiceRecord, ItemKind};
pub use domain::tenant::TenantId;
pub use errors::{BuildError, ParseError, UserInputError};
pub use intent::{IntentTable, IntentTag};
pub use invoicing::{
    build_invoice, parse_invoice_text, InvoiceBuild, LineOutcome, ParsedInvoice, SkipReason,
    SkippedLine,
};
pub use matching::{
    best_match, token_sort_ratio, MatchOutcome, MatchPolicy, DEFAULT_MATCH_THRESHOLD,
};
