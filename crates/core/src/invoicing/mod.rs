//! Freeform invoice text handling: line splitting and payload assembly.

pub mod payload;
pub mod text;

pub use payload::{
    build_invoice, InvoiceBuild, LineOutcome, SkipReason, SkippedLine,
};
pub use text::{parse_invoice_text, ParsedInvoice};
