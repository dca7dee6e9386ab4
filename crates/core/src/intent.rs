//! Chat intent classification.
//!
//! Classification is a first-match substring scan over an ordered trigger
//! table. The scan lowercases the incoming text, so triggers are stored
//! lowercase. Anything the table misses is treated as freeform invoice
//! details when the raw text spans multiple lines, otherwise unknown.

/// The commands the chat surface understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentTag {
    Greet,
    ListProducts,
    ListClients,
    CreateInvoicePrompt,
    ListRecentInvoices,
    GetInvoiceByClient,
    FreeformInvoice,
    Unknown,
}

const INTENT_PATTERNS: &[(IntentTag, &[&str])] = &[
    (IntentTag::Greet, &["hi", "hello", "hey", "salam", "assalamualaikum"]),
    (IntentTag::ListProducts, &["get all products", "show products", "products list"]),
    (IntentTag::ListClients, &["get all clients", "show clients", "clients list"]),
    (IntentTag::CreateInvoicePrompt, &["create invoice", "make invoice", "new invoice"]),
    (IntentTag::ListRecentInvoices, &["get last 5 invoices", "recent invoices", "last invoices"]),
    (IntentTag::GetInvoiceByClient, &["get invoice by client", "invoice by client", "client invoice"]),
];

/// Ordered trigger table; earlier entries win when several would match.
#[derive(Clone, Copy, Debug)]
pub struct IntentTable {
    entries: &'static [(IntentTag, &'static [&'static str])],
}

impl Default for IntentTable {
    fn default() -> Self {
        Self { entries: INTENT_PATTERNS }
    }
}

impl IntentTable {
    /// Classify a raw inbound message.
    ///
    /// The newline check runs against the raw text, before any trimming, so
    /// a single-line command with a trailing newline still lands on the
    /// freeform branch rather than the command it resembles only after
    /// normalization.
    pub fn classify(&self, text: &str) -> IntentTag {
        let lowered = text.to_lowercase();
        for (tag, triggers) in self.entries {
            if triggers.iter().any(|trigger| lowered.contains(trigger)) {
                return *tag;
            }
        }
        if text.contains('\n') {
            IntentTag::FreeformInvoice
        } else {
            IntentTag::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IntentTable, IntentTag};

    struct Case {
        text: &'static str,
        expected: IntentTag,
    }

    #[test]
    fn classifies_command_phrases() {
        let table = IntentTable::default();
        let cases = [
            Case { text: "hello", expected: IntentTag::Greet },
            Case { text: "Hey there", expected: IntentTag::Greet },
            Case { text: "assalamualaikum", expected: IntentTag::Greet },
            Case { text: "show products", expected: IntentTag::ListProducts },
            Case { text: "can you get all products", expected: IntentTag::ListProducts },
            Case { text: "clients list", expected: IntentTag::ListClients },
            Case { text: "create invoice", expected: IntentTag::CreateInvoicePrompt },
            Case { text: "please make invoice", expected: IntentTag::CreateInvoicePrompt },
            Case { text: "recent invoices", expected: IntentTag::ListRecentInvoices },
            Case { text: "get last 5 invoices", expected: IntentTag::ListRecentInvoices },
            Case {
                text: "get invoice by client: Acme",
                expected: IntentTag::GetInvoiceByClient,
            },
            Case { text: "what is the weather", expected: IntentTag::Unknown },
        ];

        for case in cases {
            assert_eq!(table.classify(case.text), case.expected, "text: {:?}", case.text);
        }
    }

    #[test]
    fn multiline_text_is_freeform_invoice_details() {
        let table = IntentTable::default();
        let text = "Acme Corp\nblue shirt, 2, 25.50\nmug, 1, 8";
        assert_eq!(table.classify(text), IntentTag::FreeformInvoice);
    }

    #[test]
    fn single_line_gibberish_is_unknown() {
        let table = IntentTable::default();
        assert_eq!(table.classify("fix my router"), IntentTag::Unknown);
    }

    #[test]
    fn trailing_newline_alone_routes_to_freeform() {
        let table = IntentTable::default();
        assert_eq!(table.classify("fix my router\n"), IntentTag::FreeformInvoice);
    }

    #[test]
    fn trigger_matching_is_substring_based() {
        // "this" contains "hi", so the greeting entry catches it first.
        let table = IntentTable::default();
        assert_eq!(table.classify("this is fine"), IntentTag::Greet);
    }

    #[test]
    fn earlier_table_entries_win() {
        // "show products and clients list" matches both listing intents;
        // the product entry sits first in the table.
        let table = IntentTable::default();
        assert_eq!(table.classify("show products and clients list"), IntentTag::ListProducts);
    }
}
