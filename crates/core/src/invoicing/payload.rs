use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    domain::{
        catalog::{ClientRecord, ProductRecord},
        invoice::{InvoiceItem, InvoicePayload, ItemKind},
        tenant::TenantId,
    },
    errors::BuildError,
    invoicing::text::ParsedInvoice,
    matching::{best_match, MatchPolicy},
};

/// Why an item line was dropped from the build.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("expected 3 comma-separated fields, found {found}")]
    FieldCount { found: usize },
    #[error("quantity '{raw}' is not a positive whole number")]
    InvalidQuantity { raw: String },
    #[error("price '{raw}' is not a non-negative amount")]
    InvalidPrice { raw: String },
    #[error("no product matched '{query}' (best score {score})")]
    NoProductMatch { query: String, score: u8 },
}

/// A dropped item line, numbered from 1 within the item section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_no: usize,
    pub reason: SkipReason,
}

/// Outcome of resolving a single item line.
#[derive(Clone, Debug, PartialEq)]
pub enum LineOutcome {
    Resolved(InvoiceItem),
    Skipped(SkippedLine),
}

/// A finished invoice build: the payload plus the lines it dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct InvoiceBuild {
    pub payload: InvoicePayload,
    pub skipped: Vec<SkippedLine>,
}

/// Assemble an invoice payload from parsed text and catalog snapshots.
///
/// The client header must fuzzy-match a client at or above the acceptance
/// threshold, otherwise the whole build fails. Item lines resolve
/// independently: malformed or unmatched lines are skipped and reported,
/// never fatal, unless every line is skipped. The payload total is the sum
/// of `quantity * price` over exactly the resolved items.
pub fn build_invoice(
    parsed: &ParsedInvoice,
    clients: &[ClientRecord],
    products: &[ProductRecord],
    policy: &MatchPolicy,
    tenant: &TenantId,
    title: &str,
) -> Result<InvoiceBuild, BuildError> {
    let client_outcome = best_match(
        &parsed.client_header,
        clients,
        ClientRecord::match_key,
        policy.acceptance_threshold,
    );
    let Some(client) = client_outcome.entity else {
        return Err(BuildError::UnknownClient { query: parsed.client_header.clone() });
    };

    let mut items = Vec::new();
    let mut skipped = Vec::new();
    let mut total = Decimal::ZERO;

    for (index, line) in parsed.item_lines.iter().enumerate() {
        match resolve_item_line(index + 1, line, products, policy) {
            LineOutcome::Resolved(item) => {
                total += item.price * Decimal::from(item.quantity);
                items.push(item);
            }
            LineOutcome::Skipped(skip) => skipped.push(skip),
        }
    }

    if items.is_empty() {
        return Err(BuildError::NoResolvedItems);
    }

    Ok(InvoiceBuild {
        payload: InvoicePayload {
            title: title.to_string(),
            tenant: tenant.clone(),
            client_id: client.id.clone(),
            client_match_score: client_outcome.score,
            items,
            total_amount: total,
        },
        skipped,
    })
}

/// Resolve one `name, quantity, price` line against the product catalog.
pub fn resolve_item_line(
    line_no: usize,
    raw_line: &str,
    products: &[ProductRecord],
    policy: &MatchPolicy,
) -> LineOutcome {
    let skip = |reason| LineOutcome::Skipped(SkippedLine { line_no, reason });

    let fields: Vec<&str> = raw_line.split(',').map(str::trim).collect();
    let [name, quantity_raw, price_raw] = fields.as_slice() else {
        return skip(SkipReason::FieldCount { found: fields.len() });
    };

    let quantity = match quantity_raw.parse::<u32>() {
        Ok(quantity) if quantity > 0 => quantity,
        _ => return skip(SkipReason::InvalidQuantity { raw: quantity_raw.to_string() }),
    };

    let price = match price_raw.parse::<Decimal>() {
        Ok(price) if !price.is_sign_negative() => price,
        _ => return skip(SkipReason::InvalidPrice { raw: price_raw.to_string() }),
    };

    let outcome = best_match(
        name,
        products,
        ProductRecord::display_key,
        policy.acceptance_threshold,
    );
    let Some(product) = outcome.entity else {
        return skip(SkipReason::NoProductMatch {
            query: name.to_string(),
            score: outcome.score,
        });
    };

    let kind = if policy.is_strong(outcome.score) {
        ItemKind::Product
    } else {
        ItemKind::Service
    };

    LineOutcome::Resolved(InvoiceItem {
        kind,
        product_id: product.id.clone(),
        product: product.display_key().unwrap_or_default(),
        quantity,
        price,
        match_score: outcome.score,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{build_invoice, resolve_item_line, LineOutcome, SkipReason};
    use crate::{
        domain::{
            catalog::{ClientRecord, ProductRecord, ProductSize},
            invoice::ItemKind,
            tenant::TenantId,
        },
        errors::BuildError,
        invoicing::text::parse_invoice_text,
        matching::MatchPolicy,
    };

    fn client(id: &str, name: &str) -> ClientRecord {
        ClientRecord {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            contact: None,
            address: None,
        }
    }

    fn product(id: &str, name: &str) -> ProductRecord {
        ProductRecord { id: id.to_string(), name: name.to_string(), price: None, size: None }
    }

    fn catalog() -> (Vec<ClientRecord>, Vec<ProductRecord>) {
        (
            vec![client("c1", "Acme Corp"), client("c2", "Globex")],
            vec![product("p1", "Blue Shirt"), product("p2", "Mug")],
        )
    }

    fn dec(text: &str) -> Decimal {
        text.parse().expect("decimal literal")
    }

    #[test]
    fn builds_payload_and_skips_unmatched_lines() {
        let (clients, products) = catalog();
        let parsed = parse_invoice_text(
            "Acme Corp\nblue shirt, 2, 25.50\nnonexistent product xyz, 1, 10\nmug, 1, 8",
        )
        .expect("parse");

        let build = build_invoice(
            &parsed,
            &clients,
            &products,
            &MatchPolicy::default(),
            &TenantId::new("t1"),
            "created using Whatsapp",
        )
        .expect("build");

        assert_eq!(build.payload.client_id, "c1");
        assert_eq!(build.payload.items.len(), 2);
        assert_eq!(build.payload.items[0].product_id, "p1");
        assert_eq!(build.payload.items[0].quantity, 2);
        assert_eq!(build.payload.items[1].product_id, "p2");
        assert_eq!(build.payload.total_amount, dec("59.00"));

        assert_eq!(build.skipped.len(), 1);
        assert_eq!(build.skipped[0].line_no, 2);
        assert!(matches!(build.skipped[0].reason, SkipReason::NoProductMatch { .. }));
    }

    #[test]
    fn unknown_client_fails_the_whole_build() {
        let (clients, products) = catalog();
        let parsed = parse_invoice_text("Completely Unrelated Pty\nmug, 1, 8").expect("parse");

        let err = build_invoice(
            &parsed,
            &clients,
            &products,
            &MatchPolicy::default(),
            &TenantId::new("t1"),
            "created using Whatsapp",
        )
        .expect_err("unknown client");

        assert_eq!(
            err,
            BuildError::UnknownClient { query: "Completely Unrelated Pty".to_string() }
        );
    }

    #[test]
    fn all_lines_skipped_fails_the_build() {
        let (clients, products) = catalog();
        let parsed =
            parse_invoice_text("Acme Corp\nmug, zero, 8\ntotally unknown thing, 1, 5")
                .expect("parse");

        let err = build_invoice(
            &parsed,
            &clients,
            &products,
            &MatchPolicy::default(),
            &TenantId::new("t1"),
            "created using Whatsapp",
        )
        .expect_err("no items");

        assert_eq!(err, BuildError::NoResolvedItems);
    }

    #[test]
    fn payload_carries_the_real_client_score() {
        let (clients, products) = catalog();
        let parsed = parse_invoice_text("Acme Crp\nmug, 1, 8").expect("parse");

        let build = build_invoice(
            &parsed,
            &clients,
            &products,
            &MatchPolicy::default(),
            &TenantId::new("t1"),
            "created using Whatsapp",
        )
        .expect("build");

        assert_eq!(build.payload.client_match_score, 89);
        assert_eq!(build.payload.items[0].match_score, 100);
    }

    #[test]
    fn mid_band_matches_are_service_lines() {
        let products = vec![product("p1", "Blue Shirt")];
        let policy = MatchPolicy::new(70, 90);

        let LineOutcome::Resolved(near) =
            resolve_item_line(1, "bleu shirt, 1, 20", &products, &policy)
        else {
            panic!("near match should resolve");
        };
        assert_eq!(near.kind, ItemKind::Service);
        assert_eq!(near.match_score, 80);

        let LineOutcome::Resolved(exact) =
            resolve_item_line(1, "blue shirt, 1, 20", &products, &policy)
        else {
            panic!("exact match should resolve");
        };
        assert_eq!(exact.kind, ItemKind::Product);
        assert_eq!(exact.match_score, 100);
    }

    #[test]
    fn sized_products_resolve_by_their_display_key() {
        let sized = ProductRecord {
            id: "p3".to_string(),
            name: "Shirt".to_string(),
            price: Some(dec("30")),
            size: Some(ProductSize { name: "XL".to_string() }),
        };

        let LineOutcome::Resolved(item) = resolve_item_line(
            1,
            "shirt xl, 1, 30",
            &[sized],
            &MatchPolicy::default(),
        ) else {
            panic!("sized product should resolve");
        };
        assert_eq!(item.product, "shirt xl");
        assert_eq!(item.match_score, 100);
    }

    #[test]
    fn malformed_lines_report_their_reason() {
        let products = vec![product("p2", "Mug")];
        let policy = MatchPolicy::default();

        struct Case {
            line: &'static str,
            expected: SkipReason,
        }

        let cases = [
            Case { line: "mug, 2", expected: SkipReason::FieldCount { found: 2 } },
            Case { line: "mug, 2, 8, extra", expected: SkipReason::FieldCount { found: 4 } },
            Case {
                line: "mug, 0, 8",
                expected: SkipReason::InvalidQuantity { raw: "0".to_string() },
            },
            Case {
                line: "mug, two, 8",
                expected: SkipReason::InvalidQuantity { raw: "two".to_string() },
            },
            Case {
                line: "mug, -1, 8",
                expected: SkipReason::InvalidQuantity { raw: "-1".to_string() },
            },
            Case {
                line: "mug, 2, -8",
                expected: SkipReason::InvalidPrice { raw: "-8".to_string() },
            },
            Case {
                line: "mug, 2, cheap",
                expected: SkipReason::InvalidPrice { raw: "cheap".to_string() },
            },
        ];

        for case in cases {
            let LineOutcome::Skipped(skip) = resolve_item_line(3, case.line, &products, &policy)
            else {
                panic!("line should be skipped: {:?}", case.line);
            };
            assert_eq!(skip.line_no, 3);
            assert_eq!(skip.reason, case.expected, "line: {:?}", case.line);
        }
    }

    #[test]
    fn free_items_are_allowed() {
        let products = vec![product("p2", "Mug")];
        let LineOutcome::Resolved(item) =
            resolve_item_line(1, "mug, 3, 0", &products, &MatchPolicy::default())
        else {
            panic!("zero price should resolve");
        };
        assert_eq!(item.price, Decimal::ZERO);
    }
}
