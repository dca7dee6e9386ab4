use crate::errors::ParseError;

/// Raw invoice text split into its client header and item lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedInvoice {
    pub client_header: String,
    pub item_lines: Vec<String>,
}

/// Split freeform invoice text into a client header and item lines.
///
/// Lines are trimmed and blank lines dropped before the split, so blank
/// lines between the header and the items, or among the items, are
/// harmless. The first surviving line is the client header; everything
/// after it is an item line. Text with no surviving lines is an error.
pub fn parse_invoice_text(raw: &str) -> Result<ParsedInvoice, ParseError> {
    let mut lines = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string);

    let client_header = lines.next().ok_or(ParseError::Empty)?;
    Ok(ParsedInvoice { client_header, item_lines: lines.collect() })
}
