use thiserror::Error;

/// Failures while splitting raw invoice text into header and item lines.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invoice text contains no non-blank lines")]
    Empty,
}

/// Failures that abort an invoice build outright.
///
/// Per-line problems are not errors; they surface as skipped lines on the
/// build result instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("no client matched '{query}'")]
    UnknownClient { query: String },
    #[error("every item line was skipped")]
    NoResolvedItems,
}

/// User-correctable problems, each with a chat-facing message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UserInputError {
    #[error("empty invoice text")]
    EmptyInvoiceText,
    #[error("no client matched '{query}'")]
    UnknownClient { query: String },
    #[error("no item lines resolved")]
    NoResolvedItems,
    #[error("missing client query")]
    MissingClientQuery,
}

impl UserInputError {
    /// The exact sentence shown to the chat user.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInvoiceText => "No details provided.".to_string(),
            Self::UnknownClient { query } => {
                format!("No matching client found for '{query}'")
            }
            Self::NoResolvedItems => {
                "No valid products found. Please follow the format properly.".to_string()
            }
            Self::MissingClientQuery => {
                "Please provide a client name, e.g. 'get invoice by client: ClientName'."
                    .to_string()
            }
        }
    }
}

impl From<ParseError> for UserInputError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Empty => Self::EmptyInvoiceText,
        }
    }
}

impl From<BuildError> for UserInputError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::UnknownClient { query } => Self::UnknownClient { query },
            BuildError::NoResolvedItems => Self::NoResolvedItems,
        }
    }
}
