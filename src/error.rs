use thiserror::Error;

/// Errors produced while parsing, validating or writing VCF text.
#[derive(Error, Debug)]
pub enum Error {
    /// A structured header payload does not follow the `<K=V,...>` grammar.
    #[error("invalid tag list `{text}`, ({reason})")]
    Grammar { text: String, reason: String },

    /// A structured header line lacks a tag mandated for its kind.
    #[error("{key} header line `{line}` is missing required tag `{tag}`")]
    RequiredTagMissing {
        key: String,
        tag: String,
        line: String,
    },

    /// A header or data line has the wrong shape or a non-numeric field.
    #[error("{message}: `{text}`")]
    Schema { message: String, text: String },

    /// An allele or attribute lookup could not be resolved.
    #[error("{0}")]
    Reference(String),

    /// A record does not agree with the header it is written against.
    #[error("{0}")]
    Consistency(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn grammar(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Grammar {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn schema(message: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
            text: text.into(),
        }
    }

    pub fn reference(message: impl Into<String>) -> Self {
        Self::Reference(message.into())
    }

    pub fn consistency(message: impl Into<String>) -> Self {
        Self::Consistency(message.into())
    }
}
