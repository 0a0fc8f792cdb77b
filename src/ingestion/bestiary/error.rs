//! Error types for statblock feature extraction.
//!
//! Every variant is fatal for the record being processed and for nothing
//! else: the assembler converts them into skipped-record entries.

/// Result type alias using [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors raised while flattening a single monster record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// A required key is absent and has no documented default.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Dotted path of the missing key.
        field: String,
    },

    /// A value is present but does not follow its grammar.
    #[error("cannot parse `{field}` value {value:?}")]
    Unparseable {
        /// Dotted path of the offending key.
        field: String,
        /// The raw text that failed to parse.
        value: String,
    },

    /// A value is present but has none of the anticipated shapes.
    #[error("`{field}` has an unexpected shape (expected {expected})")]
    MalformedShape {
        /// Dotted path of the offending key.
        field: String,
        /// Human-readable list of the accepted shapes.
        expected: &'static str,
    },
}

impl ExtractError {
    /// Create a missing-field error.
    pub fn missing(field: impl Into<String>) -> Self {
        ExtractError::MissingField {
            field: field.into(),
        }
    }

    /// Create an unparseable-value error.
    pub fn unparseable(field: impl Into<String>, value: impl Into<String>) -> Self {
        ExtractError::Unparseable {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a malformed-shape error.
    pub fn malformed(field: impl Into<String>, expected: &'static str) -> Self {
        ExtractError::MalformedShape {
            field: field.into(),
            expected,
        }
    }

    /// The key path this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ExtractError::MissingField { field }
            | ExtractError::Unparseable { field, .. }
            | ExtractError::MalformedShape { field, .. } => field,
        }
    }
}
