//! Error types for qail-ir.

use thiserror::Error;

/// The main error type for compilation and configuration.
#[derive(Debug, Error)]
pub enum IrError {
    /// A construct the chosen dialect has no rendering for.
    #[error("Unsupported construct for {dialect}: {construct}")]
    Unsupported {
        construct: &'static str,
        dialect: &'static str,
    },

    /// A column reference whose source alias is not in scope.
    #[error("Unknown source alias: '{0}'")]
    UnknownAlias(String),

    /// A column missing from a table's declared column list.
    #[error("Unknown column '{column}' on '{table}'")]
    UnknownColumn { table: String, column: String },

    /// A field missing from a projection or join result.
    #[error("Unknown field '{field}' on virtual source '{alias}'")]
    UnknownField { alias: String, field: String },

    /// A tree whose shape has no SQL rendering.
    #[error("Malformed query: {0}")]
    Malformed(String),

    /// Internal consistency fault. Reaching this is a bug in the caller's
    /// tree construction or in the compiler itself.
    #[error("Internal compiler error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IrError {
    /// Create an unsupported-construct error.
    pub fn unsupported(construct: &'static str, dialect: &'static str) -> Self {
        Self::Unsupported { construct, dialect }
    }

    /// Create a malformed-tree error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Result type alias for qail-ir operations.
pub type IrResult<T> = Result<T, IrError>;
