//! Error types for rs-table-tracer.
//!
//! This module defines the errors returned by tracing operations and the
//! [`ErrorContext`] value callers attach to validation failures.

use std::fmt;

use crate::structure::TableId;

/// Where in a tracing run an error was raised.
///
/// Obtained from [`TraceState::error_context`](crate::TraceState::error_context)
/// inside a transformer or listener and carried by the error itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Table being traced when the error occurred.
    pub table_id: Option<TableId>,

    /// Row ordinal (1-based) within that table.
    pub row: Option<usize>,

    /// Column ordinal (1-based, skipped offsets excluded) within that row.
    pub column: Option<usize>,

    /// Logical name of the column, if one was mapped.
    pub column_name: Option<String>,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(id) = self.table_id {
            parts.push(format!("table {id}"));
        }
        if let Some(row) = self.row {
            parts.push(format!("row {row}"));
        }
        match (&self.column_name, self.column) {
            (Some(name), _) => parts.push(format!("column \"{name}\"")),
            (None, Some(column)) => parts.push(format!("column {column}")),
            (None, None) => {}
        }

        if parts.is_empty() {
            f.write_str("outside of iteration")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Error type for tracing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend cannot read the given source.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// A method was called outside the window where it is allowed, or a
    /// backend was asked for something it does not support.
    #[error("Cannot call \"{method}\": {reason}")]
    Usage {
        /// The offending method.
        method: &'static str,
        /// What to do instead.
        reason: String,
    },

    /// A caller-supplied transformer rejected a scraped value.
    #[error("Validation failed at {context}: {message}")]
    Validation {
        /// Validator message.
        message: String,
        /// Position of the rejected value.
        context: ErrorContext,
    },

    /// A row did not produce the number of columns a transformer expected.
    #[error("Expected {expected} columns but collected {actual} at {context}")]
    ColumnCountMismatch {
        /// Column count the transformer expected.
        expected: usize,
        /// Column count actually collected.
        actual: usize,
        /// Row that failed.
        context: ErrorContext,
    },
}

impl Error {
    /// Builds a usage error for `method`.
    pub(crate) fn usage(method: &'static str, reason: impl Into<String>) -> Self {
        Self::Usage {
            method,
            reason: reason.into(),
        }
    }

    /// Builds a validation error carrying `context`.
    pub fn validation(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Validation {
            message: message.into(),
            context,
        }
    }
}

/// Result type alias for tracing operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display_prefers_column_name() {
        let context = ErrorContext {
            table_id: Some(TableId::new(0xab)),
            row: Some(2),
            column: Some(3),
            column_name: Some("price".to_string()),
        };
        assert_eq!(context.to_string(), "table 00000000000000ab, row 2, column \"price\"");
    }

    #[test]
    fn test_empty_context_display() {
        assert_eq!(ErrorContext::default().to_string(), "outside of iteration");
    }

    #[test]
    fn test_usage_error_names_method() {
        let err = Error::usage("set_column_names", "use a Row/Start listener");
        assert!(err.to_string().contains("\"set_column_names\""));
    }
}
