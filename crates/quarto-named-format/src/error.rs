/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template rewriting and positional formatting.

use thiserror::Error;

/// Errors that can occur while formatting a named template.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A placeholder was opened but never closed.
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// Neither the resolver nor the fallback produced a value for a key.
    #[error("Key not found: '{key}'")]
    KeyNotFound { key: String },

    /// A dotted path ran into a null value before it was exhausted.
    #[error("Cannot read '{member}' of null while resolving '{path}'")]
    TraversalTerminated { path: String, member: String },

    /// A dotted path named a member that does not exist.
    #[error("No property or field '{member}' while resolving '{path}'")]
    InvalidPropertyPath { path: String, member: String },

    /// Custom placeholder markers are unusable.
    #[error("Invalid placeholder markers: {message}")]
    InvalidMarkers { message: String },

    /// The positional template is malformed.
    #[error("Invalid format string at offset {offset}: {message}")]
    InvalidFormatString { offset: usize, message: String },

    /// A positional index has no matching argument.
    #[error("Index {index} is out of range for {len} argument(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The value kind does not understand the format specifier.
    #[error("Format specifier '{specifier}' is not valid for {value}")]
    InvalidFormatSpecifier { specifier: String, value: String },

    /// Writing the rendered text to a sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    pub(crate) fn unterminated(offset: usize) -> Self {
        FormatError::Syntax {
            offset,
            message: "unterminated placeholder".to_string(),
        }
    }
}

/// Result type for formatting operations.
pub type FormatResult<T> = Result<T, FormatError>;
