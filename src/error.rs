//! Errors raised while turning schema text into a [`SchemaSpec`](crate::ast::SchemaSpec).
//!
//! Parse and build errors abort construction. Validation problems are not raised
//! here; they are collected by [`crate::validate`] and only wrapped into
//! [`SchemaError::Validation`] by the one-shot helpers.

use crate::validate::ValidationErrors;

/// Malformed schema text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} at offset {offset} in `{fragment}`")]
pub struct ParseError {
    /// Raw text of the construct that failed (usually one field definition).
    pub fragment: String,
    /// Byte offset into the full schema text where the problem was found.
    pub offset: usize,
    pub reason: String,
}

impl ParseError {
    pub fn new(fragment: impl Into<String>, offset: usize, reason: impl Into<String>) -> Self {
        ParseError {
            fragment: fragment.into(),
            offset,
            reason: reason.into(),
        }
    }

    /// Shift the offset by `base`; used when a sub-span was parsed on its own.
    pub(crate) fn rebase(mut self, base: usize) -> Self {
        self.offset += base;
        self
    }
}

/// Structurally invalid schema (well-formed text, inconsistent model).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Duplicate field name: {path}")]
    DuplicateField { path: String },
}

impl BuildError {
    /// Prefix the path with the enclosing field's name.
    pub(crate) fn nested(self, parent: &str) -> Self {
        self.prefixed(parent)
    }

    /// Mark the path as inside an array element (`[]`).
    pub(crate) fn in_element(self) -> Self {
        self.prefixed("[]")
    }

    fn prefixed(self, prefix: &str) -> Self {
        match self {
            BuildError::DuplicateField { path } => BuildError::DuplicateField {
                path: if path.starts_with('[') {
                    format!("{}{}", prefix, path)
                } else {
                    format!("{}.{}", prefix, path)
                },
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Parse: {0}")]
    Parse(#[from] ParseError),
    #[error("Build: {0}")]
    Build(#[from] BuildError),
    #[error("Validation: {0}")]
    Validation(#[from] ValidationErrors),
}
