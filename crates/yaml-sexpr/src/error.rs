/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for loading and converting YAML.

use crate::{KeyPath, SourceLocation};
use thiserror::Error;

/// Result type alias for yaml-sexpr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading YAML or converting it to an S-expression.
///
/// Every error is terminal for the conversion call: no partial output is
/// produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A node's variant has no S-expression rendering.
    #[error("Unsupported type {type_name} at {path}")]
    UnsupportedType { type_name: String, path: KeyPath },

    /// A mapping key is not a string.
    #[error("Mapping key must be a string, got {key_type} at {path}")]
    InvalidKeyType {
        key_type: &'static str,
        path: KeyPath,
    },

    /// Input text is not valid UTF-8.
    #[error("Invalid UTF-8 in input at byte {}", .location.offset)]
    InvalidEncoding { location: SourceLocation },

    /// Nesting deeper than the configured limit.
    #[error("Maximum nesting depth of {max_depth} exceeded at {path}")]
    DepthExceeded { max_depth: usize, path: KeyPath },

    /// YAML syntax or structure error reported while loading.
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        location: Option<SourceLocation>,
    },

    /// The document is empty or its root is null.
    #[error("YAML document is empty or contains only null values")]
    EmptyDocument,
}

impl Error {
    /// Stable name of the error kind, used for machine-readable diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::UnsupportedType { .. } => "UnsupportedType",
            Error::InvalidKeyType { .. } => "InvalidKeyType",
            Error::InvalidEncoding { .. } => "InvalidEncoding",
            Error::DepthExceeded { .. } => "DepthExceeded",
            Error::Parse { .. } => "Parse",
            Error::EmptyDocument => "EmptyDocument",
        }
    }

    /// Key path of the offending node, for conversion errors.
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            Error::UnsupportedType { path, .. }
            | Error::InvalidKeyType { path, .. }
            | Error::DepthExceeded { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Source location, for load errors that have one.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Error::InvalidEncoding { location } => Some(location),
            Error::Parse { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    /// Attach a filename to the source location, if there is one.
    pub fn with_file(mut self, file: &str) -> Self {
        match &mut self {
            Error::InvalidEncoding { location }
            | Error::Parse {
                location: Some(location),
                ..
            } => location.file = Some(file.to_string()),
            _ => {}
        }
        self
    }
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::Parse {
            message: err.info().to_string(),
            location: Some(SourceLocation::from_marker(err.marker())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_path() {
        let mut path = KeyPath::new();
        path.push_key("items");
        path.push_index(1);
        path.push_key("price");

        let err = Error::UnsupportedType {
            type_name: "!money".into(),
            path,
        };
        assert_eq!(err.to_string(), "Unsupported type !money at items[1].price");
        assert_eq!(err.kind(), "UnsupportedType");
        assert_eq!(err.path().map(|p| p.to_string()).as_deref(), Some("items[1].price"));
    }

    #[test]
    fn test_with_file_sets_location_file() {
        let err = Error::Parse {
            message: "bad".into(),
            location: Some(SourceLocation::new(None, 3, 1, 4)),
        }
        .with_file("input.yaml");
        assert_eq!(
            err.location().and_then(|l| l.file.as_deref()),
            Some("input.yaml")
        );

        let err = Error::EmptyDocument.with_file("input.yaml");
        assert!(err.location().is_none());
    }
}
