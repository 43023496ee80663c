/*
 * location.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source locations for load errors.

use serde::Serialize;
use std::fmt;

/// Position of a YAML construct in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Optional filename or source identifier
    pub file: Option<String>,

    /// Byte offset from start of source (0-based)
    pub offset: usize,

    /// Line number (1-based)
    pub line: usize,

    /// Column number (1-based, in characters not bytes)
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: Option<String>, offset: usize, line: usize, column: usize) -> Self {
        Self {
            file,
            offset,
            line,
            column,
        }
    }

    /// Create a location from a yaml-rust2 marker.
    ///
    /// yaml-rust2 reports 1-based lines and 0-based columns.
    pub fn from_marker(marker: &yaml_rust2::scanner::Marker) -> Self {
        Self {
            file: None,
            offset: marker.index(),
            line: marker.line().max(1),
            column: marker.col() + 1,
        }
    }

    /// Set the filename for this location.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self {
            file: None,
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}
