/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conversion of resolved YAML values to S-expression text.
//!
//! The [`Converter`] walks a [`Value`] tree depth-first and dispatches on each
//! node's variant:
//!
//! | value            | output                                 |
//! |------------------|----------------------------------------|
//! | null             | `nil`                                  |
//! | boolean          | `#t` / `#f`                            |
//! | integer, float   | decimal literal, `+inf.0`, `+nan.0`... |
//! | string           | `'symbol` or `"escaped string"`        |
//! | date             | `(make-date 2012 08 06)`               |
//! | sequence         | `(a b c)` or `(yaml:item ...)` records |
//! | mapping          | `(yaml:key value) ...`                 |
//!
//! Mapping and record-list output are space-separated forms without their
//! own enclosing parentheses; the enclosing key form supplies them.

mod collection;
mod scalar;
mod symbol;

pub use collection::is_record_list;
pub use scalar::{encode_string, escape_string, format_date, format_float};
pub use symbol::{MAX_SYMBOL_LEN, format_symbol, is_symbol};

use crate::value::Value;
use crate::{Error, KeyPath, PathSegment, Result};

/// Namespace prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "yaml";

/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Conversion settings, fixed for the whole traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Token prepended to every mapping key as `<prefix>:<key>`
    pub prefix: String,

    /// Deepest nesting level accepted below the root. Text loaded with
    /// [`crate::load`] is also capped at [`crate::MAX_FLOW_DEPTH`] nested
    /// flow collections, whatever this value.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Converts value trees to S-expression text.
///
/// A converter holds only its immutable [`Config`]; it can be shared freely
/// between threads and reused for any number of documents.
///
/// # Example
///
/// ```rust
/// use yaml_sexpr::{Config, Converter, Value};
///
/// let converter = Converter::new(Config::default());
/// let doc = Value::mapping([("state", Value::from("KS")), ("qty", Value::from(4))]);
/// assert_eq!(
///     converter.convert_document(&doc).unwrap(),
///     "((yaml:state 'KS) (yaml:qty 4))"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: Config,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Prefix a mapping key with the configured namespace.
    pub fn namespace(&self, key: &str) -> String {
        format!("{}:{}", self.config.prefix, key)
    }

    /// Convert a single value.
    ///
    /// Mappings and record lists yield their forms without enclosing
    /// parentheses; use [`Converter::convert_document`] for a complete
    /// top-level expression.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedType`] for tagged values, [`Error::InvalidKeyType`]
    /// for non-string mapping keys and [`Error::DepthExceeded`] when nesting
    /// goes past `max_depth`. Each error carries the key path of the node.
    pub fn convert(&self, value: &Value) -> Result<String> {
        let mut emitter = Emitter::new(&self.config);
        emitter.emit_value(value)?;
        Ok(emitter.out)
    }

    /// Convert a document root into one parenthesized top-level list.
    ///
    /// An empty mapping or sequence at the root yields `()`.
    pub fn convert_document(&self, value: &Value) -> Result<String> {
        tracing::debug!(
            prefix = %self.config.prefix,
            root = value.type_name(),
            "converting document"
        );
        let body = self.convert(value)?;
        let empty = match value {
            Value::Mapping(m) => m.is_empty(),
            Value::Sequence(items) => items.is_empty(),
            _ => false,
        };
        if empty {
            Ok(body)
        } else {
            Ok(format!("({})", body))
        }
    }
}

/// Traversal state for one conversion call.
///
/// Output is accumulated in `out` and only handed back when the whole tree
/// converted successfully.
pub(crate) struct Emitter<'a> {
    config: &'a Config,
    /// Path to the node being converted
    path: KeyPath,
    /// Nesting level of the node being converted (root = 0)
    depth: usize,
    out: String,
}

impl<'a> Emitter<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            path: KeyPath::new(),
            depth: 0,
            out: String::new(),
        }
    }

    /// Run `f` one level deeper, with `segment` appended to the path.
    fn descend<F>(&mut self, segment: PathSegment, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        match segment {
            PathSegment::Key(key) => self.path.push_key(key),
            PathSegment::Index(index) => self.path.push_index(index),
        }
        self.depth += 1;

        let result = if self.depth > self.config.max_depth {
            Err(Error::DepthExceeded {
                max_depth: self.config.max_depth,
                path: self.path.clone(),
            })
        } else {
            f(self)
        };

        self.depth -= 1;
        self.path.pop();
        result
    }

    fn emit_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.out.push_str("nil"),
            Value::Boolean(b) => self.out.push_str(if *b { "#t" } else { "#f" }),
            Value::Integer(i) => self.out.push_str(&i.to_string()),
            Value::Float(f) => self.out.push_str(&format_float(*f)),
            Value::String(s) => self.out.push_str(&encode_string(s)),
            Value::Date(d) => self.out.push_str(&format_date(d)),
            Value::Sequence(items) => self.emit_sequence(items)?,
            Value::Mapping(mapping) => self.emit_mapping(mapping)?,
            Value::Tagged(tagged) => {
                return Err(Error::UnsupportedType {
                    type_name: tagged.tag.clone(),
                    path: self.path.clone(),
                });
            }
        }
        Ok(())
    }
}
