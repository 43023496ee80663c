//! # yaml-sexpr
//!
//! Conversion of YAML documents into Scheme-style S-expressions.
//!
//! The crate has two halves:
//!
//! - a **loader** ([`load`], [`load_file`], [`load_bytes`]) built on
//!   yaml-rust2's event parser that produces a fully resolved [`Value`] tree:
//!   aliases expanded, merge keys applied, scalars typed;
//! - a **converter** ([`Converter`]) that turns a value tree into
//!   deterministic S-expression text.
//!
//! ## Output conventions
//!
//! Mapping entries become `(<prefix>:<key> <value>)` forms. Strings that look
//! like identifiers or codes become quoted symbols (`'KS`), other strings are
//! escaped literals. Sequences of mappings are record lists, with one
//! `(<prefix>:item ...)` form per element.
//!
//! ## Example
//!
//! ```rust
//! use yaml_sexpr::{yaml_to_sexpr, Config};
//!
//! let yaml = r#"
//! products:
//!   - id: P001
//!     price: 9.99
//!   - id: P002
//!     price: 14.99
//! "#;
//!
//! let sexpr = yaml_to_sexpr(yaml, &Config::default()).unwrap();
//! assert_eq!(
//!     sexpr,
//!     "((yaml:products (yaml:item (yaml:id 'P001) (yaml:price 9.99)) \
//!      (yaml:item (yaml:id 'P002) (yaml:price 14.99))))"
//! );
//! ```

mod convert;
mod error;
mod loader;
mod location;
mod path;
mod resolve;
mod value;

pub use convert::{
    Config, Converter, DEFAULT_MAX_DEPTH, DEFAULT_PREFIX, MAX_SYMBOL_LEN, encode_string,
    escape_string, format_date, format_float, format_symbol, is_record_list, is_symbol,
};
pub use error::{Error, Result};
pub use loader::{MAX_FLOW_DEPTH, load, load_bytes, load_file};
pub use location::SourceLocation;
pub use path::{KeyPath, PathSegment};
pub use value::{Mapping, Tagged, Value};

/// Load a YAML document and convert it to a top-level S-expression.
pub fn yaml_to_sexpr(content: &str, config: &Config) -> Result<String> {
    let value = load(content)?;
    Converter::new(config.clone()).convert_document(&value)
}
