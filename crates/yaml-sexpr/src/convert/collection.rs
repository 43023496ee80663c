/*
 * collection.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Sequence and mapping output.

use super::Emitter;
use crate::value::{Mapping, Value};
use crate::{Error, PathSegment, Result};

/// Check whether a sequence is a record list: non-empty, and every element
/// is a mapping.
///
/// ```rust
/// use yaml_sexpr::{is_record_list, Value};
///
/// let rows = vec![Value::mapping([("id", Value::from(1))])];
/// assert!(is_record_list(&rows));
/// assert!(!is_record_list(&[]));
/// ```
pub fn is_record_list(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_mapping)
}

impl Emitter<'_> {
    /// Record lists become `(<prefix>:item <fields>...)` forms, one per
    /// element; anything else is a plain parenthesized list.
    pub(super) fn emit_sequence(&mut self, items: &[Value]) -> Result<()> {
        if items.is_empty() {
            self.out.push_str("()");
            return Ok(());
        }

        if is_record_list(items) {
            tracing::trace!(path = %self.path, len = items.len(), "record list");
            let item = format!("({}:item ", self.config.prefix);
            for (index, record) in items.iter().enumerate() {
                if index > 0 {
                    self.out.push(' ');
                }
                self.out.push_str(&item);
                self.descend(PathSegment::Index(index), |this| this.emit_value(record))?;
                self.out.push(')');
            }
            return Ok(());
        }

        self.out.push('(');
        for (index, element) in items.iter().enumerate() {
            if index > 0 {
                self.out.push(' ');
            }
            self.descend(PathSegment::Index(index), |this| this.emit_value(element))?;
        }
        self.out.push(')');
        Ok(())
    }

    /// Each entry becomes `(<prefix>:<key> <value>)`, in insertion order.
    pub(super) fn emit_mapping(&mut self, mapping: &Mapping) -> Result<()> {
        if mapping.is_empty() {
            self.out.push_str("()");
            return Ok(());
        }

        for (index, (key, value)) in mapping.iter().enumerate() {
            let Some(key) = key.as_str() else {
                return Err(Error::InvalidKeyType {
                    key_type: key.type_name(),
                    path: self.path.clone(),
                });
            };
            if index > 0 {
                self.out.push(' ');
            }
            self.out.push('(');
            self.out.push_str(&self.config.prefix);
            self.out.push(':');
            self.out.push_str(key);
            self.out.push(' ');
            self.descend(PathSegment::Key(key.to_string()), |this| this.emit_value(value))?;
            self.out.push(')');
        }
        Ok(())
    }
}
