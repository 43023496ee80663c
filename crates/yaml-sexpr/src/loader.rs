/*
 * loader.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! YAML loader that builds resolved [`Value`] trees.
//!
//! The loader is driven by yaml-rust2's event parser. It expands aliases,
//! applies merge keys (`<<`) and types scalars, so the converter only ever
//! sees a plain tree.

use crate::resolve::{CORE_TAG_PREFIX, resolve_plain, resolve_tagged};
use crate::value::{Mapping, Tagged, Value};
use crate::{Error, KeyPath, Result, SourceLocation};
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Deepest nesting of flow collections (`[...]`, `{...}`) the YAML parser
/// accepts. Block collections have no parser limit.
pub const MAX_FLOW_DEPTH: usize = u8::MAX as usize;

/// Message yaml-rust2 reports when flow nesting exceeds [`MAX_FLOW_DEPTH`].
const FLOW_DEPTH_MESSAGE: &str = "recursion limit exceeded";

/// Load a single YAML document into a resolved value tree.
///
/// If the input contains multiple documents, only the first one is loaded.
///
/// # Example
///
/// ```rust
/// use yaml_sexpr::{load, Value};
///
/// let value = load("name: Dorothy\nqty: 4").unwrap();
/// assert_eq!(value.get("qty"), Some(&Value::Integer(4)));
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] for invalid YAML, [`Error::DepthExceeded`] when
/// flow collections nest deeper than [`MAX_FLOW_DEPTH`], and
/// [`Error::EmptyDocument`] when the document is empty or its root is null.
pub fn load(content: &str) -> Result<Value> {
    load_impl(content, None)
}

/// Load a YAML document with an associated filename.
///
/// The filename is attached to the source location of any load error.
pub fn load_file(content: &str, filename: &str) -> Result<Value> {
    load_impl(content, Some(filename))
}

/// Load a YAML document from raw bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidEncoding`] if the bytes are not valid UTF-8, with
/// the location of the first invalid byte.
pub fn load_bytes(bytes: &[u8], filename: Option<&str>) -> Result<Value> {
    let content = match std::str::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => {
            let valid = &bytes[..err.valid_up_to()];
            // The prefix is valid UTF-8 by construction
            let prefix = String::from_utf8_lossy(valid);
            let line = prefix.matches('\n').count() + 1;
            let column = prefix.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
            let mut location = SourceLocation::new(None, err.valid_up_to(), line, column);
            if let Some(file) = filename {
                location = location.with_file(file);
            }
            return Err(Error::InvalidEncoding { location });
        }
    };
    load_impl(content, filename)
}

fn load_impl(content: &str, filename: Option<&str>) -> Result<Value> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    tracing::debug!(bytes = content.len(), file = filename, "loading YAML document");

    let mut parser = Parser::new_from_str(content);
    let mut builder = ValueBuilder::new();

    // false = single document only
    if let Err(err) = parser.load(&mut builder, false) {
        let err = if err.info() == FLOW_DEPTH_MESSAGE {
            tracing::debug!(depth = builder.stack.len(), "flow nesting limit reached");
            Error::DepthExceeded {
                max_depth: MAX_FLOW_DEPTH,
                path: builder.open_path(),
            }
        } else {
            Error::from(err)
        };
        return Err(attach_file(err, filename));
    }

    builder.result().map_err(|e| attach_file(e, filename))
}

fn attach_file(err: Error, filename: Option<&str>) -> Error {
    match filename {
        Some(file) => err.with_file(file),
        None => err,
    }
}

/// Builder that implements MarkedEventReceiver to construct a Value tree.
struct ValueBuilder {
    /// Stack of collections being constructed
    stack: Vec<BuildNode>,

    /// Anchored nodes, by yaml-rust2 anchor id
    anchors: HashMap<usize, Value>,

    /// The completed root node
    root: Option<Value>,

    /// First error raised while handling events; later events are ignored
    error: Option<Error>,
}

/// A collection being constructed during parsing.
enum BuildNode {
    Sequence {
        anchor: usize,
        tag: Option<Tag>,
        items: Vec<Value>,
    },

    Mapping {
        start_marker: Marker,
        anchor: usize,
        tag: Option<Tag>,
        entries: Vec<PendingEntry>,
    },
}

/// A mapping entry whose value may not have been seen yet.
struct PendingEntry {
    key: Value,
    /// The key was a plain, untagged `<<`
    merge: bool,
    value: Option<Value>,
}

impl ValueBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Value> {
        if let Some(err) = self.error {
            return Err(err);
        }
        match self.root {
            None | Some(Value::Null) => Err(Error::EmptyDocument),
            Some(root) => Ok(root),
        }
    }

    fn fail(&mut self, message: impl Into<String>, marker: &Marker) {
        if self.error.is_none() {
            self.error = Some(Error::Parse {
                message: message.into(),
                location: Some(SourceLocation::from_marker(marker)),
            });
        }
    }

    /// Path of the node the parser is about to deliver.
    fn open_path(&self) -> KeyPath {
        let mut path = KeyPath::new();
        for node in &self.stack {
            match node {
                BuildNode::Sequence { items, .. } => path.push_index(items.len()),
                BuildNode::Mapping { entries, .. } => {
                    if let Some(PendingEntry {
                        key: Value::String(key),
                        value: None,
                        ..
                    }) = entries.last()
                    {
                        path.push_key(key.as_str());
                    }
                }
            }
        }
        path
    }

    fn remember_anchor(&mut self, anchor: usize, value: &Value) {
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }
    }

    fn push_complete(&mut self, node: Value, merge_key: bool) {
        let Some(parent) = self.stack.last_mut() else {
            // This is the root
            self.root = Some(node);
            return;
        };

        match parent {
            BuildNode::Sequence { items, .. } => items.push(node),
            BuildNode::Mapping { entries, .. } => match entries.last_mut() {
                Some(PendingEntry { value: slot @ None, .. }) => *slot = Some(node),
                _ => entries.push(PendingEntry {
                    key: node,
                    merge: merge_key,
                    value: None,
                }),
            },
        }
    }

    /// True when the next completed node will be a mapping key.
    fn expecting_key(&self) -> bool {
        match self.stack.last() {
            Some(BuildNode::Mapping { entries, .. }) => {
                entries.last().is_none_or(|entry| entry.value.is_some())
            }
            _ => false,
        }
    }

    fn on_scalar(&mut self, value: String, style: TScalarStyle, anchor: usize, tag: Option<Tag>, marker: &Marker) {
        let merge_key = style == TScalarStyle::Plain
            && tag.is_none()
            && value == "<<"
            && self.expecting_key();

        let resolved = match tag {
            Some(tag) => match resolve_tagged(&value, &full_tag(&tag)) {
                Ok(v) => v,
                Err(message) => return self.fail(message, marker),
            },
            None if style == TScalarStyle::Plain => resolve_plain(&value),
            None => Value::String(value),
        };

        if let Value::Tagged(Tagged { tag, .. }) = &resolved {
            tracing::warn!(tag = %tag, line = marker.line(), "unsupported YAML tag");
        }

        self.remember_anchor(anchor, &resolved);
        self.push_complete(resolved, merge_key);
    }

    fn on_sequence_end(&mut self, marker: &Marker) {
        let Some(BuildNode::Sequence { anchor, tag, items }) = self.stack.pop() else {
            return self.fail("sequence end without matching start", marker);
        };
        let value = wrap_collection_tag(Value::Sequence(items), tag.as_ref(), "seq");
        self.remember_anchor(anchor, &value);
        self.push_complete(value, false);
    }

    fn on_mapping_end(&mut self, marker: &Marker) {
        let Some(BuildNode::Mapping {
            start_marker,
            anchor,
            tag,
            entries,
        }) = self.stack.pop()
        else {
            return self.fail("mapping end without matching start", marker);
        };

        let mapping = match build_mapping(entries) {
            Ok(mapping) => mapping,
            Err(message) => return self.fail(message, &start_marker),
        };
        let value = wrap_collection_tag(Value::Mapping(mapping), tag.as_ref(), "map");
        self.remember_anchor(anchor, &value);
        self.push_complete(value, false);
    }
}

impl MarkedEventReceiver for ValueBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(value, style, anchor, tag) => {
                self.on_scalar(value, style, anchor, tag, &marker);
            }

            Event::SequenceStart(anchor, tag) => {
                self.stack.push(BuildNode::Sequence {
                    anchor,
                    tag,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => self.on_sequence_end(&marker),

            Event::MappingStart(anchor, tag) => {
                self.stack.push(BuildNode::Mapping {
                    start_marker: marker,
                    anchor,
                    tag,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => self.on_mapping_end(&marker),

            Event::Alias(anchor) => match self.anchors.get(&anchor).cloned() {
                Some(value) => self.push_complete(value, false),
                None => self.fail("found undefined alias", &marker),
            },

            // Stream and document boundaries carry no data
            _ => {}
        }
    }
}

/// Render a parsed tag the way the resolver expects it.
fn full_tag(tag: &Tag) -> String {
    if tag.handle == "!!" {
        format!("{}{}", CORE_TAG_PREFIX, tag.suffix)
    } else {
        format!("{}{}", tag.handle, tag.suffix)
    }
}

/// Keep a collection as-is for its own core tag, wrap it otherwise.
fn wrap_collection_tag(value: Value, tag: Option<&Tag>, core: &str) -> Value {
    let Some(tag) = tag else {
        return value;
    };
    let full = full_tag(tag);
    if full.strip_prefix(CORE_TAG_PREFIX) == Some(core) || full == "!" {
        return value;
    }
    let tag = match full.strip_prefix(CORE_TAG_PREFIX) {
        Some(suffix) => format!("!!{}", suffix),
        None => full,
    };
    tracing::warn!(tag = %tag, "unsupported YAML tag");
    Value::Tagged(Tagged {
        tag,
        value: Box::new(value),
    })
}

/// Build the final mapping: merged entries first, then explicit ones.
///
/// A later entry with an equal key replaces the value of the earlier one but
/// keeps its position, so explicit keys override merged keys and, within a
/// `<<: [a, b]` list, `a` overrides `b`.
fn build_mapping(entries: Vec<PendingEntry>) -> std::result::Result<Mapping, String> {
    let mut merged: Vec<(Value, Value)> = Vec::new();
    let mut own: Vec<(Value, Value)> = Vec::new();

    for entry in entries {
        let value = entry.value.unwrap_or(Value::Null);
        if !entry.merge {
            own.push((entry.key, value));
            continue;
        }
        match value {
            Value::Mapping(source) => merged.extend(source),
            Value::Sequence(sources) => {
                for source in sources.into_iter().rev() {
                    match source {
                        Value::Mapping(source) => merged.extend(source),
                        other => {
                            return Err(format!(
                                "expected a mapping for merging, but found {}",
                                other.type_name()
                            ));
                        }
                    }
                }
            }
            other => {
                return Err(format!(
                    "expected a mapping or list of mappings for merging, but found {}",
                    other.type_name()
                ));
            }
        }
    }

    let mut result: Vec<(Value, Value)> = Vec::with_capacity(merged.len() + own.len());
    // position of each string key in `result`
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (key, value) in merged.into_iter().chain(own) {
        let existing = match &key {
            Value::String(name) => positions.get(name).copied(),
            other => result.iter().position(|(k, _)| k == other),
        };
        match existing {
            Some(index) => result[index].1 = value,
            None => {
                if let Value::String(name) = &key {
                    positions.insert(name.clone(), result.len());
                }
                result.push((key, value));
            }
        }
    }
    Ok(result.into_iter().collect())
}
