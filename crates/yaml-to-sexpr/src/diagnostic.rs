/*
 * diagnostic.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error reporting for the command line: ariadne reports for located load
//! errors, plain messages otherwise, or one JSON object per line when
//! `--json-errors` is given.

use ariadne::{Color, Label, Report, ReportKind, Source};
use serde::Serialize;
use yaml_sexpr::Error;

/// Machine-readable form of a failure, written to stderr as one JSON line.
#[derive(Debug, Serialize, PartialEq)]
pub struct JsonDiagnostic {
    pub file: Option<String>,
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl JsonDiagnostic {
    pub fn from_error(error: &Error, file: &str) -> Self {
        Self {
            file: Some(file.to_string()),
            kind: error.kind().to_string(),
            message: error.to_string(),
            path: error.path().map(ToString::to_string),
            line: error.location().map(|loc| loc.line),
            column: error.location().map(|loc| loc.column),
        }
    }
}

/// Report a conversion failure for `file` on stderr.
///
/// `source` is the input text when it was valid UTF-8; it is needed to
/// render a report with the offending line underlined.
pub fn report(error: &Error, file: &str, source: Option<&str>, json: bool) {
    if json {
        print_json(&JsonDiagnostic::from_error(error, file));
        return;
    }

    if let Some(rendered) = source.and_then(|src| render_located(error, file, src)) {
        eprint!("{}", rendered);
        return;
    }

    match error.location() {
        Some(loc) if loc.file.is_some() => eprintln!("Error: {}: {}", loc, error),
        _ => eprintln!("Error: {}: {}", file, error),
    }
}

/// Report a failure that is not tied to a YAML document, such as an
/// unreadable input file.
pub fn print_json_failure(error: &anyhow::Error) {
    print_json(&JsonDiagnostic {
        file: None,
        kind: "Io".to_string(),
        message: format!("{:#}", error),
        path: None,
        line: None,
        column: None,
    });
}

fn print_json(diagnostic: &JsonDiagnostic) {
    match serde_json::to_string(diagnostic) {
        Ok(line) => eprintln!("{}", line),
        Err(e) => eprintln!("Error: failed to serialize diagnostic: {}", e),
    }
}

/// Render an ariadne report for errors that carry a source location.
fn render_located(error: &Error, file: &str, source: &str) -> Option<String> {
    let location = error.location()?;

    // ariadne spans count characters, not bytes
    let start = source.get(..location.offset)?.chars().count();
    let total = source.chars().count();
    let end = (start + 1).min(total).max(start);

    let label = match error {
        Error::Parse { message, .. } => message.as_str(),
        _ => "here",
    };

    let mut output = Vec::new();
    Report::build(ReportKind::Error, file.to_string(), start)
        .with_message(error.to_string())
        .with_label(
            Label::new((file.to_string(), start..end))
                .with_message(label)
                .with_color(Color::Red),
        )
        .finish()
        .write((file.to_string(), Source::from(source)), &mut output)
        .ok()?;

    String::from_utf8(output).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_sexpr::{Config, KeyPath, yaml_to_sexpr};

    #[test]
    fn test_json_for_conversion_error() {
        let mut path = KeyPath::new();
        path.push_key("items");
        path.push_index(0);
        let error = Error::UnsupportedType {
            type_name: "!money".into(),
            path,
        };

        let diagnostic = JsonDiagnostic::from_error(&error, "prices.yaml");
        assert_eq!(diagnostic.kind, "UnsupportedType");
        assert_eq!(diagnostic.path.as_deref(), Some("items[0]"));
        assert_eq!(diagnostic.line, None);

        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["file"], "prices.yaml");
        assert_eq!(json["message"], "Unsupported type !money at items[0]");
        assert!(json.get("line").is_none());
    }

    #[test]
    fn test_json_for_parse_error_has_position() {
        let error = yaml_to_sexpr("a: [1, 2\n", &Config::default()).unwrap_err();
        let diagnostic = JsonDiagnostic::from_error(&error, "bad.yaml");
        assert_eq!(diagnostic.kind, "Parse");
        assert!(diagnostic.line.is_some());
        assert!(diagnostic.column.is_some());
        assert_eq!(diagnostic.path, None);
    }

    #[test]
    fn test_render_located_parse_error() {
        let source = "a: [1, 2\n";
        let error = yaml_to_sexpr(source, &Config::default()).unwrap_err();
        let rendered = render_located(&error, "bad.yaml", source).unwrap();
        assert!(rendered.contains("bad.yaml"));
        assert!(rendered.contains("Parse error"));
    }

    #[test]
    fn test_render_skips_unlocated_errors() {
        assert!(render_located(&Error::EmptyDocument, "empty.yaml", "").is_none());
    }
}
