//! Built-in English messages, the last link of the mapper chain.

use serde_json::{Number, Value};

use crate::error::{IssueKind, RawIssue};

fn number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => format!("{}", f),
        _ => n.to_string(),
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => number(n),
        other => other.to_string(),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number(n),
        other => other.to_string(),
    }
}

fn size_unit(origin: &str) -> Option<&'static str> {
    match origin {
        "string" => Some("characters"),
        "array" | "set" => Some("items"),
        "file" => Some("bytes"),
        _ => None,
    }
}

fn format_noun(format: &str) -> &str {
    match format {
        "email" => "email address",
        "url" => "URL",
        "uuid" => "UUID",
        "datetime" => "ISO datetime",
        "date" => "ISO date",
        other => other,
    }
}

fn bound_message(prefix: &str, origin: &str, op: &str, limit: &Value) -> String {
    match size_unit(origin) {
        Some(unit) => format!(
            "{}: expected {} to have {}{} {}",
            prefix,
            origin,
            op,
            plain(limit),
            unit
        ),
        None => format!("{}: expected {} to be {}{}", prefix, origin, op, plain(limit)),
    }
}

/// Default message for an issue.
pub fn default_message(issue: &RawIssue) -> String {
    match &issue.kind {
        IssueKind::InvalidType { expected, received } => {
            format!("Invalid input: expected {}, received {}", expected, received)
        }
        IssueKind::InvalidValue { values } => match values.as_slice() {
            [single] => format!("Invalid input: expected {}", quoted(single)),
            many => format!(
                "Invalid option: expected one of {}",
                many.iter().map(quoted).collect::<Vec<_>>().join("|")
            ),
        },
        IssueKind::TooSmall {
            origin,
            minimum,
            inclusive,
            exact,
        } => {
            let op = if *exact {
                ""
            } else if *inclusive {
                ">="
            } else {
                ">"
            };
            bound_message("Too small", origin, op, minimum)
        }
        IssueKind::TooBig {
            origin,
            maximum,
            inclusive,
            exact,
        } => {
            let op = if *exact {
                ""
            } else if *inclusive {
                "<="
            } else {
                "<"
            };
            bound_message("Too big", origin, op, maximum)
        }
        IssueKind::TooFew { minimum, received } => format!(
            "Too small: expected array to have >={} items, received {}",
            minimum, received
        ),
        IssueKind::TooMany { maximum, received } => format!(
            "Too big: expected array to have <={} items, received {}",
            maximum, received
        ),
        IssueKind::NotMultipleOf { divisor } => {
            format!("Invalid number: must be a multiple of {}", plain(divisor))
        }
        IssueKind::UnrecognizedKeys { keys } => format!(
            "Unrecognized key{}: {}",
            if keys.len() > 1 { "s" } else { "" },
            keys.iter()
                .map(|key| format!("\"{}\"", key))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        IssueKind::InvalidUnion { .. } => "Invalid input".to_string(),
        IssueKind::InvalidFormat { format, pattern } => {
            let pattern = pattern.as_deref().unwrap_or_default();
            match format.as_str() {
                "starts_with" => format!("Invalid string: must start with \"{}\"", pattern),
                "ends_with" => format!("Invalid string: must end with \"{}\"", pattern),
                "includes" => format!("Invalid string: must include \"{}\"", pattern),
                "regex" => format!("Invalid string: must match pattern {}", pattern),
                "lowercase" => "Invalid string: must be lowercase".to_string(),
                "uppercase" => "Invalid string: must be uppercase".to_string(),
                other => format!("Invalid {}", format_noun(other)),
            }
        }
        IssueKind::Custom { .. } => "Invalid input".to_string(),
    }
}
