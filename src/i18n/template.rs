//! Minimal message template renderer.
//!
//! Understands a single construct: a `{{ .field }}` action, where `field` is
//! a dotted path into a JSON object (`{{ .user.name }}`). The leading dot is
//! optional and `{{ . }}` renders the data itself. There are no pipelines,
//! conditionals or functions; catalog messages and raw message keys only
//! ever need substitution.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::TemplateError;

static ACTION_REGEX: OnceLock<Regex> = OnceLock::new();

fn action_regex() -> &'static Regex {
    ACTION_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(\.|\.?[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*$")
            .expect("action regex is valid")
    })
}

#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Text(&'a str),
    /// Empty path means the data itself.
    Field(Vec<&'a str>),
}

/// Render `template` against `data`.
///
/// Fails on malformed actions, on fields missing from `data`, and on fields
/// that resolve to arrays or objects.
pub fn render(template: &str, data: Option<&Value>) -> Result<String, TemplateError> {
    let segments = parse(template)?;

    let mut out = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Field(path) => {
                let value = lookup(data, &path)?;
                write_scalar(&mut out, value, &path)?;
            }
        }
    }
    Ok(out)
}

/// Render `key` as a template, returning `key` verbatim if rendering fails.
///
/// This is the degradation path used whenever no translation engine is
/// available for a request.
pub fn fallback_render(key: &str, data: Option<&Value>) -> String {
    render(key, data).unwrap_or_else(|_| key.to_string())
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut pos = 0;

    while pos < template.len() {
        let rest = &template[pos..];
        // `}}` outside an action is plain text.
        let Some(open) = rest.find("{{").map(|i| i + pos) else {
            segments.push(Segment::Text(rest));
            break;
        };

        if open > pos {
            segments.push(Segment::Text(&template[pos..open]));
        }

        let body_start = open + 2;
        let end = template[body_start..]
            .find("}}")
            .map(|i| i + body_start)
            .ok_or(TemplateError::Unclosed(open))?;

        segments.push(Segment::Field(parse_action(&template[body_start..end])?));
        pos = end + 2;
    }

    Ok(segments)
}

fn parse_action(body: &str) -> Result<Vec<&str>, TemplateError> {
    let path = action_regex()
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| TemplateError::InvalidAction(body.trim().to_string()))?;

    let path = path.strip_prefix('.').unwrap_or(path);
    if path.is_empty() {
        return Ok(Vec::new());
    }
    Ok(path.split('.').collect())
}

fn lookup<'v>(data: Option<&'v Value>, path: &[&str]) -> Result<&'v Value, TemplateError> {
    let Some(mut current) = data else {
        return Err(TemplateError::MissingData(display_path(path)));
    };

    for segment in path {
        current = current
            .as_object()
            .and_then(|object| object.get(*segment))
            .ok_or_else(|| TemplateError::MissingField(display_path(path)))?;
    }
    Ok(current)
}

fn write_scalar(out: &mut String, value: &Value, path: &[&str]) -> Result<(), TemplateError> {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => {}
        Value::Array(_) | Value::Object(_) => {
            return Err(TemplateError::NotScalar(display_path(path)))
        }
    }
    Ok(())
}

fn display_path(path: &[&str]) -> String {
    if path.is_empty() {
        ".".to_string()
    } else {
        path.join(".")
    }
}
