use std::sync::OnceLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// Placeholder expansion failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    /// Referenced variable is unset and has no default
    #[error("line {line}: environment variable `{name}` is not set")]
    MissingVariable { name: String, line: usize },

    /// Placeholder is not of the form `env.NAME`
    #[error("line {line}: unsupported placeholder `{key}`, expected `env.NAME`")]
    UnsupportedScope { key: String, line: usize },
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    // `{{ key }}` or `{{ key | default("value") }}`
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\)\s*)?\}\}"#)
            .expect("placeholder pattern must be valid")
    })
}

/// Replace `{{ env.NAME }}` placeholders in raw config text
///
/// Comment lines are copied through untouched, so a commented-out setting
/// never requires its variable to be set.
///
/// # Errors
///
/// Returns an error for an unset variable without a default, or for a
/// placeholder outside the `env` scope
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut expanded = Vec::new();

    for (index, line) in input.lines().enumerate() {
        if line.trim_start().starts_with('#') {
            expanded.push(line.to_owned());
            continue;
        }

        expanded.push(expand_line(line, index + 1)?);
    }

    let mut output = expanded.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str, line_number: usize) -> Result<String, ExpandError> {
    let mut output = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else { continue };

        output.push_str(&line[cursor..whole.start()]);
        output.push_str(&resolve(&captures, line_number)?);
        cursor = whole.end();
    }

    output.push_str(&line[cursor..]);
    Ok(output)
}

fn resolve(captures: &Captures<'_>, line: usize) -> Result<String, ExpandError> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(name) = key.strip_prefix("env.").filter(|name| !name.is_empty() && !name.contains('.')) else {
        return Err(ExpandError::UnsupportedScope {
            key: key.to_owned(),
            line,
        });
    };

    match (std::env::var(name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => Err(ExpandError::MissingVariable {
            name: name.to_owned(),
            line,
        }),
    }
}
