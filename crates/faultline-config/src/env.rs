use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `{{ scope.NAME }}` with an optional `| default("value")`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
});

/// Expand `{{ env.VAR }}` placeholders in raw config text
///
/// A placeholder may carry a fallback, `{{ env.VAR | default("x") }}`, used
/// when the variable is unset. Comment lines are copied verbatim so a
/// commented-out placeholder never requires its variable.
pub fn expand_env(input: &str) -> anyhow::Result<String> {
    input.split_inclusive('\n').map(expand_line).collect()
}

fn expand_line(line: &str) -> anyhow::Result<Cow<'_, str>> {
    if line.trim_start().starts_with('#') || !PLACEHOLDER.is_match(line) {
        return Ok(Cow::Borrowed(line));
    }

    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in PLACEHOLDER.captures_iter(line) {
        let Some(whole) = captures.get(0) else { continue };
        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&captures)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(Cow::Owned(expanded))
}

fn resolve(captures: &Captures<'_>) -> anyhow::Result<String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        anyhow::bail!("only variables scoped with 'env.' are supported: `{key}`");
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => anyhow::bail!("environment variable not found: `{var_name}`"),
    }
}
