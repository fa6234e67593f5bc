/// Parse the free-form label override input, e.g. `["bug", "ui"]` or `bug,ui`.
///
/// Returns `None` when no override was given, meaning the request's own
/// labels should be used.
pub fn parse_input_labels(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let inner = raw.strip_prefix('[').unwrap_or(raw);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    Some(
        inner
            .split(',')
            .map(|label| label.replace('"', "").trim().to_string())
            .filter(|label| !label.is_empty())
            .collect(),
    )
}
