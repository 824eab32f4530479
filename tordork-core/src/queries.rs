//! Dork list parsing

/// Parse a newline-delimited dork list.
///
/// Every line is trimmed; blank lines are dropped. No other structure is
/// imposed on a query.
pub fn parse_queries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shorten a query for status lines
pub fn query_preview(query: &str) -> String {
    query.chars().take(crate::QUERY_PREVIEW_CHARS).collect()
}
