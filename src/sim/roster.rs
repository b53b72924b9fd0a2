//! Participant list parsing

/// Parse a newline-delimited list of names.
///
/// Lines are trimmed and blank lines dropped. Order and duplicates are kept.
pub fn parse_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
