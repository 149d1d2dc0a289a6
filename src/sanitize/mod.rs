//! Free-text sanitizing.

/// Strip markup-like tags (`<` up to the next `>`) and trim whitespace.
///
/// A `<` with no closing `>` after it is kept verbatim.
pub fn sanitize_input(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Sanitize an optional field; blank results read as absent.
pub fn sanitize_optional(raw: Option<&str>) -> Option<String> {
    raw.map(sanitize_input).filter(|s| !s.is_empty())
}
