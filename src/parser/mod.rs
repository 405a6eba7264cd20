//! Parsing of the "brief options" line shown under each search result.
//!
//! The line reads `symbol | date | collection`, e.g.
//! `A/RES/2758 (XXVI) | 1971-10-25 | Resolutions and Decisions`.

/// Field delimiter of the brief-options line.
const DELIMITER: char = '|';

/// Extracts `(document_symbol, date)` from a brief-options line.
///
/// Segments are trimmed. The text after the last `|` is the collection label
/// and is never taken as a field, so the symbol needs at least one `|` and
/// the date at least two. Missing fields come back empty. Embedded `|`
/// characters are not escaped and will mis-split.
///
/// # Example
///
/// ```
/// use undl_core::parser::parse_brief_options;
///
/// let (symbol, date) =
///     parse_brief_options("A/RES/2758 (XXVI) | 1971-10-25 | Resolutions and Decisions");
/// assert_eq!(symbol, "A/RES/2758 (XXVI)");
/// assert_eq!(date, "1971-10-25");
/// ```
#[must_use]
pub fn parse_brief_options(text: &str) -> (String, String) {
    let segments: Vec<&str> = text.split(DELIMITER).map(str::trim).collect();
    // The last segment is the trailing collection label.
    let fields = &segments[..segments.len().saturating_sub(1)];

    let field = |index: usize| fields.get(index).map_or_else(String::new, |s| (*s).to_string());
    (field(0), field(1))
}
