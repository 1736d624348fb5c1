//! Percent-encoding for wiki link targets.

/// Characters escaped by [`percent_encode`], in application order.
///
/// `%` comes first so escapes introduced by later entries are never
/// escaped again. This is a restricted subset of RFC 3986: anything not
/// listed here, including non-ASCII text, is emitted as-is.
pub const ESCAPE_TABLE: [(char, &str); 20] = [
    ('%', "%25"),
    (' ', "%20"),
    ('!', "%21"),
    ('#', "%23"),
    ('$', "%24"),
    ('&', "%26"),
    ('\'', "%27"),
    ('(', "%28"),
    (')', "%29"),
    ('*', "%2A"),
    ('+', "%2B"),
    (',', "%2C"),
    ('/', "%2F"),
    (':', "%3A"),
    (';', "%3B"),
    ('=', "%3D"),
    ('?', "%3F"),
    ('@', "%40"),
    ('[', "%5B"),
    (']', "%5D"),
];

/// Returns the escape sequence for `c`, if the table lists it.
fn escape_for(c: char) -> Option<&'static str> {
    ESCAPE_TABLE
        .iter()
        .find(|(target, _)| *target == c)
        .map(|(_, escape)| *escape)
}

/// Percent-encodes a string for use in a URL path segment.
///
/// Each input character is examined once, which gives the same result as
/// replacing every table entry in order over the whole string. Absent input
/// encodes to the empty string.
///
/// # Examples
///
/// ```
/// use wikirender::percent_encode;
///
/// assert_eq!(percent_encode("a b"), "a%20b");
/// assert_eq!(percent_encode(None), "");
/// ```
pub fn percent_encode<'a>(input: impl Into<Option<&'a str>>) -> String {
    let Some(input) = input.into() else {
        return String::new();
    };

    let mut encoded = String::with_capacity(input.len());
    for c in input.chars() {
        match escape_for(c) {
            Some(escape) => encoded.push_str(escape),
            None => encoded.push(c),
        }
    }
    encoded
}
