//! Parameter extraction from capture groups.

use crate::router::pattern::Capture;

/// A positional route parameter. `None` when its group did not participate.
pub type Param = Option<String>;

/// Turn capture groups into positional parameters.
///
/// Nested optional groups such as `/blog(/\d{4}(/\d{2})?)?` make an outer
/// group swallow the text of the groups inside it. When the next group took
/// part in the match, the current value is therefore cut where that group
/// starts. Leading and trailing `/` are trimmed from every value.
pub fn extract(captures: &[Option<Capture<'_>>]) -> Vec<Param> {
    captures
        .iter()
        .enumerate()
        .map(|(index, capture)| {
            let capture = capture.as_ref()?;
            let text = match captures.get(index + 1) {
                Some(Some(next)) => {
                    let own_len = next.offset.saturating_sub(capture.offset);
                    capture.text.get(..own_len).unwrap_or(capture.text)
                }
                _ => capture.text,
            };
            Some(text.trim_matches('/').to_string())
        })
        .collect()
}
