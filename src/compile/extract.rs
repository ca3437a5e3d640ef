use crate::types::span::Span;
use crate::types::syntax::Syntax;

/// Scans the text for top level sigils and returns their spans in order of
/// appearance, duplicates included.
///
/// Delimiters are balanced by counting depth, so only the outermost sigil of
/// a nested one is returned. A sigil is dropped if it contains an odd number
/// of single or double quotes. Unterminated sigils are never returned, this
/// function does not fail.
pub fn spans(syntax: &Syntax<'_>, text: &str) -> Vec<Span> {
    // Delimiters are valid UTF-8 so they can only ever match at a char
    // boundary, which means slicing the text at the found offsets is safe.
    //
    // xxxx[xx[xx]xx]xxx
    //     ^         ^
    //     start     i

    let begin = syntax.begin.as_bytes();
    let end = syntax.end.as_bytes();
    let bytes = text.as_bytes();

    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(begin) {
            if depth == 0 {
                start = i;
            }
            depth += 1;
            i += begin.len();
        } else if depth > 0 && rest.starts_with(end) {
            depth -= 1;
            i += end.len();
            if depth == 0 {
                let span = Span::from(start..i);
                if has_balanced_quotes(&text[span]) {
                    spans.push(span);
                }
            }
        } else {
            i += 1;
        }
    }

    spans
}

/// Returns `true` if the text contains at least one begin delimiter followed
/// later by an end delimiter.
pub fn contains_sigil(syntax: &Syntax<'_>, text: &str) -> bool {
    match text.find(syntax.begin.as_str()) {
        Some(i) => text[i + syntax.begin.len()..].contains(syntax.end.as_str()),
        None => false,
    }
}

fn has_balanced_quotes(s: &str) -> bool {
    let count = |q| s.bytes().filter(|&b| b == q).count();
    count(b'\'') % 2 == 0 && count(b'"') % 2 == 0
}
