//! Lexical helpers for locating statement terminators in SQL text.
//!
//! A `;` only counts as a terminator outside string literals ('...'), quoted
//! identifiers ("...", `...`, [...]) and comments (-- and /* */).

/// Byte offset of the first statement terminator in `sql`.
pub fn first_terminator(sql: &str) -> Option<usize> {
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b';' => return Some(i),
            b'\'' | b'"' | b'`' => i = skip_quoted(bytes, i),
            b'[' => i = skip_past(bytes, i + 1, b"]"),
            b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_past(bytes, i + 2, b"\n"),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_past(bytes, i + 2, b"*/"),
            _ => i += 1,
        }
    }
    None
}

/// True when `sql` holds at most one statement: anything after the first
/// terminator is whitespace or comments.
pub fn is_single_statement(sql: &str) -> bool {
    match first_terminator(sql) {
        Some(end) => is_trivia(&sql[end + 1..]),
        None => true,
    }
}

/// Index just past the closing quote of the literal opening at `start`.
/// A doubled quote inside the literal is an escaped quote.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_past(bytes: &[u8], from: usize, end: &[u8]) -> usize {
    bytes
        .get(from..)
        .and_then(|rest| rest.windows(end.len()).position(|w| w == end))
        .map(|pos| from + pos + end.len())
        .unwrap_or(bytes.len())
}

fn is_trivia(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b if b.is_ascii_whitespace() => i += 1,
            b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_past(bytes, i + 2, b"\n"),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_past(bytes, i + 2, b"*/"),
            _ => return false,
        }
    }
    true
}
