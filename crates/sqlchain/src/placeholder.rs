//! Positional `?` placeholder scanning.
//!
//! Only quoting and comments are tokenized: a `?` inside `'...'`, `"..."`,
//! `-- ...` or `/* ... */` is literal text, every other `?` is a placeholder.
//! In escape strings (`E'...'`) a backslash also escapes the next byte.

/// Count `?` placeholders in `sql`.
pub fn count(sql: &str) -> usize {
    offsets(sql).len()
}

/// Rewrite `?` placeholders into numbered `$1, $2, ...` markers.
pub fn to_numbered(sql: &str) -> String {
    let positions = offsets(sql);
    let mut out = String::with_capacity(sql.len() + positions.len() * 2);
    let mut start = 0;
    for (n, pos) in positions.into_iter().enumerate() {
        out.push_str(&sql[start..pos]);
        out.push('$');
        out.push_str(&(n + 1).to_string());
        start = pos + 1;
    }
    out.push_str(&sql[start..]);
    out
}

/// Byte offsets of every placeholder in `sql`.
fn offsets(sql: &str) -> Vec<usize> {
    let bytes = sql.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                let escapes = quote == b'\'' && is_escape_prefix(bytes, i);
                i += 1;
                while i < bytes.len() {
                    if escapes && bytes[i] == b'\\' {
                        i += 2;
                        continue;
                    }
                    if bytes[i] == quote {
                        // doubled quote is an escape
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = sql[i..].find('\n').map_or(bytes.len(), |p| i + p + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = sql[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
            }
            b'?' => {
                found.push(i);
                i += 1;
            }
            _ => i += 1,
        }
    }
    found
}

/// Whether the quote at `quote` opens an `E'...'` literal: preceded by a
/// lone `E`/`e`, not by the tail of a longer identifier.
fn is_escape_prefix(bytes: &[u8], quote: usize) -> bool {
    let Some(prefix) = quote.checked_sub(1) else {
        return false;
    };
    if !matches!(bytes[prefix], b'E' | b'e') {
        return false;
    }
    prefix == 0 || !is_ident_byte(bytes[prefix - 1])
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
