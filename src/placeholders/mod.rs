//! Positional placeholder scanning.
//!
//! The builder keeps its own count of bound values, but raw fragments (`where_raw`,
//! `append_raw`, [`crate::query::Query`]) can contain `?` markers written by hand. Before a
//! statement reaches a driver the rendered SQL is scanned so the placeholder and
//! parameter counts can be compared.

mod scanner;

use scanner::{
    State, is_block_comment_end, is_block_comment_start, is_closing_quote, is_line_comment_start,
};

/// Count `?` placeholders outside of quoted literals, quoted identifiers, and comments.
///
/// Numbered placeholders such as `?1` are counted once per occurrence.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut state = State::Normal;
    let mut count = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::BacktickQuoted,
                b'?' => count += 1,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment;
                    idx += 1;
                }
                _ => {}
            },
            State::SingleQuoted | State::DoubleQuoted | State::BacktickQuoted => {
                let quote = match state {
                    State::SingleQuoted => b'\'',
                    State::DoubleQuoted => b'"',
                    _ => b'`',
                };
                match is_closing_quote(bytes, idx, quote) {
                    Some(true) => state = State::Normal,
                    Some(false) => idx += 1, // escaped quote
                    None => {}
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            // Block comments do not nest: the first `*/` ends them.
            State::BlockComment => {
                if is_block_comment_end(bytes, idx) {
                    state = State::Normal;
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_bare_placeholders() {
        assert_eq!(count_placeholders("SELECT * FROM t WHERE a = ? AND b = ?"), 2);
        assert_eq!(count_placeholders("SELECT 1"), 0);
    }

    #[test]
    fn skips_literals_identifiers_and_comments() {
        let sql = "SELECT '?', \"?\", `a?` -- ?\n/* ? */ FROM t WHERE a = ?";
        assert_eq!(count_placeholders(sql), 1);
    }

    #[test]
    fn block_comments_end_at_first_terminator() {
        assert_eq!(
            count_placeholders("SELECT * FROM t /* a /* b */ WHERE x = ?"),
            1
        );
        assert_eq!(count_placeholders("SELECT ? /* ? /* ? */ , ? */"), 2);
        assert_eq!(count_placeholders("SELECT 1 /* unterminated ?"), 0);
    }

    #[test]
    fn handles_escaped_quotes() {
        assert_eq!(count_placeholders("SELECT 'it''s ?' WHERE x = ?"), 1);
    }

    #[test]
    fn counts_numbered_placeholders_per_occurrence() {
        assert_eq!(count_placeholders("INSERT INTO t VALUES (?1, ?2)"), 2);
    }
}
