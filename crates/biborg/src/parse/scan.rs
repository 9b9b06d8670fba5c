//! Cursor level readers for BibTeX source text.
//!
//! Every reader takes the whole input and a byte position and returns the position just past
//! whatever it consumed. Positions are always on `char` boundaries; all of the delimiters are
//! ascii so slicing next to them is valid. Readers never index past the end of the input: running
//! out of text is reported as an [`Error`] instead.
use memchr::{memchr, memchr2_iter};

use crate::error::{Error, ErrorKind};

/// The BibTeX block start character.
pub const BLOCK_START: u8 = b'{';

/// The BibTeX block end character.
pub const BLOCK_END: u8 = b'}';

/// The BibTeX list separator character.
pub const LIST_SEP: u8 = b',';

const QUOTE: u8 = b'"';

/// The `char` starting at `pos`, or `None` at the end of input.
#[inline]
pub fn char_at(input: &str, pos: usize) -> Option<char> {
    input.get(pos..)?.chars().next()
}

/// Skip zero or more whitespace characters.
///
/// Returns `input.len()` if only whitespace remains or `pos` is already at the end.
pub fn skip_whitespace(input: &str, pos: usize) -> usize {
    match input.get(pos..) {
        Some(rest) => rest
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map_or(input.len(), |(offset, _)| pos + offset),
        None => input.len(),
    }
}

/// Read the next value: a block, a quoted literal or a bare token.
///
/// Leading whitespace is skipped first. `include_delimiters` only applies to blocks, see
/// [`read_block`].
///
/// # Errors
/// When a block or quoted literal is not terminated before the end of `input`.
pub fn read_value(
    input: &str,
    pos: usize,
    include_delimiters: bool,
) -> Result<(usize, &str), Error> {
    let start = skip_whitespace(input, pos);

    match input.as_bytes().get(start) {
        Some(&BLOCK_START) => read_block(input, start, include_delimiters),
        Some(&QUOTE) => read_quoted(input, start),
        _ => Ok(read_bare(input, start)),
    }
}

/// Read a brace balanced block starting at the next non-whitespace character.
///
/// The outermost opening brace is never part of the returned value and nested blocks always
/// are. The brace closing the block is consumed and only included when `include_delimiters`
/// is set.
///
/// # Errors
/// - [`ErrorKind::ExpectedBlockOpen`] if the next character is not a `{`.
/// - [`ErrorKind::UnterminatedBlock`] if the input ends before the block is closed.
pub fn read_block(
    input: &str,
    pos: usize,
    include_delimiters: bool,
) -> Result<(usize, &str), Error> {
    let start = skip_whitespace(input, pos);
    let bytes = input.as_bytes();

    match char_at(input, start) {
        Some('{') => {}
        Some(found) => {
            return Err(Error::at(
                ErrorKind::ExpectedBlockOpen,
                input,
                start,
                format!(
                    "cannot read a block that does not start with a '{{' but found '{found}'"
                ),
            ))
        }
        None => {
            return Err(Error::at(
                ErrorKind::ExpectedBlockOpen,
                input,
                start,
                "cannot read a block at the end of input",
            ))
        }
    }

    let content = start + 1;
    let mut depth: usize = 1;

    for offset in memchr2_iter(BLOCK_START, BLOCK_END, &bytes[content..]) {
        let end = content + offset;
        if bytes[end] == BLOCK_START {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                let value_end = if include_delimiters { end + 1 } else { end };
                return Ok((end + 1, &input[content..value_end]));
            }
        }
    }

    Err(Error::at(
        ErrorKind::UnterminatedBlock,
        input,
        start,
        format!("block is still open at the end of input ({depth} unclosed)"),
    ))
}

/// Read a quoted literal starting at `pos`, which must be a `"`.
///
/// Neither quote is part of the value. There is no escaping: the first `"` after the opening
/// one always closes the literal.
///
/// # Errors
/// [`ErrorKind::UnterminatedQuote`] if there is no closing `"`.
pub fn read_quoted(input: &str, pos: usize) -> Result<(usize, &str), Error> {
    debug_assert_eq!(input.as_bytes().get(pos), Some(&QUOTE));

    let content = pos + 1;
    let rest = input.as_bytes().get(content..).unwrap_or_default();

    memchr(QUOTE, rest)
        .map(|offset| (content + offset + 1, &input[content..content + offset]))
        .ok_or_else(|| {
            Error::at(
                ErrorKind::UnterminatedQuote,
                input,
                pos,
                "quoted value is never closed",
            )
        })
}

/// Read a bare token: everything up to a `,`, a `}`, whitespace or the end of input.
///
/// The token is returned verbatim and may be empty.
pub fn read_bare(input: &str, pos: usize) -> (usize, &str) {
    let Some(rest) = input.get(pos..) else {
        return (input.len(), "");
    };

    let end = rest
        .char_indices()
        .find(|&(_, c)| c == ',' || c == '}' || c.is_whitespace())
        .map_or(input.len(), |(offset, _)| pos + offset);

    (end, &input[pos..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_whitespace() {
        assert_eq!(skip_whitespace("  \t\nab", 0), 4);
        assert_eq!(skip_whitespace("  \t\nab", 2), 4);
        assert_eq!(skip_whitespace("ab", 0), 0);
        assert_eq!(skip_whitespace("ab   ", 2), 5);
        assert_eq!(skip_whitespace("", 0), 0);
        assert_eq!(skip_whitespace("ab", 2), 2);
        assert_eq!(skip_whitespace("ab", 7), 2);
        // non-ascii whitespace counts too
        assert_eq!(skip_whitespace("\u{a0}\u{3000}x", 0), 5);
    }

    #[test]
    fn test_read_block() {
        assert_eq!(read_block("{abc} rest", 0, false).unwrap(), (5, "abc"));
        assert_eq!(read_block("  {abc}", 0, false).unwrap(), (7, "abc"));
        assert_eq!(
            read_block("{outer {inner} text},", 0, false).unwrap(),
            (20, "outer {inner} text")
        );
        assert_eq!(read_block("{{}{{}}}", 0, false).unwrap(), (8, "{}{{}}"));
        assert_eq!(read_block("{🍄{é}}x", 0, false).unwrap(), (10, "🍄{é}"));
    }

    #[test]
    fn test_read_block_include_delimiters() {
        assert_eq!(read_block("{a{b}c}", 0, true).unwrap(), (7, "a{b}c}"));
        assert_eq!(read_block("{}", 0, true).unwrap(), (2, "}"));
    }

    #[test]
    fn test_read_block_errors() {
        let err = read_block("  x{}", 0, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpectedBlockOpen);
        assert!(err.to_string().contains("found 'x'"));

        let err = read_block("   ", 0, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExpectedBlockOpen);

        let err = read_block("{a{b}", 0, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedBlock);

        let err = read_block("{", 0, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedBlock);
    }

    #[test]
    fn test_read_quoted() {
        assert_eq!(read_quoted("\"A Study\", x", 0).unwrap(), (9, "A Study"));
        assert_eq!(read_quoted("\"\"", 0).unwrap(), (2, ""));
        // no escapes, the first quote always closes
        assert_eq!(read_quoted(r#""a\"b""#, 0).unwrap(), (4, r"a\"));
        assert_eq!(read_quoted("\"{\"}\"", 0).unwrap(), (3, "{"));

        let err = read_quoted("\"never closed", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnterminatedQuote);
    }

    #[test]
    fn test_read_bare() {
        assert_eq!(read_bare("2024, x", 0), (4, "2024"));
        assert_eq!(read_bare("2024}", 0), (4, "2024"));
        assert_eq!(read_bare("20 24", 0), (2, "20"));
        assert_eq!(read_bare("2024", 0), (4, "2024"));
        assert_eq!(read_bare(",", 0), (0, ""));
        assert_eq!(read_bare("jan", 3), (3, ""));
        assert_eq!(read_bare("mär,", 0), (4, "mär"));
    }

    #[test]
    fn test_read_value_dispatch() {
        assert_eq!(read_value("  {a b}", 0, false).unwrap(), (7, "a b"));
        assert_eq!(read_value(" \"a b\"", 0, false).unwrap(), (6, "a b"));
        assert_eq!(read_value(" a b", 0, false).unwrap(), (2, "a"));
        assert_eq!(read_value("   ", 0, false).unwrap(), (3, ""));
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn no_panic(s in "\\PC*", pos in 0usize..64) {
            let _ = skip_whitespace(&s, pos);
            let _ = read_value(&s, 0, false);
            let _ = read_value(&s, 0, true);
            let _ = read_block(&s, 0, false);
            let _ = read_bare(&s, pos);
        }
    }
}
