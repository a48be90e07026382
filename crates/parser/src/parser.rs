//! Winnow-based parser for the compact memory-trace text format.
//!
//! Grammar:
//! ```text
//! history   = process (separator process)*
//! separator = DASH+ NEWLINE
//! process   = (comment | blank | op_line)*
//! comment   = "//" REST_OF_LINE NEWLINE
//! op_line   = op (WHITESPACE op)* NEWLINE
//! op        = key ":=" value    -- write, returns ⊥
//!           | key "==" value    -- read that returned value
//!           | key "==?"         -- read that found nothing
//! key       = IDENT
//! value     = INTEGER
//! ```

use c3_core::history::types::Label;
use c3_core::specification::memory::MemoryLabel;
use c3_core::specification::{MemoryArg, MemoryMethod, MemoryValue};
use winnow::ascii::{dec_uint, newline, till_line_ending};
use winnow::combinator::{alt, eof, repeat, separated};
use winnow::prelude::*;
use winnow::token::{literal, take_while};
use winnow::ModalResult;

/// One parsed operation.
pub type Operation = MemoryLabel<String, u64>;

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// A parse error with human-readable location information.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "parse error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Parse a compact trace into one operation sequence per process, in file
/// order.
///
/// The result feeds [`c3_core::history::History::from_sessions`], which
/// numbers the processes from 1.
///
/// # Errors
///
/// Returns a [`ParseError`] with line/column information when the input does
/// not conform to the grammar.
pub fn parse_history(input: &str) -> Result<Vec<Vec<Operation>>, ParseError> {
    let original = input;
    let mut stream: &str = input;
    match history_parser.parse_next(&mut stream) {
        Ok(processes) => Ok(processes),
        Err(e) => {
            let consumed = original.len().saturating_sub(stream.len());
            let (line, column) = offset_to_line_col(original, consumed);
            Err(ParseError {
                message: e.to_string(),
                line,
                column,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Line/column helper
// ---------------------------------------------------------------------------

/// Convert a byte offset into the original input to 1-based (line, column).
fn offset_to_line_col(input: &str, offset: usize) -> (usize, usize) {
    let prefix = &input[..offset.min(input.len())];
    let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
    let column = prefix
        .rfind('\n')
        .map_or_else(|| prefix.len() + 1, |pos| prefix.len() - pos);
    (line, column)
}

// ---------------------------------------------------------------------------
// Whitespace helpers
// ---------------------------------------------------------------------------

/// Inline whitespace: spaces and tabs only (no newlines).
fn inline_ws(input: &mut &str) -> ModalResult<()> {
    take_while(1.., [' ', '\t']).void().parse_next(input)
}

fn opt_inline_ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., [' ', '\t']).void().parse_next(input)
}

// ---------------------------------------------------------------------------
// Leaf parsers
// ---------------------------------------------------------------------------

/// A key: one or more alphanumeric characters or `_`.
fn key(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_')
        .map(ToString::to_string)
        .parse_next(input)
}

fn value(input: &mut &str) -> ModalResult<u64> {
    dec_uint.parse_next(input)
}

// ---------------------------------------------------------------------------
// Operation parsers
// ---------------------------------------------------------------------------

/// `key ":=" value`
fn write_op(input: &mut &str) -> ModalResult<Operation> {
    let (key, _, value) = (key, literal(":="), value).parse_next(input)?;
    Ok(Label::operation(
        MemoryMethod::Wr,
        MemoryArg::Entry(key, value),
        MemoryValue::Bottom,
    ))
}

/// `key "==?"`
fn read_bottom_op(input: &mut &str) -> ModalResult<Operation> {
    let (key, _) = (key, literal("==?")).parse_next(input)?;
    Ok(Label::operation(
        MemoryMethod::Rd,
        MemoryArg::Key(key),
        MemoryValue::Bottom,
    ))
}

/// `key "==" value`
fn read_op(input: &mut &str) -> ModalResult<Operation> {
    let (key, _, value) = (key, literal("=="), value).parse_next(input)?;
    Ok(Label::operation(
        MemoryMethod::Rd,
        MemoryArg::Key(key),
        MemoryValue::Value(value),
    ))
}

/// `==?` shares its prefix with `==`, so the bottom read is tried first.
fn operation(input: &mut &str) -> ModalResult<Operation> {
    alt((write_op, read_bottom_op, read_op)).parse_next(input)
}

// ---------------------------------------------------------------------------
// Line parsers
// ---------------------------------------------------------------------------

/// `"//" <rest-of-line> NEWLINE`; produces nothing.
fn comment_line(input: &mut &str) -> ModalResult<Option<Vec<Operation>>> {
    opt_inline_ws.parse_next(input)?;
    literal("//").parse_next(input)?;
    till_line_ending.parse_next(input)?;
    line_end.parse_next(input)?;
    Ok(None)
}

/// A newline, or the end of an input without a trailing newline.
fn line_end(input: &mut &str) -> ModalResult<()> {
    alt((newline.void(), eof.void())).parse_next(input)
}

/// One or more operations separated by inline whitespace.
fn op_line(input: &mut &str) -> ModalResult<Option<Vec<Operation>>> {
    opt_inline_ws.parse_next(input)?;
    let ops: Vec<Operation> = separated(1.., operation, inline_ws).parse_next(input)?;
    opt_inline_ws.parse_next(input)?;
    line_end.parse_next(input)?;
    Ok(Some(ops))
}

fn blank_line(input: &mut &str) -> ModalResult<Option<Vec<Operation>>> {
    opt_inline_ws.parse_next(input)?;
    newline.parse_next(input)?;
    Ok(None)
}

fn process_item(input: &mut &str) -> ModalResult<Option<Vec<Operation>>> {
    alt((comment_line, blank_line, op_line)).parse_next(input)
}

/// A line of one or more `-`, possibly surrounded by inline whitespace.
fn separator(input: &mut &str) -> ModalResult<()> {
    opt_inline_ws.parse_next(input)?;
    take_while(1.., '-').parse_next(input)?;
    opt_inline_ws.parse_next(input)?;
    line_end.parse_next(input)
}

// ---------------------------------------------------------------------------
// Process and history parsers
// ---------------------------------------------------------------------------

/// Items up to the next separator or end-of-input.
fn process(input: &mut &str) -> ModalResult<Vec<Operation>> {
    let mut ops = Vec::new();

    loop {
        let trimmed = input.trim_start_matches([' ', '\t']);
        if trimmed.starts_with('-') || trimmed.is_empty() {
            break;
        }
        if let Some(mut line) = process_item.parse_next(input)? {
            ops.append(&mut line);
        }
    }

    Ok(ops)
}

/// `process (separator process)*`, then trailing blank lines and end-of-input.
fn history_parser(input: &mut &str) -> ModalResult<Vec<Vec<Operation>>> {
    let mut processes = vec![process.parse_next(input)?];

    while separator.parse_next(input).is_ok() {
        processes.push(process.parse_next(input)?);
    }

    repeat::<_, _, (), _, _>(0.., blank_line).parse_next(input)?;

    if !input.is_empty() {
        return Err(winnow::error::ErrMode::Backtrack(
            winnow::error::ContextError::new(),
        ));
    }

    Ok(processes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use c3_core::history::display::format_history;
    use c3_core::history::History;

    use super::*;

    fn w(key: &str, value: u64) -> Operation {
        Label::operation(
            MemoryMethod::Wr,
            MemoryArg::Entry(key.to_string(), value),
            MemoryValue::Bottom,
        )
    }
    fn r(key: &str, value: u64) -> Operation {
        Label::operation(
            MemoryMethod::Rd,
            MemoryArg::Key(key.to_string()),
            MemoryValue::Value(value),
        )
    }
    fn rb(key: &str) -> Operation {
        Label::operation(
            MemoryMethod::Rd,
            MemoryArg::Key(key.to_string()),
            MemoryValue::Bottom,
        )
    }

    // -----------------------------------------------------------------------
    // Happy-path tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_single_process() {
        let result = parse_history("x:=1\nx==1\n").expect("should parse");
        assert_eq!(result, vec![vec![w("x", 1), r("x", 1)]]);
    }

    #[test]
    fn test_multi_process_with_separator() {
        let result = parse_history("x:=1\n---\ny:=2\n").expect("should parse");
        assert_eq!(result, vec![vec![w("x", 1)], vec![w("y", 2)]]);
    }

    #[test]
    fn test_multiple_operations_per_line() {
        let result = parse_history("x:=1 y:=1\t z==2\n").expect("should parse");
        assert_eq!(result, vec![vec![w("x", 1), w("y", 1), r("z", 2)]]);
    }

    #[test]
    fn test_bottom_read() {
        let result = parse_history("x==?\n").expect("should parse");
        assert_eq!(result, vec![vec![rb("x")]]);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let input = "// process 1\nx:=1\n\n  // indented\nx==1\n---\n// process 2\ny:=2\n";
        let result = parse_history(input).expect("should parse");
        assert_eq!(result, vec![vec![w("x", 1), r("x", 1)], vec![w("y", 2)]]);
    }

    #[test]
    fn test_empty_process_between_separators() {
        let result = parse_history("x:=1\n---\n---\ny:=2\n").expect("should parse");
        assert_eq!(result.len(), 3);
        assert!(result[1].is_empty());
    }

    #[test]
    fn test_comment_only_input() {
        let result = parse_history("// nothing recorded\n").expect("should parse");
        assert_eq!(result, vec![Vec::<Operation>::new()]);
    }

    #[test]
    fn test_trailing_blank_lines() {
        let result = parse_history("x:=1\n\n\n").expect("should parse");
        assert_eq!(result, vec![vec![w("x", 1)]]);
    }

    #[test]
    fn test_missing_final_newline() {
        let result = parse_history("x:=1\n---\nx==1").expect("should parse");
        assert_eq!(result, vec![vec![w("x", 1)], vec![r("x", 1)]]);
        assert!(parse_history("// only a comment").is_ok());
    }

    #[test]
    fn test_trailing_separator_without_newline() {
        let with_newline = parse_history("x:=1\n---\n").expect("should parse");
        let without = parse_history("x:=1\n---").expect("should parse");
        assert_eq!(without, with_newline);
        assert_eq!(without, vec![vec![w("x", 1)], vec![]]);
    }

    #[test]
    fn test_round_trip_through_format() {
        let input = "x:=1\ny==?\n---\nx==1\ny:=7\n---\ny==7\n";
        let parsed = parse_history(input).expect("should parse");
        assert_eq!(format_history(&parsed), input);
    }

    #[test]
    fn test_processes_numbered_from_one() {
        let parsed = parse_history("x:=1\n---\nx==1\n").expect("should parse");
        let history = History::from_sessions(parsed);
        let ids: Vec<String> = history.operations().iter().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["1.1", "2.1"]);
    }

    // -----------------------------------------------------------------------
    // Error tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_error_has_line_column() {
        let err = parse_history("x:=1\n@bad\n").expect_err("should fail");
        assert_eq!(err.line, 2, "expected error on line 2, got: {err}");
    }

    #[test]
    fn test_missing_value_is_an_error() {
        assert!(parse_history("x:=\n").is_err());
        assert!(parse_history("x==\n").is_err());
    }

    #[test]
    fn test_parse_error_display() {
        let err = parse_history("x:=1\n@bad\n").expect_err("should fail");
        let msg = err.to_string();
        assert!(msg.contains("parse error"), "display: {msg}");
        assert!(msg.contains("line 2"), "display: {msg}");
    }

    #[test]
    fn test_offset_to_line_col() {
        assert_eq!(offset_to_line_col("hello\nworld\n", 0), (1, 1));
        assert_eq!(offset_to_line_col("hello\nworld\n", 6), (2, 1));
        assert_eq!(offset_to_line_col("hello\nworld\n", 8), (2, 3));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_error_serializes() {
        let err = parse_history("x:=1\n@bad\n").expect_err("should fail");
        let value = serde_json::to_value(&err).expect("serializable");
        assert_eq!(value["line"], 2);
    }
}
