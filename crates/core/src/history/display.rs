use alloc::string::String;
use core::fmt::{Display, Write};

use crate::specification::memory::{MemoryArg, MemoryLabel, MemoryMethod, MemoryValue};

/// Format memory sessions in the compact text format.
///
/// Each operation goes on its own line: `x:=1` for a write, `x==1` for a read
/// that returned `1`, `x==?` for a read that found nothing. Sessions are
/// separated by `---`. The output always ends with a trailing newline so that
/// it round-trips through `c3_parser::parse_history`.
///
/// # Panics
///
/// Panics on an entry that is not a well-formed memory operation.
#[must_use]
pub fn format_history<Key, Value>(sessions: &[Vec<MemoryLabel<Key, Value>>]) -> String
where
    Key: Display,
    Value: Display,
{
    let mut output = String::new();
    for (i, session) in sessions.iter().enumerate() {
        if i > 0 {
            output.push_str("---\n");
        }
        for op in session {
            let _ = match (op.method(), op.arg(), op.ret()) {
                (MemoryMethod::Wr, MemoryArg::Entry(key, value), _) => {
                    writeln!(output, "{key}:={value}")
                }
                (MemoryMethod::Rd, MemoryArg::Key(key), Some(MemoryValue::Value(value))) => {
                    writeln!(output, "{key}=={value}")
                }
                (MemoryMethod::Rd, MemoryArg::Key(key), Some(MemoryValue::Bottom)) => {
                    writeln!(output, "{key}==?")
                }
                _ => panic!("`{}({})` has no compact form", op.method(), op.arg()),
            };
        }
    }
    output
}
