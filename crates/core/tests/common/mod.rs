#![allow(dead_code)]

use c3_core::history::types::{Label, OpId};
use c3_core::history::History;
use c3_core::specification::{MemoryArg, MemoryMethod, MemoryValue, RwMemory};

/// History over the read/write memory used throughout the tests.
pub type MemHistory = History<MemoryMethod, MemoryArg<&'static str, u64>, MemoryValue<u64>>;

/// A single read or write in a [`MemHistory`].
pub type MemOp = Label<MemoryMethod, MemoryArg<&'static str, u64>, MemoryValue<u64>>;

/// The memory oracle matching [`MemHistory`].
pub const MEM: RwMemory<&'static str, u64> = RwMemory::new();

/// Parse an `"{process}.{index}"` id.
pub fn id(s: &str) -> OpId {
    s.parse().expect("valid op id")
}

/// DSL macro for building test histories over the memory oracle.
///
/// # Syntax
///
/// ```ignore
/// history! {
///     "p1" => [w(x, 1), r(y, 1)],
///     "p2" => [w(y, 1), r(x)],     // r(var) reads nothing
/// }
/// ```
///
/// - `w(var, val)` → `wr(var, val)`, returns ⊥
/// - `r(var, val)` → `rd(var)` that returned `val`
/// - `r(var)`      → `rd(var)` that returned ⊥
///
/// Build a single operation.
#[macro_export]
macro_rules! op {
    (w($var:ident, $val:expr)) => {
        c3_core::history::types::Label::operation(
            c3_core::specification::MemoryMethod::Wr,
            c3_core::specification::MemoryArg::Entry(stringify!($var), $val as u64),
            c3_core::specification::MemoryValue::Bottom,
        )
    };
    (r($var:ident, $val:expr)) => {
        c3_core::history::types::Label::operation(
            c3_core::specification::MemoryMethod::Rd,
            c3_core::specification::MemoryArg::Key(stringify!($var)),
            c3_core::specification::MemoryValue::Value($val as u64),
        )
    };
    (r($var:ident)) => {
        c3_core::history::types::Label::operation(
            c3_core::specification::MemoryMethod::Rd,
            c3_core::specification::MemoryArg::Key(stringify!($var)),
            c3_core::specification::MemoryValue::Bottom,
        )
    };
}

/// Build a full history: each process is `"name" => [ ... ]`.
#[macro_export]
macro_rules! history {
    ($( $process:literal => [ $( $f:ident ( $($args:tt)* ) ),* $(,)? ] ),* $(,)?) => {{
        let processes: Vec<(&str, Vec<_>)> = vec![
            $( ($process, vec![ $( $crate::op!($f($($args)*)) ),* ]) ),*
        ];
        $crate::common::MemHistory::new(processes)
    }};
}
