//! Serialized input format for recorded traces.
//!
//! A trace is a JSON object mapping each process name to the operations it
//! issued, in order:
//!
//! ```json
//! {
//!   "p1": [{ "method": "wr", "arg": ["x", 1] }],
//!   "p2": [{ "method": "rd", "arg": "x", "ret": 1 }]
//! }
//! ```
//!
//! `ret` may be omitted when it is the default outcome (for the memory
//! oracle, `null`).

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use super::types::Label;
use super::History;

/// One recorded operation: the request and its observed outcome.
#[derive(::serde::Serialize, ::serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
pub struct RecordedOperation<Method, Arg, Ret: Default> {
    pub method: Method,
    pub arg: Arg,
    #[serde(default)]
    pub ret: Ret,
}

impl<Method, Arg, Ret> From<RecordedOperation<Method, Arg, Ret>> for Label<Method, Arg, Ret>
where
    Ret: Default,
{
    fn from(op: RecordedOperation<Method, Arg, Ret>) -> Self {
        Self::operation(op.method, op.arg, op.ret)
    }
}

/// Per-process recorded sequences, keyed by process name.
#[derive(::serde::Serialize, ::serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[serde(transparent)]
pub struct Trace<Method, Arg, Ret: Default>(
    pub BTreeMap<String, Vec<RecordedOperation<Method, Arg, Ret>>>,
);

impl<Method, Arg, Ret> From<Trace<Method, Arg, Ret>> for History<Method, Arg, Ret>
where
    Ret: Default,
{
    fn from(trace: Trace<Method, Arg, Ret>) -> Self {
        Self::new(
            trace
                .0
                .into_iter()
                .map(|(process, ops)| (process, ops.into_iter().map(Label::from).collect())),
        )
    }
}
