//! Key-value read/write memory.

use alloc::rc::Rc;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::Hash;
use core::marker::PhantomData;

use hashbrown::HashMap;

use super::{SpecLabel, Specification};
use crate::history::types::Label;

/// Methods understood by [`RwMemory`].
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemoryMethod {
    /// `rd(key)`: returns the current value of `key`.
    Rd,
    /// `wr(key, value)`: sets `key`, returns nothing.
    Wr,
}

impl MemoryMethod {
    /// Whether `arg` has the shape this method expects: an entry for `wr`,
    /// a bare key for `rd`.
    #[must_use]
    pub const fn accepts<Key, Value>(self, arg: &MemoryArg<Key, Value>) -> bool {
        matches!(
            (self, arg),
            (Self::Wr, MemoryArg::Entry(..)) | (Self::Rd, MemoryArg::Key(_))
        )
    }
}

impl Display for MemoryMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rd => write!(f, "rd"),
            Self::Wr => write!(f, "wr"),
        }
    }
}

/// Argument of a memory method: a bare key for reads, a key-value entry for
/// writes.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemoryArg<Key, Value> {
    Entry(Key, Value),
    Key(Key),
}

impl<Key, Value> MemoryArg<Key, Value> {
    pub const fn key(&self) -> &Key {
        match self {
            Self::Entry(key, _) | Self::Key(key) => key,
        }
    }
}

impl<Key: Display, Value: Display> Display for MemoryArg<Key, Value> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry(key, value) => write!(f, "{key}, {value}"),
            Self::Key(key) => write!(f, "{key}"),
        }
    }
}

/// Outcome of a memory method.
///
/// `Bottom` is both the outcome of a write and the value read from a key
/// that was never written. Serialized as `null` or the bare value.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        from = "Option<Value>",
        into = "Option<Value>",
        bound(serialize = "Value: Clone + ::serde::Serialize")
    )
)]
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemoryValue<Value> {
    #[default]
    Bottom,
    Value(Value),
}

impl<Value> From<Option<Value>> for MemoryValue<Value> {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Bottom, Self::Value)
    }
}

impl<Value> From<MemoryValue<Value>> for Option<Value> {
    fn from(value: MemoryValue<Value>) -> Self {
        match value {
            MemoryValue::Bottom => None,
            MemoryValue::Value(value) => Some(value),
        }
    }
}

impl<Value: Display> Display for MemoryValue<Value> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bottom => write!(f, "⊥"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(feature = "schemars")]
impl<Value: ::schemars::JsonSchema> ::schemars::JsonSchema for MemoryValue<Value> {
    fn schema_name() -> alloc::borrow::Cow<'static, str> {
        <Option<Value>>::schema_name()
    }

    fn json_schema(generator: &mut ::schemars::SchemaGenerator) -> ::schemars::Schema {
        <Option<Value>>::json_schema(generator)
    }
}

/// A label understood by [`RwMemory`].
pub type MemoryLabel<Key, Value> = Label<MemoryMethod, MemoryArg<Key, Value>, MemoryValue<Value>>;

/// Reference semantics of a read/write memory over keys `Key` holding
/// `Value`s.
///
/// The state is a shared map from written keys to their latest value. A
/// write produces a new map and leaves the previous one untouched; a read
/// hands back the map it was given.
pub struct RwMemory<Key, Value> {
    _marker: PhantomData<fn() -> (Key, Value)>,
}

impl<Key, Value> RwMemory<Key, Value> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<Key, Value> Default for RwMemory<Key, Value> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Key, Value> Debug for RwMemory<Key, Value> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("RwMemory")
    }
}

impl<Key, Value> Specification for RwMemory<Key, Value>
where
    Key: Hash + Eq + Clone + Debug,
    Value: Clone + Debug + PartialEq,
{
    type Method = MemoryMethod;
    type Arg = MemoryArg<Key, Value>;
    type Ret = MemoryValue<Value>;
    type State = Rc<HashMap<Key, Value>>;

    fn start(&self) -> Self::State {
        Rc::new(HashMap::new())
    }

    fn step(&self, state: &Self::State, instr: &SpecLabel<Self>) -> (Self::State, SpecLabel<Self>) {
        match (instr.method(), instr.arg()) {
            (MemoryMethod::Wr, MemoryArg::Entry(key, value)) => {
                let mut next = HashMap::clone(state);
                next.insert(key.clone(), value.clone());
                (Rc::new(next), instr.completed(MemoryValue::Bottom))
            }
            (MemoryMethod::Rd, MemoryArg::Key(key)) => {
                let ret = state.get(key).cloned().into();
                (Rc::clone(state), instr.completed(ret))
            }
            (method, arg) => panic!("unexpected memory request {method}({arg:?})"),
        }
    }
}
