use alloc::string::{String, ToString};
use core::fmt::{self, Debug, Display, Formatter};
use core::str::FromStr;

/// Identifier of an operation inside a [`History`](super::History).
///
/// Written `"{process}.{index}"`, where `index` is the 1-based position of
/// the operation in its process's recorded sequence. Ordering is
/// lexicographic: first by `process`, then by `index`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpId {
    pub process: String,
    /// 1-based position within the process.
    pub index: usize,
}

impl OpId {
    #[must_use]
    pub fn new(process: impl Into<String>, index: usize) -> Self {
        Self {
            process: process.into(),
            index,
        }
    }
}

impl Display for OpId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.process, self.index)
    }
}

/// Error parsing an [`OpId`] from its `"{process}.{index}"` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOpIdError(pub String);

impl Display for ParseOpIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid operation id `{}`", self.0)
    }
}

impl FromStr for OpId {
    type Err = ParseOpIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (process, index) = s
            .rsplit_once('.')
            .ok_or_else(|| ParseOpIdError(s.to_string()))?;
        let index = index.parse().map_err(|_| ParseOpIdError(s.to_string()))?;
        Ok(Self::new(process, index))
    }
}

#[cfg(feature = "serde")]
impl ::serde::Serialize for OpId {
    fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> ::serde::Deserialize<'de> for OpId {
    fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(::serde::de::Error::custom)
    }
}

/// A recorded call, with or without its outcome.
///
/// An `Instruction` is a request whose outcome is hidden; an `Operation`
/// carries the outcome that was observed. Oracles replay both, but only
/// operations are checked against the reference semantics.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Label<Method, Arg, Ret> {
    Instruction {
        method: Method,
        arg: Arg,
        op_id: Option<OpId>,
    },
    Operation {
        method: Method,
        arg: Arg,
        ret: Ret,
        op_id: Option<OpId>,
    },
}

impl<Method, Arg, Ret> Label<Method, Arg, Ret> {
    #[must_use]
    pub const fn instruction(method: Method, arg: Arg) -> Self {
        Self::Instruction {
            method,
            arg,
            op_id: None,
        }
    }

    #[must_use]
    pub const fn operation(method: Method, arg: Arg, ret: Ret) -> Self {
        Self::Operation {
            method,
            arg,
            ret,
            op_id: None,
        }
    }

    pub const fn method(&self) -> &Method {
        match self {
            Self::Instruction { method, .. } | Self::Operation { method, .. } => method,
        }
    }

    pub const fn arg(&self) -> &Arg {
        match self {
            Self::Instruction { arg, .. } | Self::Operation { arg, .. } => arg,
        }
    }

    /// The observed outcome; `None` for instructions.
    pub const fn ret(&self) -> Option<&Ret> {
        match self {
            Self::Instruction { .. } => None,
            Self::Operation { ret, .. } => Some(ret),
        }
    }

    pub const fn op_id(&self) -> Option<&OpId> {
        match self {
            Self::Instruction { op_id, .. } | Self::Operation { op_id, .. } => op_id.as_ref(),
        }
    }

    pub const fn is_operation(&self) -> bool {
        matches!(self, Self::Operation { .. })
    }

    /// Returns the same label tagged with `op_id`.
    #[must_use]
    pub fn with_op_id(self, id: OpId) -> Self {
        match self {
            Self::Instruction { method, arg, .. } => Self::Instruction {
                method,
                arg,
                op_id: Some(id),
            },
            Self::Operation {
                method, arg, ret, ..
            } => Self::Operation {
                method,
                arg,
                ret,
                op_id: Some(id),
            },
        }
    }
}

impl<Method, Arg, Ret> Label<Method, Arg, Ret>
where
    Method: Clone,
    Arg: Clone,
{
    /// Projects onto the request: drops the outcome, keeps everything else.
    #[must_use]
    pub fn to_instruction(&self) -> Self {
        Self::Instruction {
            method: self.method().clone(),
            arg: self.arg().clone(),
            op_id: self.op_id().cloned(),
        }
    }

    /// Pairs the request with `ret`, keeping `method`, `arg` and `op_id`.
    #[must_use]
    pub fn completed(&self, ret: Ret) -> Self {
        Self::Operation {
            method: self.method().clone(),
            arg: self.arg().clone(),
            ret,
            op_id: self.op_id().cloned(),
        }
    }
}

impl<Method, Arg, Ret> Display for Label<Method, Arg, Ret>
where
    Method: Display,
    Arg: Display,
    Ret: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.op_id() {
            write!(f, "{id}:")?;
        }
        write!(f, "{}({})", self.method(), self.arg())?;
        if let Some(ret) = self.ret() {
            write!(f, "▷{ret}")?;
        }
        Ok(())
    }
}

impl<Method, Arg, Ret> Debug for Label<Method, Arg, Ret>
where
    Method: Debug,
    Arg: Debug,
    Ret: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.op_id() {
            write!(f, "{id}:")?;
        }
        write!(f, "{:?}({:?})", self.method(), self.arg())?;
        if let Some(ret) = self.ret() {
            write!(f, "▷{ret:?}")?;
        }
        Ok(())
    }
}
