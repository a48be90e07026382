use crate::consistency::Model;

/// Error returned by [`check`](crate::consistency::check) when a history
/// does not satisfy the requested model.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No candidate order (and, for Causal Convergence, no arbitration)
    /// justifies every operation.
    Invalid(Model),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Invalid(model) => write!(f, "history violates {model}"),
        }
    }
}

impl std::error::Error for Error {}
