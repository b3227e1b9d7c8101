use strum::EnumIs;
use thiserror::Error;

/// Structural misuse detected while building or reading expressions.
///
/// Every variant is a contract violation by the caller: nothing inside the crate
/// recovers from them. Upstream producers (e.g. an NL reader) are expected to map
/// them onto their own diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, Error)]
pub enum ExprError {
    /// The operator kind is not in the admissible set of the constructor.
    #[error("invalid expression kind")]
    InvalidKind,

    /// A child handle is null or belongs to the wrong category.
    #[error("invalid argument")]
    InvalidArgument,

    /// A call was started with a null function or one registered elsewhere.
    #[error("invalid function")]
    InvalidFunction,

    /// The declared arity is below the minimum of the kind.
    #[error("invalid number of arguments")]
    InvalidNumArgs,

    /// A piecewise-linear term must have at least one breakpoint.
    #[error("invalid number of breakpoints")]
    InvalidNumBreakpoints,

    #[error("too many arguments")]
    TooManyArgs,

    #[error("too many slopes")]
    TooManySlopes,

    #[error("too many breakpoints")]
    TooManyBreakpoints,

    #[error("too few arguments")]
    TooFewArgs,

    #[error("too few slopes")]
    TooFewSlopes,

    #[error("too few breakpoints")]
    TooFewBreakpoints,

    /// Indexed accessor called with `index >= len`.
    #[error("index out of bounds")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type ExprResult<T> = Result<T, ExprError>;

/// Bounds-checked read used by every indexed accessor.
#[inline]
pub(crate) fn checked_get<T: Copy>(items: &[T], index: usize) -> ExprResult<T> {
    items
        .get(index)
        .copied()
        .ok_or(ExprError::IndexOutOfBounds {
            index,
            len: items.len(),
        })
}
