//! Forward iteration over the children of iterated expressions.
use std::{fmt, marker::PhantomData};

use crate::{
    arena::NodeRef,
    error::{ExprResult, checked_get},
    expr::{ExprHandle, sealed::RawHandle},
};

/// Iterator over the arguments of an iterated expression, in insertion order.
///
/// The iterator is `Copy`; two iterators compare equal when they walk the same
/// argument list and sit at the same positions. It never invalidates while the
/// factory that built the expression is alive.
pub struct ExprIterator<'a, A> {
    args: &'a [NodeRef<'a>],
    front: usize,
    back: usize,
    _arg: PhantomData<fn() -> A>,
}

impl<'a, A: ExprHandle<'a>> ExprIterator<'a, A> {
    #[inline]
    pub(crate) fn new(args: &'a [NodeRef<'a>]) -> Self {
        Self {
            args,
            front: 0,
            back: args.len(),
            _arg: PhantomData,
        }
    }

    /// The argument the next call to `next` returns, without advancing.
    #[inline]
    pub fn peek(&self) -> Option<A> {
        (self.front < self.back).then(|| A::from_node(Some(self.args[self.front])))
    }

    /// Index of the next argument in the parent expression.
    #[inline]
    pub fn position(&self) -> usize {
        self.front
    }
}

impl<'a, A> Clone for ExprIterator<'a, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, A> Copy for ExprIterator<'a, A> {}

impl<'a, A> PartialEq for ExprIterator<'a, A> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.args, other.args) && self.front == other.front && self.back == other.back
    }
}

impl<'a, A> Eq for ExprIterator<'a, A> {}

impl<'a, A> fmt::Debug for ExprIterator<'a, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprIterator")
            .field("args", &self.args.as_ptr())
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}

impl<'a, A: ExprHandle<'a>> Iterator for ExprIterator<'a, A> {
    type Item = A;

    #[inline]
    fn next(&mut self) -> Option<A> {
        let item = self.peek()?;
        self.front += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a, A: ExprHandle<'a>> DoubleEndedIterator for ExprIterator<'a, A> {
    #[inline]
    fn next_back(&mut self) -> Option<A> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(A::from_node(Some(self.args[self.back])))
    }
}

impl<'a, A: ExprHandle<'a>> ExactSizeIterator for ExprIterator<'a, A> {}

impl<'a, A: ExprHandle<'a>> std::iter::FusedIterator for ExprIterator<'a, A> {}

/// Indexed and iterator access shared by all iterated expressions.
///
/// Implemented by [`CallExpr`](crate::expr::CallExpr),
/// [`VarArgExpr`](crate::expr::VarArgExpr), [`SumExpr`](crate::expr::SumExpr),
/// [`NumberOfExpr`](crate::expr::NumberOfExpr), [`CountExpr`](crate::expr::CountExpr),
/// [`IteratedLogicalExpr`](crate::expr::IteratedLogicalExpr) and
/// [`AllDiffExpr`](crate::expr::AllDiffExpr).
pub trait IteratedExpr<'a>: ExprHandle<'a> {
    /// View type of the children.
    type Arg: ExprHandle<'a>;

    /// Number of arguments, equal to the arity declared when the expression was built.
    ///
    /// # Panics
    /// If the handle is null.
    #[inline]
    fn num_args(&self) -> usize {
        self.get().args().len()
    }

    /// Argument at `index`, or [`ExprError::IndexOutOfBounds`](crate::error::ExprError::IndexOutOfBounds).
    #[inline]
    fn arg(&self, index: usize) -> ExprResult<Self::Arg> {
        checked_get(self.get().args(), index).map(|node| Self::Arg::from_node(Some(node)))
    }

    /// Iterator over the arguments in insertion order.
    #[inline]
    fn iter(&self) -> ExprIterator<'a, Self::Arg> {
        ExprIterator::new(self.get().args())
    }
}

/// Implement [`IteratedExpr`] and `IntoIterator` for an iterated view.
macro_rules! impl_iterated {
    ($name:ident => $arg:ident) => {
        impl<'a> $crate::expr::IteratedExpr<'a> for $name<'a> {
            type Arg = $arg<'a>;
        }

        impl<'a> IntoIterator for $name<'a> {
            type Item = $arg<'a>;
            type IntoIter = $crate::expr::ExprIterator<'a, $arg<'a>>;

            #[inline]
            fn into_iter(self) -> Self::IntoIter {
                $crate::expr::IteratedExpr::iter(&self)
            }
        }
    };
}

pub(crate) use impl_iterated;
