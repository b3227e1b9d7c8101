//! Iterative walkers over expression graphs.
//!
//! - [`walk`]: pre-order traversal threading a user state from each node to its children.
//! - [`walk_no_input`]: the same without state.
//! - [`compare_expressions`]: structural equality, as opposed to the identity equality of
//!   handles. Works across factories.
//!
//! Traversal uses an explicit stack (no recursion), so arbitrarily deep expressions do not
//! overflow the call stack. Shared sub-expressions are visited once per occurrence.
//!
//! Example: maximum depth of an expression
//! ```
//! use mpexpr::prelude::*;
//!
//! let factory = ExprFactory::new();
//! let x = factory.make_variable(0);
//! let abs = factory.make_unary(ExprKind::Abs, x).unwrap();
//! let neg = factory.make_unary(ExprKind::Minus, abs).unwrap();
//!
//! let mut max_depth = 0;
//! walk(neg, 0usize, |depth, _| {
//!     max_depth = max_depth.max(*depth);
//!     *depth += 1;
//!     WalkControl::Continue
//! });
//! assert_eq!(max_depth, 2);
//! ```
use smallvec::SmallVec;

use crate::expr::{
    Expr, ExprHandle,
    view::{ExprView, ExprViewVariant},
};

/// What the traversal does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkControl {
    /// Visit the children of the current node.
    Continue,
    /// Do not descend into the current node; siblings are still visited.
    SkipChildren,
    /// Stop the whole traversal.
    Break,
}

/// Walk `root` in pre-order, children left to right.
///
/// The visitor receives the state inherited from the parent (`input` for the root) and
/// may modify it; every child scheduled by [`WalkControl::Continue`] starts from a clone
/// of the modified state. Null handles, including a missing false branch, are never
/// visited.
///
/// Returns `false` if the traversal was stopped by [`WalkControl::Break`].
pub fn walk<'a, I, F>(root: impl Into<Expr<'a>>, input: I, mut visitor: F) -> bool
where
    I: Clone,
    F: FnMut(&mut I, Expr<'a>) -> WalkControl,
{
    let root = root.into();
    if root.is_null() {
        return true;
    }

    let mut stack: SmallVec<[(Expr<'a>, I); 16]> = SmallVec::new();
    stack.push((root, input));

    while let Some((current, mut state)) = stack.pop() {
        match visitor(&mut state, current) {
            WalkControl::Continue => {
                // Reverse the freshly pushed children so the leftmost pops first.
                let mark = stack.len();
                stack.extend(current.children().map(|child| (child, state.clone())));
                stack[mark..].reverse();
            }
            WalkControl::SkipChildren => {}
            WalkControl::Break => return false,
        }
    }
    true
}

/// Convenience when no state needs to be threaded.
#[inline]
pub fn walk_no_input<'a, F>(root: impl Into<Expr<'a>>, mut visitor: F) -> bool
where
    F: FnMut(Expr<'a>) -> WalkControl,
{
    walk(root, (), |_, expr| visitor(expr))
}

/// Compare two expressions for structural equality.
///
/// This is different from `==` on handles, which compares by identity. Two trees built
/// separately from the same inputs (even in different factories) are structurally equal.
/// Numbers are compared bit for bit and called functions by name.
pub fn compare_expressions<'a, 'b>(a: impl Into<Expr<'a>>, b: impl Into<Expr<'b>>) -> bool {
    let mut stack: SmallVec<[(Expr<'a>, Expr<'b>); 16]> = SmallVec::new();
    stack.push((a.into(), b.into()));

    while let Some((a, b)) = stack.pop() {
        match (a.is_null(), b.is_null()) {
            (true, true) => continue,
            (false, false) => {}
            _ => return false,
        }
        if a.kind() != b.kind() || !same_leaf(a.view(), b.view()) {
            return false;
        }

        let mark = stack.len();
        let mut lhs = a.children();
        let mut rhs = b.children();
        loop {
            match (lhs.next(), rhs.next()) {
                (Some(x), Some(y)) => stack.push((x, y)),
                (None, None) => break,
                _ => return false,
            }
        }
        stack[mark..].reverse();
    }
    true
}

/// Compare the non-child content of two nodes of the same kind.
fn same_leaf(a: ExprView<'_>, b: ExprView<'_>) -> bool {
    let same_bits = |x: &[f64], y: &[f64]| {
        x.iter().map(|v| v.to_bits()).eq(y.iter().map(|v| v.to_bits()))
    };
    match (a, b) {
        (ExprView::NumericConstant(x), ExprView::NumericConstant(y)) => {
            x.value().to_bits() == y.value().to_bits()
        }
        (ExprView::LogicalConstant(x), ExprView::LogicalConstant(y)) => x.value() == y.value(),
        (ExprView::Variable(x), ExprView::Variable(y)) => x.index() == y.index(),
        (ExprView::PLTerm(x), ExprView::PLTerm(y)) => {
            same_bits(x.slopes(), y.slopes()) && same_bits(x.breakpoints(), y.breakpoints())
        }
        (ExprView::Call(x), ExprView::Call(y)) => x.function().name() == y.function().name(),
        (a, b) => ExprViewVariant::from(a) == ExprViewVariant::from(b),
    }
}
