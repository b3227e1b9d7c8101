//! Expression handles: small `Copy` views onto arena nodes.
//!
//! Role
//! - [`Expr`] is the root view and accepts any node; [`NumericExpr`] and
//!   [`LogicalExpr`] are restricted to one category.
//! - Concrete views ([`UnaryExpr`], [`CountExpr`], ...) expose the accessors of one
//!   structural family and upcast through `From` to their category view and to
//!   [`Expr`].
//! - Every handle may be null (its `Default`); the null handle upcasts to null.
//!
//! Equality semantics
//! - Handles compare by identity: two handles are equal iff they point to the same
//!   node, or are both null. Comparison works across handle types, so a
//!   [`NumericConstant`] can be compared to the [`NumericExpr`] returned by an
//!   accessor. The factory does not hash-cons, so two structurally identical trees
//!   built separately are *not* equal.
//!
//! Example
//! ```
//! use mpexpr::prelude::*;
//!
//! let factory = ExprFactory::new();
//! let x = factory.make_variable(0);
//! let e = factory.make_unary(ExprKind::Abs, x).unwrap();
//! assert_eq!(e.arg(), x);
//! assert!(NumericExpr::default().is_null());
//! assert_eq!(Expr::from(e).kind(), ExprKind::Abs);
//! ```
pub mod iter;
pub mod logical;
pub mod numeric;
pub mod pretty;
pub mod view;

use std::fmt;

use either::Either;
use smallvec::SmallVec;

use crate::{
    arena::{Node, NodeRef, Payload},
    error::{ExprError, ExprResult},
    kind::{Category, ExprKind},
};

pub use iter::{ExprIterator, IteratedExpr};
pub use logical::*;
pub use numeric::*;

pub(crate) mod sealed {
    use crate::arena::Node;

    /// Raw access to the node behind a handle. Not nameable outside the crate.
    pub trait RawHandle<'a>: Copy + Default {
        /// Short type name used in `Debug` output and panic messages.
        const NAME: &'static str;

        fn node(&self) -> Option<&'a Node<'a>>;

        /// Wrap a node. The caller guarantees `accepts(node)` for non-null nodes.
        fn from_node(node: Option<&'a Node<'a>>) -> Self;

        /// Whether this view may wrap `node`.
        fn accepts(node: &Node<'a>) -> bool;

        #[inline]
        #[track_caller]
        fn get(&self) -> &'a Node<'a> {
            match self.node() {
                Some(node) => node,
                None => null_handle(Self::NAME),
            }
        }
    }

    #[cold]
    #[track_caller]
    fn null_handle(name: &str) -> ! {
        panic!("attempted to read through a null {name} handle")
    }
}

/// Operations shared by every expression handle.
///
/// Implemented for [`Expr`], the category views and all concrete views; the trait
/// is sealed.
pub trait ExprHandle<'a>: sealed::RawHandle<'a> + fmt::Debug {
    /// `true` for the null handle (the `Default` of every view).
    #[inline]
    fn is_null(&self) -> bool {
        self.node().is_none()
    }

    /// Operator tag of the node.
    ///
    /// # Panics
    /// If the handle is null.
    #[inline]
    #[track_caller]
    fn kind(&self) -> ExprKind {
        self.get().kind()
    }

    /// Category of the value the expression produces.
    ///
    /// # Panics
    /// If the handle is null.
    #[inline]
    #[track_caller]
    fn category(&self) -> Category {
        self.get().category()
    }

    /// Upcast to the root view.
    #[inline]
    fn as_expr(&self) -> Expr<'a> {
        Expr(self.node())
    }
}

#[inline]
pub(crate) fn same_node<'a>(a: Option<&'a Node<'a>>, b: Option<&'a Node<'a>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => std::ptr::eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Declare a handle type together with its identity-based trait impls.
macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, |$node:ident| $accepts:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default)]
        pub struct $name<'a>(Option<&'a $crate::arena::Node<'a>>);

        impl<'a> $crate::expr::sealed::RawHandle<'a> for $name<'a> {
            const NAME: &'static str = stringify!($name);

            #[inline]
            fn node(&self) -> Option<&'a $crate::arena::Node<'a>> {
                self.0
            }

            #[inline]
            fn from_node(node: Option<&'a $crate::arena::Node<'a>>) -> Self {
                debug_assert!(
                    node.is_none_or(|n| <Self as $crate::expr::sealed::RawHandle<'a>>::accepts(n)),
                    "{} cannot wrap a {} node",
                    stringify!($name),
                    node.map(|n| n.kind()).unwrap_or($crate::kind::ExprKind::Constant),
                );
                $name(node)
            }

            #[inline]
            #[allow(unused_variables)]
            fn accepts($node: &$crate::arena::Node<'a>) -> bool {
                $accepts
            }
        }

        impl<'a> $crate::expr::ExprHandle<'a> for $name<'a> {}

        impl<'a, R: $crate::expr::ExprHandle<'a>> PartialEq<R> for $name<'a> {
            #[inline]
            fn eq(&self, other: &R) -> bool {
                $crate::expr::same_node(self.0, $crate::expr::sealed::RawHandle::node(other))
            }
        }

        impl<'a> Eq for $name<'a> {}

        impl<'a> std::hash::Hash for $name<'a> {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.0
                    .map(|n| n as *const $crate::arena::Node<'a>)
                    .hash(state)
            }
        }

        impl<'a> std::fmt::Debug for $name<'a> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.0 {
                    Some(n) => write!(f, "{}({} @ {:p})", stringify!($name), n.kind(), n),
                    None => write!(f, "{}(null)", stringify!($name)),
                }
            }
        }
    };
}

/// Implement infallible upcasts from a concrete view to its bases.
macro_rules! impl_upcast {
    ($from:ident => $($to:ident),+) => {
        $(
            impl<'a> From<$from<'a>> for $to<'a> {
                #[inline]
                fn from(value: $from<'a>) -> Self {
                    $to(value.0)
                }
            }
        )+
    };
}

pub(crate) use {define_handle, impl_upcast};

define_handle!(
    /// Root view: any expression, numeric or logical.
    Expr,
    |node| true
);

define_handle!(
    /// Any expression producing a number.
    NumericExpr,
    |node| node.category() == Category::Numeric
);

define_handle!(
    /// Any expression producing a truth value.
    LogicalExpr,
    |node| node.category() == Category::Logical
);

impl_upcast!(NumericExpr => Expr);
impl_upcast!(LogicalExpr => Expr);

impl<'a> Expr<'a> {
    /// Checked downcast to any other view. Returns `None` when the node is not
    /// accepted by `H`; the null handle downcasts to null.
    pub fn downcast<H: ExprHandle<'a>>(self) -> Option<H> {
        match self.0 {
            None => Some(H::default()),
            Some(node) if H::accepts(node) => Some(H::from_node(Some(node))),
            Some(_) => None,
        }
    }

    /// Direct children in slot order. A missing false branch is skipped.
    pub fn children(&self) -> impl Iterator<Item = Expr<'a>> + use<'a> {
        let mut fixed: SmallVec<[NodeRef<'a>; 3]> = SmallVec::new();
        let nodes = match self.0.map(|node| &node.payload) {
            None | Some(Payload::Number(_) | Payload::Bool(_) | Payload::Variable(_)) => {
                Either::Left(fixed.into_iter())
            }
            Some(Payload::Unary(arg)) => {
                fixed.push(*arg);
                Either::Left(fixed.into_iter())
            }
            Some(Payload::Binary(lhs, rhs)) => {
                fixed.extend([*lhs, *rhs]);
                Either::Left(fixed.into_iter())
            }
            Some(Payload::Conditional {
                condition,
                true_expr,
                false_expr,
            }) => {
                fixed.extend([*condition, *true_expr]);
                fixed.extend(*false_expr);
                Either::Left(fixed.into_iter())
            }
            Some(Payload::PLTerm { var, .. }) => {
                fixed.push(*var);
                Either::Left(fixed.into_iter())
            }
            Some(Payload::Call { args, .. } | Payload::Iterated(args)) => {
                Either::Right(args.iter().copied())
            }
        };
        nodes.map(|node| Expr(Some(node)))
    }
}

macro_rules! impl_category_downcast {
    ($to:ident) => {
        impl<'a> TryFrom<Expr<'a>> for $to<'a> {
            type Error = ExprError;

            /// Checked downcast from the root view. The null handle converts to null.
            fn try_from(value: Expr<'a>) -> ExprResult<Self> {
                value.downcast().ok_or(ExprError::InvalidArgument)
            }
        }
    };
}

impl_category_downcast!(NumericExpr);
impl_category_downcast!(LogicalExpr);

impl<'a> NumericExpr<'a> {
    #[inline]
    pub fn downcast<H: ExprHandle<'a>>(self) -> Option<H> {
        self.as_expr().downcast()
    }
}

impl<'a> LogicalExpr<'a> {
    #[inline]
    pub fn downcast<H: ExprHandle<'a>>(self) -> Option<H> {
        self.as_expr().downcast()
    }
}
