//! Concrete views over logical expressions.
use crate::{
    arena::Payload,
    expr::{
        CountExpr, Expr, ExprHandle, LogicalExpr, NumericExpr, define_handle, impl_upcast,
        iter::impl_iterated, sealed::RawHandle,
    },
    kind::{ExprKind, ExprShape},
};

define_handle!(
    /// Boolean literal.
    LogicalConstant,
    |node| matches!(node.payload, Payload::Bool(_))
);

define_handle!(NotExpr, |node| node.kind == ExprKind::Not);

define_handle!(
    /// `&&`, `||` or `<==>` over two logical operands.
    BinaryLogicalExpr,
    |node| node.kind.shape() == ExprShape::BinaryLogical
);

define_handle!(
    /// Comparison of two numeric operands.
    RelationalExpr,
    |node| node.kind.shape() == ExprShape::Relational
);

define_handle!(
    /// `atleast`, `atmost`, `exactly` and their negations: a numeric bound against a count.
    LogicalCountExpr,
    |node| node.kind.shape() == ExprShape::LogicalCount
);

define_handle!(
    /// `condition ==> true_expr [else false_expr]`.
    ImplicationExpr,
    |node| node.kind == ExprKind::Implication
);

define_handle!(
    /// `exists` or `forall` over logical arguments.
    IteratedLogicalExpr,
    |node| node.kind.shape() == ExprShape::IteratedLogical
);

define_handle!(
    /// All-different constraint over numeric arguments.
    AllDiffExpr,
    |node| node.kind == ExprKind::AllDiff
);

impl_upcast!(LogicalConstant => LogicalExpr, Expr);
impl_upcast!(NotExpr => LogicalExpr, Expr);
impl_upcast!(BinaryLogicalExpr => LogicalExpr, Expr);
impl_upcast!(RelationalExpr => LogicalExpr, Expr);
impl_upcast!(LogicalCountExpr => LogicalExpr, Expr);
impl_upcast!(ImplicationExpr => LogicalExpr, Expr);
impl_upcast!(IteratedLogicalExpr => LogicalExpr, Expr);
impl_upcast!(AllDiffExpr => LogicalExpr, Expr);

impl_iterated!(IteratedLogicalExpr => LogicalExpr);
impl_iterated!(AllDiffExpr => NumericExpr);

impl<'a> LogicalConstant<'a> {
    #[track_caller]
    pub fn value(&self) -> bool {
        match self.get().payload {
            Payload::Bool(value) => value,
            _ => unreachable!(),
        }
    }
}

impl<'a> NotExpr<'a> {
    #[track_caller]
    pub fn arg(&self) -> LogicalExpr<'a> {
        LogicalExpr::from_node(Some(self.get().unary()))
    }
}

impl<'a> BinaryLogicalExpr<'a> {
    #[track_caller]
    pub fn lhs(&self) -> LogicalExpr<'a> {
        LogicalExpr::from_node(Some(self.get().binary().0))
    }

    #[track_caller]
    pub fn rhs(&self) -> LogicalExpr<'a> {
        LogicalExpr::from_node(Some(self.get().binary().1))
    }
}

impl<'a> RelationalExpr<'a> {
    #[track_caller]
    pub fn lhs(&self) -> NumericExpr<'a> {
        NumericExpr::from_node(Some(self.get().binary().0))
    }

    #[track_caller]
    pub fn rhs(&self) -> NumericExpr<'a> {
        NumericExpr::from_node(Some(self.get().binary().1))
    }
}

impl<'a> LogicalCountExpr<'a> {
    #[track_caller]
    pub fn lhs(&self) -> NumericExpr<'a> {
        NumericExpr::from_node(Some(self.get().binary().0))
    }

    #[track_caller]
    pub fn rhs(&self) -> CountExpr<'a> {
        CountExpr::from_node(Some(self.get().binary().1))
    }
}

impl<'a> ImplicationExpr<'a> {
    #[track_caller]
    pub fn condition(&self) -> LogicalExpr<'a> {
        LogicalExpr::from_node(Some(self.get().conditional().0))
    }

    #[track_caller]
    pub fn true_expr(&self) -> LogicalExpr<'a> {
        LogicalExpr::from_node(Some(self.get().conditional().1))
    }

    /// The false branch; null when the expression was built without one.
    #[track_caller]
    pub fn false_expr(&self) -> LogicalExpr<'a> {
        LogicalExpr::from_node(self.get().conditional().2)
    }
}

impl<'a> LogicalExpr<'a> {
    /// Dispatch view over the concrete kind of this expression.
    pub fn view(&self) -> crate::expr::view::ExprView<'a> {
        self.as_expr().view()
    }
}
