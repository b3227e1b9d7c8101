//! Dispatch enum over the concrete views.
//!
//! [`Expr::view`] decodes the outer constructor of a node in O(1) and returns the
//! matching concrete handle, which is how consumers (writers, drivers) branch on
//! expression kinds without unchecked casts.
use strum::{EnumDiscriminants, EnumIs};

use crate::{
    arena::Payload,
    expr::{
        AllDiffExpr, BinaryExpr, BinaryLogicalExpr, CallExpr, CountExpr, Expr, IfExpr,
        ImplicationExpr, IteratedLogicalExpr, LogicalConstant, LogicalCountExpr, NotExpr,
        NumberOfExpr, NumericConstant, PLTerm, RelationalExpr, SumExpr, UnaryExpr, VarArgExpr,
        Variable, sealed::RawHandle,
    },
    kind::ExprShape,
};

/// The concrete view of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIs, EnumDiscriminants)]
#[strum_discriminants(name(ExprViewVariant))]
#[strum_discriminants(vis(pub))]
pub enum ExprView<'a> {
    /// The null handle.
    Null,

    // Numeric
    NumericConstant(NumericConstant<'a>),
    Variable(Variable<'a>),
    Unary(UnaryExpr<'a>),
    Binary(BinaryExpr<'a>),
    If(IfExpr<'a>),
    PLTerm(PLTerm<'a>),
    Call(CallExpr<'a>),
    VarArg(VarArgExpr<'a>),
    Sum(SumExpr<'a>),
    NumberOf(NumberOfExpr<'a>),
    Count(CountExpr<'a>),

    // Logical
    LogicalConstant(LogicalConstant<'a>),
    Not(NotExpr<'a>),
    BinaryLogical(BinaryLogicalExpr<'a>),
    Relational(RelationalExpr<'a>),
    LogicalCount(LogicalCountExpr<'a>),
    Implication(ImplicationExpr<'a>),
    IteratedLogical(IteratedLogicalExpr<'a>),
    AllDiff(AllDiffExpr<'a>),
}

impl<'a> Expr<'a> {
    /// Decode the concrete view of this expression.
    pub fn view(&self) -> ExprView<'a> {
        let Some(n) = self.node() else {
            return ExprView::Null;
        };
        let node = Some(n);
        match n.kind.shape() {
            ExprShape::Constant => match n.payload {
                Payload::Bool(_) => ExprView::LogicalConstant(RawHandle::from_node(node)),
                _ => ExprView::NumericConstant(RawHandle::from_node(node)),
            },
            ExprShape::Variable => ExprView::Variable(RawHandle::from_node(node)),
            ExprShape::Unary => ExprView::Unary(RawHandle::from_node(node)),
            ExprShape::Binary => ExprView::Binary(RawHandle::from_node(node)),
            ExprShape::If => ExprView::If(RawHandle::from_node(node)),
            ExprShape::PLTerm => ExprView::PLTerm(RawHandle::from_node(node)),
            ExprShape::Call => ExprView::Call(RawHandle::from_node(node)),
            ExprShape::VarArg => ExprView::VarArg(RawHandle::from_node(node)),
            ExprShape::Sum => ExprView::Sum(RawHandle::from_node(node)),
            ExprShape::NumberOf => ExprView::NumberOf(RawHandle::from_node(node)),
            ExprShape::Count => ExprView::Count(RawHandle::from_node(node)),
            ExprShape::Not => ExprView::Not(RawHandle::from_node(node)),
            ExprShape::BinaryLogical => ExprView::BinaryLogical(RawHandle::from_node(node)),
            ExprShape::Relational => ExprView::Relational(RawHandle::from_node(node)),
            ExprShape::LogicalCount => ExprView::LogicalCount(RawHandle::from_node(node)),
            ExprShape::Implication => ExprView::Implication(RawHandle::from_node(node)),
            ExprShape::IteratedLogical => ExprView::IteratedLogical(RawHandle::from_node(node)),
            ExprShape::AllDiff => ExprView::AllDiff(RawHandle::from_node(node)),
        }
    }
}

impl<'a> ExprView<'a> {
    /// Upcast the view back to the root handle.
    pub fn as_expr(&self) -> Expr<'a> {
        match *self {
            ExprView::Null => Expr::default(),
            ExprView::NumericConstant(e) => e.into(),
            ExprView::Variable(e) => e.into(),
            ExprView::Unary(e) => e.into(),
            ExprView::Binary(e) => e.into(),
            ExprView::If(e) => e.into(),
            ExprView::PLTerm(e) => e.into(),
            ExprView::Call(e) => e.into(),
            ExprView::VarArg(e) => e.into(),
            ExprView::Sum(e) => e.into(),
            ExprView::NumberOf(e) => e.into(),
            ExprView::Count(e) => e.into(),
            ExprView::LogicalConstant(e) => e.into(),
            ExprView::Not(e) => e.into(),
            ExprView::BinaryLogical(e) => e.into(),
            ExprView::Relational(e) => e.into(),
            ExprView::LogicalCount(e) => e.into(),
            ExprView::Implication(e) => e.into(),
            ExprView::IteratedLogical(e) => e.into(),
            ExprView::AllDiff(e) => e.into(),
        }
    }
}
