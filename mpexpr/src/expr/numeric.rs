//! Concrete views over numeric expressions.
use crate::{
    arena::Payload,
    error::{ExprResult, checked_get},
    expr::{
        Expr, ExprHandle, LogicalExpr, NumericExpr, define_handle, impl_upcast,
        iter::impl_iterated, sealed::RawHandle,
    },
    function::Function,
    kind::{ExprKind, ExprShape},
};

define_handle!(
    /// Numeric literal.
    NumericConstant,
    |node| matches!(node.payload, Payload::Number(_))
);

define_handle!(
    /// Reference to a decision variable by index.
    Variable,
    |node| node.kind == ExprKind::Variable
);

define_handle!(
    /// Unary numeric operation such as `abs` or unary minus.
    UnaryExpr,
    |node| node.kind.shape() == ExprShape::Unary
);

define_handle!(
    /// Binary numeric operation such as `+` or `^`.
    BinaryExpr,
    |node| node.kind.shape() == ExprShape::Binary
);

define_handle!(
    /// `if condition then true_expr [else false_expr]`.
    IfExpr,
    |node| node.kind == ExprKind::If
);

define_handle!(
    /// Piecewise-linear term over a single variable.
    PLTerm,
    |node| node.kind == ExprKind::PLTerm
);

define_handle!(
    /// Call of a user-defined function. Arguments may be of either category.
    CallExpr,
    |node| node.kind == ExprKind::Call
);

define_handle!(
    /// `min` or `max` over numeric arguments.
    VarArgExpr,
    |node| node.kind.shape() == ExprShape::VarArg
);

define_handle!(
    /// Sum of numeric arguments.
    SumExpr,
    |node| node.kind == ExprKind::Sum
);

define_handle!(
    /// Number of arguments equal to the first one.
    NumberOfExpr,
    |node| node.kind == ExprKind::NumberOf
);

define_handle!(
    /// Number of true logical arguments. Numeric, with logical children.
    CountExpr,
    |node| node.kind == ExprKind::Count
);

impl_upcast!(NumericConstant => NumericExpr, Expr);
impl_upcast!(Variable => NumericExpr, Expr);
impl_upcast!(UnaryExpr => NumericExpr, Expr);
impl_upcast!(BinaryExpr => NumericExpr, Expr);
impl_upcast!(IfExpr => NumericExpr, Expr);
impl_upcast!(PLTerm => NumericExpr, Expr);
impl_upcast!(CallExpr => NumericExpr, Expr);
impl_upcast!(VarArgExpr => NumericExpr, Expr);
impl_upcast!(SumExpr => NumericExpr, Expr);
impl_upcast!(NumberOfExpr => NumericExpr, Expr);
impl_upcast!(CountExpr => NumericExpr, Expr);

impl_iterated!(CallExpr => Expr);
impl_iterated!(VarArgExpr => NumericExpr);
impl_iterated!(SumExpr => NumericExpr);
impl_iterated!(NumberOfExpr => NumericExpr);
impl_iterated!(CountExpr => LogicalExpr);

impl<'a> NumericConstant<'a> {
    #[track_caller]
    pub fn value(&self) -> f64 {
        match self.get().payload {
            Payload::Number(value) => value,
            _ => unreachable!(),
        }
    }
}

impl<'a> Variable<'a> {
    /// Index of the referenced decision variable.
    #[track_caller]
    pub fn index(&self) -> usize {
        match self.get().payload {
            Payload::Variable(index) => index,
            _ => unreachable!(),
        }
    }
}

impl<'a> UnaryExpr<'a> {
    #[track_caller]
    pub fn arg(&self) -> NumericExpr<'a> {
        NumericExpr::from_node(Some(self.get().unary()))
    }
}

impl<'a> BinaryExpr<'a> {
    #[track_caller]
    pub fn lhs(&self) -> NumericExpr<'a> {
        NumericExpr::from_node(Some(self.get().binary().0))
    }

    #[track_caller]
    pub fn rhs(&self) -> NumericExpr<'a> {
        NumericExpr::from_node(Some(self.get().binary().1))
    }
}

impl<'a> IfExpr<'a> {
    #[track_caller]
    pub fn condition(&self) -> LogicalExpr<'a> {
        LogicalExpr::from_node(Some(self.get().conditional().0))
    }

    #[track_caller]
    pub fn true_expr(&self) -> NumericExpr<'a> {
        NumericExpr::from_node(Some(self.get().conditional().1))
    }

    /// The false branch; null when the expression was built without one.
    #[track_caller]
    pub fn false_expr(&self) -> NumericExpr<'a> {
        NumericExpr::from_node(self.get().conditional().2)
    }
}

impl<'a> PLTerm<'a> {
    #[track_caller]
    fn parts(&self) -> (&'a [f64], &'a [f64], Variable<'a>) {
        match self.get().payload {
            Payload::PLTerm {
                slopes,
                breakpoints,
                var,
            } => (slopes, breakpoints, Variable::from_node(Some(var))),
            _ => unreachable!(),
        }
    }

    pub fn num_breakpoints(&self) -> usize {
        self.parts().1.len()
    }

    /// Always `num_breakpoints() + 1`.
    pub fn num_slopes(&self) -> usize {
        self.parts().0.len()
    }

    pub fn slope(&self, index: usize) -> ExprResult<f64> {
        checked_get(self.parts().0, index)
    }

    pub fn breakpoint(&self, index: usize) -> ExprResult<f64> {
        checked_get(self.parts().1, index)
    }

    pub fn slopes(&self) -> &'a [f64] {
        self.parts().0
    }

    pub fn breakpoints(&self) -> &'a [f64] {
        self.parts().1
    }

    /// The variable the term is applied to.
    pub fn arg(&self) -> Variable<'a> {
        self.parts().2
    }

    pub fn var_index(&self) -> usize {
        self.arg().index()
    }
}

impl<'a> CallExpr<'a> {
    /// The called function.
    #[track_caller]
    pub fn function(&self) -> Function<'a> {
        match self.get().payload {
            Payload::Call { function, .. } => Function::from_info(function),
            _ => unreachable!(),
        }
    }
}

impl<'a> NumberOfExpr<'a> {
    /// The value whose occurrences are counted; always the first argument.
    #[track_caller]
    pub fn value(&self) -> NumericExpr<'a> {
        NumericExpr::from_node(self.get().args().first().copied())
    }
}

impl<'a> NumericExpr<'a> {
    /// Dispatch view over the concrete kind of this expression.
    pub fn view(&self) -> crate::expr::view::ExprView<'a> {
        self.as_expr().view()
    }
}
