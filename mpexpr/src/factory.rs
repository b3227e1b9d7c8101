//! The expression factory: sole producer of expression nodes.
//!
//! Every constructor validates its inputs before touching the arena, so a failed
//! call leaves the factory exactly as it was. Allocation methods take `&'a self`:
//! handles borrow the factory and cannot outlive it.
use log::trace;

use crate::{
    arena::{ExprArena, NodeRef, Payload},
    builder::{
        AllDiffExprBuilder, CallExprBuilder, CountExprBuilder, IteratedExprBuilder,
        IteratedLogicalExprBuilder, NumberOfExprBuilder, PLTermBuilder, SumExprBuilder,
        VarArgExprBuilder,
    },
    error::{ExprError, ExprResult},
    expr::{
        AllDiffExpr, BinaryExpr, BinaryLogicalExpr, CallExpr, CountExpr, ExprHandle, IfExpr,
        ImplicationExpr, IteratedExpr, IteratedLogicalExpr, LogicalConstant, LogicalCountExpr,
        LogicalExpr, NotExpr, NumberOfExpr, NumericConstant, NumericExpr, PLTerm,
        RelationalExpr, SumExpr, UnaryExpr, VarArgExpr, Variable, sealed::RawHandle,
    },
    function::{Function, FunctionRegistry},
    kind::ExprKind,
};

/// Initial sizing of the factory arenas.
///
/// Arenas grow on demand; the capacities only decide the size of the first chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Number of expression nodes.
    pub node_capacity: usize,
    /// Number of child references across all iterated expressions.
    pub arg_capacity: usize,
    /// Number of PL-term slopes and breakpoints.
    pub number_capacity: usize,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            node_capacity: 256,
            arg_capacity: 512,
            number_capacity: 64,
        }
    }
}

/// Owns every node and function descriptor of an expression graph.
///
/// ```
/// use mpexpr::prelude::*;
///
/// let factory = ExprFactory::new();
/// let x = factory.make_variable(0);
/// let two = factory.make_numeric_constant(2.0);
/// let sq = factory.make_binary(ExprKind::Pow, x, two).unwrap();
///
/// let mut sum = factory.begin_sum(2).unwrap();
/// sum.add_arg(sq).unwrap();
/// sum.add_arg(x).unwrap();
/// let sum = factory.end_sum(sum).unwrap();
///
/// assert_eq!(sum.num_args(), 2);
/// assert_eq!(sum.arg(0).unwrap(), sq);
/// ```
pub struct ExprFactory<'a> {
    arena: ExprArena<'a>,
    functions: FunctionRegistry<'a>,
}

impl Default for ExprFactory<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `callback` with a factory scoped to the call.
pub fn with_factory<F, R>(callback: F) -> R
where
    F: for<'a> FnOnce(&'a ExprFactory<'a>) -> R,
{
    let factory = ExprFactory::new();
    callback(&factory)
}

/// Node behind a required (non-null) child.
#[inline]
fn required<'a, H: ExprHandle<'a>>(handle: H) -> ExprResult<NodeRef<'a>> {
    handle.node().ok_or(ExprError::InvalidArgument)
}

impl<'a> ExprFactory<'a> {
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    pub fn with_config(config: FactoryConfig) -> Self {
        Self {
            arena: ExprArena::with_capacity(
                config.node_capacity,
                config.arg_capacity,
                config.number_capacity,
            ),
            functions: FunctionRegistry::new(),
        }
    }

    /// Number of nodes created so far.
    pub fn num_nodes(&self) -> usize {
        self.arena.num_nodes()
    }

    // ---------------------------------------------------------------------
    // Atomic constructors
    // ---------------------------------------------------------------------

    pub fn make_numeric_constant(&'a self, value: f64) -> NumericConstant<'a> {
        let node = self
            .arena
            .alloc_node(ExprKind::Constant, Payload::Number(value));
        NumericConstant::from_node(Some(node))
    }

    /// Reference to the decision variable with the given index.
    pub fn make_variable(&'a self, index: usize) -> Variable<'a> {
        let node = self
            .arena
            .alloc_node(ExprKind::Variable, Payload::Variable(index));
        Variable::from_node(Some(node))
    }

    pub fn make_logical_constant(&'a self, value: bool) -> LogicalConstant<'a> {
        let node = self
            .arena
            .alloc_node(ExprKind::Constant, Payload::Bool(value));
        LogicalConstant::from_node(Some(node))
    }

    // ---------------------------------------------------------------------
    // Function registry
    // ---------------------------------------------------------------------

    /// Register a function that call expressions can reference.
    ///
    /// Names need not be unique: every call creates a new descriptor, and
    /// [`find_function`](Self::find_function) resolves a name to the first one.
    pub fn add_function(&'a self, name: &str) -> Function<'a> {
        self.functions.add(name)
    }

    pub fn num_functions(&self) -> usize {
        self.functions.len()
    }

    /// Function registered at position `index`.
    pub fn function(&self, index: usize) -> ExprResult<Function<'a>> {
        self.functions
            .get(index)
            .ok_or(ExprError::IndexOutOfBounds {
                index,
                len: self.functions.len(),
            })
    }

    /// First function registered under `name`.
    pub fn find_function(&self, name: &str) -> Option<Function<'a>> {
        self.functions.find(name)
    }

    // ---------------------------------------------------------------------
    // Fixed-shape constructors
    // ---------------------------------------------------------------------

    /// Unary numeric operation. `kind` must satisfy [`ExprKind::is_unary`].
    pub fn make_unary(
        &'a self,
        kind: ExprKind,
        arg: impl Into<NumericExpr<'a>>,
    ) -> ExprResult<UnaryExpr<'a>> {
        if !kind.is_unary() {
            return Err(ExprError::InvalidKind);
        }
        let arg = required::<NumericExpr>(arg.into())?;
        let node = self.arena.alloc_node(kind, Payload::Unary(arg));
        Ok(UnaryExpr::from_node(Some(node)))
    }

    /// Binary numeric operation. `kind` must satisfy [`ExprKind::is_binary`].
    pub fn make_binary(
        &'a self,
        kind: ExprKind,
        lhs: impl Into<NumericExpr<'a>>,
        rhs: impl Into<NumericExpr<'a>>,
    ) -> ExprResult<BinaryExpr<'a>> {
        if !kind.is_binary() {
            return Err(ExprError::InvalidKind);
        }
        let lhs = required::<NumericExpr>(lhs.into())?;
        let rhs = required::<NumericExpr>(rhs.into())?;
        let node = self.arena.alloc_node(kind, Payload::Binary(lhs, rhs));
        Ok(BinaryExpr::from_node(Some(node)))
    }

    /// `if condition then true_expr else false_expr`. The false branch may be null.
    pub fn make_if(
        &'a self,
        condition: impl Into<LogicalExpr<'a>>,
        true_expr: impl Into<NumericExpr<'a>>,
        false_expr: impl Into<NumericExpr<'a>>,
    ) -> ExprResult<IfExpr<'a>> {
        let payload = Payload::Conditional {
            condition: required::<LogicalExpr>(condition.into())?,
            true_expr: required::<NumericExpr>(true_expr.into())?,
            false_expr: Into::<NumericExpr<'a>>::into(false_expr).node(),
        };
        let node = self.arena.alloc_node(ExprKind::If, payload);
        Ok(IfExpr::from_node(Some(node)))
    }

    pub fn make_not(&'a self, arg: impl Into<LogicalExpr<'a>>) -> ExprResult<NotExpr<'a>> {
        let arg = required::<LogicalExpr>(arg.into())?;
        let node = self.arena.alloc_node(ExprKind::Not, Payload::Unary(arg));
        Ok(NotExpr::from_node(Some(node)))
    }

    /// `&&`, `||` or `<==>`.
    pub fn make_binary_logical(
        &'a self,
        kind: ExprKind,
        lhs: impl Into<LogicalExpr<'a>>,
        rhs: impl Into<LogicalExpr<'a>>,
    ) -> ExprResult<BinaryLogicalExpr<'a>> {
        if !kind.is_binary_logical() {
            return Err(ExprError::InvalidKind);
        }
        let lhs = required::<LogicalExpr>(lhs.into())?;
        let rhs = required::<LogicalExpr>(rhs.into())?;
        let node = self.arena.alloc_node(kind, Payload::Binary(lhs, rhs));
        Ok(BinaryLogicalExpr::from_node(Some(node)))
    }

    /// Comparison of two numeric expressions.
    pub fn make_relational(
        &'a self,
        kind: ExprKind,
        lhs: impl Into<NumericExpr<'a>>,
        rhs: impl Into<NumericExpr<'a>>,
    ) -> ExprResult<RelationalExpr<'a>> {
        if !kind.is_relational() {
            return Err(ExprError::InvalidKind);
        }
        let lhs = required::<NumericExpr>(lhs.into())?;
        let rhs = required::<NumericExpr>(rhs.into())?;
        let node = self.arena.alloc_node(kind, Payload::Binary(lhs, rhs));
        Ok(RelationalExpr::from_node(Some(node)))
    }

    /// Bound `lhs` against the number of true arguments of `rhs`.
    pub fn make_logical_count(
        &'a self,
        kind: ExprKind,
        lhs: impl Into<NumericExpr<'a>>,
        rhs: CountExpr<'a>,
    ) -> ExprResult<LogicalCountExpr<'a>> {
        if !kind.is_logical_count() {
            return Err(ExprError::InvalidKind);
        }
        let lhs = required::<NumericExpr>(lhs.into())?;
        let rhs = required(rhs)?;
        let node = self.arena.alloc_node(kind, Payload::Binary(lhs, rhs));
        Ok(LogicalCountExpr::from_node(Some(node)))
    }

    /// `condition ==> true_expr else false_expr`. The false branch may be null.
    pub fn make_implication(
        &'a self,
        condition: impl Into<LogicalExpr<'a>>,
        true_expr: impl Into<LogicalExpr<'a>>,
        false_expr: impl Into<LogicalExpr<'a>>,
    ) -> ExprResult<ImplicationExpr<'a>> {
        let payload = Payload::Conditional {
            condition: required::<LogicalExpr>(condition.into())?,
            true_expr: required::<LogicalExpr>(true_expr.into())?,
            false_expr: Into::<LogicalExpr<'a>>::into(false_expr).node(),
        };
        let node = self.arena.alloc_node(ExprKind::Implication, payload);
        Ok(ImplicationExpr::from_node(Some(node)))
    }

    // ---------------------------------------------------------------------
    // Iterated builders
    // ---------------------------------------------------------------------

    /// Copy the collected children into the arena and allocate the node.
    fn finish_iterated<E: IteratedExpr<'a>>(
        &'a self,
        builder: IteratedExprBuilder<'a, E>,
    ) -> ExprResult<E> {
        // Builders are not tied to the factory that started them.
        if builder
            .function
            .is_some_and(|function| !self.functions.owns(function))
        {
            return Err(ExprError::InvalidFunction);
        }
        let args = self.arena.alloc_args(builder.finish()?.iter().copied());
        let payload = match builder.function {
            Some(function) => Payload::Call { function, args },
            None => Payload::Iterated(args),
        };
        let node = self.arena.alloc_node(builder.kind, payload);
        trace!("Finished {} expression with {} arguments.", builder.kind, args.len());
        Ok(E::from_node(Some(node)))
    }

    /// Start a call of `function` with `num_args` arguments of any category.
    ///
    /// Fails with [`ExprError::InvalidFunction`] if `function` is null or was
    /// registered in another factory.
    pub fn begin_call(
        &self,
        function: Function<'a>,
        num_args: usize,
    ) -> ExprResult<CallExprBuilder<'a>> {
        let info = function.info().ok_or(ExprError::InvalidFunction)?;
        if !self.functions.owns(info) {
            return Err(ExprError::InvalidFunction);
        }
        Ok(CallExprBuilder::new(ExprKind::Call, num_args).with_function(info))
    }

    pub fn end_call(&'a self, builder: CallExprBuilder<'a>) -> ExprResult<CallExpr<'a>> {
        self.finish_iterated(builder)
    }

    /// Start a `min` or `max` expression.
    pub fn begin_vararg(
        &self,
        kind: ExprKind,
        num_args: usize,
    ) -> ExprResult<VarArgExprBuilder<'a>> {
        if !kind.is_vararg() {
            return Err(ExprError::InvalidKind);
        }
        Ok(VarArgExprBuilder::new(kind, num_args))
    }

    pub fn end_vararg(&'a self, builder: VarArgExprBuilder<'a>) -> ExprResult<VarArgExpr<'a>> {
        self.finish_iterated(builder)
    }

    pub fn begin_sum(&self, num_args: usize) -> ExprResult<SumExprBuilder<'a>> {
        Ok(SumExprBuilder::new(ExprKind::Sum, num_args))
    }

    pub fn end_sum(&'a self, builder: SumExprBuilder<'a>) -> ExprResult<SumExpr<'a>> {
        self.finish_iterated(builder)
    }

    /// Start a `numberof value in (...)` expression.
    ///
    /// `value` becomes argument 0, so `num_args` counts it and must be at least 1;
    /// the builder then expects `num_args - 1` candidates.
    pub fn begin_number_of(
        &self,
        num_args: usize,
        value: impl Into<NumericExpr<'a>>,
    ) -> ExprResult<NumberOfExprBuilder<'a>> {
        if num_args < ExprKind::NumberOf.min_args() {
            return Err(ExprError::InvalidNumArgs);
        }
        let mut builder = NumberOfExprBuilder::new(ExprKind::NumberOf, num_args);
        builder.add_arg(value)?;
        Ok(builder)
    }

    pub fn end_number_of(
        &'a self,
        builder: NumberOfExprBuilder<'a>,
    ) -> ExprResult<NumberOfExpr<'a>> {
        self.finish_iterated(builder)
    }

    /// Start a count of true logical arguments.
    pub fn begin_count(&self, num_args: usize) -> ExprResult<CountExprBuilder<'a>> {
        Ok(CountExprBuilder::new(ExprKind::Count, num_args))
    }

    pub fn end_count(&'a self, builder: CountExprBuilder<'a>) -> ExprResult<CountExpr<'a>> {
        self.finish_iterated(builder)
    }

    /// Start an `exists` or `forall` expression.
    pub fn begin_iterated_logical(
        &self,
        kind: ExprKind,
        num_args: usize,
    ) -> ExprResult<IteratedLogicalExprBuilder<'a>> {
        if !kind.is_iterated_logical() {
            return Err(ExprError::InvalidKind);
        }
        Ok(IteratedLogicalExprBuilder::new(kind, num_args))
    }

    pub fn end_iterated_logical(
        &'a self,
        builder: IteratedLogicalExprBuilder<'a>,
    ) -> ExprResult<IteratedLogicalExpr<'a>> {
        self.finish_iterated(builder)
    }

    pub fn begin_all_diff(&self, num_args: usize) -> ExprResult<AllDiffExprBuilder<'a>> {
        Ok(AllDiffExprBuilder::new(ExprKind::AllDiff, num_args))
    }

    pub fn end_all_diff(
        &'a self,
        builder: AllDiffExprBuilder<'a>,
    ) -> ExprResult<AllDiffExpr<'a>> {
        self.finish_iterated(builder)
    }

    /// Start a piecewise-linear term with `num_breakpoints` breakpoints and
    /// `num_breakpoints + 1` slopes.
    pub fn begin_pl_term(&self, num_breakpoints: usize) -> ExprResult<PLTermBuilder> {
        PLTermBuilder::new(num_breakpoints)
    }

    /// Finish a piecewise-linear term applied to `var`.
    pub fn end_pl_term(
        &'a self,
        builder: PLTermBuilder,
        var: Variable<'a>,
    ) -> ExprResult<PLTerm<'a>> {
        let var = required(var)?;
        let (slopes, breakpoints) = builder.finish()?;
        let payload = Payload::PLTerm {
            slopes: self.arena.alloc_numbers(slopes.iter().copied()),
            breakpoints: self.arena.alloc_numbers(breakpoints.iter().copied()),
            var,
        };
        let node = self.arena.alloc_node(ExprKind::PLTerm, payload);
        trace!(
            "Finished PLTERM expression with {} breakpoints.",
            breakpoints.len()
        );
        Ok(PLTerm::from_node(Some(node)))
    }
}
