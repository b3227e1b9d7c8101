//! mpexpr: typed, arena-backed expression trees for mathematical-programming models.
//!
//! The crate is the in-memory representation that sits between a model reader (for
//! instance an AMPL `.nl` parser) and the solver drivers that consume the model:
//! numeric expressions (arithmetic, `if`, piecewise-linear terms, function calls,
//! `min`/`max`, `sum`, `count`, `numberof`) and logical expressions (`!`, `&&`, `||`,
//! comparisons, `atleast`/`atmost`/`exactly`, implication, `exists`/`forall`,
//! `alldiff`).
//!
//! Shape
//!  - Nodes are immutable records (operator kind + payload) owned by an
//!    [`ExprFactory`](factory::ExprFactory) and freed in bulk when it drops.
//!  - Handles are pointer-sized `Copy` views onto nodes. Each concrete view exposes only
//!    the accessors of its structural family and upcasts to [`NumericExpr`](expr::NumericExpr)
//!    or [`LogicalExpr`](expr::LogicalExpr) and to [`Expr`](expr::Expr).
//!  - Every constructor validates operator kinds, null children and arities and reports
//!    misuse as an [`ExprError`](error::ExprError); the child categories are enforced by
//!    the handle types themselves.
//!
//! Example
//! ```
//! use mpexpr::prelude::*;
//!
//! let factory = ExprFactory::new();
//! let x = factory.make_variable(0);
//! let y = factory.make_variable(1);
//! let ten = factory.make_numeric_constant(10.0);
//!
//! // x * y <= 10
//! let prod = factory.make_binary(ExprKind::Mul, x, y).unwrap();
//! let le = factory.make_relational(ExprKind::Le, prod, ten).unwrap();
//! assert_eq!(le.lhs(), prod);
//! assert_eq!(le.category(), Category::Logical);
//! assert_eq!(le.to_string(), "x[0] * x[1] <= 10");
//!
//! // Misuse is reported, not silently accepted.
//! assert_eq!(
//!     factory.make_binary(ExprKind::If, x, y).unwrap_err(),
//!     ExprError::InvalidKind
//! );
//! ```

mod arena;
/// Builders for iterated expressions and piecewise-linear terms.
pub mod builder;
/// Error type shared by every fallible operation.
pub mod error;
/// Expression handles, iterators, dispatch views and pretty-printing.
pub mod expr;
/// The factory that owns and creates expression nodes.
pub mod factory;
/// Function descriptors referenced by call expressions.
pub mod function;
/// Operator kinds and their metadata.
pub mod kind;
/// Iterative traversal and structural comparison.
pub mod walker;

pub mod prelude {
    //! Convenient re-exports for end users.
    //!
    //! - The factory, its configuration and the builders
    //! - Every handle type plus the `ExprHandle`/`IteratedExpr` traits
    //! - Kinds, errors, dispatch views, walkers and pretty-printing
    pub use crate::builder::{
        AllDiffExprBuilder, CallExprBuilder, CountExprBuilder, IteratedExprBuilder,
        IteratedLogicalExprBuilder, NumberOfExprBuilder, PLTermBuilder, SumExprBuilder,
        VarArgExprBuilder,
    };
    pub use crate::error::{ExprError, ExprResult};
    pub use crate::expr::{
        AllDiffExpr, BinaryExpr, BinaryLogicalExpr, CallExpr, CountExpr, Expr, ExprHandle,
        ExprIterator, IfExpr, ImplicationExpr, IteratedExpr, IteratedLogicalExpr,
        LogicalConstant, LogicalCountExpr, LogicalExpr, NotExpr, NumberOfExpr, NumericConstant,
        NumericExpr, PLTerm, RelationalExpr, SumExpr, UnaryExpr, VarArgExpr, Variable,
        pretty::PrettyExpr,
        view::{ExprView, ExprViewVariant},
    };
    pub use crate::factory::{ExprFactory, FactoryConfig, with_factory};
    pub use crate::function::Function;
    pub use crate::kind::{Category, ExprKind, ExprShape};

    // Walker ergonomics
    pub use crate::walker::{WalkControl, compare_expressions, walk, walk_no_input};
}
