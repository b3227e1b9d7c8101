//! Expression kinds and their static metadata.
//!
//! Every node carries an [`ExprKind`]. Kinds are laid out so that each structural
//! family occupies a contiguous range of discriminants; the admissible-set checks
//! performed by the factory are range tests over that layout.
use strum::{Display, EnumIter, FromRepr, IntoStaticStr};

/// Whether an expression produces a number or a truth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Numeric,
    Logical,
}

/// Structural family of an expression kind.
///
/// Each family maps to exactly one concrete handle type in [`crate::expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprShape {
    Constant,
    Variable,
    Unary,
    Binary,
    If,
    PLTerm,
    Call,
    VarArg,
    Sum,
    NumberOf,
    Count,
    Not,
    BinaryLogical,
    Relational,
    LogicalCount,
    Implication,
    IteratedLogical,
    AllDiff,
}

/// Operator tag of an expression node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, FromRepr, IntoStaticStr, Display,
)]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum ExprKind {
    // Atoms. `Constant` is shared by numeric and logical literals.
    Constant,
    Variable,

    // Unary numeric
    Minus,
    Abs,
    Floor,
    Ceil,
    Sqrt,
    Pow2,
    Exp,
    Log,
    Log10,
    Sin,
    Sinh,
    Cos,
    Cosh,
    Tan,
    Tanh,
    Asin,
    Asinh,
    Acos,
    Acosh,
    Atan,
    Atanh,

    // Binary numeric
    Add,
    Sub,
    Less,
    Mul,
    Div,
    TruncDiv,
    Mod,
    Pow,
    PowConstBase,
    PowConstExp,
    Atan2,
    Precision,
    Round,
    Trunc,

    If,
    PLTerm,
    Call,

    // Var-arg numeric
    Min,
    Max,

    Sum,
    NumberOf,
    Count,

    // Logical
    Not,

    // Binary logical
    Or,
    And,
    Iff,

    // Relational
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
    Ne,

    // Logical count
    AtLeast,
    AtMost,
    Exactly,
    NotAtLeast,
    NotAtMost,
    NotExactly,

    Implication,

    // Iterated logical
    Exists,
    Forall,

    AllDiff,
}

impl ExprKind {
    const FIRST_UNARY: u8 = ExprKind::Minus as u8;
    const LAST_UNARY: u8 = ExprKind::Atanh as u8;
    const FIRST_BINARY: u8 = ExprKind::Add as u8;
    const LAST_BINARY: u8 = ExprKind::Trunc as u8;
    const FIRST_VARARG: u8 = ExprKind::Min as u8;
    const LAST_VARARG: u8 = ExprKind::Max as u8;
    const FIRST_BINARY_LOGICAL: u8 = ExprKind::Or as u8;
    const LAST_BINARY_LOGICAL: u8 = ExprKind::Iff as u8;
    const FIRST_RELATIONAL: u8 = ExprKind::Lt as u8;
    const LAST_RELATIONAL: u8 = ExprKind::Ne as u8;
    const FIRST_LOGICAL_COUNT: u8 = ExprKind::AtLeast as u8;
    const LAST_LOGICAL_COUNT: u8 = ExprKind::NotExactly as u8;
    const FIRST_ITERATED_LOGICAL: u8 = ExprKind::Exists as u8;
    const LAST_ITERATED_LOGICAL: u8 = ExprKind::Forall as u8;

    #[inline]
    const fn in_range(self, first: u8, last: u8) -> bool {
        let k = self as u8;
        k >= first && k <= last
    }

    /// Kinds accepted by [`ExprFactory::make_unary`](crate::factory::ExprFactory::make_unary).
    #[inline]
    pub const fn is_unary(self) -> bool {
        self.in_range(Self::FIRST_UNARY, Self::LAST_UNARY)
    }

    /// Kinds accepted by [`ExprFactory::make_binary`](crate::factory::ExprFactory::make_binary).
    #[inline]
    pub const fn is_binary(self) -> bool {
        self.in_range(Self::FIRST_BINARY, Self::LAST_BINARY)
    }

    /// Kinds accepted by [`ExprFactory::begin_vararg`](crate::factory::ExprFactory::begin_vararg).
    #[inline]
    pub const fn is_vararg(self) -> bool {
        self.in_range(Self::FIRST_VARARG, Self::LAST_VARARG)
    }

    #[inline]
    pub const fn is_binary_logical(self) -> bool {
        self.in_range(Self::FIRST_BINARY_LOGICAL, Self::LAST_BINARY_LOGICAL)
    }

    #[inline]
    pub const fn is_relational(self) -> bool {
        self.in_range(Self::FIRST_RELATIONAL, Self::LAST_RELATIONAL)
    }

    #[inline]
    pub const fn is_logical_count(self) -> bool {
        self.in_range(Self::FIRST_LOGICAL_COUNT, Self::LAST_LOGICAL_COUNT)
    }

    #[inline]
    pub const fn is_iterated_logical(self) -> bool {
        self.in_range(Self::FIRST_ITERATED_LOGICAL, Self::LAST_ITERATED_LOGICAL)
    }

    /// Structural family of this kind.
    pub const fn shape(self) -> ExprShape {
        use ExprKind::*;

        if self.is_unary() {
            return ExprShape::Unary;
        }
        if self.is_binary() {
            return ExprShape::Binary;
        }
        if self.is_vararg() {
            return ExprShape::VarArg;
        }
        if self.is_binary_logical() {
            return ExprShape::BinaryLogical;
        }
        if self.is_relational() {
            return ExprShape::Relational;
        }
        if self.is_logical_count() {
            return ExprShape::LogicalCount;
        }
        if self.is_iterated_logical() {
            return ExprShape::IteratedLogical;
        }
        match self {
            Constant => ExprShape::Constant,
            Variable => ExprShape::Variable,
            If => ExprShape::If,
            PLTerm => ExprShape::PLTerm,
            Call => ExprShape::Call,
            Sum => ExprShape::Sum,
            NumberOf => ExprShape::NumberOf,
            Count => ExprShape::Count,
            Not => ExprShape::Not,
            Implication => ExprShape::Implication,
            AllDiff => ExprShape::AllDiff,
            // Covered by the range checks above.
            _ => unreachable!(),
        }
    }

    /// Category of the value produced by expressions of this kind.
    ///
    /// Returns `None` for [`ExprKind::Constant`]: the category of a literal is
    /// decided by the literal itself.
    pub const fn category(self) -> Option<Category> {
        match self.shape() {
            ExprShape::Constant => None,
            ExprShape::Variable
            | ExprShape::Unary
            | ExprShape::Binary
            | ExprShape::If
            | ExprShape::PLTerm
            | ExprShape::Call
            | ExprShape::VarArg
            | ExprShape::Sum
            | ExprShape::NumberOf
            | ExprShape::Count => Some(Category::Numeric),
            ExprShape::Not
            | ExprShape::BinaryLogical
            | ExprShape::Relational
            | ExprShape::LogicalCount
            | ExprShape::Implication
            | ExprShape::IteratedLogical
            | ExprShape::AllDiff => Some(Category::Logical),
        }
    }

    /// Smallest arity an iterated expression of this kind may declare.
    #[inline]
    pub const fn min_args(self) -> usize {
        match self {
            ExprKind::NumberOf => 1,
            _ => 0,
        }
    }

    /// AMPL spelling of the operator, used when printing expressions.
    pub const fn symbol(self) -> &'static str {
        use ExprKind::*;

        match self {
            Constant => "constant",
            Variable => "variable",
            Minus => "-",
            Abs => "abs",
            Floor => "floor",
            Ceil => "ceil",
            Sqrt => "sqrt",
            Pow2 => "^2",
            Exp => "exp",
            Log => "log",
            Log10 => "log10",
            Sin => "sin",
            Sinh => "sinh",
            Cos => "cos",
            Cosh => "cosh",
            Tan => "tan",
            Tanh => "tanh",
            Asin => "asin",
            Asinh => "asinh",
            Acos => "acos",
            Acosh => "acosh",
            Atan => "atan",
            Atanh => "atanh",
            Add => "+",
            Sub => "-",
            Less => "less",
            Mul => "*",
            Div => "/",
            TruncDiv => "div",
            Mod => "mod",
            Pow | PowConstBase | PowConstExp => "^",
            Atan2 => "atan2",
            Precision => "precision",
            Round => "round",
            Trunc => "trunc",
            If => "if",
            PLTerm => "<<>>",
            Call => "call",
            Min => "min",
            Max => "max",
            Sum => "sum",
            NumberOf => "numberof",
            Count => "count",
            Not => "!",
            Or => "||",
            And => "&&",
            Iff => "<==>",
            Lt => "<",
            Le => "<=",
            Eq => "=",
            Ge => ">=",
            Gt => ">",
            Ne => "!=",
            AtLeast => "atleast",
            AtMost => "atmost",
            Exactly => "exactly",
            NotAtLeast => "!atleast",
            NotAtMost => "!atmost",
            NotExactly => "!exactly",
            Implication => "==>",
            Exists => "exists",
            Forall => "forall",
            AllDiff => "alldiff",
        }
    }
}
