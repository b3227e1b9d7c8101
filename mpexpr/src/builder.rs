//! Builders accumulating the children of iterated expressions.
//!
//! A builder is obtained from one of the `begin_*` methods of
//! [`ExprFactory`](crate::factory::ExprFactory), receives exactly the declared number
//! of children and is consumed by the matching `end_*` method. Builders do not touch
//! the factory until they are ended, so dropping one leaves the factory unchanged.
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::{
    arena::NodeRef,
    error::{ExprError, ExprResult},
    expr::{
        AllDiffExpr, CallExpr, CountExpr, IteratedExpr, IteratedLogicalExpr, NumberOfExpr,
        SumExpr, VarArgExpr, sealed::RawHandle,
    },
    function::FunctionInfo,
    kind::ExprKind,
};

/// Upper bound on the space a builder reserves before any argument is added.
/// Declared arities come from model files and may be arbitrarily large.
const MAX_RESERVED: usize = 1024;

/// Accumulates the arguments of an iterated expression of type `E`.
///
/// The type parameter ties the builder to the `end_*` method that may finish it,
/// and fixes the accepted argument view to `E::Arg`.
#[derive(Debug)]
pub struct IteratedExprBuilder<'a, E> {
    pub(crate) kind: ExprKind,
    pub(crate) function: Option<&'a FunctionInfo>,
    pub(crate) num_args: usize,
    pub(crate) args: SmallVec<[NodeRef<'a>; 8]>,
    _expr: PhantomData<fn() -> E>,
}

pub type CallExprBuilder<'a> = IteratedExprBuilder<'a, CallExpr<'a>>;
pub type VarArgExprBuilder<'a> = IteratedExprBuilder<'a, VarArgExpr<'a>>;
pub type SumExprBuilder<'a> = IteratedExprBuilder<'a, SumExpr<'a>>;
pub type NumberOfExprBuilder<'a> = IteratedExprBuilder<'a, NumberOfExpr<'a>>;
pub type CountExprBuilder<'a> = IteratedExprBuilder<'a, CountExpr<'a>>;
pub type IteratedLogicalExprBuilder<'a> = IteratedExprBuilder<'a, IteratedLogicalExpr<'a>>;
pub type AllDiffExprBuilder<'a> = IteratedExprBuilder<'a, AllDiffExpr<'a>>;

impl<'a, E: IteratedExpr<'a>> IteratedExprBuilder<'a, E> {
    pub(crate) fn new(kind: ExprKind, num_args: usize) -> Self {
        Self {
            kind,
            function: None,
            num_args,
            args: SmallVec::with_capacity(num_args.min(MAX_RESERVED)),
            _expr: PhantomData,
        }
    }

    pub(crate) fn with_function(mut self, function: &'a FunctionInfo) -> Self {
        self.function = Some(function);
        self
    }

    /// Kind of the expression being built.
    #[inline]
    pub fn kind(&self) -> ExprKind {
        self.kind
    }

    /// Arity declared when the builder was created.
    #[inline]
    pub fn num_args(&self) -> usize {
        self.num_args
    }

    /// Number of arguments added so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Append the next argument.
    ///
    /// Fails with [`ExprError::InvalidArgument`] on a null handle and with
    /// [`ExprError::TooManyArgs`] once the declared arity is reached.
    pub fn add_arg(&mut self, arg: impl Into<E::Arg>) -> ExprResult<()> {
        let arg: E::Arg = arg.into();
        let node = arg.node().ok_or(ExprError::InvalidArgument)?;
        if self.args.len() >= self.num_args {
            return Err(ExprError::TooManyArgs);
        }
        self.args.push(node);
        Ok(())
    }

    /// Append every argument of `args`, stopping at the first failure.
    pub fn extend_args<I>(&mut self, args: I) -> ExprResult<()>
    where
        I: IntoIterator,
        I::Item: Into<E::Arg>,
    {
        args.into_iter().try_for_each(|arg| self.add_arg(arg))
    }

    /// Arguments, checked against the declared arity.
    pub(crate) fn finish(&self) -> ExprResult<&[NodeRef<'a>]> {
        if self.args.len() < self.num_args {
            return Err(ExprError::TooFewArgs);
        }
        Ok(&self.args)
    }
}

/// Accumulates the slopes and breakpoints of a piecewise-linear term.
///
/// A term with `n` breakpoints takes exactly `n + 1` slopes. Slopes and
/// breakpoints may be added in any interleaving.
#[derive(Debug, Clone)]
pub struct PLTermBuilder {
    num_breakpoints: usize,
    slopes: SmallVec<[f64; 8]>,
    breakpoints: SmallVec<[f64; 8]>,
}

impl PLTermBuilder {
    /// Fails with [`ExprError::InvalidNumBreakpoints`] when `num_breakpoints` is zero
    /// or `num_breakpoints + 1` slopes cannot be counted.
    pub(crate) fn new(num_breakpoints: usize) -> ExprResult<Self> {
        if num_breakpoints == 0 {
            return Err(ExprError::InvalidNumBreakpoints);
        }
        let num_slopes = num_breakpoints
            .checked_add(1)
            .ok_or(ExprError::InvalidNumBreakpoints)?;
        Ok(Self {
            num_breakpoints,
            slopes: SmallVec::with_capacity(num_slopes.min(MAX_RESERVED)),
            breakpoints: SmallVec::with_capacity(num_breakpoints.min(MAX_RESERVED)),
        })
    }

    #[inline]
    pub fn num_breakpoints(&self) -> usize {
        self.num_breakpoints
    }

    pub fn add_slope(&mut self, slope: f64) -> ExprResult<()> {
        if self.slopes.len() > self.num_breakpoints {
            return Err(ExprError::TooManySlopes);
        }
        self.slopes.push(slope);
        Ok(())
    }

    pub fn add_breakpoint(&mut self, breakpoint: f64) -> ExprResult<()> {
        if self.breakpoints.len() >= self.num_breakpoints {
            return Err(ExprError::TooManyBreakpoints);
        }
        self.breakpoints.push(breakpoint);
        Ok(())
    }

    /// Slopes and breakpoints, checked against the declared sizes.
    pub(crate) fn finish(&self) -> ExprResult<(&[f64], &[f64])> {
        if self.breakpoints.len() < self.num_breakpoints {
            return Err(ExprError::TooFewBreakpoints);
        }
        if self.slopes.len() <= self.num_breakpoints {
            return Err(ExprError::TooFewSlopes);
        }
        Ok((&self.slopes, &self.breakpoints))
    }
}
