use std::fmt;

use typed_arena::Arena;

use crate::{
    function::FunctionInfo,
    kind::{Category, ExprKind},
};

/// Arena-backed storage for expression nodes.
///
/// Role
/// - Own every node, argument slice and number slice created by an
///   [`ExprFactory`](crate::factory::ExprFactory) in `typed_arena` pools.
/// - Hand out `&'a` references that stay valid (and at a stable address) until the
///   arena is dropped. Nodes are never freed individually.
///
/// The arena is append-only: allocation goes through `&'a self`, so a node can only
/// reference nodes allocated before it and the resulting graph is acyclic.
pub(crate) struct ExprArena<'a> {
    nodes: Arena<Node<'a>>,
    args: Arena<NodeRef<'a>>,
    numbers: Arena<f64>,
}

pub(crate) type NodeRef<'a> = &'a Node<'a>;

impl<'a> ExprArena<'a> {
    pub fn with_capacity(nodes: usize, args: usize, numbers: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(nodes),
            args: Arena::with_capacity(args),
            numbers: Arena::with_capacity(numbers),
        }
    }

    /// Allocate a node. The caller is responsible for the kind/payload pairing.
    #[inline]
    pub fn alloc_node(&'a self, kind: ExprKind, payload: Payload<'a>) -> NodeRef<'a> {
        self.nodes.alloc(Node { kind, payload })
    }

    /// Copy a list of child references into a contiguous arena slice.
    #[inline]
    pub fn alloc_args<I>(&'a self, args: I) -> &'a [NodeRef<'a>]
    where
        I: IntoIterator<Item = NodeRef<'a>>,
    {
        self.args.alloc_extend(args)
    }

    #[inline]
    pub fn alloc_numbers<I>(&'a self, numbers: I) -> &'a [f64]
    where
        I: IntoIterator<Item = f64>,
    {
        self.numbers.alloc_extend(numbers)
    }

    /// Number of nodes allocated so far.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// An immutable expression record: operator tag plus kind-determined payload.
///
/// Nodes are only reachable through the typed handles of [`crate::expr`].
pub struct Node<'a> {
    pub(crate) kind: ExprKind,
    pub(crate) payload: Payload<'a>,
}

/// Kind-determined content of a [`Node`].
#[derive(Debug)]
pub(crate) enum Payload<'a> {
    Number(f64),
    Bool(bool),
    Variable(usize),
    Unary(NodeRef<'a>),
    Binary(NodeRef<'a>, NodeRef<'a>),
    /// `if` and implication: the false branch may be absent.
    Conditional {
        condition: NodeRef<'a>,
        true_expr: NodeRef<'a>,
        false_expr: Option<NodeRef<'a>>,
    },
    PLTerm {
        slopes: &'a [f64],
        breakpoints: &'a [f64],
        var: NodeRef<'a>,
    },
    Call {
        function: &'a FunctionInfo,
        args: &'a [NodeRef<'a>],
    },
    Iterated(&'a [NodeRef<'a>]),
}

impl<'a> Node<'a> {
    #[inline]
    pub fn kind(&self) -> ExprKind {
        self.kind
    }

    /// Category of the value this node produces.
    pub fn category(&self) -> Category {
        match (self.kind.category(), &self.payload) {
            (Some(category), _) => category,
            (None, Payload::Bool(_)) => Category::Logical,
            (None, _) => Category::Numeric,
        }
    }

    /// Children of an iterated node (call arguments included); empty otherwise.
    #[inline]
    pub(crate) fn args(&self) -> &'a [NodeRef<'a>] {
        match self.payload {
            Payload::Call { args, .. } | Payload::Iterated(args) => args,
            _ => &[],
        }
    }

    #[inline]
    pub(crate) fn unary(&self) -> NodeRef<'a> {
        match self.payload {
            Payload::Unary(arg) => arg,
            _ => self.payload_mismatch(),
        }
    }

    #[inline]
    pub(crate) fn binary(&self) -> (NodeRef<'a>, NodeRef<'a>) {
        match self.payload {
            Payload::Binary(lhs, rhs) => (lhs, rhs),
            _ => self.payload_mismatch(),
        }
    }

    #[inline]
    pub(crate) fn conditional(&self) -> (NodeRef<'a>, NodeRef<'a>, Option<NodeRef<'a>>) {
        match self.payload {
            Payload::Conditional {
                condition,
                true_expr,
                false_expr,
            } => (condition, true_expr, false_expr),
            _ => self.payload_mismatch(),
        }
    }

    #[cold]
    #[track_caller]
    fn payload_mismatch(&self) -> ! {
        unreachable!("payload of {} node does not match its kind", self.kind)
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("payload", &self.payload)
            .finish()
    }
}
