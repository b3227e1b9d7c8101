//! RcDoc-based pretty-printer with termcolor annotations for expressions.
//!
//! Role
//! - Convert any expression handle into an annotated document suitable for width-aware
//!   rendering, using AMPL-like infix notation (`x[0] + 2 * x[1]`, `if c then a else b`).
//! - Provide colored output for terminals (TTY-aware) and plain strings for logs/tests.
//!
//! Parentheses are only emitted where precedence or associativity requires them. The
//! null handle renders as `<null>`.
//!
//! Performance
//! - Building the doc is O(n) in the number of occurrences (shared sub-expressions are
//!   printed once per occurrence); rendering is linear in the size of the document.

use std::io::{self, Write};

use pretty::{FmtWrite, RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{
    expr::{
        AllDiffExpr, BinaryExpr, BinaryLogicalExpr, CallExpr, CountExpr, Expr, ExprHandle,
        IfExpr, ImplicationExpr, IteratedExpr, IteratedLogicalExpr, LogicalConstant,
        LogicalCountExpr, LogicalExpr, NotExpr, NumberOfExpr, NumericConstant, NumericExpr,
        PLTerm, RelationalExpr, SumExpr, UnaryExpr, VarArgExpr, Variable, view::ExprView,
    },
    kind::ExprKind,
};

/// Styles used to annotate parts of the pretty-printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Punct, // commas, semicolons, `<<`/`>>`
    /// Parentheses are colored by nesting depth so matching pairs share a color.
    Paren(u8),
    Keyword,  // if, then, else, in, true, false
    Operator, // +, *, &&, ||, ==>, <=
    Ident,    // variables
    Literal,  // numbers
    Function, // abs, min, sum, user functions
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Paren(depth) => {
                let fg = match depth % 6 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::White,
                    3 => Color::Yellow,
                    4 => Color::Red,
                    5 => Color::Magenta,
                    _ => unreachable!(),
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Keyword => {
                s.set_fg(Some(Color::Cyan)).set_bold(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Ident => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Literal => {
                s.set_fg(Some(Color::Magenta));
            }
            Style::Function => {
                s.set_fg(Some(Color::Blue)).set_bold(true);
            }
        }
        s
    }
}

type Doc = RcDoc<'static, Style>;

fn styled(style: Style, s: &'static str) -> Doc {
    RcDoc::as_string(s).annotate(style)
}

fn punct(s: &'static str) -> Doc {
    styled(Style::Punct, s)
}

#[inline]
fn lparen(depth: u8) -> Doc {
    RcDoc::as_string("(").annotate(Style::Paren(depth))
}

#[inline]
fn rparen(depth: u8) -> Doc {
    RcDoc::as_string(")").annotate(Style::Paren(depth))
}

fn kw(s: &'static str) -> Doc {
    styled(Style::Keyword, s)
}

fn op(s: &'static str) -> Doc {
    styled(Style::Operator, s)
}

fn number(value: f64) -> Doc {
    RcDoc::as_string(value).annotate(Style::Literal)
}

fn variable(index: usize) -> Doc {
    RcDoc::as_string(format!("x[{index}]")).annotate(Style::Ident)
}

/// Binding strength of the outermost construct of `e`; atoms bind tightest.
fn calculate_precedence(e: Expr<'_>) -> u8 {
    use ExprKind::*;

    if e.is_null() {
        return u8::MAX;
    }
    match e.kind() {
        If => 1,
        Implication | Iff => 2,
        Or => 3,
        And => 4,
        Not => 5,
        Lt | Le | Eq | Ge | Gt | Ne => 6,
        AtLeast | AtMost | Exactly | NotAtLeast | NotAtMost | NotExactly => 6,
        Add | Sub | Less => 7,
        Mul | Div | TruncDiv | Mod => 8,
        Minus => 9,
        Pow | PowConstBase | PowConstExp | Pow2 => 10,
        Constant => match e.view() {
            ExprView::NumericConstant(c) if c.value().is_sign_negative() => 9,
            _ => u8::MAX,
        },
        _ => u8::MAX,
    }
}

/// Render `e` as an operand that must bind at least as tightly as `min_prec`.
#[inline]
fn operand<'a>(e: impl ExprHandle<'a>, min_prec: u8, depth: u8) -> Doc {
    operand_expr(e.as_expr(), min_prec, depth)
}

fn operand_expr(e: Expr<'_>, min_prec: u8, depth: u8) -> Doc {
    if calculate_precedence(e) < min_prec {
        lparen(depth)
            .append(to_doc_with_depth(e, depth + 1))
            .append(rparen(depth))
            .group()
    } else {
        to_doc_with_depth(e, depth)
    }
}

/// `(a, b, c)`; breaks after commas when the line is too long.
fn arg_list<'a>(args: impl Iterator<Item = Expr<'a>>, depth: u8) -> Doc {
    let items = args.map(|arg| to_doc_with_depth(arg, depth + 1));
    lparen(depth)
        .append(RcDoc::intersperse(items, punct(",").append(RcDoc::line())).nest(2))
        .append(rparen(depth))
        .group()
}

fn function_call<'a>(name: Doc, args: impl Iterator<Item = Expr<'a>>, depth: u8) -> Doc {
    name.append(arg_list(args, depth))
}

fn infix(lhs: Doc, symbol: &'static str, rhs: Doc) -> Doc {
    lhs.append(RcDoc::space())
        .append(op(symbol))
        .append(RcDoc::line())
        .append(rhs)
        .group()
}

fn conditional(first: Doc, true_expr: Doc, false_expr: Option<Doc>, is_implication: bool) -> Doc {
    let head = if is_implication {
        first
            .append(RcDoc::space())
            .append(op("==>"))
            .append(RcDoc::space())
            .append(true_expr)
    } else {
        kw("if")
            .append(RcDoc::space())
            .append(first)
            .append(RcDoc::line())
            .append(kw("then"))
            .append(RcDoc::space())
            .append(true_expr)
    };
    let doc = match false_expr {
        Some(false_expr) => head
            .append(RcDoc::line())
            .append(kw("else"))
            .append(RcDoc::space())
            .append(false_expr),
        None => head,
    };
    doc.group().nest(2)
}

/// Depth-aware document builder that colors parentheses by nesting level.
fn to_doc_with_depth(e: Expr<'_>, depth: u8) -> Doc {
    match e.view() {
        ExprView::Null => punct("<null>"),

        // Numeric
        ExprView::NumericConstant(c) => number(c.value()),
        ExprView::Variable(v) => variable(v.index()),
        ExprView::Unary(u) => match u.kind() {
            ExprKind::Minus => op("-").append(operand(u.arg(), 10, depth)),
            ExprKind::Pow2 => operand(u.arg(), 11, depth).append(op("^2")),
            kind => function_call(
                styled(Style::Function, kind.symbol()),
                std::iter::once(u.arg().as_expr()),
                depth,
            ),
        },
        ExprView::Binary(b) => match b.kind() {
            ExprKind::Atan2 | ExprKind::Precision | ExprKind::Round | ExprKind::Trunc => {
                function_call(
                    styled(Style::Function, b.kind().symbol()),
                    [b.lhs().as_expr(), b.rhs().as_expr()].into_iter(),
                    depth,
                )
            }
            kind => {
                let prec = calculate_precedence(b.as_expr());
                // `^` is right-associative, everything else left-associative.
                let (lhs_prec, rhs_prec) = if prec == 10 {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                infix(
                    operand(b.lhs(), lhs_prec, depth),
                    kind.symbol(),
                    operand(b.rhs(), rhs_prec, depth),
                )
            }
        },
        ExprView::If(i) => conditional(
            operand(i.condition(), 2, depth),
            operand(i.true_expr(), 2, depth),
            (!i.false_expr().is_null()).then(|| operand(i.false_expr(), 1, depth)),
            false,
        ),
        ExprView::PLTerm(p) => {
            let list = |values: &[f64]| -> Doc {
                RcDoc::intersperse(
                    values.iter().map(|&v| number(v)),
                    punct(",").append(RcDoc::space()),
                )
            };
            punct("<<")
                .append(list(p.breakpoints()))
                .append(punct(";"))
                .append(RcDoc::space())
                .append(list(p.slopes()))
                .append(punct(">>"))
                .append(RcDoc::space())
                .append(variable(p.var_index()))
                .group()
        }
        ExprView::Call(c) => function_call(
            RcDoc::as_string(c.function().name().to_owned()).annotate(Style::Function),
            c.iter(),
            depth,
        ),
        ExprView::VarArg(v) => function_call(
            styled(Style::Function, v.kind().symbol()),
            v.iter().map(|arg| arg.as_expr()),
            depth,
        ),
        ExprView::Sum(s) => function_call(
            styled(Style::Function, "sum"),
            s.iter().map(|arg| arg.as_expr()),
            depth,
        ),
        ExprView::NumberOf(n) => kw("numberof")
            .append(RcDoc::space())
            .append(operand(n.value(), 8, depth))
            .append(RcDoc::space())
            .append(kw("in"))
            .append(RcDoc::space())
            .append(arg_list(n.iter().skip(1).map(|arg| arg.as_expr()), depth))
            .group(),
        ExprView::Count(c) => function_call(
            styled(Style::Function, "count"),
            c.iter().map(|arg| arg.as_expr()),
            depth,
        ),

        // Logical
        ExprView::LogicalConstant(c) => kw(if c.value() { "true" } else { "false" }),
        ExprView::Not(n) => op("!").append(operand(n.arg(), 5, depth)),
        ExprView::BinaryLogical(b) => {
            let prec = calculate_precedence(b.as_expr());
            infix(
                operand(b.lhs(), prec, depth),
                b.kind().symbol(),
                operand(b.rhs(), prec + 1, depth),
            )
        }
        ExprView::Relational(r) => infix(
            operand(r.lhs(), 7, depth),
            r.kind().symbol(),
            operand(r.rhs(), 7, depth),
        ),
        ExprView::LogicalCount(l) => op(l.kind().symbol())
            .append(RcDoc::space())
            .append(operand(l.lhs(), 7, depth))
            .append(RcDoc::space())
            .append(arg_list(l.rhs().iter().map(|arg| arg.as_expr()), depth))
            .group(),
        ExprView::Implication(i) => conditional(
            operand(i.condition(), 3, depth),
            operand(i.true_expr(), 3, depth),
            (!i.false_expr().is_null()).then(|| operand(i.false_expr(), 2, depth)),
            true,
        ),
        ExprView::IteratedLogical(l) => function_call(
            styled(Style::Function, l.kind().symbol()),
            l.iter().map(|arg| arg.as_expr()),
            depth,
        ),
        ExprView::AllDiff(a) => function_call(
            styled(Style::Function, "alldiff"),
            a.iter().map(|arg| arg.as_expr()),
            depth,
        ),
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

/// Render a document to a `termcolor::WriteColor` with width-aware layout.
fn render_to<W: WriteColor + Write>(doc: &Doc, width: usize, out: &mut W) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

/// Convenience: retrieve the width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pretty-printing conveniences for every expression handle.
pub trait PrettyExpr {
    /// Build an RcDoc representation of this expression with style annotations.
    /// Useful for composing or rendering manually.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render this expression with colors to any termcolor writer at the given width.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        render_to(&self.pretty_doc(), width, out)
    }

    /// Print this expression to stdout with colors (TTY-aware), at auto-detected width (or 80 if not a TTY).
    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.pretty_render_to(terminal_width(), &mut stdout)
    }

    /// Format this expression into a plain string (no colors) laid out for `width` columns.
    fn to_pretty_string(&self, width: usize) -> String {
        let mut buf = String::new();
        self.pretty_doc()
            .render_fmt(width, &mut buf)
            .expect("formatting into a String is infallible");
        buf
    }

    /// Format this expression into a plain string (no colors), 80 columns wide.
    fn pretty_string(&self) -> String {
        self.to_pretty_string(80)
    }
}

impl<'a, T: ExprHandle<'a>> PrettyExpr for T {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        to_doc_with_depth(self.as_expr(), 0)
    }
}

macro_rules! impl_display_for_type {
    ($($t:ident),+ $(,)?) => {
        $(
            impl std::fmt::Display for $t<'_> {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    let mut w = FmtWrite::new(f);
                    let doc = self.pretty_doc();
                    doc.render_raw(80, &mut w)
                }
            }
        )+
    };
}

impl_display_for_type!(Expr, NumericExpr, LogicalExpr);
impl_display_for_type!(
    NumericConstant,
    Variable,
    UnaryExpr,
    BinaryExpr,
    IfExpr,
    PLTerm,
    CallExpr,
    VarArgExpr,
    SumExpr,
    NumberOfExpr,
    CountExpr,
);
impl_display_for_type!(
    LogicalConstant,
    NotExpr,
    BinaryLogicalExpr,
    RelationalExpr,
    LogicalCountExpr,
    ImplicationExpr,
    IteratedLogicalExpr,
    AllDiffExpr,
);
