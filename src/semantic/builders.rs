//! Smart constructors for syntax tree nodes.
//!
//! The plain `make_*` functions only allocate; `build_unary`, `build_binary`
//! and `actuals_match_formals` also type-check their operands and report
//! through the [`DiagnosticReporter`].

use super::symbol_table::{SymbolRef, SymbolTable};
use super::tree::{BinaryOp, ConstKind, ExprKind, Node, NodeKind, RefKind, StmtKind, UnaryOp};
use super::types::{ScalarType, Type};
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter, Span};

pub fn make_constant(kind: ConstKind, ty: Type, value: i64, span: Span) -> Node {
    let kind = match kind {
        ConstKind::Int => NodeKind::IntConst(value),
        ConstKind::Char => NodeKind::CharConst(value as u8),
    };
    Node::new(kind, ty, span)
}

/// String constants are arrays of char
pub fn make_string(text: impl Into<String>, span: Span) -> Node {
    Node::new(
        NodeKind::StringConst(text.into()),
        Type::Array(ScalarType::Char),
        span,
    )
}

/// Variable, array subscript or call node. `subtree` is the subscript or
/// the argument list.
pub fn make_reference(
    kind: RefKind,
    ty: Type,
    symbol: SymbolRef,
    subtree: Option<Node>,
    span: Span,
) -> Node {
    let kind = match kind {
        RefKind::Var => NodeKind::Var(symbol),
        RefKind::ArraySubscript => NodeKind::ArraySubscript {
            array: symbol,
            index: Box::new(subtree.unwrap_or_else(|| make_error(span))),
        },
        RefKind::FunCall => NodeKind::Call {
            callee: symbol,
            args: subtree.map(Box::new),
        },
    };
    Node::new(kind, ty, span)
}

/// Unary, binary or assignment node; `right` is ignored for unary nodes
pub fn make_expr(kind: ExprKind, ty: Type, left: Node, right: Option<Node>, span: Span) -> Node {
    let rhs = move || Box::new(right.unwrap_or_else(|| make_error(span)));
    let kind = match kind {
        ExprKind::Unary(op) => NodeKind::Unary {
            op,
            operand: Box::new(left),
        },
        ExprKind::Binary(op) => NodeKind::Binary {
            op,
            left: Box::new(left),
            right: rhs(),
        },
        ExprKind::Assign => NodeKind::Assign {
            lhs: Box::new(left),
            rhs: rhs(),
        },
    };
    Node::new(kind, ty, span)
}

/// Statement node from positional children: If = test/then/else,
/// While = test/body, For = init/test/update/body, Return = value
pub fn make_statement(
    kind: StmtKind,
    ty: Type,
    c0: Option<Node>,
    c1: Option<Node>,
    c2: Option<Node>,
    c3: Option<Node>,
    span: Span,
) -> Node {
    let boxed = |node: Option<Node>| node.map(Box::new);
    let required = |node: Option<Node>| Box::new(node.unwrap_or_else(|| make_error(span)));

    let kind = match kind {
        StmtKind::Return => NodeKind::Return { value: boxed(c0) },
        StmtKind::For => NodeKind::For {
            init: boxed(c0),
            test: boxed(c1),
            update: boxed(c2),
            body: boxed(c3),
        },
        StmtKind::While => NodeKind::While {
            test: required(c0),
            body: boxed(c1),
        },
        StmtKind::If => NodeKind::If {
            test: required(c0),
            then_branch: boxed(c1),
            else_branch: boxed(c2),
        },
    };
    Node::new(kind, ty, span)
}

pub fn make_error(span: Span) -> Node {
    Node::new(NodeKind::Error, Type::Error, span)
}

/// Prepend `head` to the list `tail`
pub fn make_list(head: Node, tail: Option<Node>) -> Node {
    let span = match &tail {
        Some(tail) => head.span.merge(&tail.span),
        None => head.span,
    };
    Node::new(
        NodeKind::List {
            head: Box::new(head),
            tail: tail.map(Box::new),
        },
        Type::Void,
        span,
    )
}

/// Make sure a function body ends in a `return`.
///
/// An empty body becomes a list holding a single valueless return.
pub fn append_return(body: Option<Node>, span: Span) -> Node {
    let implicit = || make_statement(StmtKind::Return, Type::Void, None, None, None, None, span);

    let mut statements = body.map(Node::into_list).unwrap_or_default();
    let last = match statements.pop() {
        Some(last) if last.is_return() => last,
        Some(last) => {
            statements.push(last);
            implicit()
        }
        None => implicit(),
    };

    statements
        .into_iter()
        .rev()
        .fold(make_list(last, None), |tail, head| make_list(head, Some(tail)))
}

fn compatible(formal: Type, actual: Type) -> bool {
    match formal {
        Type::Int | Type::Char => actual.is_arith(),
        Type::Array(elt) => actual == Type::Array(elt),
        _ => false,
    }
}

/// Check the actual arguments of a call against the callee's formals.
///
/// Reports each mismatching position and, separately, a wrong argument
/// count. Error-typed actuals always match.
pub fn actuals_match_formals(
    table: &SymbolTable,
    reporter: &mut DiagnosticReporter,
    function: SymbolRef,
    actuals: Option<&Node>,
    span: Span,
) -> bool {
    let Some(symbol) = table.get(function) else {
        return false;
    };
    let formals = symbol.formals();
    let actuals: Vec<&Node> = actuals.map(|list| list.iter_list().collect()).unwrap_or_default();
    let mut ok = true;

    for (n, (formal, actual)) in formals.iter().zip(&actuals).enumerate() {
        if actual.ty.is_error() || compatible(formal.ty, actual.ty) {
            continue;
        }
        ok = false;
        reporter.report(
            Diagnostic::error(
                codes::ARGUMENT_TYPE_MISMATCH,
                format!(
                    "function {}: type of argument {} does not match the declaration",
                    symbol.name,
                    n + 1
                ),
            )
            .with_note(format!("expected {}, found {}", formal.ty, actual.ty)),
            actual.span,
        );
    }

    if formals.len() != actuals.len() {
        ok = false;
        reporter.report(
            Diagnostic::error(
                codes::ARGUMENT_COUNT_MISMATCH,
                format!(
                    "function {}: expected {} argument(s), found {}",
                    symbol.name,
                    formals.len(),
                    actuals.len()
                ),
            ),
            span,
        );
    }

    ok
}

pub fn build_unary(
    op: UnaryOp,
    operand: Node,
    span: Span,
    reporter: &mut DiagnosticReporter,
) -> Node {
    if operand.ty.is_error() {
        return make_error(span);
    }

    let ty = match op {
        UnaryOp::Neg if operand.ty.is_arith() => Type::Int,
        UnaryOp::Not if operand.ty == Type::Bool => Type::Bool,
        UnaryOp::Neg => {
            let what = format!("operand of unary {}", op.symbol());
            return operand_error(reporter, &what, "int or char", span);
        }
        UnaryOp::Not => {
            let what = format!("operand of {}", op.symbol());
            return operand_error(reporter, &what, "Boolean", span);
        }
    };

    make_expr(ExprKind::Unary(op), ty, operand, None, span)
}

pub fn build_binary(
    op: BinaryOp,
    left: Node,
    right: Node,
    reporter: &mut DiagnosticReporter,
) -> Node {
    let span = left.span.merge(&right.span);
    if left.ty.is_error() || right.ty.is_error() {
        return make_error(span);
    }

    let ty = if op.is_logical() {
        if left.ty != Type::Bool || right.ty != Type::Bool {
            let what = format!("operands of {}", op.symbol());
            return operand_error(reporter, &what, "Boolean", span);
        }
        Type::Bool
    } else {
        if !left.ty.is_arith() || !right.ty.is_arith() {
            let what = format!("operands of {}", op.symbol());
            return operand_error(reporter, &what, "int or char", span);
        }
        if op.is_arithmetic() {
            Type::Int
        } else {
            Type::Bool
        }
    };

    make_expr(ExprKind::Binary(op), ty, left, Some(right), span)
}

fn operand_error(
    reporter: &mut DiagnosticReporter,
    what: &str,
    expected: &str,
    span: Span,
) -> Node {
    reporter.report(
        Diagnostic::error(codes::OPERAND_TYPE, format!("{} must be {}", what, expected)),
        span,
    );
    make_error(span)
}
