//! Syntax tree for C-- function bodies.
//!
//! Every node carries the type it evaluates to (`Void` for statements) and
//! the source span it was built from. Variables, array subscripts and calls
//! point back into the symbol table through a [`SymbolRef`]; all other
//! children are owned by their parent.

use std::fmt;

use super::symbol_table::SymbolRef;
use super::types::Type;
use crate::diagnostics::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Le,
    Lt,
    Ge,
    Gt,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Le => "<=",
            BinaryOp::Lt => "<",
            BinaryOp::Ge => ">=",
            BinaryOp::Gt => ">",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Le | BinaryOp::Lt | BinaryOp::Ge | BinaryOp::Gt
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Which expression node `make_expr` builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Unary(UnaryOp),
    Binary(BinaryOp),
    Assign,
}

/// Which statement node `make_statement` builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtKind {
    Return,
    For,
    While,
    If,
}

/// Which symbol reference node `make_reference` builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Var,
    ArraySubscript,
    FunCall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstKind {
    Int,
    Char,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Stands in for a subtree that was already reported
    Error,
    IntConst(i64),
    CharConst(u8),
    StringConst(String),
    Var(SymbolRef),
    ArraySubscript {
        array: SymbolRef,
        index: Box<Node>,
    },
    Call {
        callee: SymbolRef,
        /// Argument list, a chain of `List` nodes
        args: Option<Box<Node>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Assign {
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Return {
        value: Option<Box<Node>>,
    },
    For {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Option<Box<Node>>,
    },
    While {
        test: Box<Node>,
        body: Option<Box<Node>>,
    },
    If {
        test: Box<Node>,
        then_branch: Option<Box<Node>>,
        else_branch: Option<Box<Node>>,
    },
    List {
        head: Box<Node>,
        tail: Option<Box<Node>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub ty: Type,
    pub span: Span,
}

/// Flat classification of nodes, one tag per operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeTag {
    Error,
    IntConst,
    CharConst,
    StringConst,
    Var,
    ArraySubscript,
    Plus,
    UnaryMinus,
    BinaryMinus,
    Mult,
    Div,
    Equals,
    Neq,
    Leq,
    Lt,
    Geq,
    Gt,
    LogicalAnd,
    LogicalOr,
    LogicalNot,
    FunCall,
    Assign,
    Return,
    For,
    While,
    If,
    List,
}

impl NodeTag {
    pub const ALL: [NodeTag; 27] = [
        NodeTag::Error,
        NodeTag::IntConst,
        NodeTag::CharConst,
        NodeTag::StringConst,
        NodeTag::Var,
        NodeTag::ArraySubscript,
        NodeTag::Plus,
        NodeTag::UnaryMinus,
        NodeTag::BinaryMinus,
        NodeTag::Mult,
        NodeTag::Div,
        NodeTag::Equals,
        NodeTag::Neq,
        NodeTag::Leq,
        NodeTag::Lt,
        NodeTag::Geq,
        NodeTag::Gt,
        NodeTag::LogicalAnd,
        NodeTag::LogicalOr,
        NodeTag::LogicalNot,
        NodeTag::FunCall,
        NodeTag::Assign,
        NodeTag::Return,
        NodeTag::For,
        NodeTag::While,
        NodeTag::If,
        NodeTag::List,
    ];
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeTag::Error => "Error",
            NodeTag::IntConst => "Intcon",
            NodeTag::CharConst => "Charcon",
            NodeTag::StringConst => "Stringcon",
            NodeTag::Var => "Var",
            NodeTag::ArraySubscript => "ArraySubscript",
            NodeTag::Plus => "Plus",
            NodeTag::UnaryMinus => "UnaryMinus",
            NodeTag::BinaryMinus => "BinaryMinus",
            NodeTag::Mult => "Mult",
            NodeTag::Div => "Div",
            NodeTag::Equals => "Equals",
            NodeTag::Neq => "Neq",
            NodeTag::Leq => "Leq",
            NodeTag::Lt => "Lt",
            NodeTag::Geq => "Geq",
            NodeTag::Gt => "Gt",
            NodeTag::LogicalAnd => "LogicalAnd",
            NodeTag::LogicalOr => "LogicalOr",
            NodeTag::LogicalNot => "LogicalNot",
            NodeTag::FunCall => "FunCall",
            NodeTag::Assign => "Assg",
            NodeTag::Return => "Return",
            NodeTag::For => "For",
            NodeTag::While => "While",
            NodeTag::If => "If",
            NodeTag::List => "STnodeList",
        };
        f.write_str(name)
    }
}

impl Node {
    pub fn new(kind: NodeKind, ty: Type, span: Span) -> Self {
        Self { kind, ty, span }
    }

    pub fn tag(&self) -> NodeTag {
        match &self.kind {
            NodeKind::Error => NodeTag::Error,
            NodeKind::IntConst(_) => NodeTag::IntConst,
            NodeKind::CharConst(_) => NodeTag::CharConst,
            NodeKind::StringConst(_) => NodeTag::StringConst,
            NodeKind::Var(_) => NodeTag::Var,
            NodeKind::ArraySubscript { .. } => NodeTag::ArraySubscript,
            NodeKind::Call { .. } => NodeTag::FunCall,
            NodeKind::Unary { op: UnaryOp::Neg, .. } => NodeTag::UnaryMinus,
            NodeKind::Unary { op: UnaryOp::Not, .. } => NodeTag::LogicalNot,
            NodeKind::Binary { op, .. } => match op {
                BinaryOp::Add => NodeTag::Plus,
                BinaryOp::Sub => NodeTag::BinaryMinus,
                BinaryOp::Mul => NodeTag::Mult,
                BinaryOp::Div => NodeTag::Div,
                BinaryOp::Eq => NodeTag::Equals,
                BinaryOp::Ne => NodeTag::Neq,
                BinaryOp::Le => NodeTag::Leq,
                BinaryOp::Lt => NodeTag::Lt,
                BinaryOp::Ge => NodeTag::Geq,
                BinaryOp::Gt => NodeTag::Gt,
                BinaryOp::And => NodeTag::LogicalAnd,
                BinaryOp::Or => NodeTag::LogicalOr,
            },
            NodeKind::Assign { .. } => NodeTag::Assign,
            NodeKind::Return { .. } => NodeTag::Return,
            NodeKind::For { .. } => NodeTag::For,
            NodeKind::While { .. } => NodeTag::While,
            NodeKind::If { .. } => NodeTag::If,
            NodeKind::List { .. } => NodeTag::List,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, NodeKind::Error)
    }

    pub fn is_return(&self) -> bool {
        matches!(self.kind, NodeKind::Return { .. })
    }

    /// Value of an integer or character constant
    pub fn const_value(&self) -> Option<i64> {
        match self.kind {
            NodeKind::IntConst(value) => Some(value),
            NodeKind::CharConst(value) => Some(i64::from(value)),
            _ => None,
        }
    }

    pub fn string_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::StringConst(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Symbol referenced by a variable, subscript or call node
    pub fn symbol(&self) -> Option<SymbolRef> {
        match &self.kind {
            NodeKind::Var(symbol)
            | NodeKind::ArraySubscript { array: symbol, .. }
            | NodeKind::Call { callee: symbol, .. } => Some(*symbol),
            _ => None,
        }
    }

    /// Left operand of a binary or assignment node, the operand of a unary one
    pub fn left(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::Unary { operand, .. } => Some(&**operand),
            NodeKind::Binary { left, .. } => Some(&**left),
            NodeKind::Assign { lhs, .. } => Some(&**lhs),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::Binary { right, .. } => Some(&**right),
            NodeKind::Assign { rhs, .. } => Some(&**rhs),
            _ => None,
        }
    }

    /// Subscript expression, or the argument list of a call
    pub fn subtree(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::ArraySubscript { index, .. } => Some(&**index),
            NodeKind::Call { args, .. } => args.as_deref(),
            _ => None,
        }
    }

    /// Positional statement child: If = test/then/else, While = test/body,
    /// For = init/test/update/body, Return = value
    pub fn child(&self, n: usize) -> Option<&Node> {
        match (&self.kind, n) {
            (NodeKind::If { test, .. }, 0) | (NodeKind::While { test, .. }, 0) => Some(&**test),
            (NodeKind::If { then_branch, .. }, 1) => then_branch.as_deref(),
            (NodeKind::If { else_branch, .. }, 2) => else_branch.as_deref(),
            (NodeKind::While { body, .. }, 1) => body.as_deref(),
            (NodeKind::For { init, .. }, 0) => init.as_deref(),
            (NodeKind::For { test, .. }, 1) => test.as_deref(),
            (NodeKind::For { update, .. }, 2) => update.as_deref(),
            (NodeKind::For { body, .. }, 3) => body.as_deref(),
            (NodeKind::Return { value }, 0) => value.as_deref(),
            _ => None,
        }
    }

    pub fn list_head(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::List { head, .. } => Some(&**head),
            _ => None,
        }
    }

    pub fn list_tail(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::List { tail, .. } => tail.as_deref(),
            _ => None,
        }
    }

    /// Elements of a list, head to tail. A node that is not a list yields
    /// itself.
    pub fn iter_list(&self) -> ListIter<'_> {
        ListIter { next: Some(self) }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Error
            | NodeKind::IntConst(_)
            | NodeKind::CharConst(_)
            | NodeKind::StringConst(_)
            | NodeKind::Var(_) => Vec::new(),
            NodeKind::ArraySubscript { index, .. } => vec![&**index],
            NodeKind::Call { args, .. } => args.as_deref().into_iter().collect(),
            NodeKind::Unary { operand, .. } => vec![&**operand],
            NodeKind::Binary { left, right, .. } => vec![&**left, &**right],
            NodeKind::Assign { lhs, rhs } => vec![&**lhs, &**rhs],
            NodeKind::Return { value } => value.as_deref().into_iter().collect(),
            NodeKind::For {
                init,
                test,
                update,
                body,
            } => [init, test, update, body]
                .into_iter()
                .filter_map(|child| child.as_deref())
                .collect(),
            NodeKind::While { test, body } => {
                std::iter::once(&**test).chain(body.as_deref()).collect()
            }
            NodeKind::If {
                test,
                then_branch,
                else_branch,
            } => std::iter::once(&**test)
                .chain(then_branch.as_deref())
                .chain(else_branch.as_deref())
                .collect(),
            NodeKind::List { head, tail } => std::iter::once(&**head).chain(tail.as_deref()).collect(),
        }
    }

    /// Split a list into its elements, head to tail. A node that is not a
    /// list becomes a list of one.
    pub fn into_list(self) -> Vec<Node> {
        let mut items = Vec::new();
        let mut next = Some(self);
        while let Some(mut node) = next {
            match std::mem::replace(&mut node.kind, NodeKind::Error) {
                NodeKind::List { head, tail } => {
                    items.push(*head);
                    next = tail.map(|tail| *tail);
                }
                kind => {
                    node.kind = kind;
                    items.push(node);
                    next = None;
                }
            }
        }
        items
    }

    fn take_tail(&mut self) -> Option<Box<Node>> {
        match &mut self.kind {
            NodeKind::List { tail, .. } => tail.take(),
            _ => None,
        }
    }

    /// Pre-order traversal of the whole subtree
    pub fn walk(&self, visit: &mut impl FnMut(&Node)) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            visit(node);
            stack.extend(node.children().into_iter().rev());
        }
    }
}

// Lists are unlinked one tail at a time; a body may hold any number of
// statements.
impl Drop for Node {
    fn drop(&mut self) {
        let mut next = self.take_tail();
        while let Some(mut node) = next {
            next = node.take_tail();
        }
    }
}

pub struct ListIter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        match &node.kind {
            NodeKind::List { head, tail } => {
                self.next = tail.as_deref();
                Some(&**head)
            }
            _ => {
                self.next = None;
                Some(node)
            }
        }
    }
}
