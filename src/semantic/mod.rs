//! Semantic core of the C-- front end: symbol table, syntax tree, and the
//! actions that build and check the tree during parsing.

mod actions;
pub mod builders;
mod consumer;
mod context;
mod symbol_table;
mod tree;
mod types;

#[cfg(test)]
mod actions_tests;

pub use actions::Semantics;
pub use consumer::{FunctionStats, NodeStats, TreeConsumer};
pub use context::{FunctionContext, ParamDesc, PendingFunction};
pub use symbol_table::{
    hash, Formal, FunctionInfo, ProtoState, Scope, Symbol, SymbolError, SymbolRef, SymbolTable,
    HASH_TABLE_SIZE,
};
pub use tree::{
    BinaryOp, ConstKind, ExprKind, ListIter, Node, NodeKind, NodeTag, RefKind, StmtKind, UnaryOp,
};
pub use types::{BaseType, ScalarType, Type};
