//! Parser state staged between the reductions of a function header.

use super::symbol_table::{Scope, SymbolRef};
use super::types::{BaseType, Type};
use crate::diagnostics::Span;

/// A parameter as written in a prototype or definition header
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDesc {
    pub name: String,
    pub ty: BaseType,
    pub is_array: bool,
    pub span: Span,
}

impl ParamDesc {
    /// The type a parameter of this shape has inside the function body
    pub fn param_type(&self) -> Type {
        match self.ty.scalar() {
            Some(elt) if self.is_array => Type::Array(elt),
            Some(elt) => elt.into(),
            None => Type::Void,
        }
    }
}

/// A function header whose parameter list is still being read
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFunction {
    pub name: String,
    pub span: Span,
    pub ret_type: BaseType,
    pub params: Vec<ParamDesc>,
}

impl PendingFunction {
    pub fn new(name: impl Into<String>, span: Span, ret_type: BaseType) -> Self {
        Self {
            name: name.into(),
            span,
            ret_type,
            params: Vec::new(),
        }
    }
}

/// Everything the semantic actions remember between two reductions
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionContext {
    /// Scope new declarations go into
    pub scope: Scope,
    /// Type keyword of the declaration being read
    pub current_type: BaseType,
    /// Header staged by `begin_function`, consumed by `record_function_info`
    pub pending: Option<PendingFunction>,
    /// Function whose body is being parsed
    pub current_function: Option<SymbolRef>,
    /// Declared return type of that function
    pub ret_type: BaseType,
    /// Whether the declaration being read started with `extern`
    pub is_extern: bool,
}

impl FunctionContext {
    pub fn new() -> Self {
        Self {
            scope: Scope::Global,
            current_type: BaseType::Int,
            pending: None,
            current_function: None,
            ret_type: BaseType::Void,
            is_extern: false,
        }
    }

    /// Back to the state before any function header was seen
    pub fn reset(&mut self) {
        self.scope = Scope::Global;
        self.pending = None;
        self.current_function = None;
        self.ret_type = BaseType::Void;
        self.is_extern = false;
    }
}

impl Default for FunctionContext {
    fn default() -> Self {
        Self::new()
    }
}
