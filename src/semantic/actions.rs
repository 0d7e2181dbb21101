//! Semantic actions run by the parser as it recognizes each construct.
//!
//! Declarations update the symbol table; expressions and statements are
//! type-checked and turned into syntax tree nodes. Problems are reported and
//! replaced by error nodes so parsing can go on.

use log::debug;

use super::builders::{
    actuals_match_formals, append_return, build_binary, build_unary, make_constant, make_error,
    make_expr, make_list, make_reference, make_statement, make_string,
};
use super::consumer::TreeConsumer;
use super::context::{FunctionContext, ParamDesc, PendingFunction};
use super::symbol_table::{Scope, SymbolRef, SymbolTable};
use super::tree::{BinaryOp, ConstKind, ExprKind, Node, RefKind, StmtKind, UnaryOp};
use super::types::{BaseType, ScalarType, Type};
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter, Span};

/// Symbol table, staged function state and diagnostics for one compilation
pub struct Semantics<'a> {
    symbols: SymbolTable,
    context: FunctionContext,
    reporter: &'a mut DiagnosticReporter,
}

impl<'a> Semantics<'a> {
    pub fn new(reporter: &'a mut DiagnosticReporter) -> Self {
        Self {
            symbols: SymbolTable::new(),
            context: FunctionContext::new(),
            reporter,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    pub fn context(&self) -> &FunctionContext {
        &self.context
    }

    pub fn reporter_mut(&mut self) -> &mut DiagnosticReporter {
        &mut *self.reporter
    }

    pub fn had_errors(&self) -> bool {
        self.reporter.has_errors()
    }

    fn error(&mut self, code: &'static str, message: String, span: Span) {
        self.reporter.report(Diagnostic::error(code, message), span);
    }

    // Declarations

    pub fn set_type(&mut self, ty: BaseType) {
        self.context.current_type = ty;
    }

    pub fn mark_extern(&mut self) {
        self.context.is_extern = true;
    }

    /// Stage a function header; its parameters go into the local scope
    pub fn begin_function(&mut self, name: &str, span: Span) {
        debug!("function header {} -> {}", name, self.context.current_type);
        self.context.scope = Scope::Local;
        self.context.ret_type = self.context.current_type;
        self.context.pending = Some(PendingFunction::new(name, span, self.context.current_type));
    }

    pub fn add_param(&mut self, name: &str, ty: BaseType, is_array: bool, span: Span) {
        if let Some(pending) = self.context.pending.as_mut() {
            pending.params.push(ParamDesc {
                name: name.to_string(),
                ty,
                is_array,
                span,
            });
        }
    }

    /// One prototype of a declaration list. The extern flag and type keyword
    /// carry over to the next prototype in the same list.
    pub fn declare_prototype(&mut self) {
        self.symbols
            .record_function_info(&mut self.context, true, self.reporter);
        self.symbols.init(Scope::Local);
    }

    /// End of a prototype declaration list
    pub fn end_prototypes(&mut self) {
        self.symbols.cleanup_function_info(&mut self.context);
    }

    /// The header is followed by a body: record the definition before any
    /// local declaration is read
    pub fn begin_definition(&mut self) {
        self.context.current_function =
            self.symbols
                .record_function_info(&mut self.context, false, self.reporter);
    }

    pub fn declare_variable(&mut self, name: &str, span: Span) {
        let Some(scalar) = self.declarable(name, span) else {
            return;
        };
        let entry = self
            .symbols
            .insert(name, self.context.scope, span, self.reporter);
        if let Some(symbol) = self.symbols.get_mut(entry) {
            symbol.ty = scalar.into();
            symbol.is_formal = false;
        }
    }

    pub fn declare_array(&mut self, name: &str, size: u32, span: Span) {
        let Some(scalar) = self.declarable(name, span) else {
            return;
        };
        let entry = self
            .symbols
            .insert(name, self.context.scope, span, self.reporter);
        if let Some(symbol) = self.symbols.get_mut(entry) {
            symbol.ty = Type::Array(scalar);
            symbol.num_elts = Some(size);
            symbol.is_formal = false;
        }
    }

    fn declarable(&mut self, name: &str, span: Span) -> Option<ScalarType> {
        let scalar = self.context.current_type.scalar();
        if scalar.is_none() {
            self.error(
                codes::VOID_VARIABLE,
                format!("Illegal type [void] for variable {}", name),
                span,
            );
        }
        scalar
    }

    /// Close the function: make sure the body returns, hand the tree to
    /// `consumer`, then drop every local declaration.
    pub fn finish_function(
        &mut self,
        body: Option<Node>,
        span: Span,
        consumer: &mut dyn TreeConsumer,
    ) {
        let tree = append_return(body, span);
        match self.context.current_function {
            Some(function) => consumer.process(&self.symbols, function, &tree),
            None => debug!("no function entry to hand the body to"),
        }
        self.symbols.cleanup_function_info(&mut self.context);
    }

    // Expressions

    pub fn int_constant(&mut self, value: i64, span: Span) -> Node {
        make_constant(ConstKind::Int, Type::Int, value, span)
    }

    pub fn char_constant(&mut self, value: u8, span: Span) -> Node {
        make_constant(ConstKind::Char, Type::Char, i64::from(value), span)
    }

    pub fn string_constant(&mut self, text: &str, span: Span) -> Node {
        make_string(text, span)
    }

    pub fn variable(&mut self, name: &str, span: Span) -> Node {
        let Some(entry) = self.symbols.lookup_any(name) else {
            self.error(
                codes::UNDECLARED_IDENTIFIER,
                format!("Undeclared variable: {}", name),
                span,
            );
            return make_error(span);
        };
        let ty = self.symbols.get(entry).map_or(Type::Error, |symbol| symbol.ty);
        make_reference(RefKind::Var, ty, entry, None, span)
    }

    pub fn array_element(&mut self, name: &str, index: Node, span: Span) -> Node {
        let mut failed = false;
        let entry = self.symbols.lookup_any(name);
        let elt_type = entry
            .and_then(|entry| self.symbols.get(entry))
            .and_then(|symbol| symbol.elt_type());

        match (entry, elt_type) {
            (None, _) => {
                self.error(
                    codes::UNDECLARED_IDENTIFIER,
                    format!("Undeclared variable: {}", name),
                    span,
                );
                failed = true;
            }
            (Some(_), None) => {
                self.error(
                    codes::NOT_AN_ARRAY,
                    format!("{} not declared as an array", name),
                    span,
                );
                failed = true;
            }
            _ => {}
        }

        if !index.ty.is_arith() && !index.ty.is_error() {
            self.error(
                codes::SUBSCRIPT_TYPE,
                format!("subscript to array {} must be of type int or char", name),
                index.span,
            );
            failed = true;
        }

        match (entry, elt_type) {
            (Some(entry), Some(elt)) if !failed => {
                make_reference(RefKind::ArraySubscript, elt.into(), entry, Some(index), span)
            }
            _ => make_error(span),
        }
    }

    /// Argument list, built back to front
    pub fn argument_list(&mut self, head: Node, tail: Option<Node>) -> Node {
        make_list(head, tail)
    }

    pub fn call_expression(&mut self, name: &str, args: Option<Node>, span: Span) -> Node {
        let Some(entry) = self.symbols.lookup_any(name) else {
            self.error(
                codes::UNDECLARED_IDENTIFIER,
                format!("{} undeclared", name),
                span,
            );
            return make_error(span);
        };
        self.call(name, entry, args, span, false)
    }

    /// A call used as a statement; the callee must be a void function
    pub fn call_statement(&mut self, name: &str, args: Option<Node>, span: Span) -> Node {
        let Some(entry) = self.symbols.lookup_any(name) else {
            self.error(
                codes::UNDECLARED_IDENTIFIER,
                format!("undeclared identifier {}", name),
                span,
            );
            return make_error(span);
        };
        self.call(name, entry, args, span, true)
    }

    fn call(
        &mut self,
        name: &str,
        entry: SymbolRef,
        args: Option<Node>,
        span: Span,
        as_statement: bool,
    ) -> Node {
        let (is_function, ret_type) = match self.symbols.get(entry) {
            Some(symbol) => (symbol.is_function(), symbol.ret_type().unwrap_or_default()),
            None => (false, BaseType::Void),
        };

        if !is_function {
            self.error(
                codes::NOT_A_FUNCTION,
                format!("{} is not a function", name),
                span,
            );
            return make_error(span);
        }

        if as_statement && ret_type != BaseType::Void {
            self.error(
                codes::NON_VOID_CALL_STATEMENT,
                format!("non-VOID function {} used in a statement", name),
                span,
            );
            return make_error(span);
        }

        if !actuals_match_formals(&self.symbols, self.reporter, entry, args.as_ref(), span) {
            return make_error(span);
        }

        make_reference(RefKind::FunCall, ret_type.as_type(), entry, args, span)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: Node, span: Span) -> Node {
        build_unary(op, operand, span, self.reporter)
    }

    pub fn binary(&mut self, op: BinaryOp, left: Node, right: Node) -> Node {
        build_binary(op, left, right, self.reporter)
    }

    // Statements

    pub fn assignment(&mut self, lhs: Node, rhs: Node, span: Span) -> Node {
        if lhs.is_error() {
            return lhs;
        }
        if rhs.is_error() {
            return rhs;
        }
        if !lhs.ty.is_arith() {
            self.error(
                codes::INVALID_ASSIGNMENT,
                "invalid LHS in assignment".to_string(),
                lhs.span,
            );
            return make_error(span);
        }
        if !rhs.ty.is_arith() {
            self.error(
                codes::INVALID_ASSIGNMENT,
                "invalid RHS in assignment".to_string(),
                rhs.span,
            );
            return make_error(span);
        }
        make_expr(ExprKind::Assign, Type::Void, lhs, Some(rhs), span)
    }

    fn check_condition(&mut self, test: &Node) {
        if test.ty != Type::Bool && !test.ty.is_error() {
            self.reporter.report(
                Diagnostic::error(
                    codes::NON_BOOLEAN_CONDITION,
                    "conditional does not have Boolean type",
                )
                .with_note(format!("found {}", test.ty)),
                test.span,
            );
        }
    }

    pub fn if_statement(
        &mut self,
        test: Node,
        then_branch: Option<Node>,
        else_branch: Option<Node>,
        span: Span,
    ) -> Node {
        self.check_condition(&test);
        make_statement(
            StmtKind::If,
            Type::Void,
            Some(test),
            then_branch,
            else_branch,
            None,
            span,
        )
    }

    pub fn while_statement(&mut self, test: Node, body: Option<Node>, span: Span) -> Node {
        self.check_condition(&test);
        make_statement(StmtKind::While, Type::Void, Some(test), body, None, None, span)
    }

    pub fn for_statement(
        &mut self,
        init: Option<Node>,
        test: Option<Node>,
        update: Option<Node>,
        body: Option<Node>,
        span: Span,
    ) -> Node {
        if let Some(test) = &test {
            self.check_condition(test);
        }
        make_statement(StmtKind::For, Type::Void, init, test, update, body, span)
    }

    pub fn return_statement(&mut self, value: Option<Node>, span: Span) -> Node {
        let returns_value = self.context.ret_type != BaseType::Void;

        match value {
            None if returns_value => {
                self.error(
                    codes::RETURN_TYPE,
                    "return with no return value in non-void function".to_string(),
                    span,
                );
                make_error(span)
            }
            None => make_statement(StmtKind::Return, Type::Void, None, None, None, None, span),
            Some(value) if !returns_value => {
                self.error(
                    codes::RETURN_TYPE,
                    "non-void return expression in function with no return value".to_string(),
                    value.span,
                );
                make_error(span)
            }
            Some(value) if !value.ty.is_arith() && !value.ty.is_error() => {
                self.reporter.report(
                    Diagnostic::error(codes::RETURN_TYPE, "illegal return type")
                        .with_note(format!("found {}", value.ty)),
                    value.span,
                );
                make_error(span)
            }
            Some(value) => {
                let ty = value.ty;
                make_statement(StmtKind::Return, ty, Some(value), None, None, None, span)
            }
        }
    }

    /// Prepend a statement to a statement list. Empty statements vanish.
    pub fn statement_list(&mut self, head: Option<Node>, tail: Option<Node>) -> Option<Node> {
        match head {
            Some(head) => Some(make_list(head, tail)),
            None => tail,
        }
    }
}
