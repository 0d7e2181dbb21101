use super::actions::Semantics;
use super::symbol_table::{Scope, SymbolRef, SymbolTable};
use super::tree::{BinaryOp, Node, NodeTag};
use super::types::{BaseType, Type};
use crate::diagnostics::{codes, DiagnosticReporter, Span};

const AT: Span = Span {
    offset: 0,
    length: 0,
};

fn messages(reporter: &DiagnosticReporter) -> Vec<&str> {
    reporter
        .diagnostics()
        .iter()
        .map(|d| d.message.as_str())
        .collect()
}

/// Open the body of `ret name(int n)`
fn open_function(s: &mut Semantics<'_>, ret: BaseType, name: &str) {
    s.set_type(ret);
    s.begin_function(name, AT);
    s.add_param("n", BaseType::Int, false, AT);
    s.begin_definition();
}

/// Globals `int x; char buf[8];` and prototype `void p(int a), int q(void)`
fn declare_globals(s: &mut Semantics<'_>) {
    s.set_type(BaseType::Int);
    s.declare_variable("x", AT);
    s.set_type(BaseType::Char);
    s.declare_array("buf", 8, AT);

    s.set_type(BaseType::Void);
    s.begin_function("p", AT);
    s.add_param("a", BaseType::Int, false, AT);
    s.declare_prototype();
    s.set_type(BaseType::Int);
    s.begin_function("q", AT);
    s.declare_prototype();
    s.end_prototypes();
}

#[test]
fn declarations_fill_the_global_scope() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);
    declare_globals(&mut s);

    let table = s.symbols();
    let sigs: Vec<(String, String)> = table
        .symbols(Scope::Global)
        .map(|sym| (sym.name.clone(), sym.type_signature()))
        .collect();
    assert_eq!(sigs.len(), 4);
    assert!(sigs.contains(&("buf".to_string(), "C[8]".to_string())));
    assert!(sigs.contains(&("p".to_string(), "(I) -> void".to_string())));
    assert!(sigs.contains(&("q".to_string(), "(void) -> I".to_string())));
    assert_eq!(table.symbols(Scope::Local).count(), 0);
    assert_eq!(s.context().scope, Scope::Global);
    assert!(!s.had_errors());
}

#[test]
fn void_variables_are_rejected() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);
    s.set_type(BaseType::Void);
    s.declare_variable("v", AT);
    s.declare_array("w", 3, AT);

    assert!(s.symbols().lookup("v", Scope::Global).is_none());
    drop(s);
    assert_eq!(
        messages(&reporter),
        vec![
            "Illegal type [void] for variable v",
            "Illegal type [void] for variable w",
        ]
    );
}

#[test]
fn references_resolve_local_first() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);
    declare_globals(&mut s);
    open_function(&mut s, BaseType::Int, "f");
    s.set_type(BaseType::Char);
    s.declare_variable("x", AT);

    let x = s.variable("x", AT);
    assert_eq!(x.ty, Type::Char);
    assert_eq!(x.symbol().map(|r| r.scope()), Some(Scope::Local));

    let n = s.variable("n", AT);
    assert_eq!(n.ty, Type::Int);

    let index = s.int_constant(3, AT);
    let elt = s.array_element("buf", index, AT);
    assert_eq!((elt.tag(), elt.ty), (NodeTag::ArraySubscript, Type::Char));
    assert!(!s.had_errors());
}

#[test]
fn bad_references() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);
    declare_globals(&mut s);
    open_function(&mut s, BaseType::Int, "f");

    assert!(s.variable("y", AT).is_error());

    let index = s.int_constant(0, AT);
    assert!(s.array_element("x", index, AT).is_error());

    let index = s.string_constant("no", AT);
    assert!(s.array_element("buf", index, AT).is_error());

    assert!(s.call_expression("x", None, AT).is_error());
    assert!(s.call_expression("g", None, AT).is_error());
    assert!(s.call_statement("g", None, AT).is_error());

    drop(s);
    assert_eq!(
        messages(&reporter),
        vec![
            "Undeclared variable: y",
            "x not declared as an array",
            "subscript to array buf must be of type int or char",
            "x is not a function",
            "g undeclared",
            "undeclared identifier g",
        ]
    );
}

#[test]
fn calls() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);
    declare_globals(&mut s);
    open_function(&mut s, BaseType::Int, "f");

    let q = s.call_expression("q", None, AT);
    assert_eq!((q.tag(), q.ty), (NodeTag::FunCall, Type::Int));

    let arg = s.char_constant(b'a', AT);
    let args = s.argument_list(arg, None);
    let p = s.call_statement("p", Some(args), AT);
    assert_eq!((p.tag(), p.ty), (NodeTag::FunCall, Type::Void));
    assert_eq!(p.subtree().map(|args| args.iter_list().count()), Some(1));

    assert!(!s.had_errors());

    let q = s.call_statement("q", None, AT);
    assert!(q.is_error());
    let p = s.call_statement("p", None, AT);
    assert!(p.is_error());

    drop(s);
    assert_eq!(
        messages(&reporter),
        vec![
            "non-VOID function q used in a statement",
            "function p: expected 1 argument(s), found 0",
        ]
    );
}

#[test]
fn assignments() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);
    declare_globals(&mut s);
    open_function(&mut s, BaseType::Int, "f");

    let lhs = s.variable("x", AT);
    let rhs = s.char_constant(b'a', AT);
    let ok = s.assignment(lhs, rhs, AT);
    assert_eq!((ok.tag(), ok.ty), (NodeTag::Assign, Type::Void));

    let lhs = s.variable("buf", AT);
    let rhs = s.int_constant(1, AT);
    assert!(s.assignment(lhs, rhs, AT).is_error());

    let lhs = s.variable("x", AT);
    let rhs = s.string_constant("s", AT);
    assert!(s.assignment(lhs, rhs, AT).is_error());

    // already reported, nothing new
    let lhs = s.variable("nope", AT);
    let rhs = s.int_constant(1, AT);
    assert!(s.assignment(lhs, rhs, AT).is_error());

    drop(s);
    assert_eq!(
        messages(&reporter),
        vec![
            "invalid LHS in assignment",
            "invalid RHS in assignment",
            "Undeclared variable: nope",
        ]
    );
}

#[test]
fn conditions_must_be_boolean() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);
    open_function(&mut s, BaseType::Void, "f");

    let n = s.variable("n", AT);
    let zero = s.int_constant(0, AT);
    let test = s.binary(BinaryOp::Gt, n, zero);
    let node = s.while_statement(test, None, AT);
    assert_eq!(node.tag(), NodeTag::While);
    assert!(!s.had_errors());

    let test = s.variable("n", AT);
    s.if_statement(test, None, None, AT);
    let test = s.int_constant(1, AT);
    s.for_statement(None, Some(test), None, None, AT);
    // an omitted test is fine
    s.for_statement(None, None, None, None, AT);

    drop(s);
    assert_eq!(reporter.count(codes::NON_BOOLEAN_CONDITION), 2);
}

#[test]
fn returns_follow_the_declared_type() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);
    open_function(&mut s, BaseType::Char, "f");

    let value = s.variable("n", AT);
    let ret = s.return_statement(Some(value), AT);
    assert_eq!((ret.tag(), ret.ty), (NodeTag::Return, Type::Int));

    assert!(s.return_statement(None, AT).is_error());
    let value = s.string_constant("s", AT);
    assert!(s.return_statement(Some(value), AT).is_error());

    let mut done = |_: &SymbolTable, _: SymbolRef, _: &Node| {};
    s.finish_function(None, AT, &mut done);
    open_function(&mut s, BaseType::Void, "g");

    assert!(s.return_statement(None, AT).is_return());
    let value = s.int_constant(1, AT);
    assert!(s.return_statement(Some(value), AT).is_error());

    drop(s);
    assert_eq!(
        messages(&reporter),
        vec![
            "return with no return value in non-void function",
            "illegal return type",
            "non-void return expression in function with no return value",
        ]
    );
}

#[test]
fn empty_statements_vanish_from_lists() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);

    let one = s.int_constant(1, AT);
    let tail = s.statement_list(Some(one), None);
    let list = s.statement_list(None, tail.clone());
    assert_eq!(list, tail);
    assert_eq!(s.statement_list(None, None), None);
}

#[test]
fn finished_body_is_handed_over_then_locals_dropped() {
    let mut reporter = DiagnosticReporter::new("test.c", "");
    let mut s = Semantics::new(&mut reporter);
    open_function(&mut s, BaseType::Void, "f");
    s.set_type(BaseType::Int);
    s.declare_array("v", 4, AT);

    let index = s.variable("n", AT);
    let lhs = s.array_element("v", index, AT);
    let rhs = s.int_constant(9, AT);
    let assign = s.assignment(lhs, rhs, AT);
    let body = s.statement_list(Some(assign), None);

    let mut seen = Vec::new();
    let mut consumer = |symbols: &SymbolTable, function: SymbolRef, body: &Node| {
        let name = symbols.get(function).map(|f| f.name.clone());
        let mut locals = Vec::new();
        body.walk(&mut |node: &Node| {
            if let Some(symbol) = node.symbol().and_then(|r| symbols.get(r)) {
                locals.push(symbol.name.clone());
            }
        });
        seen.push((name, locals, body.iter_list().map(Node::tag).collect::<Vec<_>>()));
    };
    s.finish_function(body, AT, &mut consumer);

    assert_eq!(
        seen,
        vec![(
            Some("f".to_string()),
            vec!["v".to_string(), "n".to_string()],
            vec![NodeTag::Assign, NodeTag::Return],
        )]
    );
    assert_eq!(s.symbols().symbols(Scope::Local).count(), 0);
    assert_eq!(s.context().current_function, None);
    assert_eq!(
        s.symbols()
            .lookup("f", Scope::Global)
            .and_then(|f| s.symbols().get(f))
            .map(|f| f.ty),
        Some(Type::Function)
    );
}
