use indoc::indoc;

use super::Parser;
use crate::diagnostics::{codes, DiagnosticReporter};
use crate::lexer::Scanner;
use crate::semantic::{
    Node, NodeStats, NodeTag, ProtoState, Scope, SymbolRef, SymbolTable, TreeConsumer, Type,
};

fn parse_with<C: TreeConsumer>(
    source: &str,
    consumer: &mut C,
) -> (Option<SymbolTable>, DiagnosticReporter) {
    let mut reporter = DiagnosticReporter::new("test.c", source);
    let tokens = Scanner::new(source, &mut reporter).scan_tokens();
    let symbols = Parser::new(tokens, &mut reporter, consumer).parse();
    (symbols, reporter)
}

fn parse(source: &str) -> (Option<SymbolTable>, DiagnosticReporter) {
    parse_with(source, &mut NodeStats::new())
}

fn messages(reporter: &DiagnosticReporter) -> Vec<&str> {
    reporter
        .diagnostics()
        .iter()
        .map(|d| d.message.as_str())
        .collect()
}

fn proto_state(symbols: &SymbolTable, name: &str) -> Option<ProtoState> {
    symbols
        .lookup(name, Scope::Global)
        .and_then(|f| symbols.get(f))
        .map(|f| f.proto_state())
}

#[test]
fn call_to_defined_function_is_int() {
    let source = indoc! {"
        int f(int x) { return x + 1; }

        int main(void)
        {
            int y;
            y = f(2);
            return y;
        }
    "};

    let mut calls = Vec::new();
    let mut consumer = |_: &SymbolTable, _: SymbolRef, body: &Node| {
        body.walk(&mut |node: &Node| {
            if node.tag() == NodeTag::FunCall {
                calls.push(node.ty);
            }
        });
    };
    let (symbols, reporter) = parse_with(source, &mut consumer);

    assert!(symbols.is_some());
    assert!(!reporter.has_errors(), "{:?}", messages(&reporter));
    assert_eq!(calls, vec![Type::Int]);
}

#[test]
fn definition_arity_differs_from_prototype() {
    let source = indoc! {"
        int f(int x);
        int f(int x, int y) { return x; }
    "};

    let (symbols, reporter) = parse(source);

    assert_eq!(reporter.error_count(), 1);
    assert_eq!(reporter.count(codes::PROTOTYPE_ARITY_MISMATCH), 1);
    let symbols = symbols.expect("parse succeeds");
    assert_eq!(proto_state(&symbols, "f"), Some(ProtoState::Defined));
}

#[test]
fn returning_a_void_call() {
    let (_, reporter) = parse("void g() {} int h() { return g(); }");

    assert_eq!(messages(&reporter), vec!["illegal return type"]);
}

#[test]
fn node_counts_of_a_loop() {
    let source = indoc! {"
        int sum(int a[], int n)
        {
            int i, s;
            s = 0;
            for (i = 0; i < n; i = i + 1)
                s = s + a[i];
            return s;
        }
    "};

    let mut stats = NodeStats::new();
    let (_, reporter) = parse_with(source, &mut stats);

    assert!(!reporter.has_errors(), "{:?}", messages(&reporter));
    insta::assert_snapshot!(stats.render(), @r"
    @@FUN: sum
    Intcon: 3
    Var: 10
    ArraySubscript: 1
    Plus: 2
    Lt: 1
    Assg: 4
    Return: 1
    For: 1
    STnodeList: 3
    ");
}

#[test]
fn empty_body_returns_implicitly() {
    let mut stats = NodeStats::new();
    let (_, reporter) = parse_with("void f(void) { ; { } }", &mut stats);

    assert!(!reporter.has_errors());
    insta::assert_snapshot!(stats.render(), @r"
    @@FUN: f
    Return: 1
    STnodeList: 1
    ");
}

#[test]
fn semantic_errors_do_not_stop_the_parse() {
    let source = indoc! {r#"
        int x;
        int x;
        void f(void)
        {
            y = 1;
            x = "s";
            if (x) ;
        }
        int g(void) { return 2; }
    "#};

    let (symbols, reporter) = parse(source);

    assert_eq!(
        messages(&reporter),
        vec![
            "multiple declarations of x",
            "Undeclared variable: y",
            "invalid RHS in assignment",
            "conditional does not have Boolean type",
        ]
    );
    // the function after the errors is still recorded
    let symbols = symbols.expect("parse succeeds");
    assert_eq!(proto_state(&symbols, "g"), Some(ProtoState::Defined));
}

#[test]
fn error_subtrees_are_reported_once() {
    let source = "int f(void) { int x; x = (y + 1) * 2; return -y; }";

    let (_, reporter) = parse(source);

    assert_eq!(
        messages(&reporter),
        vec!["Undeclared variable: y", "Undeclared variable: y"]
    );
}

#[test]
fn syntax_error_ends_the_run() {
    let (symbols, reporter) = parse("int f( { } int g(void) { y = 1; }");

    assert!(symbols.is_none());
    assert_eq!(messages(&reporter), vec!["syntax error: expected type"]);
    assert_eq!(reporter.count(codes::EXPECTED_TYPE), 1);
}

#[test]
fn missing_semicolon() {
    let (symbols, reporter) = parse("int x\nint y;");

    assert!(symbols.is_none());
    assert_eq!(reporter.count(codes::EXPECTED_TOKEN), 1);
    assert_eq!(
        reporter.diagnostics()[0].notes,
        vec!["found 'int'".to_string()]
    );
}

#[test]
fn global_table_after_parse() {
    let source = indoc! {r#"
        extern void print(char s[]);
        int count;
        char name[16];

        int main(void)
        {
            print("hi");
            return 0;
        }
    "#};

    let (symbols, reporter) = parse(source);
    let symbols = symbols.expect("parse succeeds");

    assert!(!reporter.has_errors(), "{:?}", messages(&reporter));
    insta::assert_snapshot!(symbols.dump(Scope::Global), @r"
    >> count: scope = G; type: I
    >> print: scope = G; type: (C[]) -> void
    >> name: scope = G; type: C[16]
    >> main: scope = G; type: (void) -> I
    ");
    assert_eq!(symbols.symbols(Scope::Local).count(), 0);
}

#[test]
fn locals_visible_to_the_consumer_only() {
    let source = indoc! {"
        int f(int a, char b[])
        {
            int t;
            t = a + b[0];
            return t;
        }
    "};

    let mut dumps = Vec::new();
    let mut consumer = |symbols: &SymbolTable, _: SymbolRef, _: &Node| {
        dumps.push(symbols.dump(Scope::Local));
    };
    let (symbols, _) = parse_with(source, &mut consumer);

    assert_eq!(dumps.len(), 1);
    insta::assert_snapshot!(&dumps[0], @r"
    >> a: scope = L<formal param>; type: I
    >> b: scope = L<formal param>; type: C[]
    >> t: scope = L; type: I
    ");
    let symbols = symbols.expect("parse succeeds");
    for name in ["a", "b", "t"] {
        assert_eq!(symbols.lookup(name, Scope::Local), None);
    }
}

#[test]
fn listed_prototypes() {
    let source = indoc! {"
        int f(int a), g(char c[]);
        int g(char c[]) { return c[0]; }
    "};

    let (symbols, reporter) = parse(source);
    let symbols = symbols.expect("parse succeeds");

    assert!(!reporter.has_errors(), "{:?}", messages(&reporter));
    assert_eq!(proto_state(&symbols, "f"), Some(ProtoState::PrototypeSeen));
    assert_eq!(proto_state(&symbols, "g"), Some(ProtoState::Defined));
}

#[test]
fn repeated_prototype_in_one_list() {
    let (_, reporter) = parse("void f(int a), f(int a);");

    assert_eq!(
        messages(&reporter),
        vec!["Multiple prototypes/definitions for function f"]
    );
}

#[test]
fn extern_functions_cannot_be_defined() {
    let source = indoc! {"
        extern int e(void);
        int e(void) { return 1; }
    "};

    let (_, reporter) = parse(source);

    assert_eq!(
        messages(&reporter),
        vec!["function e was previously defined as EXTERN"]
    );
}

#[test]
fn calls_as_statements() {
    let source = indoc! {"
        int f(void) { return 1; }
        void p(int n, char s[]) { }
        void main(void)
        {
            f();
            p('x', \"ok\");
            p(1);
            q();
        }
    "};

    let (_, reporter) = parse(source);

    assert_eq!(
        messages(&reporter),
        vec![
            "non-VOID function f used in a statement",
            "function p: expected 2 argument(s), found 1",
            "undeclared identifier q",
        ]
    );
}

#[test]
fn argument_types_checked() {
    let source = indoc! {"
        void p(int n, char s[]) { }
        void main(void)
        {
            int v[4];
            p(v, v);
        }
    "};

    let (_, reporter) = parse(source);

    assert_eq!(
        messages(&reporter),
        vec![
            "function p: type of argument 1 does not match the declaration",
            "function p: type of argument 2 does not match the declaration",
        ]
    );
    assert_eq!(reporter.count(codes::ARGUMENT_COUNT_MISMATCH), 0);
}

#[test]
fn return_checks() {
    let source = indoc! {"
        void v(void) { return 1; }
        int i(void) { return; }
        char c(void) { return 'a' == 'b'; }
    "};

    let (_, reporter) = parse(source);

    assert_eq!(
        messages(&reporter),
        vec![
            "non-void return expression in function with no return value",
            "return with no return value in non-void function",
            "illegal return type",
        ]
    );
}

#[test]
fn oversized_constant_is_recovered() {
    let (symbols, reporter) = parse("int f(void) { return 99999999999999999999; }");

    assert!(symbols.is_some());
    assert_eq!(reporter.error_count(), 1);
    assert_eq!(reporter.count(codes::INVALID_NUMBER), 1);
}

#[test]
fn void_declarations_are_semantic_errors() {
    let (symbols, reporter) = parse("void x; int f(void v) { return 0; }");

    assert!(symbols.is_some());
    assert_eq!(
        messages(&reporter),
        vec![
            "Illegal type [void] for variable x",
            "Illegal type [void] for identifier v",
        ]
    );
}

#[test]
fn long_straight_line_body() {
    let statements = 100_000;
    let source = format!(
        "int x;\nvoid f(void)\n{{\n{}}}\n",
        "    x = 1;\n".repeat(statements)
    );

    let mut stats = NodeStats::new();
    let (symbols, reporter) = parse_with(&source, &mut stats);

    assert!(symbols.is_some());
    assert!(!reporter.has_errors(), "{:?}", messages(&reporter));
    assert_eq!(stats.total(NodeTag::Assign), statements);
    assert_eq!(stats.total(NodeTag::List), statements + 1);
    assert_eq!(stats.total(NodeTag::Return), 1);
}

#[test]
fn arity_reported_once_alongside_argument_types() {
    let source = indoc! {"
        int f(int a, int b) { return a + b; }
        int g(void)
        {
            int v[3];
            return f(v);
        }
    "};

    let (_, reporter) = parse(source);

    assert_eq!(
        messages(&reporter),
        vec![
            "function f: type of argument 1 does not match the declaration",
            "function f: expected 2 argument(s), found 1",
        ]
    );
}
