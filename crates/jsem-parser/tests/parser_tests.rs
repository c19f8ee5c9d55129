//! Tests for the parser's public surface: tree shape, identifier roles and
//! positions.

use jsem_parser::*;
use jsem_scanner::SyntaxKind;

struct Parsed {
    arena: NodeArena,
    root: NodeIndex,
    diagnostics: Vec<ParseDiagnostic>,
}

fn parse(source: &str) -> Parsed {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    let diagnostics = parser.get_diagnostics().to_vec();
    Parsed {
        arena: parser.into_arena(),
        root,
        diagnostics,
    }
}

fn parse_clean(source: &str) -> Parsed {
    let parsed = parse(source);
    assert!(
        parsed.diagnostics.is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parsed.diagnostics
    );
    parsed
}

fn statements(parsed: &Parsed) -> Vec<NodeIndex> {
    let node = parsed.arena.get(parsed.root).expect("root");
    parsed
        .arena
        .get_source_file(node)
        .expect("source file")
        .statements
        .iter()
        .collect()
}

/// Every node reachable from the root, pre-order.
fn walk(arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        out.push(idx);
        let mut children = arena.get_children(idx);
        children.reverse();
        stack.extend(children);
    }
    out
}

fn identifiers_of_kind(parsed: &Parsed, kind: SyntaxKind) -> Vec<String> {
    walk(&parsed.arena, parsed.root)
        .into_iter()
        .filter(|&idx| parsed.arena.kind(idx) == Some(kind))
        .filter_map(|idx| parsed.arena.identifier_text(idx).map(str::to_string))
        .collect()
}

fn kinds(parsed: &Parsed) -> Vec<SyntaxKind> {
    walk(&parsed.arena, parsed.root)
        .into_iter()
        .filter_map(|idx| parsed.arena.kind(idx))
        .collect()
}

#[test]
fn test_parse_variable_declarations() {
    let parsed = parse_clean("var a = 1, b; let c = 'x'; const d = [1, 2];");
    let stmts = statements(&parsed);
    assert_eq!(stmts.len(), 3);

    let flags: Vec<NodeFlags> = stmts
        .iter()
        .map(|&stmt| {
            let node = parsed.arena.get(stmt).expect("statement");
            let list = parsed.arena.get_variable_statement(node).expect("variable statement").declaration_list;
            parsed.arena.get(list).expect("list").flags
        })
        .collect();
    assert_eq!(flags, vec![NodeFlags::empty(), NodeFlags::LET, NodeFlags::CONST]);
    assert_eq!(
        identifiers_of_kind(&parsed, SyntaxKind::BindingIdentifier),
        vec!["a", "b", "c", "d"]
    );
}

#[test]
fn test_identifier_roles() {
    let parsed = parse_clean("function f(p) { return p.q + r[s]; }");
    assert_eq!(identifiers_of_kind(&parsed, SyntaxKind::BindingIdentifier), vec!["f", "p"]);
    assert_eq!(identifiers_of_kind(&parsed, SyntaxKind::Identifier), vec!["p", "r", "s"]);
    assert_eq!(identifiers_of_kind(&parsed, SyntaxKind::IdentifierName), vec!["q"]);
}

#[test]
fn test_object_literal_members() {
    let parsed = parse_clean("x = { a: 1, b, get c() { return 1; }, set c(v) {}, d() {}, [e]: 2, ...f, 'g': 3, async h() {}, *i() {} };");
    let all = kinds(&parsed);
    assert!(all.contains(&SyntaxKind::ShorthandPropertyAssignment));
    assert!(all.contains(&SyntaxKind::GetAccessor));
    assert!(all.contains(&SyntaxKind::SetAccessor));
    assert!(all.contains(&SyntaxKind::ComputedPropertyName));
    assert!(all.contains(&SyntaxKind::SpreadAssignment));
    assert_eq!(all.iter().filter(|&&k| k == SyntaxKind::MethodDeclaration).count(), 3);
    // Shorthand and computed names are references; plain keys are not
    assert_eq!(identifiers_of_kind(&parsed, SyntaxKind::Identifier), vec!["x", "b", "e", "f"]);
}

#[test]
fn test_arrow_functions() {
    let parsed = parse_clean("a = x => x; b = (x, y = 1, ...z) => { return x; }; c = async () => await d; e = async => async;");
    let arrows: Vec<NodeIndex> = walk(&parsed.arena, parsed.root)
        .into_iter()
        .filter(|&idx| parsed.arena.kind(idx) == Some(SyntaxKind::ArrowFunction))
        .collect();
    assert_eq!(arrows.len(), 4);
    let shapes: Vec<(usize, bool)> = arrows
        .iter()
        .map(|&idx| {
            let func = parsed.arena.get_function_at(idx).expect("function data");
            (func.parameters.len(), func.is_async)
        })
        .collect();
    assert_eq!(shapes, vec![(1, false), (3, false), (0, true), (1, false)]);
    assert!(kinds(&parsed).contains(&SyntaxKind::AwaitExpression));
}

#[test]
fn test_parenthesized_expression_is_not_arrow() {
    let parsed = parse_clean("(a, b);\n(c)\n");
    assert!(!kinds(&parsed).contains(&SyntaxKind::ArrowFunction));
    assert_eq!(
        kinds(&parsed)
            .iter()
            .filter(|&&k| k == SyntaxKind::ParenthesizedExpression)
            .count(),
        2
    );
}

#[test]
fn test_class_members() {
    let parsed = parse_clean(
        "class A extends B { constructor(x) { super(x); } static create() {} get v() { return 1; } #p = 1; field; static { init(); } }",
    );
    let class = statements(&parsed)[0];
    let node = parsed.arena.get(class).expect("class");
    let data = parsed.arena.get_class(node).expect("class data");
    let member_kinds: Vec<SyntaxKind> = data
        .members
        .iter()
        .filter_map(|m| parsed.arena.kind(m))
        .collect();
    assert_eq!(
        member_kinds,
        vec![
            SyntaxKind::Constructor,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::GetAccessor,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::Block,
        ]
    );
    let static_method = data.members.iter().nth(1).expect("static method");
    assert!(parsed.arena.get(static_method).expect("method").has_flag(NodeFlags::STATIC));
    assert_eq!(parsed.arena.kind(data.heritage), Some(SyntaxKind::Identifier));
}

#[test]
fn test_destructuring_declarations() {
    let parsed = parse_clean("const { a, b: [c, , d = 1], ...e } = obj; function f({ g }, [h]) {}");
    assert_eq!(
        identifiers_of_kind(&parsed, SyntaxKind::BindingIdentifier),
        vec!["a", "c", "d", "e", "f", "g", "h"]
    );
    assert_eq!(identifiers_of_kind(&parsed, SyntaxKind::IdentifierName), vec!["b"]);
}

#[test]
fn test_for_statements() {
    let parsed = parse_clean(
        "for (var i = 0; i < 10; i++) {}\nfor (const k in o) {}\nfor (let v of list) {}\nfor (x of y) {}\nfor (;;) { break; }",
    );
    let stmt_kinds: Vec<SyntaxKind> = statements(&parsed)
        .into_iter()
        .filter_map(|s| parsed.arena.kind(s))
        .collect();
    assert_eq!(
        stmt_kinds,
        vec![
            SyntaxKind::ForStatement,
            SyntaxKind::ForInStatement,
            SyntaxKind::ForOfStatement,
            SyntaxKind::ForOfStatement,
            SyntaxKind::ForStatement,
        ]
    );
}

#[test]
fn test_switch_try_labels() {
    let parsed = parse_clean(
        "outer: while (a) { switch (b) { case 1: c(); break outer; default: d(); } }\ntry { e(); } catch ({ message }) { f(message); } finally { g(); }",
    );
    let all = kinds(&parsed);
    for kind in [
        SyntaxKind::LabeledStatement,
        SyntaxKind::SwitchStatement,
        SyntaxKind::CaseBlock,
        SyntaxKind::CaseClause,
        SyntaxKind::DefaultClause,
        SyntaxKind::TryStatement,
        SyntaxKind::CatchClause,
        SyntaxKind::ObjectBindingPattern,
    ] {
        assert!(all.contains(&kind), "missing {kind:?}");
    }
    // Labels are never references
    assert!(!identifiers_of_kind(&parsed, SyntaxKind::Identifier).contains(&"outer".to_string()));
}

#[test]
fn test_templates_and_regex() {
    let parsed = parse_clean("a = `x${b}y${c + 1}z`; d = /ab+c/gi.test(e); f = tag`t${g}`;");
    let all = kinds(&parsed);
    assert!(all.contains(&SyntaxKind::TemplateExpression));
    assert!(all.contains(&SyntaxKind::TaggedTemplateExpression));
    assert!(all.contains(&SyntaxKind::RegularExpressionLiteral));
    assert_eq!(
        identifiers_of_kind(&parsed, SyntaxKind::Identifier),
        vec!["a", "b", "c", "d", "e", "f", "tag", "g"]
    );
}

#[test]
fn test_division_is_not_regex() {
    let parsed = parse_clean("x = a / b / c;");
    assert!(!kinds(&parsed).contains(&SyntaxKind::RegularExpressionLiteral));
}

#[test]
fn test_new_and_call_chains() {
    let parsed = parse_clean("x = new Foo.Bar(1).baz(); y = new Date; z = a?.b?.(c)?.[d];");
    let news: Vec<NodeIndex> = walk(&parsed.arena, parsed.root)
        .into_iter()
        .filter(|&idx| parsed.arena.kind(idx) == Some(SyntaxKind::NewExpression))
        .collect();
    assert_eq!(news.len(), 2);
    let first = parsed.arena.get_call_expr_at(news[0]).expect("new data");
    assert_eq!(parsed.arena.kind(first.expression), Some(SyntaxKind::PropertyAccessExpression));
    assert!(first.arguments.is_some());
    let second = parsed.arena.get_call_expr_at(news[1]).expect("new data");
    assert!(second.arguments.is_none());
}

#[test]
fn test_binary_precedence() {
    let parsed = parse_clean("x = a + b * c;");
    let stmt = statements(&parsed)[0];
    let expr = parsed
        .arena
        .get(stmt)
        .and_then(|n| parsed.arena.get_expression(n))
        .expect("expression statement")
        .expression;
    let assign = parsed.arena.get(expr).and_then(|n| parsed.arena.get_binary_expr(n)).expect("assignment");
    assert_eq!(assign.operator_token, SyntaxKind::EqualsToken);
    let sum = parsed
        .arena
        .get(assign.right)
        .and_then(|n| parsed.arena.get_binary_expr(n))
        .expect("sum");
    assert_eq!(sum.operator_token, SyntaxKind::PlusToken);
    assert_eq!(parsed.arena.kind(sum.right), Some(SyntaxKind::BinaryExpression));
}

#[test]
fn test_modules() {
    let parsed = parse_clean(
        "import def, { a, b as c } from 'm';\nimport * as ns from 'n';\nimport 'side';\nexport { a, c as d };\nexport { x as y } from 'o';\nexport default function () {}\nexport const e = 1;",
    );
    assert_eq!(
        identifiers_of_kind(&parsed, SyntaxKind::BindingIdentifier),
        vec!["def", "a", "c", "ns", "e"]
    );
    // Local export names are references, re-exported names are not
    assert_eq!(identifiers_of_kind(&parsed, SyntaxKind::Identifier), vec!["a", "c"]);
    let last = *statements(&parsed).last().expect("statement");
    assert!(parsed.arena.get(last).expect("export").has_flag(NodeFlags::EXPORTED));
}

#[test]
fn test_let_as_identifier() {
    let parsed = parse_clean("let = 1;\nlet x = let;");
    assert_eq!(identifiers_of_kind(&parsed, SyntaxKind::Identifier), vec!["let", "let"]);
}

#[test]
fn test_parent_links_and_positions() {
    let parsed = parse_clean("var a = 1;\n  foo(a);");
    let nodes = walk(&parsed.arena, parsed.root);
    for &idx in &nodes[1..] {
        let parent = parsed.arena.parent(idx);
        assert!(parsed.arena.get_children(parent).contains(&idx));
    }
    let reference = nodes
        .iter()
        .copied()
        .find(|&idx| parsed.arena.kind(idx) == Some(SyntaxKind::Identifier) && parsed.arena.identifier_text(idx) == Some("a"))
        .expect("reference to a");
    let location = parsed.arena.token_at(reference).expect("location");
    assert_eq!(location.start.line, 2);
    assert_eq!(location.start.column, 6);
    assert_eq!(location.text, "a");
}

#[test]
fn test_syntax_errors_are_reported_without_panicking() {
    for source in ["var = ;", "function (", "a = {", "class { x(", "`${", "for (var i", "x = (1,"] {
        let parsed = parse(source);
        assert!(!parsed.diagnostics.is_empty(), "{source:?}");
    }
}
