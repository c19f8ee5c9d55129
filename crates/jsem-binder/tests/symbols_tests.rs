//! Tests for symbol binding and usage classification.

use jsem_binder::*;
use jsem_parser::{NodeArena, NodeIndex, ParserState};
use jsem_scanner::SyntaxKind;

struct Bound {
    arena: NodeArena,
    root: NodeIndex,
    result: BindResult,
}

impl Bound {
    fn named(&self, name: &str) -> Vec<&Symbol> {
        self.result.symbols.iter().filter(|symbol| symbol.name == name).collect()
    }

    fn only(&self, name: &str) -> &Symbol {
        let symbols = self.named(name);
        assert_eq!(symbols.len(), 1, "expected one symbol named {name}, got {symbols:?}");
        symbols[0]
    }

    fn scope_kind(&self, symbol: &Symbol) -> ScopeKind {
        self.result.scopes.get(symbol.scope).expect("scope").kind
    }
}

fn bind_source(source: &str) -> Bound {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    let arena = parser.into_arena();
    let result = bind(&arena, root);
    Bound { arena, root, result }
}

fn usage_kinds(symbol: &Symbol) -> Vec<UsageKind> {
    symbol.usages.iter().map(|usage| usage.kind).collect()
}

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

#[test]
fn test_every_identifier_binds_to_exactly_one_symbol() {
    let bound = bind_source(
        "var a = 1;\n\
         function f(p, { q }) { let r = p + q; return r + a + missing; }\n\
         class C extends Base { m() { return this; } }\n\
         try { f(a, {}); } catch (err) { err; }\n\
         for (const k of [1, 2]) { k; }",
    );

    for idx in walk(&bound.arena, bound.root) {
        let kind = bound.arena.kind(idx);
        if !matches!(
            kind,
            Some(SyntaxKind::Identifier | SyntaxKind::BindingIdentifier | SyntaxKind::ThisKeyword)
        ) {
            continue;
        }
        let sym_id = bound.result.node_symbols.get(&idx).copied();
        assert!(sym_id.is_some(), "identifier {:?} is unbound", bound.arena.identifier_text(idx));
        let owners = bound
            .result
            .symbols
            .iter()
            .filter(|symbol| symbol.usages.iter().any(|usage| usage.node == idx))
            .count();
        assert_eq!(owners, 1);
    }
    assert!(bound.result.validate().is_empty());
}

#[test]
fn test_var_redeclaration_reuses_symbol() {
    let bound = bind_source("var x = 1; var x;");
    let x = bound.only("x");
    assert_eq!(x.kind, SymbolKind::Variable);
    assert_eq!(usage_kinds(x), vec![UsageKind::DeclarationWrite, UsageKind::Declaration]);
    assert!(!x.is_external);
}

#[test]
fn test_let_is_invisible_outside_block() {
    let bound = bind_source("{ let a = 1; a; } a;");
    let symbols = bound.named("a");
    assert_eq!(symbols.len(), 2);

    let inner = symbols[0];
    assert_eq!(inner.kind, SymbolKind::LetVariable);
    assert_eq!(bound.scope_kind(inner), ScopeKind::Block);
    assert_eq!(usage_kinds(inner), vec![UsageKind::LexicalDeclaration, UsageKind::Read]);

    let outer = symbols[1];
    assert!(outer.is_external);
    assert_eq!(outer.scope, bound.result.scopes.root());
    assert_eq!(usage_kinds(outer), vec![UsageKind::Read]);
}

#[test]
fn test_const_kind() {
    let bound = bind_source("const c = 1; c;");
    let c = bound.only("c");
    assert_eq!(c.kind, SymbolKind::ConstVariable);
    assert_eq!(usage_kinds(c), vec![UsageKind::LexicalDeclaration, UsageKind::Read]);
}

#[test]
fn test_catch_parameter_is_local_to_catch() {
    let bound = bind_source("try { } catch (e) { e; } e;");
    let symbols = bound.named("e");
    assert_eq!(symbols.len(), 2);

    assert_eq!(bound.scope_kind(symbols[0]), ScopeKind::Catch);
    assert_eq!(symbols[0].kind, SymbolKind::Variable);
    assert_eq!(usage_kinds(symbols[0]), vec![UsageKind::Declaration, UsageKind::Read]);
    assert!(symbols[1].is_external);
}

#[test]
fn test_reference_before_var_binds_to_hoisted_symbol() {
    let bound = bind_source("x; var x = 1;");
    let x = bound.only("x");
    assert!(!x.is_external);
    assert_eq!(usage_kinds(x), vec![UsageKind::DeclarationWrite, UsageKind::Read]);
}

#[test]
fn test_var_in_nested_block_hoists_to_function() {
    let bound = bind_source("function f() { if (a) { var v; function g() {} } v; g(); }");
    let v = bound.only("v");
    let g = bound.only("g");
    assert_eq!(bound.scope_kind(v), ScopeKind::Function);
    assert_eq!(bound.scope_kind(g), ScopeKind::Function);
    assert_eq!(g.kind, SymbolKind::Function);
    assert_eq!(usage_kinds(v), vec![UsageKind::Declaration, UsageKind::Read]);
}

#[test]
fn test_external_symbol_is_created_once() {
    let bound = bind_source("foo(); foo = 2; function f() { foo; }");
    let foo = bound.only("foo");
    assert!(foo.is_external);
    assert_eq!(foo.kind, SymbolKind::Variable);
    assert_eq!(foo.scope, bound.result.scopes.root());
    assert_eq!(
        usage_kinds(foo),
        vec![UsageKind::Read, UsageKind::Write, UsageKind::Read]
    );
}

#[test]
fn test_var_promoted_to_function_once() {
    let bound = bind_source("var f; function f() {}");
    let f = bound.only("f");
    assert_eq!(f.kind, SymbolKind::Function);
    assert_eq!(usage_kinds(f), vec![UsageKind::Declaration, UsageKind::Declaration]);

    let bound = bind_source("function f() {} var f;");
    assert_eq!(bound.only("f").kind, SymbolKind::Function);
}

#[test]
fn test_assignment_usage_kinds() {
    let bound = bind_source(
        "var a, b, c;\n\
         a = 1;\n\
         b += 1;\n\
         c++;\n\
         [a, b] = [1, 2];\n\
         ({ c } = {});\n\
         for (a in {}) {}\n\
         a;",
    );
    assert_eq!(
        usage_kinds(bound.only("a")),
        vec![
            UsageKind::Declaration,
            UsageKind::Write,
            UsageKind::Write,
            UsageKind::Write,
            UsageKind::Read,
        ]
    );
    assert_eq!(
        usage_kinds(bound.only("b")),
        vec![UsageKind::Declaration, UsageKind::ReadWrite, UsageKind::Write]
    );
    assert_eq!(
        usage_kinds(bound.only("c")),
        vec![UsageKind::Declaration, UsageKind::ReadWrite, UsageKind::Write]
    );
}

#[test]
fn test_right_side_of_assignment_is_read() {
    let bound = bind_source("var a, b; a = [b];");
    assert_eq!(usage_kinds(bound.only("b")), vec![UsageKind::Declaration, UsageKind::Read]);
}

#[test]
fn test_parameters_bind_to_function_scope() {
    let bound = bind_source("function f(a, { b, c = 1 }, ...d) { return a; }");
    for name in ["a", "b", "c", "d"] {
        let param = bound.only(name);
        assert_eq!(param.kind, SymbolKind::Parameter, "{name}");
        assert_eq!(bound.scope_kind(param), ScopeKind::Function);
        assert_eq!(param.usages[0].kind, UsageKind::LexicalDeclaration);
    }
    assert_eq!(usage_kinds(bound.only("a")).len(), 2);
}

#[test]
fn test_arrow_parameters() {
    let bound = bind_source("var g = (x, y) => x * y;");
    let x = bound.only("x");
    assert_eq!(x.kind, SymbolKind::Parameter);
    assert_eq!(bound.scope_kind(x), ScopeKind::FunctionExpression);
    let arguments = bound.only("arguments");
    assert!(arguments.is_external);
    assert_eq!(bound.scope_kind(arguments), ScopeKind::FunctionExpression);
}

#[test]
fn test_function_expression_name_is_local() {
    let bound = bind_source("var g = function h() { h; }; h;");
    let symbols = bound.named("h");
    assert_eq!(symbols.len(), 2);

    assert_eq!(symbols[0].kind, SymbolKind::Function);
    assert_eq!(bound.scope_kind(symbols[0]), ScopeKind::FunctionExpression);
    assert_eq!(usage_kinds(symbols[0]), vec![UsageKind::Declaration, UsageKind::Read]);
    assert!(symbols[1].is_external);
}

#[test]
fn test_class_declaration_and_expression_names() {
    let bound = bind_source("class A {} var B = class Inner { m() { Inner; } };");
    let a = bound.only("A");
    assert_eq!(a.kind, SymbolKind::Class);
    assert_eq!(bound.scope_kind(a), ScopeKind::Module);
    assert_eq!(usage_kinds(a), vec![UsageKind::LexicalDeclaration]);

    let inner = bound.only("Inner");
    assert_eq!(inner.kind, SymbolKind::Class);
    assert_eq!(bound.scope_kind(inner), ScopeKind::ClassBody);
    assert_eq!(usage_kinds(inner), vec![UsageKind::LexicalDeclaration, UsageKind::Read]);
}

#[test]
fn test_methods_are_not_reachable_by_name() {
    let bound = bind_source("class C { constructor() {} m() { return m; } get p() { return 1; } }");
    let methods: Vec<&Symbol> = bound
        .result
        .symbols
        .iter()
        .filter(|symbol| symbol.kind == SymbolKind::Method)
        .collect();
    let names: Vec<&str> = methods.iter().map(|symbol| symbol.name.as_str()).collect();
    assert_eq!(names, vec!["constructor", "m", "p"]);
    assert!(methods.iter().all(|symbol| bound.scope_kind(symbol) == ScopeKind::ClassBody));

    let m_symbols = bound.named("m");
    assert_eq!(m_symbols.len(), 2);
    assert!(m_symbols[1].is_external);
    assert_eq!(usage_kinds(m_symbols[1]), vec![UsageKind::Read]);
}

#[test]
fn test_imports_bind_to_module() {
    let bound = bind_source("import a, { b as c } from \"m\";\nimport * as ns from \"n\";\nc(ns, a);");
    for name in ["a", "c", "ns"] {
        let symbol = bound.only(name);
        assert_eq!(symbol.kind, SymbolKind::Import);
        assert_eq!(symbol.scope, bound.result.scopes.root());
        assert_eq!(usage_kinds(symbol), vec![UsageKind::Declaration, UsageKind::Read]);
    }
    assert!(bound.named("b").is_empty());
}

#[test]
fn test_loop_let_is_scoped_to_loop() {
    let bound = bind_source("for (let i = 0; i < 3; i++) {} i;");
    let symbols = bound.named("i");
    assert_eq!(symbols.len(), 2);
    assert_eq!(symbols[0].kind, SymbolKind::LetVariable);
    assert_eq!(bound.scope_kind(symbols[0]), ScopeKind::Block);
    assert_eq!(
        usage_kinds(symbols[0]),
        vec![UsageKind::LexicalDeclaration, UsageKind::Read, UsageKind::ReadWrite]
    );
    assert!(symbols[1].is_external);
}

#[test]
fn test_for_of_var_head_hoists() {
    let bound = bind_source("function f(xs) { for (var x of xs) {} return x; }");
    let x = bound.only("x");
    assert_eq!(bound.scope_kind(x), ScopeKind::Function);
    assert_eq!(usage_kinds(x), vec![UsageKind::Declaration, UsageKind::Read]);
}

#[test]
fn test_switch_case_let_is_scoped_to_case_block() {
    let bound = bind_source("switch (k) { case 1: let y = 2; y; }");
    let y = bound.only("y");
    assert_eq!(bound.scope_kind(y), ScopeKind::Block);
    assert_eq!(usage_kinds(y), vec![UsageKind::LexicalDeclaration, UsageKind::Read]);
}

#[test]
fn test_builtins() {
    let bound = bind_source("function f() { return arguments; } window.x; eval;");
    let window = bound.only("window");
    assert!(window.is_external);
    assert_eq!(window.scope, bound.result.scopes.root());
    assert_eq!(usage_kinds(window), vec![UsageKind::Read]);

    let arguments = bound.only("arguments");
    assert!(arguments.is_external);
    assert_eq!(bound.scope_kind(arguments), ScopeKind::Function);

    assert_eq!(bound.only("eval").kind, SymbolKind::Function);
}

#[test]
fn test_declaration_clears_external_flag() {
    let bound = bind_source("var window = 1;");
    let window = bound.only("window");
    assert!(!window.is_external);
    assert_eq!(usage_kinds(window), vec![UsageKind::DeclarationWrite]);
}

#[test]
fn test_destructuring_var_is_declaration_write() {
    let bound = bind_source("var { a, b: [c] } = obj;");
    assert_eq!(usage_kinds(bound.only("a")), vec![UsageKind::DeclarationWrite]);
    assert_eq!(usage_kinds(bound.only("c")), vec![UsageKind::DeclarationWrite]);
    assert!(bound.named("b").is_empty());
}

#[test]
fn test_declarations_precede_references_in_every_scope() {
    let bound = bind_source("function f() { g(); y; var y = 1; function g() {} }");
    for symbol in bound.result.symbols.iter() {
        let first_reference = symbol.usages.iter().position(|usage| !usage.kind.is_declaration());
        let last_declaration = symbol.usages.iter().rposition(|usage| usage.kind.is_declaration());
        if let (Some(reference), Some(declaration)) = (first_reference, last_declaration) {
            assert!(declaration < reference, "{}: {:?}", symbol.name, usage_kinds(symbol));
        }
    }
}

#[test]
fn test_scope_tables_list_their_symbols() {
    let bound = bind_source("var a; function f(b) { let c; }");
    let root = bound.result.scopes.get(bound.result.scopes.root()).expect("root");
    let names: Vec<&str> = root.symbols.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a", "f", "eval", "window", "this"]);

    let function_scope = bound.result.scopes.get(ScopeId(1)).expect("function scope");
    let names: Vec<&str> = function_scope.symbols.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["b", "arguments", "this", "c"]);
}

fn this_symbols<'b>(bound: &'b Bound) -> Vec<&'b Symbol> {
    bound.named("this")
}

#[test]
fn test_this_binds_to_nearest_function_or_module() {
    let bound = bind_source("this; function f() { return this; } var g = () => this; var h = function () { this; };");
    let symbols = this_symbols(&bound);
    assert_eq!(symbols.len(), 3);
    for symbol in &symbols {
        assert_eq!(symbol.kind, SymbolKind::This);
        assert!(symbol.is_external);
    }

    let in_scope = |kind: ScopeKind| {
        symbols
            .iter()
            .find(|symbol| bound.scope_kind(symbol) == kind)
            .map(|symbol| usage_kinds(symbol))
            .expect("this symbol")
    };
    // The arrow has no `this` of its own.
    assert_eq!(in_scope(ScopeKind::Module), vec![UsageKind::Read, UsageKind::Read]);
    assert_eq!(in_scope(ScopeKind::Function), vec![UsageKind::Read]);
    assert_eq!(in_scope(ScopeKind::FunctionExpression), vec![UsageKind::Read]);
    assert!(bound.result.validate().is_empty());
}

#[test]
fn test_arrow_this_resolves_outward() {
    let bound = bind_source("function f() { var g = () => this; }");
    let this = this_symbols(&bound)
        .into_iter()
        .find(|symbol| bound.scope_kind(symbol) == ScopeKind::Function)
        .expect("function this");
    assert_eq!(usage_kinds(this), vec![UsageKind::Read]);
}

#[test]
fn test_methods_share_the_class_this() {
    let bound = bind_source("class C { constructor() { this.x = 1; } m() { return this.x; } }");
    let class_this = this_symbols(&bound)
        .into_iter()
        .find(|symbol| bound.scope_kind(symbol) == ScopeKind::ClassBody)
        .expect("class this");
    assert_eq!(usage_kinds(class_this), vec![UsageKind::Read, UsageKind::Read]);
    let module_this = this_symbols(&bound)
        .into_iter()
        .find(|symbol| symbol.scope == bound.result.scopes.root())
        .expect("module this");
    assert!(module_this.usages.is_empty());
}

#[test]
fn test_this_is_not_reachable_by_name_lookup() {
    let bound = bind_source("function f() { return this; }");
    let function_scope = bound
        .result
        .scopes
        .iter()
        .find(|scope| scope.kind == ScopeKind::Function)
        .expect("function scope");
    let mut state = BinderState::new(bound.result.scopes.clone());
    state.symbols = bound.result.symbols.clone();
    assert_eq!(state.resolve_name("this", function_scope.id), None);
    assert!(state.resolve_name("arguments", function_scope.id).is_some());
}

#[test]
fn test_member_named_like_class_expression_is_not_merged() {
    let bound = bind_source("var B = class Named { Named() {} other() {} };");
    let named = bound.only("Named");
    assert_eq!(named.kind, SymbolKind::Class);
    assert_eq!(usage_kinds(named), vec![UsageKind::LexicalDeclaration]);
    assert_eq!(bound.only("other").kind, SymbolKind::Method);

    let bound = bind_source("class A { A() {} }");
    let symbols = bound.named("A");
    assert_eq!(symbols.len(), 2);
    assert_eq!(symbols[0].kind, SymbolKind::Class);
    assert_eq!(usage_kinds(symbols[0]), vec![UsageKind::LexicalDeclaration]);
    assert_eq!(symbols[1].kind, SymbolKind::Method);
    assert_eq!(bound.scope_kind(symbols[1]), ScopeKind::ClassBody);
}
