//! Tests for scope tree construction.

use jsem_binder::*;
use jsem_parser::{NodeArena, NodeIndex, ParserState};
use jsem_scanner::SyntaxKind;

fn parse(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics: {:?}",
        parser.get_diagnostics()
    );
    (parser.into_arena(), root)
}

fn scope_kinds(tree: &ScopeTree) -> Vec<ScopeKind> {
    tree.iter().map(|scope| scope.kind).collect()
}

fn find_node(arena: &NodeArena, kind: SyntaxKind, text: &str) -> NodeIndex {
    (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&idx| arena.kind(idx) == Some(kind) && arena.identifier_text(idx) == Some(text))
        .unwrap_or_else(|| panic!("no {kind:?} named {text}"))
}

#[test]
fn test_module_scope_is_root() {
    let (arena, root) = parse("var x = 1;");
    let tree = build_scopes(&arena, root);

    assert_eq!(tree.len(), 1);
    let module = tree.get(tree.root()).expect("root scope");
    assert_eq!(module.kind, ScopeKind::Module);
    assert_eq!(module.node, root);
    assert!(module.is_root());
    assert_eq!(tree.scope_for(root), Some(tree.root()));
}

#[test]
fn test_function_like_scopes() {
    let (arena, root) = parse(
        "function f(a) { return () => a; }\n\
         var g = function h() {};\n\
         class C { m() {} get p() { return 1; } }",
    );
    let tree = build_scopes(&arena, root);

    assert_eq!(
        scope_kinds(&tree),
        vec![
            ScopeKind::Module,
            ScopeKind::Function,
            ScopeKind::FunctionExpression,
            ScopeKind::FunctionExpression,
            ScopeKind::ClassBody,
            ScopeKind::FunctionExpression,
            ScopeKind::FunctionExpression,
        ]
    );
    // The arrow is nested in `f`, which is nested in the module.
    let arrow = tree.get(ScopeId(2)).expect("arrow scope");
    assert_eq!(arrow.parent, Some(ScopeId(1)));
    assert_eq!(tree.get(ScopeId(1)).and_then(|scope| scope.parent), Some(tree.root()));
    // Methods are children of the class body.
    let class_body = tree.get(ScopeId(4)).expect("class scope");
    assert_eq!(class_body.children, vec![ScopeId(5), ScopeId(6)]);
}

#[test]
fn test_block_catch_loop_and_switch_scopes() {
    let (arena, root) = parse(
        "{ let a; }\n\
         try { } catch (e) { }\n\
         for (let i = 0; i < 1; i++) { }\n\
         switch (x) { case 1: let y; }",
    );
    let tree = build_scopes(&arena, root);

    assert_eq!(
        scope_kinds(&tree),
        vec![
            ScopeKind::Module,
            ScopeKind::Block,
            ScopeKind::Block,
            ScopeKind::Catch,
            ScopeKind::Block,
            ScopeKind::Block,
        ]
    );
    let introducers: Vec<Option<SyntaxKind>> = tree.iter().map(|scope| arena.kind(scope.node)).collect();
    assert_eq!(
        introducers,
        vec![
            Some(SyntaxKind::SourceFile),
            Some(SyntaxKind::Block),
            Some(SyntaxKind::Block),
            Some(SyntaxKind::CatchClause),
            Some(SyntaxKind::ForStatement),
            Some(SyntaxKind::CaseBlock),
        ]
    );
}

#[test]
fn test_function_body_block_shares_function_scope() {
    let (arena, root) = parse("function f() { var x; }");
    let tree = build_scopes(&arena, root);

    assert_eq!(scope_kinds(&tree), vec![ScopeKind::Module, ScopeKind::Function]);
    let x = find_node(&arena, SyntaxKind::BindingIdentifier, "x");
    assert_eq!(tree.scope_for(x), Some(ScopeId(1)));
}

#[test]
fn test_scope_for_nodes() {
    let (arena, root) = parse("var a; { let b = a; }");
    let tree = build_scopes(&arena, root);

    let a_decl = find_node(&arena, SyntaxKind::BindingIdentifier, "a");
    let a_ref = find_node(&arena, SyntaxKind::Identifier, "a");
    assert_eq!(tree.scope_for(a_decl), Some(tree.root()));
    assert_eq!(tree.scope_for(a_ref), Some(ScopeId(1)));

    let block = tree.get(ScopeId(1)).expect("block scope").node;
    assert_eq!(tree.scope_for(block), Some(ScopeId(1)));
    assert_eq!(tree.scope_introduced_by(block), Some(ScopeId(1)));
    assert_eq!(tree.scope_introduced_by(a_ref), None);

    assert_eq!(tree.scope_for(NodeIndex(100_000)), None);
    assert_eq!(tree.scope_for(NodeIndex::NONE), None);
}

#[test]
fn test_parent_and_child_links_agree() {
    let (arena, root) = parse(
        "function outer() { if (a) { let b; } return function () { try {} catch (e) {} }; }",
    );
    let tree = build_scopes(&arena, root);

    for scope in tree.iter() {
        for &child in &scope.children {
            assert_eq!(tree.get(child).and_then(|c| c.parent), Some(scope.id));
        }
        if let Some(parent) = scope.parent {
            assert!(tree.get(parent).expect("parent").children.contains(&scope.id));
        }
    }
    // No two scopes share an introducing node.
    let mut nodes: Vec<NodeIndex> = tree.iter().map(|scope| scope.node).collect();
    nodes.sort();
    nodes.dedup();
    assert_eq!(nodes.len(), tree.len());
}

#[test]
fn test_hoisting_target_skips_blocks() {
    let (arena, root) = parse("function f() { { try {} catch (e) { { } } } }");
    let tree = build_scopes(&arena, root);

    let innermost = ScopeId(tree.len() as u32 - 1);
    assert_eq!(tree.get(innermost).map(|scope| scope.kind), Some(ScopeKind::Block));
    assert_eq!(tree.hoisting_target(innermost), ScopeId(1));
    assert_eq!(tree.hoisting_target(tree.root()), tree.root());
    assert_eq!(tree.ancestors(innermost).last().map(|scope| scope.id), Some(tree.root()));
}
