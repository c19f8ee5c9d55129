//! Tests for the symbol model queries.

use jsem_binder::{ScopeKind, SymbolKind, UsageKind};
use jsem_checker::{AnalysisError, AnalyzerOptions, SymbolModel};
use jsem_parser::{NodeArena, NodeIndex, ParserState};
use jsem_scanner::SyntaxKind;
use jsem_solver::TypeKind;

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

fn build(source: &str) -> (NodeArena, SymbolModel) {
    let (arena, root) = parse(source);
    let model = SymbolModel::build(&arena, root, &AnalyzerOptions::default()).expect("analysis");
    (arena, model)
}

fn identifiers_named(arena: &NodeArena, name: &str) -> Vec<NodeIndex> {
    (0..arena.len() as u32)
        .map(NodeIndex)
        .filter(|&idx| {
            arena
                .kind(idx)
                .is_some_and(|kind| matches!(kind, SyntaxKind::Identifier | SyntaxKind::BindingIdentifier))
                && arena.identifier_text(idx) == Some(name)
        })
        .collect()
}

#[test]
fn test_model_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SymbolModel>();
}

#[test]
fn test_symbol_queries() {
    let (_, model) = build(
        r#"
        var a = 1;
        function f(a) { let b = a; }
        class C { m() {} }
        "#,
    );

    assert_eq!(model.symbols_named("a").count(), 2);
    let functions: Vec<_> = model.symbols_of_kind(SymbolKind::Function).map(|s| s.name.as_str()).collect();
    assert_eq!(functions, vec!["f", "eval"]);
    assert_eq!(model.symbols_of_kind(SymbolKind::Class).count(), 1);
    assert_eq!(model.symbols_of_kind(SymbolKind::Method).count(), 1);
    assert_eq!(model.symbols_of_kind(SymbolKind::LetVariable).count(), 1);
    assert_eq!(model.all_symbols().count(), model.symbols().len());

    for symbol in model.all_symbols() {
        assert_eq!(model.symbol(symbol.id).map(|s| s.id), Some(symbol.id));
        let scope = model.scope(symbol.scope).expect("owning scope");
        assert_eq!(scope.lookup(&symbol.name), Some(symbol.id));
    }
}

#[test]
fn test_root_scope_and_scope_for() {
    let (arena, model) = build("function f() { { let x; } }");
    let root = model.root_scope().expect("root scope");
    assert_eq!(root.kind, ScopeKind::Module);
    assert!(root.is_root());

    let x = identifiers_named(&arena, "x")[0];
    let scope = model.scope_for(x).expect("scope of x");
    assert_eq!(scope.kind, ScopeKind::Block);
    let parent = scope.parent.and_then(|id| model.scope(id)).expect("parent");
    assert_eq!(parent.kind, ScopeKind::Function);
}

#[test]
fn test_scope_for_unvisited_node_is_none() {
    let (arena, model) = build("var a;");
    assert!(model.scope_for(NodeIndex::NONE).is_none());
    assert!(model.scope_for(NodeIndex(arena.len() as u32 + 10)).is_none());
}

#[test]
fn test_symbol_for_identifier_nodes() {
    let (arena, model) = build("var a = 1; a = a + 1;");
    let nodes = identifiers_named(&arena, "a");
    assert_eq!(nodes.len(), 3);
    let ids: Vec<_> = nodes.iter().map(|&n| model.symbol_for(n).map(|s| s.id)).collect();
    assert!(ids.iter().all(|id| id.is_some() && *id == ids[0]));

    let symbol = model.symbol_for(nodes[0]).expect("symbol");
    let kinds: Vec<_> = symbol.usages.iter().map(|usage| usage.kind).collect();
    assert_eq!(
        kinds,
        vec![UsageKind::DeclarationWrite, UsageKind::Write, UsageKind::Read]
    );
}

#[test]
fn test_expression_types_of_nodes() {
    let (arena, model) = build("var x = $('a'); var n = 1; n = 'late';");
    let call = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&idx| arena.kind(idx) == Some(SyntaxKind::CallExpression))
        .expect("call");
    assert!(model.expression_types(call).contains_kind(TypeKind::SelectorObject));

    // Identifier references report the final types of their symbol.
    let n_nodes = identifiers_named(&arena, "n");
    let types = model.expression_types(n_nodes[0]);
    assert!(types.contains_kind(TypeKind::Number));
    assert!(types.contains_kind(TypeKind::String));

    let dollar = identifiers_named(&arena, "$")[0];
    assert!(model.expression_types(dollar).contains_kind(TypeKind::SelectorLibrary));
    assert!(model.expression_types(NodeIndex::NONE).is_empty());
}

#[test]
fn test_model_property_through_model() {
    let (arena, model) = build("var Todo = Backbone.Model.extend({ defaults: [] });");
    let call = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&idx| arena.kind(idx) == Some(SyntaxKind::CallExpression))
        .expect("call");
    let defaults = model.model_property(&arena, call, "defaults").expect("defaults");
    assert!(model.expression_types(defaults).contains_kind(TypeKind::Array));
}

#[test]
fn test_declaration_and_reference_locations() {
    let (arena, model) = build("var count = 0;\ncount++;\nfoo(count);");
    let symbol = model.symbols_named("count").next().expect("count");

    let declaration = model.declaration_location(&arena, symbol.id).expect("declaration");
    assert_eq!(declaration.text, "count");
    assert_eq!((declaration.start.line, declaration.start.column), (1, 4));
    assert_eq!(declaration.len(), 5);

    let references = model.reference_locations(&arena, symbol.id);
    let starts: Vec<_> = references.iter().map(|loc| (loc.start.line, loc.start.column)).collect();
    assert_eq!(starts, vec![(2, 0), (3, 4)]);
}

#[test]
fn test_missing_root_is_an_error() {
    let (arena, _) = parse("var a;");
    let missing = NodeIndex(arena.len() as u32 + 1);
    let err = SymbolModel::build(&arena, missing, &AnalyzerOptions::default()).expect_err("missing root");
    assert!(matches!(err, AnalysisError::MissingRoot { .. }));
    assert!(err.to_string().contains("not in the syntax tree"));
}

#[test]
fn test_analysis_is_idempotent() {
    let source = r##"
        var $el = $("#main").find("li");
        var Model = Backbone.Model.extend({});
        function render(item, index) { var html = "<li>" + item; return html; }
        render(new Model(), 0);
        try { missing(); } catch (e) { let msg = e; }
    "##;
    let (arena, root) = parse(source);
    let options = AnalyzerOptions::default();
    let first = SymbolModel::build(&arena, root, &options).expect("first");
    let second = SymbolModel::build(&arena, root, &options).expect("second");

    assert_eq!(format!("{:?}", first.symbols()), format!("{:?}", second.symbols()));
    assert_eq!(format!("{:?}", first.scopes()), format!("{:?}", second.scopes()));
    for symbol in first.all_symbols() {
        assert_eq!(Some(&symbol.types), second.symbol(symbol.id).map(|s| &s.types));
    }
}

#[test]
fn test_options_flow_into_model() {
    let options = AnalyzerOptions::from_json(r#"{ "selectorAliases": ["Zepto"] }"#).expect("options");
    let (arena, root) = parse("var z = Zepto('a');");
    let model = SymbolModel::build(&arena, root, &options).expect("analysis");
    assert_eq!(model.options(), &options);
    let z = model.symbols_named("z").next().expect("z");
    assert!(z.types.contains_kind(TypeKind::SelectorObject));
}
