//! End-to-end tests for `analyze_source`.

use jsem::binder::{ScopeKind, SymbolKind, UsageKind};
use jsem::solver::{Type, TypeKind};
use jsem::{AnalyzerOptions, analyze_source, analyze_source_with_json_options};

#[test]
fn test_analyze_source_builds_model() {
    let analysis = analyze_source(
        "todo.js",
        r##"
        var Todo = Backbone.Model.extend({ defaults: { title: "" } });
        var todo = new Todo();
        var $items = $("#todos").find("li");
        function render(list) {
            for (var i = 0; i < list.length; i++) {
                let item = list[i];
            }
        }
        render(document.getElementsByTagName("li"));
        "##,
        &AnalyzerOptions::default(),
    )
    .expect("analysis");

    let model = &analysis.model;
    assert_eq!(analysis.file_name, "todo.js");
    let todo = model.symbols_named("todo").next().expect("todo");
    assert!(todo.types.contains_kind(TypeKind::ModelInstance));
    let items = model.symbols_named("$items").next().expect("$items");
    assert!(items.types.contains_kind(TypeKind::SelectorObject));

    // The argument flows into `list`, but `item` was typed before that.
    let list = model.symbols_named("list").next().expect("list");
    assert_eq!(list.types.only(), Some(&Type::dom_element_list()));
    let item = model.symbols_named("item").next().expect("item");
    assert_eq!(item.types.only(), Some(&Type::UNKNOWN));

    let i = model.symbols_named("i").next().expect("i");
    assert_eq!(model.scope(i.scope).map(|s| s.kind), Some(ScopeKind::Function));
    let kinds: Vec<_> = i.usages.iter().map(|u| u.kind).collect();
    assert_eq!(
        kinds,
        vec![
            UsageKind::DeclarationWrite,
            UsageKind::Read,
            UsageKind::ReadWrite,
            UsageKind::Read
        ]
    );
}

#[test]
fn test_external_symbols_are_shared() {
    let analysis = analyze_source(
        "globals.js",
        "console.log(1); function f() { console.log(2); }",
        &AnalyzerOptions::default(),
    )
    .expect("analysis");
    let consoles: Vec<_> = analysis.model.symbols_named("console").collect();
    assert_eq!(consoles.len(), 1);
    assert!(consoles[0].is_external);
    assert_eq!(consoles[0].kind, SymbolKind::Variable);
    assert_eq!(consoles[0].usages.len(), 2);
    assert_eq!(Some(consoles[0].scope), analysis.model.root_scope().map(|s| s.id));
}

#[test]
fn test_syntax_error_is_reported() {
    let err = analyze_source("broken.js", "var = ;", &AnalyzerOptions::default()).expect_err("syntax error");
    let message = err.to_string();
    assert!(message.starts_with("broken.js:1:"), "{message}");
    assert!(message.contains("syntax error"), "{message}");
}

#[test]
fn test_json_options() {
    let analysis = analyze_source_with_json_options("z.js", "var a = Zepto('p');", r#"{"selectorAliases": "nope"}"#);
    assert!(analysis.is_err());

    let analysis = analyze_source_with_json_options("z.js", "var a = Zepto('p');", r#"{"selectorAliases": ["Zepto"]}"#)
        .expect("analysis");
    let a = analysis.model.symbols_named("a").next().expect("a");
    assert!(a.types.contains_kind(TypeKind::SelectorObject));
}

#[test]
fn test_models_analyze_on_separate_threads() {
    let sources = ["var a = 1;", "var b = [];", "var c = $('x');"];
    let handles: Vec<_> = sources
        .iter()
        .map(|source| {
            let source = source.to_string();
            std::thread::spawn(move || analyze_source("t.js", &source, &AnalyzerOptions::default()).map(|a| a.model))
        })
        .collect();
    for handle in handles {
        let model = handle.join().expect("thread").expect("analysis");
        assert!(model.all_symbols().any(|symbol| !symbol.types.is_empty()));
    }
}
