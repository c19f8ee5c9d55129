//! Tests for parser state internals: lookahead, recovery and node spans.

use crate::parser::ParserState;
use crate::parser::base::NodeIndex;
use jsem_scanner::SyntaxKind;

fn first_statement(parser: &ParserState, root: NodeIndex) -> NodeIndex {
    let arena = parser.get_arena();
    let root_node = arena.get(root).expect("root node");
    arena
        .get_source_file(root_node)
        .and_then(|file| file.statements.iter().next())
        .expect("first statement")
}

#[test]
fn test_look_ahead_restores_scanner_and_arena() {
    let mut parser = ParserState::new("test.js".to_string(), "a b c".to_string());
    let nodes_before = parser.arena.len();
    let seen = parser.look_ahead(|parser| {
        parser.parse_identifier();
        parser.next_token();
        parser.token_value()
    });
    assert_eq!(seen, "c");
    assert_eq!(parser.token_value(), "a");
    assert_eq!(parser.arena.len(), nodes_before);
}

#[test]
fn test_missing_semicolon_on_same_line_is_reported() {
    let mut parser = ParserState::new("test.js".to_string(), "a b".to_string());
    parser.parse_source_file();
    assert_eq!(parser.get_diagnostics().len(), 1);
    assert_eq!(parser.get_diagnostics()[0].message, "';' expected.");
}

#[test]
fn test_asi_across_line_break() {
    let mut parser = ParserState::new("test.js".to_string(), "a\nb\n".to_string());
    parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty());
}

#[test]
fn test_node_span_excludes_trailing_trivia() {
    let source = "foo(1)   // call\n";
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    let statement = first_statement(&parser, root);
    let arena = parser.get_arena();
    assert_eq!(arena.node_text(statement), Some("foo(1)"));
}

#[test]
fn test_recovery_makes_progress_on_garbage() {
    let mut parser = ParserState::new("test.js".to_string(), "} ) ] var x = 1;".to_string());
    let root = parser.parse_source_file();
    assert!(!parser.get_diagnostics().is_empty());
    let arena = parser.get_arena();
    let statements = arena
        .get(root)
        .and_then(|node| arena.get_source_file(node))
        .map(|file| file.statements.len());
    assert_eq!(statements, Some(1));
}

#[test]
fn test_disallow_in_context_is_restored_after_for_head() {
    let mut parser = ParserState::new("test.js".to_string(), "for (var i = 0; i < n; i++) {}\nx = a in b;".to_string());
    parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty());
    assert_eq!(parser.context_flags, 0);
    assert!(parser.is_token(SyntaxKind::EndOfFileToken));
}
