//! Parser state: token handling, diagnostics and the source-file entry point.
//!
//! The parser is a recursive-descent parser over an on-demand [`Scanner`].
//! Expression parsing lives in `state_expressions.rs`, statements and
//! declarations in `state_statements.rs`.

use super::base::{NodeIndex, NodeList};
use super::node::{NodeArena, NodeData, SourceFileData};
use super::node_flags::NodeFlags;
use jsem_common::limits::MAX_PARSER_RECURSION_DEPTH;
use jsem_scanner::{Scanner, SyntaxKind, punctuation_to_text};
use serde::Serialize;
use tracing::{debug, trace};

/// Inside an async function: `await` is an operator.
pub(crate) const CONTEXT_FLAG_ASYNC: u8 = 1 << 0;
/// Inside a generator: `yield` is an operator.
pub(crate) const CONTEXT_FLAG_GENERATOR: u8 = 1 << 1;
/// `in` is not a binary operator (the head of a `for` statement).
pub(crate) const CONTEXT_FLAG_DISALLOW_IN: u8 = 1 << 2;

/// A syntax error reported while parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    pub message: String,
    pub pos: u32,
    pub end: u32,
}

pub struct ParserState {
    pub(crate) scanner: Scanner,
    pub arena: NodeArena,
    pub(crate) current_token: SyntaxKind,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    pub(crate) context_flags: u8,
    /// End of the most recently consumed token
    pub(crate) prev_token_end: usize,
    recursion_depth: u32,
    file_name: String,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let mut arena = NodeArena::new();
        arena.set_source_text(source_text.clone());
        let mut scanner = Scanner::new(source_text);
        let current_token = scanner.scan();
        ParserState {
            scanner,
            arena,
            current_token,
            parse_diagnostics: Vec::new(),
            context_flags: 0,
            prev_token_end: 0,
            recursion_depth: 0,
            file_name,
        }
    }

    /// Parse the whole file and return the `SourceFile` node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        debug!(file = %self.file_name, "parsing source file");
        let statements = self.parse_statement_list(|parser| parser.is_token(SyntaxKind::EndOfFileToken));
        let end = self.scanner.text().len();
        let file_name = self.file_name.clone();
        let root = self.arena.add(
            SyntaxKind::SourceFile,
            0,
            end,
            NodeFlags::empty(),
            NodeData::SourceFile(SourceFileData {
                file_name,
                statements,
            }),
        );
        debug!(
            nodes = self.arena.len(),
            diagnostics = self.parse_diagnostics.len(),
            "parsed source file"
        );
        root
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> usize {
        self.scanner.token_start()
    }

    pub(crate) fn token_value(&self) -> String {
        self.scanner.token_value().to_string()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.token_end();
        self.current_token = self.scanner.scan();
        trace!(token = ?self.current_token, pos = self.scanner.token_start(), "token");
        self.current_token
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        let expected = punctuation_to_text(kind)
            .or_else(|| jsem_scanner::keyword_to_text(kind))
            .map_or_else(|| format!("{kind:?}"), |text| format!("'{text}'"));
        self.error_at_current(&format!("{expected} expected."));
        false
    }

    /// True when the current token is a plain identifier with this text.
    pub(crate) fn is_contextual(&self, text: &str) -> bool {
        self.is_token(SyntaxKind::Identifier) && self.scanner.token_value() == text
    }

    /// True for tokens usable as a binding or reference name.
    pub(crate) fn is_identifier(&self) -> bool {
        match self.token() {
            SyntaxKind::Identifier => {
                !(self.in_context(CONTEXT_FLAG_ASYNC) && self.scanner.token_value() == "await")
                    && !(self.in_context(CONTEXT_FLAG_GENERATOR) && self.scanner.token_value() == "yield")
            }
            // Sloppy-mode `let` used as a name
            SyntaxKind::LetKeyword => true,
            _ => false,
        }
    }

    #[inline]
    pub(crate) fn in_context(&self, flag: u8) -> bool {
        self.context_flags & flag != 0
    }

    /// Run `f` with `set` context flags on and `clear` flags off, restoring
    /// the previous flags afterwards.
    pub(crate) fn with_context<T>(&mut self, set: u8, clear: u8, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.context_flags;
        self.context_flags = (saved | set) & !clear;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    /// Speculatively run `f`, then rewind the scanner, the arena and the
    /// diagnostics.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;
        let prev_end = self.prev_token_end;
        let saved_arena_len = self.arena.nodes.len();
        let saved_diagnostics_len = self.parse_diagnostics.len();
        let saved_flags = self.context_flags;

        let result = f(self);

        self.scanner.restore_state(snapshot);
        self.current_token = current;
        self.prev_token_end = prev_end;
        self.arena.nodes.truncate(saved_arena_len);
        self.parse_diagnostics.truncate(saved_diagnostics_len);
        self.context_flags = saved_flags;
        result
    }

    // =========================================================================
    // Automatic semicolon insertion
    // =========================================================================

    pub(crate) fn can_parse_semicolon(&self) -> bool {
        self.is_token(SyntaxKind::SemicolonToken)
            || self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.scanner.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return;
        }
        if !self.can_parse_semicolon() {
            self.error_at_current("';' expected.");
        }
    }

    // =========================================================================
    // Diagnostics and recovery
    // =========================================================================

    pub(crate) fn error_at_current(&mut self, message: &str) {
        let pos = self.scanner.token_start() as u32;
        let end = self.scanner.token_end() as u32;
        // One diagnostic per position keeps recovery loops quiet
        if self.parse_diagnostics.last().is_some_and(|last| last.pos == pos) {
            return;
        }
        debug!(pos, message, "parse error");
        self.parse_diagnostics.push(ParseDiagnostic {
            message: message.to_string(),
            pos,
            end,
        });
    }

    pub(crate) fn error_expression_expected(&mut self) {
        self.error_at_current("Expression expected.");
    }

    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_PARSER_RECURSION_DEPTH {
            self.error_at_current("Maximum nesting depth exceeded.");
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    /// Placeholder for a missing expression so parents keep their shape.
    pub(crate) fn create_missing_expression(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        self.arena.add(
            SyntaxKind::OmittedExpression,
            pos,
            pos,
            NodeFlags::THIS_NODE_HAS_ERROR,
            NodeData::None,
        )
    }

    /// Parse statements until `is_end` holds. Tokens that cannot start a
    /// statement are reported and skipped.
    pub(crate) fn parse_statement_list(&mut self, is_end: impl Fn(&Self) -> bool) -> NodeList {
        let mut statements = Vec::new();
        while !is_end(self) && !self.is_token(SyntaxKind::EndOfFileToken) {
            if matches!(
                self.token(),
                SyntaxKind::CloseBraceToken
                    | SyntaxKind::CloseParenToken
                    | SyntaxKind::CloseBracketToken
                    | SyntaxKind::ColonToken
                    | SyntaxKind::CommaToken
            ) {
                self.error_at_current("Declaration or statement expected.");
                self.next_token();
                continue;
            }
            let start = self.token_pos();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.token_pos() == start && !is_end(self) {
                self.error_at_current("Declaration or statement expected.");
                self.next_token();
            }
        }
        NodeList::from(statements)
    }

    /// Parse a comma-separated list up to `close`, tolerating a trailing
    /// comma. The closing token is not consumed.
    pub(crate) fn parse_delimited_list(
        &mut self,
        close: SyntaxKind,
        mut parse_element: impl FnMut(&mut Self) -> NodeIndex,
    ) -> NodeList {
        let mut elements = Vec::new();
        while !self.is_token(close) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let start = self.token_pos();
            let element = parse_element(self);
            if element.is_some() {
                elements.push(element);
            }
            if self.parse_optional(SyntaxKind::CommaToken) {
                continue;
            }
            if !self.is_token(close) {
                self.parse_expected(SyntaxKind::CommaToken);
                if self.token_pos() == start {
                    self.next_token();
                }
            }
        }
        NodeList::from(elements)
    }
}
