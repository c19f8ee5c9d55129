//! Parser state - statement, declaration and module parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::node_flags::NodeFlags;
use super::state::{CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParserState};
use jsem_scanner::{SyntaxKind, token_is_identifier_or_keyword};

impl ParserState {
    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            self.next_token();
            return NodeIndex::NONE;
        }
        let statement = self.parse_statement_worker();
        self.exit_recursion();
        statement
    }

    fn parse_statement_worker(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                self.next_token();
                self.add_node(SyntaxKind::EmptyStatement, start_pos, NodeData::None)
            }
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => self.parse_variable_statement(),
            SyntaxKind::LetKeyword if self.is_let_declaration() => self.parse_variable_statement(),
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start_pos, false),
            SyntaxKind::ClassKeyword => self.parse_class_like(SyntaxKind::ClassDeclaration),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ContinueKeyword => self.parse_jump_statement(SyntaxKind::ContinueStatement),
            SyntaxKind::BreakKeyword => self.parse_jump_statement(SyntaxKind::BreakStatement),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::DebuggerKeyword => {
                self.next_token();
                self.parse_semicolon();
                self.add_node(SyntaxKind::DebuggerStatement, start_pos, NodeData::None)
            }
            SyntaxKind::ImportKeyword if self.is_import_declaration() => self.parse_import_declaration(),
            SyntaxKind::ExportKeyword => self.parse_export_declaration(),
            SyntaxKind::Identifier if self.is_async_function_start() => {
                self.next_token();
                self.parse_function_declaration(start_pos, true)
            }
            _ if self.is_identifier()
                && self.look_ahead(|parser| {
                    parser.next_token();
                    parser.is_token(SyntaxKind::ColonToken)
                }) =>
            {
                self.parse_labeled_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `let` starts a declaration only when a binding follows it.
    fn is_let_declaration(&mut self) -> bool {
        self.look_ahead(|parser| {
            parser.next_token();
            parser.is_identifier()
                || parser.is_token(SyntaxKind::OpenBracketToken)
                || parser.is_token(SyntaxKind::OpenBraceToken)
        })
    }

    fn is_async_function_start(&mut self) -> bool {
        self.is_contextual("async")
            && self.look_ahead(|parser| {
                parser.next_token();
                parser.is_token(SyntaxKind::FunctionKeyword) && !parser.scanner.has_preceding_line_break()
            })
    }

    fn is_import_declaration(&mut self) -> bool {
        self.look_ahead(|parser| {
            parser.next_token();
            !parser.is_token(SyntaxKind::OpenParenToken) && !parser.is_token(SyntaxKind::DotToken)
        })
    }

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let statements = self.parse_statement_list(|parser| parser.is_token(SyntaxKind::CloseBraceToken));
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.add_node(SyntaxKind::Block, start_pos, NodeData::Block(BlockData { statements }))
    }

    /// Function body. The caller sets the async/generator context.
    pub(crate) fn parse_function_block(&mut self) -> NodeIndex {
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |parser| parser.parse_block())
    }

    fn parse_expression_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = self.parse_expression_allow_in();
        self.parse_semicolon();
        self.add_node(
            SyntaxKind::ExpressionStatement,
            start_pos,
            NodeData::Expression(ExpressionData { expression }),
        )
    }

    fn parse_variable_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let declaration_list = self.parse_variable_declaration_list();
        self.parse_semicolon();
        self.add_node(
            SyntaxKind::VariableStatement,
            start_pos,
            NodeData::VariableStatement(VariableStatementData { declaration_list }),
        )
    }

    /// `var`/`let`/`const` followed by declarators. `in` handling follows the
    /// current context so `for` heads can reuse this.
    pub(crate) fn parse_variable_declaration_list(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let flags = match self.token() {
            SyntaxKind::LetKeyword => NodeFlags::LET,
            SyntaxKind::ConstKeyword => NodeFlags::CONST,
            _ => NodeFlags::empty(),
        };
        self.next_token();

        let mut declarations = Vec::new();
        loop {
            let declaration_start = self.token_pos();
            let name = self.parse_binding_name();
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            declarations.push(self.add_node(
                SyntaxKind::VariableDeclaration,
                declaration_start,
                NodeData::VariableDeclaration(VariableDeclarationData { name, initializer }),
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }

        let list = self.add_node(
            SyntaxKind::VariableDeclarationList,
            start_pos,
            NodeData::Variable(VariableData {
                declarations: NodeList::from(declarations),
            }),
        );
        self.arena.add_flags(list, flags);
        list
    }

    fn parse_if_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression_allow_in();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let then_statement = self.parse_statement();
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        self.add_node(
            SyntaxKind::IfStatement,
            start_pos,
            NodeData::If(IfStatementData {
                expression,
                then_statement,
                else_statement,
            }),
        )
    }

    fn parse_do_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let statement = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression_allow_in();
        self.parse_expected(SyntaxKind::CloseParenToken);
        // The semicolon after do-while is always optional
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.add_node(
            SyntaxKind::DoStatement,
            start_pos,
            NodeData::Loop(LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            }),
        )
    }

    fn parse_while_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression_allow_in();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.add_node(
            SyntaxKind::WhileStatement,
            start_pos,
            NodeData::Loop(LoopData {
                initializer: NodeIndex::NONE,
                condition,
                incrementor: NodeIndex::NONE,
                statement,
            }),
        )
    }

    fn parse_for_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let await_modifier = self.in_context(CONTEXT_FLAG_ASYNC) && self.is_contextual("await");
        if await_modifier {
            self.next_token();
        }
        self.parse_expected(SyntaxKind::OpenParenToken);

        let initializer = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            let is_declaration = match self.token() {
                SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => true,
                SyntaxKind::LetKeyword => self.is_let_declaration(),
                _ => false,
            };
            self.with_context(CONTEXT_FLAG_DISALLOW_IN, 0, |parser| {
                if is_declaration {
                    parser.parse_variable_declaration_list()
                } else {
                    parser.parse_expression()
                }
            })
        };

        if self.is_contextual("of") {
            self.next_token();
            let expression = self.parse_assignment_expression_allow_in();
            return self.finish_for_in_of(SyntaxKind::ForOfStatement, start_pos, initializer, expression, await_modifier);
        }
        if self.parse_optional(SyntaxKind::InKeyword) {
            let expression = self.parse_expression_allow_in();
            return self.finish_for_in_of(SyntaxKind::ForInStatement, start_pos, initializer, expression, false);
        }

        self.parse_expected(SyntaxKind::SemicolonToken);
        let condition = if self.is_token(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression_allow_in()
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression_allow_in()
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.add_node(
            SyntaxKind::ForStatement,
            start_pos,
            NodeData::Loop(LoopData {
                initializer,
                condition,
                incrementor,
                statement,
            }),
        )
    }

    fn finish_for_in_of(
        &mut self,
        kind: SyntaxKind,
        start_pos: usize,
        initializer: NodeIndex,
        expression: NodeIndex,
        await_modifier: bool,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.add_node(
            kind,
            start_pos,
            NodeData::ForInOf(ForInOfData {
                initializer,
                expression,
                statement,
                await_modifier,
            }),
        )
    }

    fn parse_jump_statement(&mut self, kind: SyntaxKind) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let label = if self.is_identifier() && !self.scanner.has_preceding_line_break() {
            self.parse_label()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.add_node(kind, start_pos, NodeData::Jump(JumpData { label }))
    }

    /// Labels live in their own namespace and are never variable references.
    fn parse_label(&mut self) -> NodeIndex {
        self.parse_identifier_name()
    }

    fn parse_labeled_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let label = self.parse_label();
        self.parse_expected(SyntaxKind::ColonToken);
        let statement = self.parse_statement();
        self.add_node(
            SyntaxKind::LabeledStatement,
            start_pos,
            NodeData::Labeled(LabeledData { label, statement }),
        )
    }

    fn parse_return_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let expression = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression_allow_in()
        };
        self.parse_semicolon();
        self.add_node(
            SyntaxKind::ReturnStatement,
            start_pos,
            NodeData::Expression(ExpressionData { expression }),
        )
    }

    fn parse_throw_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        if self.scanner.has_preceding_line_break() {
            self.error_at_current("Line break not permitted here.");
        }
        let expression = self.parse_expression_allow_in();
        self.parse_semicolon();
        self.add_node(
            SyntaxKind::ThrowStatement,
            start_pos,
            NodeData::Expression(ExpressionData { expression }),
        )
    }

    fn parse_with_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression_allow_in();
        self.parse_expected(SyntaxKind::CloseParenToken);
        let statement = self.parse_statement();
        self.add_node(
            SyntaxKind::WithStatement,
            start_pos,
            NodeData::With(WithData { expression, statement }),
        )
    }

    fn parse_switch_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression_allow_in();
        self.parse_expected(SyntaxKind::CloseParenToken);

        let case_block_start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut clauses = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let clause_start = self.token_pos();
            let (kind, expression) = match self.token() {
                SyntaxKind::CaseKeyword => {
                    self.next_token();
                    (SyntaxKind::CaseClause, self.parse_expression_allow_in())
                }
                SyntaxKind::DefaultKeyword => {
                    self.next_token();
                    (SyntaxKind::DefaultClause, NodeIndex::NONE)
                }
                _ => {
                    self.error_at_current("'case' or 'default' expected.");
                    self.next_token();
                    continue;
                }
            };
            self.parse_expected(SyntaxKind::ColonToken);
            let statements = self.parse_statement_list(|parser| {
                matches!(
                    parser.token(),
                    SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword | SyntaxKind::CloseBraceToken
                )
            });
            clauses.push(self.add_node(
                kind,
                clause_start,
                NodeData::CaseClause(CaseClauseData { expression, statements }),
            ));
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let case_block = self.add_node(
            SyntaxKind::CaseBlock,
            case_block_start,
            NodeData::Block(BlockData {
                statements: NodeList::from(clauses),
            }),
        );

        self.add_node(
            SyntaxKind::SwitchStatement,
            start_pos,
            NodeData::Switch(SwitchData { expression, case_block }),
        )
    }

    fn parse_try_statement(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_block();

        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_start = self.token_pos();
            self.next_token();
            let variable_declaration = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let name = self.parse_binding_name();
                self.parse_expected(SyntaxKind::CloseParenToken);
                name
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block();
            self.add_node(
                SyntaxKind::CatchClause,
                catch_start,
                NodeData::CatchClause(CatchClauseData {
                    variable_declaration,
                    block,
                }),
            )
        } else {
            NodeIndex::NONE
        };

        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };

        if catch_clause.is_none() && finally_block.is_none() {
            self.error_at_current("'catch' or 'finally' expected.");
        }

        self.add_node(
            SyntaxKind::TryStatement,
            start_pos,
            NodeData::Try(TryData {
                try_block,
                catch_clause,
                finally_block,
            }),
        )
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// `function` keyword onwards; `async` has already been consumed.
    fn parse_function_declaration(&mut self, start_pos: usize, is_async: bool) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        // The name is optional only after `export default`
        let name = if self.is_identifier() {
            self.parse_binding_identifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_function_rest(SyntaxKind::FunctionDeclaration, start_pos, name, is_async, is_generator)
    }

    /// Parameters and body of any function-like node.
    pub(crate) fn parse_function_rest(
        &mut self,
        kind: SyntaxKind,
        start_pos: usize,
        name: NodeIndex,
        is_async: bool,
        is_generator: bool,
    ) -> NodeIndex {
        let parameters = self.parse_parameter_list(is_async, is_generator);
        let (set, clear) = function_context(is_async, is_generator);
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.with_context(set, clear, |parser| parser.parse_function_block())
        } else {
            self.error_at_current("'{' expected.");
            NodeIndex::NONE
        };

        let node = self.add_node(
            kind,
            start_pos,
            NodeData::Function(FunctionData {
                name,
                parameters,
                body,
                is_async,
                asterisk_token: is_generator,
            }),
        );
        let mut flags = NodeFlags::empty();
        if is_async {
            flags |= NodeFlags::ASYNC;
        }
        if is_generator {
            flags |= NodeFlags::GENERATOR;
        }
        self.arena.add_flags(node, flags);
        node
    }

    pub(crate) fn parse_parameter_list(&mut self, is_async: bool, is_generator: bool) -> NodeList {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let (set, clear) = function_context(is_async, is_generator);
        let parameters = self.with_context(set, clear | CONTEXT_FLAG_DISALLOW_IN, |parser| {
            parser.parse_delimited_list(SyntaxKind::CloseParenToken, |parser| parser.parse_parameter())
        });
        self.parse_expected(SyntaxKind::CloseParenToken);
        parameters
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_binding_name();
        if name.is_none() {
            return NodeIndex::NONE;
        }
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()
        } else {
            NodeIndex::NONE
        };
        let node = self.add_node(
            SyntaxKind::Parameter,
            start_pos,
            NodeData::Parameter(ParameterData {
                name,
                initializer,
                dot_dot_dot_token,
            }),
        );
        if dot_dot_dot_token {
            self.arena.add_flags(node, NodeFlags::REST);
        }
        node
    }

    // =========================================================================
    // Classes and method-like members
    // =========================================================================

    pub(crate) fn parse_class_like(&mut self, kind: SyntaxKind) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.is_identifier() {
            self.parse_binding_identifier()
        } else {
            NodeIndex::NONE
        };
        let heritage = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_left_hand_side_expression()
        } else {
            NodeIndex::NONE
        };

        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) && !self.is_token(SyntaxKind::EndOfFileToken) {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let member_start = self.token_pos();
            let member = self.parse_class_element();
            if member.is_some() {
                members.push(member);
            }
            if self.token_pos() == member_start {
                self.error_at_current("Unexpected token. A class member was expected.");
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);

        self.add_node(
            kind,
            start_pos,
            NodeData::Class(ClassData {
                name,
                heritage,
                members: NodeList::from(members),
            }),
        )
    }

    fn parse_class_element(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut flags = NodeFlags::empty();
        if self.is_contextual("static")
            && self.look_ahead(|parser| {
                parser.next_token();
                !matches!(
                    parser.token(),
                    SyntaxKind::OpenParenToken
                        | SyntaxKind::EqualsToken
                        | SyntaxKind::SemicolonToken
                        | SyntaxKind::CloseBraceToken
                )
            })
        {
            self.next_token();
            flags |= NodeFlags::STATIC;
            // Static initialization block
            if self.is_token(SyntaxKind::OpenBraceToken) {
                let block = self.with_context(0, CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR, |parser| {
                    parser.parse_function_block()
                });
                self.arena.add_flags(block, flags);
                return block;
            }
        }

        let member = match self.try_parse_method_like_member(start_pos) {
            Some(member) => member,
            None => {
                let name = self.parse_property_name();
                if self.is_token(SyntaxKind::OpenParenToken) {
                    let kind = if !flags.contains(NodeFlags::STATIC)
                        && self.arena.identifier_text(name) == Some("constructor")
                    {
                        SyntaxKind::Constructor
                    } else {
                        SyntaxKind::MethodDeclaration
                    };
                    self.parse_function_rest(kind, start_pos, name, false, false)
                } else {
                    let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                        self.with_context(0, CONTEXT_FLAG_ASYNC | CONTEXT_FLAG_GENERATOR, |parser| {
                            parser.parse_assignment_expression_allow_in()
                        })
                    } else {
                        NodeIndex::NONE
                    };
                    self.parse_semicolon();
                    self.add_node(
                        SyntaxKind::PropertyDeclaration,
                        start_pos,
                        NodeData::PropertyDeclaration(PropertyDeclarationData { name, initializer }),
                    )
                }
            }
        };
        self.arena.add_flags(member, flags);
        member
    }

    /// Generator methods, async methods and accessors, shared by object
    /// literals and class bodies. Returns `None` when the member is a plain
    /// property or method.
    pub(crate) fn try_parse_method_like_member(&mut self, start_pos: usize) -> Option<NodeIndex> {
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            let name = self.parse_property_name();
            return Some(self.parse_function_rest(SyntaxKind::MethodDeclaration, start_pos, name, false, true));
        }

        let is_modifier = (self.is_contextual("async") || self.is_contextual("get") || self.is_contextual("set"))
            && self.look_ahead(|parser| {
                parser.next_token();
                !parser.scanner.has_preceding_line_break()
                    && (token_is_identifier_or_keyword(parser.token())
                        || matches!(
                            parser.token(),
                            SyntaxKind::StringLiteral
                                | SyntaxKind::NumericLiteral
                                | SyntaxKind::OpenBracketToken
                                | SyntaxKind::PrivateIdentifier
                                | SyntaxKind::AsteriskToken
                        ))
            });
        if !is_modifier {
            return None;
        }

        let modifier = self.token_value();
        self.next_token();
        let member = match modifier.as_str() {
            "async" => {
                let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
                let name = self.parse_property_name();
                self.parse_function_rest(SyntaxKind::MethodDeclaration, start_pos, name, true, is_generator)
            }
            "get" => {
                let name = self.parse_property_name();
                self.parse_function_rest(SyntaxKind::GetAccessor, start_pos, name, false, false)
            }
            _ => {
                let name = self.parse_property_name();
                self.parse_function_rest(SyntaxKind::SetAccessor, start_pos, name, false, false)
            }
        };
        Some(member)
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn parse_import_declaration(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();

        // import "side-effect";
        if self.is_token(SyntaxKind::StringLiteral) {
            let module_specifier = self.parse_literal_node();
            self.parse_semicolon();
            return self.add_node(
                SyntaxKind::ImportDeclaration,
                start_pos,
                NodeData::ImportDecl(ImportDeclData {
                    import_clause: NodeIndex::NONE,
                    module_specifier,
                }),
            );
        }

        let clause_start = self.token_pos();
        let name = if self.is_identifier() {
            self.parse_binding_identifier()
        } else {
            NodeIndex::NONE
        };
        let named_bindings = if name.is_none() || self.parse_optional(SyntaxKind::CommaToken) {
            match self.token() {
                SyntaxKind::AsteriskToken => self.parse_namespace_import(),
                SyntaxKind::OpenBraceToken => self.parse_named_imports(),
                _ => {
                    self.error_at_current("'{' or '*' expected.");
                    NodeIndex::NONE
                }
            }
        } else {
            NodeIndex::NONE
        };
        let import_clause = self.add_node(
            SyntaxKind::ImportClause,
            clause_start,
            NodeData::ImportClause(ImportClauseData { name, named_bindings }),
        );

        let module_specifier = self.parse_module_specifier();
        self.parse_semicolon();
        self.add_node(
            SyntaxKind::ImportDeclaration,
            start_pos,
            NodeData::ImportDecl(ImportDeclData {
                import_clause,
                module_specifier,
            }),
        )
    }

    fn parse_module_specifier(&mut self) -> NodeIndex {
        if !self.is_contextual("from") {
            self.error_at_current("'from' expected.");
            return NodeIndex::NONE;
        }
        self.next_token();
        if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_literal_node()
        } else {
            self.error_at_current("String literal expected.");
            NodeIndex::NONE
        }
    }

    fn parse_namespace_import(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::AsteriskToken);
        if self.is_contextual("as") {
            self.next_token();
        } else {
            self.error_at_current("'as' expected.");
        }
        let name = self.parse_binding_identifier();
        self.add_node(
            SyntaxKind::NamespaceImport,
            start_pos,
            NodeData::NamespaceImport(NamespaceImportData { name }),
        )
    }

    fn parse_named_imports(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let elements = self.parse_delimited_list(SyntaxKind::CloseBraceToken, |parser| {
            let specifier_start = parser.token_pos();
            let has_alias = parser.look_ahead(|parser| {
                parser.next_token();
                parser.is_contextual("as")
            });
            let (property_name, name) = if has_alias {
                let property_name = parser.parse_module_export_name();
                parser.next_token();
                (property_name, parser.parse_binding_identifier())
            } else {
                (NodeIndex::NONE, parser.parse_binding_identifier())
            };
            parser.add_node(
                SyntaxKind::ImportSpecifier,
                specifier_start,
                NodeData::Specifier(SpecifierData { property_name, name }),
            )
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.add_node(
            SyntaxKind::NamedImports,
            start_pos,
            NodeData::NamedBindings(NamedBindingsData { elements }),
        )
    }

    /// Exported name: any identifier-like word or a string literal.
    fn parse_module_export_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_literal_node()
        } else {
            self.parse_identifier_name()
        }
    }

    fn parse_export_declaration(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();

        if self.parse_optional(SyntaxKind::DefaultKeyword) {
            let declaration_start = self.token_pos();
            let declaration = match self.token() {
                SyntaxKind::FunctionKeyword => Some(self.parse_function_declaration(declaration_start, false)),
                SyntaxKind::ClassKeyword => Some(self.parse_class_like(SyntaxKind::ClassDeclaration)),
                SyntaxKind::Identifier if self.is_async_function_start() => {
                    self.next_token();
                    Some(self.parse_function_declaration(declaration_start, true))
                }
                _ => None,
            };
            if let Some(declaration) = declaration {
                self.arena
                    .add_flags(declaration, NodeFlags::EXPORTED | NodeFlags::DEFAULT_EXPORT);
                return declaration;
            }
            let expression = self.parse_assignment_expression_allow_in();
            self.parse_semicolon();
            return self.add_node(
                SyntaxKind::ExportAssignment,
                start_pos,
                NodeData::Expression(ExpressionData { expression }),
            );
        }

        if self.parse_optional(SyntaxKind::AsteriskToken) {
            // export * as ns from "mod"
            let export_clause = if self.is_contextual("as") {
                self.next_token();
                self.parse_module_export_name()
            } else {
                NodeIndex::NONE
            };
            let module_specifier = self.parse_module_specifier();
            self.parse_semicolon();
            return self.add_node(
                SyntaxKind::ExportDeclaration,
                start_pos,
                NodeData::ExportDecl(ExportDeclData {
                    export_clause,
                    module_specifier,
                }),
            );
        }

        if self.is_token(SyntaxKind::OpenBraceToken) {
            return self.parse_named_exports(start_pos);
        }

        let declaration = self.parse_statement();
        self.arena.add_flags(declaration, NodeFlags::EXPORTED);
        declaration
    }

    /// `export { a, b as c }` or `export { a } from "mod"`. Local names are
    /// references unless the clause re-exports from another module.
    fn parse_named_exports(&mut self, start_pos: usize) -> NodeIndex {
        let is_reexport = self.look_ahead(|parser| {
            let mut depth = 0usize;
            loop {
                match parser.token() {
                    SyntaxKind::OpenBraceToken => depth += 1,
                    SyntaxKind::CloseBraceToken => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            break;
                        }
                    }
                    SyntaxKind::EndOfFileToken => return false,
                    _ => {}
                }
                parser.next_token();
            }
            parser.next_token();
            parser.is_contextual("from")
        });

        let clause_start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let elements = self.parse_delimited_list(SyntaxKind::CloseBraceToken, |parser| {
            let specifier_start = parser.token_pos();
            let local = if is_reexport || !parser.is_identifier() {
                parser.parse_module_export_name()
            } else {
                parser.parse_identifier()
            };
            let (property_name, name) = if parser.is_contextual("as") {
                parser.next_token();
                (local, parser.parse_module_export_name())
            } else {
                (NodeIndex::NONE, local)
            };
            parser.add_node(
                SyntaxKind::ExportSpecifier,
                specifier_start,
                NodeData::Specifier(SpecifierData { property_name, name }),
            )
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        let export_clause = self.add_node(
            SyntaxKind::NamedExports,
            clause_start,
            NodeData::NamedBindings(NamedBindingsData { elements }),
        );

        let module_specifier = if is_reexport {
            self.parse_module_specifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon();
        self.add_node(
            SyntaxKind::ExportDeclaration,
            start_pos,
            NodeData::ExportDecl(ExportDeclData {
                export_clause,
                module_specifier,
            }),
        )
    }
}

/// Context flags to set and clear for the parameters and body of a function.
fn function_context(is_async: bool, is_generator: bool) -> (u8, u8) {
    let mut set = 0;
    let mut clear = 0;
    if is_async {
        set |= CONTEXT_FLAG_ASYNC;
    } else {
        clear |= CONTEXT_FLAG_ASYNC;
    }
    if is_generator {
        set |= CONTEXT_FLAG_GENERATOR;
    } else {
        clear |= CONTEXT_FLAG_GENERATOR;
    }
    (set, clear)
}
