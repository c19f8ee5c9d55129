//! Parser state - expression parsing methods

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::node_flags::NodeFlags;
use super::state::{CONTEXT_FLAG_ASYNC, CONTEXT_FLAG_DISALLOW_IN, CONTEXT_FLAG_GENERATOR, ParserState};
use jsem_scanner::{SyntaxKind, token_is_assignment_operator, token_is_identifier_or_keyword};

/// Binary operator precedence; 0 for tokens that are not binary operators.
fn binary_operator_precedence(kind: SyntaxKind) -> u8 {
    match kind {
        SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken => 1,
        SyntaxKind::AmpersandAmpersandToken => 2,
        SyntaxKind::BarToken => 3,
        SyntaxKind::CaretToken => 4,
        SyntaxKind::AmpersandToken => 5,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => 6,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InstanceOfKeyword
        | SyntaxKind::InKeyword => 7,
        SyntaxKind::LessThanLessThanToken
        | SyntaxKind::GreaterThanGreaterThanToken
        | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => 8,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => 9,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 10,
        SyntaxKind::AsteriskAsteriskToken => 11,
        _ => 0,
    }
}

impl ParserState {
    // =========================================================================
    // Parse Methods - Expressions
    // =========================================================================

    /// Parse an expression (including comma operator)
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut left = self.parse_assignment_expression();

        while self.is_token(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression();
            left = self.add_node(
                SyntaxKind::BinaryExpression,
                start_pos,
                NodeData::Binary(BinaryExprData {
                    left,
                    operator_token: SyntaxKind::CommaToken,
                    right,
                }),
            );
        }

        left
    }

    /// Parse an expression with `in` allowed, whatever the surrounding context.
    pub(crate) fn parse_expression_allow_in(&mut self) -> NodeIndex {
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |parser| parser.parse_expression())
    }

    pub(crate) fn parse_assignment_expression_allow_in(&mut self) -> NodeIndex {
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |parser| {
            parser.parse_assignment_expression()
        })
    }

    /// Parse assignment expression
    pub(crate) fn parse_assignment_expression(&mut self) -> NodeIndex {
        if !self.enter_recursion() {
            return self.create_missing_expression();
        }
        let result = self.parse_assignment_expression_worker();
        self.exit_recursion();
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> NodeIndex {
        if self.in_context(CONTEXT_FLAG_GENERATOR) && self.is_contextual("yield") {
            return self.parse_yield_expression();
        }

        if let Some(is_async) = self.look_ahead_arrow_function() {
            return self.parse_arrow_function(is_async);
        }

        let start_pos = self.token_pos();
        let left = self.parse_conditional_expression();

        if token_is_assignment_operator(self.token()) {
            let operator_token = self.token();
            self.next_token();
            let right = self.parse_assignment_expression();
            return self.add_node(
                SyntaxKind::BinaryExpression,
                start_pos,
                NodeData::Binary(BinaryExprData {
                    left,
                    operator_token,
                    right,
                }),
            );
        }

        left
    }

    fn parse_yield_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let mut flags = NodeFlags::empty();
        let mut expression = NodeIndex::NONE;
        if !self.scanner.has_preceding_line_break() {
            if self.parse_optional(SyntaxKind::AsteriskToken) {
                flags |= NodeFlags::GENERATOR;
                expression = self.parse_assignment_expression();
            } else if self.is_start_of_expression() {
                expression = self.parse_assignment_expression();
            }
        }
        let node = self.add_node(
            SyntaxKind::YieldExpression,
            start_pos,
            NodeData::Expression(ExpressionData { expression }),
        );
        self.arena.add_flags(node, flags);
        node
    }

    pub(crate) fn is_start_of_expression(&self) -> bool {
        !matches!(
            self.token(),
            SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::ColonToken
                | SyntaxKind::EndOfFileToken
        ) && !token_is_assignment_operator(self.token())
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    /// Decide whether an arrow function starts here. Returns whether it is
    /// async, or `None` for anything else.
    fn look_ahead_arrow_function(&mut self) -> Option<bool> {
        let is_async_prefix = self.is_contextual("async");
        if !is_async_prefix && !self.is_identifier() && !self.is_token(SyntaxKind::OpenParenToken) {
            return None;
        }

        self.look_ahead(|parser| {
            let mut is_async = false;
            if is_async_prefix {
                parser.next_token();
                // `async => x` takes a parameter named async
                if parser.is_token(SyntaxKind::EqualsGreaterThanToken) {
                    return (!parser.scanner.has_preceding_line_break()).then_some(false);
                }
                if parser.scanner.has_preceding_line_break() {
                    return None;
                }
                if !parser.is_identifier() && !parser.is_token(SyntaxKind::OpenParenToken) {
                    return None;
                }
                is_async = true;
            }

            if parser.is_token(SyntaxKind::OpenParenToken) {
                let mut depth = 0usize;
                loop {
                    match parser.token() {
                        SyntaxKind::OpenParenToken => depth += 1,
                        SyntaxKind::CloseParenToken => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        SyntaxKind::EndOfFileToken => return None,
                        _ => {}
                    }
                    parser.next_token();
                }
            }
            parser.next_token();

            (parser.is_token(SyntaxKind::EqualsGreaterThanToken)
                && !parser.scanner.has_preceding_line_break())
            .then_some(is_async)
        })
    }

    /// Parse arrow function expression: (params) => body or x => body
    fn parse_arrow_function(&mut self, is_async: bool) -> NodeIndex {
        let start_pos = self.token_pos();
        if is_async {
            self.next_token();
        }

        let parameters = if self.is_token(SyntaxKind::OpenParenToken) {
            self.parse_parameter_list(is_async, false)
        } else {
            let param_start = self.token_pos();
            let name = self.parse_binding_identifier();
            let parameter = self.add_node(
                SyntaxKind::Parameter,
                param_start,
                NodeData::Parameter(ParameterData {
                    name,
                    initializer: NodeIndex::NONE,
                    dot_dot_dot_token: false,
                }),
            );
            NodeList::from(vec![parameter])
        };

        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);

        let body_context = if is_async { CONTEXT_FLAG_ASYNC } else { 0 };
        let body = self.with_context(
            body_context,
            CONTEXT_FLAG_GENERATOR | if is_async { 0 } else { CONTEXT_FLAG_ASYNC },
            |parser| {
                if parser.is_token(SyntaxKind::OpenBraceToken) {
                    parser.parse_function_block()
                } else {
                    parser.parse_assignment_expression()
                }
            },
        );

        let node = self.add_node(
            SyntaxKind::ArrowFunction,
            start_pos,
            NodeData::Function(FunctionData {
                name: NodeIndex::NONE,
                parameters,
                body,
                is_async,
                asterisk_token: false,
            }),
        );
        if is_async {
            self.arena.add_flags(node, NodeFlags::ASYNC);
        }
        node
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn parse_conditional_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let condition = self.parse_binary_expression(0);
        if !self.parse_optional(SyntaxKind::QuestionToken) {
            return condition;
        }

        let when_true = self.parse_assignment_expression_allow_in();
        self.parse_expected(SyntaxKind::ColonToken);
        let when_false = self.parse_assignment_expression();
        self.add_node(
            SyntaxKind::ConditionalExpression,
            start_pos,
            NodeData::Conditional(ConditionalExprData {
                condition,
                when_true,
                when_false,
            }),
        )
    }

    /// Precedence climbing over binary operators. `**` is right associative.
    fn parse_binary_expression(&mut self, precedence: u8) -> NodeIndex {
        let start_pos = self.token_pos();
        let mut left = self.parse_unary_expression();

        loop {
            let op = self.token();
            let op_precedence = if op == SyntaxKind::InKeyword && self.in_context(CONTEXT_FLAG_DISALLOW_IN) {
                0
            } else {
                binary_operator_precedence(op)
            };
            let consume = if op == SyntaxKind::AsteriskAsteriskToken {
                op_precedence >= precedence && op_precedence > 0
            } else {
                op_precedence > precedence
            };
            if !consume {
                break;
            }

            self.next_token();
            let right = self.parse_binary_expression(op_precedence);
            left = self.add_node(
                SyntaxKind::BinaryExpression,
                start_pos,
                NodeData::Binary(BinaryExprData {
                    left,
                    operator_token: op,
                    right,
                }),
            );
        }

        left
    }

    pub(crate) fn parse_unary_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::TildeToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                let operator = self.token();
                self.next_token();
                let operand = self.parse_unary_expression();
                self.add_node(
                    SyntaxKind::PrefixUnaryExpression,
                    start_pos,
                    NodeData::Unary(UnaryExprData { operator, operand }),
                )
            }
            SyntaxKind::TypeOfKeyword => self.parse_keyword_unary(SyntaxKind::TypeOfExpression),
            SyntaxKind::VoidKeyword => self.parse_keyword_unary(SyntaxKind::VoidExpression),
            SyntaxKind::DeleteKeyword => self.parse_keyword_unary(SyntaxKind::DeleteExpression),
            SyntaxKind::Identifier if self.in_context(CONTEXT_FLAG_ASYNC) && self.is_contextual("await") => {
                self.parse_keyword_unary(SyntaxKind::AwaitExpression)
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_keyword_unary(&mut self, kind: SyntaxKind) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();
        let expression = self.parse_unary_expression();
        self.add_node(kind, start_pos, NodeData::Expression(ExpressionData { expression }))
    }

    fn parse_postfix_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let operand = self.parse_left_hand_side_expression();
        if (self.is_token(SyntaxKind::PlusPlusToken) || self.is_token(SyntaxKind::MinusMinusToken))
            && !self.scanner.has_preceding_line_break()
        {
            let operator = self.token();
            self.next_token();
            return self.add_node(
                SyntaxKind::PostfixUnaryExpression,
                start_pos,
                NodeData::Unary(UnaryExprData { operator, operand }),
            );
        }
        operand
    }

    // =========================================================================
    // Member, call and new expressions
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = self.parse_member_expression();
        self.parse_call_expression_rest(start_pos, expression)
    }

    /// Primary expression followed by property/element accesses and tagged
    /// templates, but no calls (the callee of `new`).
    fn parse_member_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let expression = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()
        } else {
            self.parse_primary_expression()
        };
        self.parse_member_expression_rest(start_pos, expression, false)
    }

    fn parse_new_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.next_token();

        // new.target
        if self.parse_optional(SyntaxKind::DotToken) {
            self.skip_meta_property_name();
            return self.add_node(SyntaxKind::NewKeyword, start_pos, NodeData::None);
        }

        let expression = self.parse_member_expression();
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_argument_list())
        } else {
            None
        };
        self.add_node(
            SyntaxKind::NewExpression,
            start_pos,
            NodeData::Call(CallExprData { expression, arguments }),
        )
    }

    fn parse_member_expression_rest(
        &mut self,
        start_pos: usize,
        mut expression: NodeIndex,
        allow_calls: bool,
    ) -> NodeIndex {
        loop {
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    expression = self.parse_property_access(start_pos, expression, false);
                }
                SyntaxKind::QuestionDotToken if allow_calls => {
                    self.next_token();
                    expression = match self.token() {
                        SyntaxKind::OpenParenToken => {
                            let arguments = self.parse_argument_list();
                            self.add_node(
                                SyntaxKind::CallExpression,
                                start_pos,
                                NodeData::Call(CallExprData {
                                    expression,
                                    arguments: Some(arguments),
                                }),
                            )
                        }
                        SyntaxKind::OpenBracketToken => self.parse_element_access(start_pos, expression, true),
                        _ => self.parse_property_access(start_pos, expression, true),
                    };
                    self.arena.add_flags(expression, NodeFlags::OPTIONAL_CHAIN);
                }
                SyntaxKind::OpenBracketToken => {
                    expression = self.parse_element_access(start_pos, expression, false);
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    let template = self.parse_template_literal();
                    expression = self.add_node(
                        SyntaxKind::TaggedTemplateExpression,
                        start_pos,
                        NodeData::TaggedTemplate(TaggedTemplateData {
                            tag: expression,
                            template,
                        }),
                    );
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    let arguments = self.parse_argument_list();
                    expression = self.add_node(
                        SyntaxKind::CallExpression,
                        start_pos,
                        NodeData::Call(CallExprData {
                            expression,
                            arguments: Some(arguments),
                        }),
                    );
                }
                _ => return expression,
            }
        }
    }

    fn parse_call_expression_rest(&mut self, start_pos: usize, expression: NodeIndex) -> NodeIndex {
        self.parse_member_expression_rest(start_pos, expression, true)
    }

    fn parse_property_access(&mut self, start_pos: usize, expression: NodeIndex, question_dot: bool) -> NodeIndex {
        let name_or_argument = if self.is_token(SyntaxKind::PrivateIdentifier) {
            self.parse_private_identifier()
        } else {
            self.parse_identifier_name()
        };
        self.add_node(
            SyntaxKind::PropertyAccessExpression,
            start_pos,
            NodeData::Access(AccessExprData {
                expression,
                name_or_argument,
                question_dot_token: question_dot,
            }),
        )
    }

    fn parse_element_access(&mut self, start_pos: usize, expression: NodeIndex, question_dot: bool) -> NodeIndex {
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let name_or_argument = self.parse_expression_allow_in();
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.add_node(
            SyntaxKind::ElementAccessExpression,
            start_pos,
            NodeData::Access(AccessExprData {
                expression,
                name_or_argument,
                question_dot_token: question_dot,
            }),
        )
    }

    pub(crate) fn parse_argument_list(&mut self) -> NodeList {
        self.parse_expected(SyntaxKind::OpenParenToken);
        let arguments = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |parser| {
            parser.parse_delimited_list(SyntaxKind::CloseParenToken, |parser| {
                parser.parse_spread_or_assignment_expression()
            })
        });
        self.parse_expected(SyntaxKind::CloseParenToken);
        arguments
    }

    fn parse_spread_or_assignment_expression(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            let start_pos = self.token_pos();
            self.next_token();
            let expression = self.parse_assignment_expression();
            return self.add_node(
                SyntaxKind::SpreadElement,
                start_pos,
                NodeData::Expression(ExpressionData { expression }),
            );
        }
        self.parse_assignment_expression()
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::ThisKeyword
            | SyntaxKind::SuperKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => {
                let kind = self.token();
                self.next_token();
                self.add_node(kind, start_pos, NodeData::None)
            }
            SyntaxKind::ImportKeyword => {
                // import(...) and import.meta
                self.next_token();
                if self.parse_optional(SyntaxKind::DotToken) {
                    self.skip_meta_property_name();
                }
                self.add_node(SyntaxKind::ImportKeyword, start_pos, NodeData::None)
            }
            SyntaxKind::NumericLiteral | SyntaxKind::StringLiteral | SyntaxKind::NoSubstitutionTemplateLiteral => {
                self.parse_literal_node()
            }
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.current_token = self.scanner.re_scan_slash_token();
                self.parse_literal_node()
            }
            SyntaxKind::TemplateHead => self.parse_template_expression(),
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(start_pos, false),
            SyntaxKind::ClassKeyword => self.parse_class_like(SyntaxKind::ClassExpression),
            SyntaxKind::Identifier
                if self.is_contextual("async")
                    && self.look_ahead(|parser| {
                        parser.next_token();
                        parser.is_token(SyntaxKind::FunctionKeyword) && !parser.scanner.has_preceding_line_break()
                    }) =>
            {
                self.next_token();
                self.parse_function_expression(start_pos, true)
            }
            _ if self.is_identifier() => self.parse_identifier(),
            _ => {
                self.error_expression_expected();
                self.create_missing_expression()
            }
        }
    }

    fn parse_function_expression(&mut self, start_pos: usize, is_async: bool) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.is_identifier() {
            self.parse_binding_identifier()
        } else {
            NodeIndex::NONE
        };
        self.parse_function_rest(SyntaxKind::FunctionExpression, start_pos, name, is_async, is_generator)
    }

    /// Current token as a `Literal`-data node of the same kind.
    pub(crate) fn parse_literal_node(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let kind = self.token();
        let text = self.token_value();
        if self.scanner.is_unterminated() {
            self.error_at_current("Unterminated literal.");
        }
        self.next_token();
        self.add_node(kind, start_pos, NodeData::Literal(LiteralData { text }))
    }

    fn parse_parenthesized_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression_allow_in();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.add_node(
            SyntaxKind::ParenthesizedExpression,
            start_pos,
            NodeData::Expression(ExpressionData { expression }),
        )
    }

    fn parse_array_literal(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |parser| {
            while !parser.is_token(SyntaxKind::CloseBracketToken) && !parser.is_token(SyntaxKind::EndOfFileToken) {
                if parser.is_token(SyntaxKind::CommaToken) {
                    let hole = parser.token_pos();
                    elements.push(parser.arena.add(
                        SyntaxKind::OmittedExpression,
                        hole,
                        hole,
                        NodeFlags::empty(),
                        NodeData::None,
                    ));
                    parser.next_token();
                    continue;
                }
                let start = parser.token_pos();
                elements.push(parser.parse_spread_or_assignment_expression());
                if !parser.parse_optional(SyntaxKind::CommaToken) && !parser.is_token(SyntaxKind::CloseBracketToken) {
                    parser.parse_expected(SyntaxKind::CommaToken);
                    if parser.token_pos() == start {
                        parser.next_token();
                    }
                }
            }
        });
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.add_node(
            SyntaxKind::ArrayLiteralExpression,
            start_pos,
            NodeData::LiteralExpr(LiteralExprData {
                elements: NodeList::from(elements),
            }),
        )
    }

    fn parse_object_literal(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let elements = self.with_context(0, CONTEXT_FLAG_DISALLOW_IN, |parser| {
            parser.parse_delimited_list(SyntaxKind::CloseBraceToken, |parser| {
                parser.parse_object_literal_element()
            })
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.add_node(
            SyntaxKind::ObjectLiteralExpression,
            start_pos,
            NodeData::LiteralExpr(LiteralExprData { elements }),
        )
    }

    fn parse_object_literal_element(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();

        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let expression = self.parse_assignment_expression();
            return self.add_node(
                SyntaxKind::SpreadAssignment,
                start_pos,
                NodeData::Expression(ExpressionData { expression }),
            );
        }

        if let Some(member) = self.try_parse_method_like_member(start_pos) {
            return member;
        }

        // Shorthand `{ a }` or `{ a = 1 }` (the latter only in assignment patterns)
        if self.is_identifier()
            && self.look_ahead(|parser| {
                parser.next_token();
                matches!(
                    parser.token(),
                    SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken | SyntaxKind::EqualsToken
                )
            })
        {
            let name = self.parse_identifier();
            let object_assignment_initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()
            } else {
                NodeIndex::NONE
            };
            return self.add_node(
                SyntaxKind::ShorthandPropertyAssignment,
                start_pos,
                NodeData::ShorthandProperty(ShorthandPropertyData {
                    name,
                    object_assignment_initializer,
                }),
            );
        }

        let name = self.parse_property_name();
        if self.is_token(SyntaxKind::OpenParenToken) {
            return self.parse_function_rest(SyntaxKind::MethodDeclaration, start_pos, name, false, false);
        }
        self.parse_expected(SyntaxKind::ColonToken);
        let initializer = self.parse_assignment_expression();
        self.add_node(
            SyntaxKind::PropertyAssignment,
            start_pos,
            NodeData::PropertyAssignment(PropertyAssignmentData { name, initializer }),
        )
    }

    /// Property name of an object member or class element.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => self.parse_literal_node(),
            SyntaxKind::PrivateIdentifier => self.parse_private_identifier(),
            SyntaxKind::OpenBracketToken => {
                self.next_token();
                let expression = self.parse_assignment_expression_allow_in();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                self.add_node(
                    SyntaxKind::ComputedPropertyName,
                    start_pos,
                    NodeData::Expression(ExpressionData { expression }),
                )
            }
            _ => self.parse_identifier_name(),
        }
    }

    // =========================================================================
    // Templates
    // =========================================================================

    fn parse_template_literal(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::TemplateHead) {
            self.parse_template_expression()
        } else {
            self.parse_literal_node()
        }
    }

    fn parse_template_expression(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let head = self.parse_literal_node();
        let mut template_spans = Vec::new();

        loop {
            let span_start = self.token_pos();
            let expression = self.parse_expression_allow_in();
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                self.error_at_current("'}' expected.");
                break;
            }
            self.current_token = self.scanner.re_scan_template_token();
            let is_tail = self.is_token(SyntaxKind::TemplateTail);
            let literal = self.parse_literal_node();
            template_spans.push(self.add_node(
                SyntaxKind::TemplateSpan,
                span_start,
                NodeData::TemplateSpan(TemplateSpanData { expression, literal }),
            ));
            if is_tail {
                break;
            }
        }

        self.add_node(
            SyntaxKind::TemplateExpression,
            start_pos,
            NodeData::Template(TemplateExprData {
                head,
                template_spans: NodeList::from(template_spans),
            }),
        )
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Identifier in reference position.
    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        self.parse_identifier_with_kind(SyntaxKind::Identifier)
    }

    /// Identifier that declares a name.
    pub(crate) fn parse_binding_identifier(&mut self) -> NodeIndex {
        self.parse_identifier_with_kind(SyntaxKind::BindingIdentifier)
    }

    fn parse_identifier_with_kind(&mut self, kind: SyntaxKind) -> NodeIndex {
        if !self.is_identifier() {
            self.error_at_current("Identifier expected.");
            return NodeIndex::NONE;
        }
        let start_pos = self.token_pos();
        let escaped_text = self.token_value();
        self.next_token();
        self.add_node(kind, start_pos, NodeData::Identifier(IdentifierData { escaped_text }))
    }

    /// Property name after `.`; reserved words are allowed.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if !token_is_identifier_or_keyword(self.token()) {
            self.error_at_current("Identifier expected.");
            return NodeIndex::NONE;
        }
        let start_pos = self.token_pos();
        let escaped_text = self.scanner.token_text().to_string();
        self.next_token();
        self.add_node(
            SyntaxKind::IdentifierName,
            start_pos,
            NodeData::Identifier(IdentifierData { escaped_text }),
        )
    }

    /// `target` of `new.target` and `meta` of `import.meta`; folded into the
    /// keyword node.
    fn skip_meta_property_name(&mut self) {
        if token_is_identifier_or_keyword(self.token()) {
            self.next_token();
        } else {
            self.error_at_current("Identifier expected.");
        }
    }

    fn parse_private_identifier(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        let escaped_text = self.scanner.token_text().to_string();
        self.next_token();
        self.add_node(
            SyntaxKind::PrivateIdentifier,
            start_pos,
            NodeData::Identifier(IdentifierData { escaped_text }),
        )
    }

    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// Identifier or destructuring pattern in a declaration.
    pub(crate) fn parse_binding_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_object_binding_pattern(),
            SyntaxKind::OpenBracketToken => self.parse_array_binding_pattern(),
            _ => self.parse_binding_identifier(),
        }
    }

    fn parse_object_binding_pattern(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let elements = self.parse_delimited_list(SyntaxKind::CloseBraceToken, |parser| {
            let element_start = parser.token_pos();
            let dot_dot_dot_token = parser.parse_optional(SyntaxKind::DotDotDotToken);
            let is_keyed = !dot_dot_dot_token
                && (!parser.is_identifier()
                    || parser.look_ahead(|parser| {
                        parser.next_token();
                        parser.is_token(SyntaxKind::ColonToken)
                    }));
            let (property_name, name) = if is_keyed {
                let property_name = parser.parse_property_name();
                parser.parse_expected(SyntaxKind::ColonToken);
                (property_name, parser.parse_binding_name())
            } else {
                (NodeIndex::NONE, parser.parse_binding_identifier())
            };
            parser.parse_binding_element_rest(element_start, property_name, name, dot_dot_dot_token)
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.add_node(
            SyntaxKind::ObjectBindingPattern,
            start_pos,
            NodeData::BindingPattern(BindingPatternData { elements }),
        )
    }

    fn parse_array_binding_pattern(&mut self) -> NodeIndex {
        let start_pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let element_start = self.token_pos();
            if self.is_token(SyntaxKind::CommaToken) {
                elements.push(self.arena.add(
                    SyntaxKind::OmittedExpression,
                    element_start,
                    element_start,
                    NodeFlags::empty(),
                    NodeData::None,
                ));
                self.next_token();
                continue;
            }
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name();
            elements.push(self.parse_binding_element_rest(element_start, NodeIndex::NONE, name, dot_dot_dot_token));
            if !self.parse_optional(SyntaxKind::CommaToken) && !self.is_token(SyntaxKind::CloseBracketToken) {
                self.parse_expected(SyntaxKind::CommaToken);
                if self.token_pos() == element_start {
                    self.next_token();
                }
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.add_node(
            SyntaxKind::ArrayBindingPattern,
            start_pos,
            NodeData::BindingPattern(BindingPatternData {
                elements: NodeList::from(elements),
            }),
        )
    }

    fn parse_binding_element_rest(
        &mut self,
        start_pos: usize,
        property_name: NodeIndex,
        name: NodeIndex,
        dot_dot_dot_token: bool,
    ) -> NodeIndex {
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression_allow_in()
        } else {
            NodeIndex::NONE
        };
        let node = self.add_node(
            SyntaxKind::BindingElement,
            start_pos,
            NodeData::BindingElement(BindingElementData {
                property_name,
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

    /// Add a node spanning from `start_pos` to the end of the last consumed
    /// token.
    pub(crate) fn add_node(&mut self, kind: SyntaxKind, start_pos: usize, data: NodeData) -> NodeIndex {
        let end = self.prev_token_end.max(start_pos);
        self.arena.add(kind, start_pos, end, NodeFlags::empty(), data)
    }
}
