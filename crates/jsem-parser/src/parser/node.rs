//! Node storage: `Node`, typed node data and the `NodeArena`.
//!
//! Every node carries a [`SyntaxKind`] tag, its byte range, its parent and a
//! typed payload. Typed accessors (`get_function`, `get_binary_expr`, ...)
//! return `None` when the node has a different shape, so callers can chain
//! them with `let ... else` without matching on the payload enum.

use super::base::{NodeIndex, NodeList};
use super::node_flags::NodeFlags;
use jsem_common::{LineMap, TokenLocation};
use jsem_scanner::SyntaxKind;
use serde::Serialize;

/// Identifier text (`Identifier`, `BindingIdentifier`, `IdentifierName`,
/// `PrivateIdentifier`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// Literal text: cooked string contents, numeric text, raw regex or
/// template chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LiteralData {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: NodeList,
}

/// `Block` statements, or the clauses of a `CaseBlock`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockData {
    pub statements: NodeList,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VariableStatementData {
    pub declaration_list: NodeIndex,
}

/// `VariableDeclarationList`; `let`/`const` are recorded in the node flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VariableData {
    pub declarations: NodeList,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VariableDeclarationData {
    /// `BindingIdentifier` or a binding pattern
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// Shared by every function-like node. For methods and accessors `name` is
/// the property name node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub parameters: NodeList,
    /// `Block`, or an expression for concise arrow bodies
    pub body: NodeIndex,
    pub is_async: bool,
    pub asterisk_token: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParameterData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
    pub dot_dot_dot_token: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassData {
    pub name: NodeIndex,
    /// Expression after `extends`
    pub heritage: NodeIndex,
    pub members: NodeList,
}

/// Class field: `name = initializer;`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropertyDeclarationData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BindingPatternData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BindingElementData {
    /// Key in an object pattern (`{ key: name }`), NONE otherwise
    pub property_name: NodeIndex,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
    pub dot_dot_dot_token: bool,
}

/// Nodes wrapping a single expression: expression/return/throw statements,
/// parenthesized, spread, await, yield, typeof/void/delete, computed property
/// names and `export default`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpressionData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnaryExprData {
    pub operator: SyntaxKind,
    pub operand: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: SyntaxKind,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

/// `CallExpression` and `NewExpression`. `arguments` is `None` for `new C`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub arguments: Option<NodeList>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaggedTemplateData {
    pub tag: NodeIndex,
    pub template: NodeIndex,
}

/// `PropertyAccessExpression` (`name_or_argument` is an `IdentifierName` or
/// `PrivateIdentifier`) and `ElementAccessExpression`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    pub question_dot_token: bool,
}

/// Array and object literal elements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LiteralExprData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// `{ name }`, or `{ name = default }` inside an assignment pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShorthandPropertyData {
    /// `Identifier` reference
    pub name: NodeIndex,
    pub object_assignment_initializer: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateExprData {
    pub head: NodeIndex,
    pub template_spans: NodeList,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateSpanData {
    pub expression: NodeIndex,
    pub literal: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IfStatementData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

/// `for (;;)`, `while` and `do-while`; unused parts are NONE.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoopData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForInOfData {
    /// `VariableDeclarationList` or an assignment target expression
    pub initializer: NodeIndex,
    pub expression: NodeIndex,
    pub statement: NodeIndex,
    pub await_modifier: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JumpData {
    pub label: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabeledData {
    pub label: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TryData {
    pub try_block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatchClauseData {
    /// Binding name or pattern; NONE for `catch {}`
    pub variable_declaration: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SwitchData {
    pub expression: NodeIndex,
    pub case_block: NodeIndex,
}

/// `case expr:` and `default:` (expression NONE).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CaseClauseData {
    pub expression: NodeIndex,
    pub statements: NodeList,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WithData {
    pub expression: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportDeclData {
    pub import_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportClauseData {
    /// Default import binding
    pub name: NodeIndex,
    /// `NamespaceImport` or `NamedImports`
    pub named_bindings: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamespaceImportData {
    pub name: NodeIndex,
}

/// `NamedImports` and `NamedExports`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamedBindingsData {
    pub elements: NodeList,
}

/// `ImportSpecifier` and `ExportSpecifier`: `property_name as name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportDeclData {
    /// `NamedExports`, the exported name of `export * as ns`, or NONE
    pub export_clause: NodeIndex,
    pub module_specifier: NodeIndex,
}

/// Typed payload of a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum NodeData {
    None,
    Identifier(IdentifierData),
    Literal(LiteralData),
    SourceFile(SourceFileData),
    Block(BlockData),
    VariableStatement(VariableStatementData),
    Variable(VariableData),
    VariableDeclaration(VariableDeclarationData),
    Function(FunctionData),
    Parameter(ParameterData),
    Class(ClassData),
    PropertyDeclaration(PropertyDeclarationData),
    BindingPattern(BindingPatternData),
    BindingElement(BindingElementData),
    Expression(ExpressionData),
    Unary(UnaryExprData),
    Binary(BinaryExprData),
    Conditional(ConditionalExprData),
    Call(CallExprData),
    TaggedTemplate(TaggedTemplateData),
    Access(AccessExprData),
    LiteralExpr(LiteralExprData),
    PropertyAssignment(PropertyAssignmentData),
    ShorthandProperty(ShorthandPropertyData),
    Template(TemplateExprData),
    TemplateSpan(TemplateSpanData),
    If(IfStatementData),
    Loop(LoopData),
    ForInOf(ForInOfData),
    Jump(JumpData),
    Labeled(LabeledData),
    Try(TryData),
    CatchClause(CatchClauseData),
    Switch(SwitchData),
    CaseClause(CaseClauseData),
    With(WithData),
    ImportDecl(ImportDeclData),
    ImportClause(ImportClauseData),
    NamespaceImport(NamespaceImportData),
    NamedBindings(NamedBindingsData),
    Specifier(SpecifierData),
    ExportDecl(ExportDeclData),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: SyntaxKind,
    pub flags: NodeFlags,
    /// Byte offset of the first character (after trivia)
    pub pos: u32,
    /// Byte offset just past the last character
    pub end: u32,
    pub parent: NodeIndex,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub fn is(&self, kind: SyntaxKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn has_flag(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }
}

/// Arena-based storage for the syntax tree of one file.
#[derive(Debug, Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    source_text: String,
    line_map: LineMap,
}

macro_rules! data_accessors {
    ($($(#[$doc:meta])* $name:ident => $variant:ident($ty:ty);)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name<'a>(&self, node: &'a Node) -> Option<&'a $ty> {
                match &node.data {
                    NodeData::$variant(data) => Some(data),
                    _ => None,
                }
            }
        )*
    };
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub(crate) fn set_source_text(&mut self, text: String) {
        self.line_map = LineMap::build(&text);
        self.source_text = text;
    }

    /// Add a node and link its children back to it.
    pub(crate) fn add(
        &mut self,
        kind: SyntaxKind,
        pos: usize,
        end: usize,
        flags: NodeFlags,
        data: NodeData,
    ) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            flags,
            pos: pos as u32,
            end: end as u32,
            parent: NodeIndex::NONE,
            data,
        });
        for child in self.get_children(index) {
            if let Some(child_node) = self.nodes.get_mut(child.0 as usize) {
                child_node.parent = index;
            }
        }
        index
    }

    pub(crate) fn add_flags(&mut self, index: NodeIndex, flags: NodeFlags) {
        if let Some(node) = self.nodes.get_mut(index.0 as usize) {
            node.flags |= flags;
        }
    }

    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<SyntaxKind> {
        self.get(index).map(|node| node.kind)
    }

    #[inline]
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map_or(NodeIndex::NONE, |node| node.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    /// Source text covered by a node.
    pub fn node_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.source_text.get(node.pos as usize..node.end as usize)
    }

    /// Line/column span and text of a node.
    pub fn token_at(&self, index: NodeIndex) -> Option<TokenLocation> {
        let node = self.get(index)?;
        Some(TokenLocation {
            start: self.line_map.position_of(node.pos),
            end: self.line_map.position_of(node.end),
            text: self.node_text(index)?.to_string(),
        })
    }

    /// Text of an identifier-like node.
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        let node = self.get(index)?;
        self.get_identifier(node).map(|ident| ident.escaped_text.as_str())
    }

    /// True when `index` is a plain identifier reference named `name`.
    pub fn is_identifier_named(&self, index: NodeIndex, name: &str) -> bool {
        self.kind(index) == Some(SyntaxKind::Identifier) && self.identifier_text(index) == Some(name)
    }

    /// Skip any number of parentheses around an expression.
    pub fn skip_parentheses(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(node) = self.get(index)
            && node.kind == SyntaxKind::ParenthesizedExpression
            && let Some(inner) = self.get_expression(node)
        {
            index = inner.expression;
        }
        index
    }

    data_accessors! {
        get_identifier => Identifier(IdentifierData);
        get_literal => Literal(LiteralData);
        get_source_file => SourceFile(SourceFileData);
        /// Block statements or case-block clauses.
        get_block => Block(BlockData);
        get_variable_statement => VariableStatement(VariableStatementData);
        get_variable => Variable(VariableData);
        get_variable_declaration => VariableDeclaration(VariableDeclarationData);
        /// Any function-like node: declarations, expressions, arrows, methods,
        /// accessors and constructors.
        get_function => Function(FunctionData);
        get_parameter => Parameter(ParameterData);
        get_class => Class(ClassData);
        get_property_declaration => PropertyDeclaration(PropertyDeclarationData);
        get_binding_pattern => BindingPattern(BindingPatternData);
        get_binding_element => BindingElement(BindingElementData);
        get_expression => Expression(ExpressionData);
        get_unary_expr => Unary(UnaryExprData);
        get_binary_expr => Binary(BinaryExprData);
        get_conditional_expr => Conditional(ConditionalExprData);
        /// Call or new expression.
        get_call_expr => Call(CallExprData);
        get_tagged_template => TaggedTemplate(TaggedTemplateData);
        /// Property or element access.
        get_access_expr => Access(AccessExprData);
        /// Array or object literal.
        get_literal_expr => LiteralExpr(LiteralExprData);
        get_property_assignment => PropertyAssignment(PropertyAssignmentData);
        get_shorthand_property => ShorthandProperty(ShorthandPropertyData);
        get_template_expr => Template(TemplateExprData);
        get_template_span => TemplateSpan(TemplateSpanData);
        get_if_statement => If(IfStatementData);
        get_loop => Loop(LoopData);
        get_for_in_of => ForInOf(ForInOfData);
        get_jump => Jump(JumpData);
        get_labeled_statement => Labeled(LabeledData);
        get_try => Try(TryData);
        get_catch_clause => CatchClause(CatchClauseData);
        get_switch => Switch(SwitchData);
        get_case_clause => CaseClause(CaseClauseData);
        get_with => With(WithData);
        get_import_decl => ImportDecl(ImportDeclData);
        get_import_clause => ImportClause(ImportClauseData);
        get_namespace_import => NamespaceImport(NamespaceImportData);
        get_named_bindings => NamedBindings(NamedBindingsData);
        get_specifier => Specifier(SpecifierData);
        get_export_decl => ExportDecl(ExportDeclData);
    }

    /// Function data for the node at `index`.
    pub fn get_function_at(&self, index: NodeIndex) -> Option<&FunctionData> {
        self.get(index).and_then(|node| self.get_function(node))
    }

    pub fn get_call_expr_at(&self, index: NodeIndex) -> Option<&CallExprData> {
        self.get(index).and_then(|node| self.get_call_expr(node))
    }

    pub fn get_access_expr_at(&self, index: NodeIndex) -> Option<&AccessExprData> {
        self.get(index).and_then(|node| self.get_access_expr(node))
    }

    pub fn get_literal_expr_at(&self, index: NodeIndex) -> Option<&LiteralExprData> {
        self.get(index).and_then(|node| self.get_literal_expr(node))
    }

    /// Children of a node in source order. Absent optional children are
    /// skipped.
    pub fn get_children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let Some(node) = self.get(index) else {
            return Vec::new();
        };

        let mut children = Vec::new();
        let mut add = |idx: NodeIndex| {
            if idx.is_some() {
                children.push(idx);
            }
        };

        match &node.data {
            NodeData::None | NodeData::Identifier(_) | NodeData::Literal(_) => {}
            NodeData::SourceFile(data) => data.statements.iter().for_each(&mut add),
            NodeData::Block(data) => data.statements.iter().for_each(&mut add),
            NodeData::VariableStatement(data) => add(data.declaration_list),
            NodeData::Variable(data) => data.declarations.iter().for_each(&mut add),
            NodeData::VariableDeclaration(data) => {
                add(data.name);
                add(data.initializer);
            }
            NodeData::Function(data) => {
                add(data.name);
                data.parameters.iter().for_each(&mut add);
                add(data.body);
            }
            NodeData::Parameter(data) => {
                add(data.name);
                add(data.initializer);
            }
            NodeData::Class(data) => {
                add(data.name);
                add(data.heritage);
                data.members.iter().for_each(&mut add);
            }
            NodeData::PropertyDeclaration(data) => {
                add(data.name);
                add(data.initializer);
            }
            NodeData::BindingPattern(data) => data.elements.iter().for_each(&mut add),
            NodeData::BindingElement(data) => {
                add(data.property_name);
                add(data.name);
                add(data.initializer);
            }
            NodeData::Expression(data) => add(data.expression),
            NodeData::Unary(data) => add(data.operand),
            NodeData::Binary(data) => {
                add(data.left);
                add(data.right);
            }
            NodeData::Conditional(data) => {
                add(data.condition);
                add(data.when_true);
                add(data.when_false);
            }
            NodeData::Call(data) => {
                add(data.expression);
                if let Some(arguments) = &data.arguments {
                    arguments.iter().for_each(&mut add);
                }
            }
            NodeData::TaggedTemplate(data) => {
                add(data.tag);
                add(data.template);
            }
            NodeData::Access(data) => {
                add(data.expression);
                add(data.name_or_argument);
            }
            NodeData::LiteralExpr(data) => data.elements.iter().for_each(&mut add),
            NodeData::PropertyAssignment(data) => {
                add(data.name);
                add(data.initializer);
            }
            NodeData::ShorthandProperty(data) => {
                add(data.name);
                add(data.object_assignment_initializer);
            }
            NodeData::Template(data) => {
                add(data.head);
                data.template_spans.iter().for_each(&mut add);
            }
            NodeData::TemplateSpan(data) => {
                add(data.expression);
                add(data.literal);
            }
            NodeData::If(data) => {
                add(data.expression);
                add(data.then_statement);
                add(data.else_statement);
            }
            NodeData::Loop(data) => {
                if node.kind == SyntaxKind::DoStatement {
                    add(data.statement);
                    add(data.condition);
                } else {
                    add(data.initializer);
                    add(data.condition);
                    add(data.incrementor);
                    add(data.statement);
                }
            }
            NodeData::ForInOf(data) => {
                add(data.initializer);
                add(data.expression);
                add(data.statement);
            }
            NodeData::Jump(data) => add(data.label),
            NodeData::Labeled(data) => {
                add(data.label);
                add(data.statement);
            }
            NodeData::Try(data) => {
                add(data.try_block);
                add(data.catch_clause);
                add(data.finally_block);
            }
            NodeData::CatchClause(data) => {
                add(data.variable_declaration);
                add(data.block);
            }
            NodeData::Switch(data) => {
                add(data.expression);
                add(data.case_block);
            }
            NodeData::CaseClause(data) => {
                add(data.expression);
                data.statements.iter().for_each(&mut add);
            }
            NodeData::With(data) => {
                add(data.expression);
                add(data.statement);
            }
            NodeData::ImportDecl(data) => {
                add(data.import_clause);
                add(data.module_specifier);
            }
            NodeData::ImportClause(data) => {
                add(data.name);
                add(data.named_bindings);
            }
            NodeData::NamespaceImport(data) => add(data.name),
            NodeData::NamedBindings(data) => data.elements.iter().for_each(&mut add),
            NodeData::Specifier(data) => {
                add(data.property_name);
                add(data.name);
            }
            NodeData::ExportDecl(data) => {
                add(data.export_clause);
                add(data.module_specifier);
            }
        }

        children
    }
}
