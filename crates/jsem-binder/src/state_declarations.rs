//! Scope pre-declaration.
//!
//! When the binding walk enters a scope, every binding site that targets the
//! scope is declared before anything inside it is visited:
//!
//! - function scopes collect hoisted `var` and function declarations through
//!   nested statements, stopping at nested functions and classes
//! - every scope declares the `let`/`const`/class declarations written
//!   directly in its statement list
//! - parameters, catch parameters, imports, class members and the names of
//!   function and class expressions bind to the scope their construct owns
//! - module, function and class scopes get their built-ins (`this`,
//!   `arguments`) after the declarations above, so a declared name wins

use crate::scopes::ScopeId;
use crate::state::BinderState;
use crate::symbols::{SymbolKind, UsageKind};
use jsem_parser::{NodeArena, NodeFlags, NodeIndex};
use jsem_scanner::SyntaxKind;
use tracing::trace;

/// Built-ins present in every module scope.
const MODULE_BUILTINS: &[(&str, SymbolKind)] = &[
    ("eval", SymbolKind::Function),
    ("window", SymbolKind::Variable),
    (THIS, SymbolKind::This),
];

/// Name of the `this` pseudo-symbol.
pub(crate) const THIS: &str = "this";

impl BinderState {
    pub(crate) fn declare_scope_bindings(&mut self, arena: &NodeArena, scope: ScopeId) {
        let Some(scope_data) = self.scopes.get(scope) else {
            return;
        };
        let introducer = scope_data.node;
        let Some(node) = arena.get(introducer) else {
            return;
        };
        trace!(scope = scope.0, kind = ?node.kind, "declaring scope bindings");

        match node.kind {
            SyntaxKind::SourceFile => {
                let Some(file) = arena.get_source_file(node) else {
                    return;
                };
                let statements: Vec<NodeIndex> = file.statements.iter().collect();
                self.declare_hoisted(arena, &statements, scope);
                self.declare_lexical(arena, &statements, scope);
                self.declare_imports(arena, &statements, scope);
                for &(name, kind) in MODULE_BUILTINS {
                    self.declare_builtin(name, kind, scope);
                }
            }
            kind if kind.is_function_like() => self.declare_function_scope(arena, introducer, scope),
            SyntaxKind::Block => {
                if let Some(block) = arena.get_block(node) {
                    let statements: Vec<NodeIndex> = block.statements.iter().collect();
                    self.declare_lexical(arena, &statements, scope);
                }
            }
            SyntaxKind::ForStatement => {
                if let Some(data) = arena.get_loop(node) {
                    let (initializer, statement) = (data.initializer, data.statement);
                    self.declare_loop_head(arena, initializer, scope);
                    self.declare_block_body(arena, statement, scope);
                }
            }
            SyntaxKind::ForInStatement | SyntaxKind::ForOfStatement => {
                if let Some(data) = arena.get_for_in_of(node) {
                    let (initializer, statement) = (data.initializer, data.statement);
                    self.declare_loop_head(arena, initializer, scope);
                    self.declare_block_body(arena, statement, scope);
                }
            }
            SyntaxKind::CaseBlock => {
                let clauses: Vec<NodeIndex> = arena
                    .get_block(node)
                    .map(|block| block.statements.iter().collect())
                    .unwrap_or_default();
                for clause in clauses {
                    let statements: Vec<NodeIndex> = arena
                        .get(clause)
                        .and_then(|clause_node| arena.get_case_clause(clause_node))
                        .map(|data| data.statements.iter().collect())
                        .unwrap_or_default();
                    self.declare_lexical(arena, &statements, scope);
                }
            }
            SyntaxKind::CatchClause => {
                if let Some(clause) = arena.get_catch_clause(node) {
                    let (variable, block) = (clause.variable_declaration, clause.block);
                    for ident in collect_binding_identifiers(arena, variable) {
                        self.declare_identifier(arena, ident, SymbolKind::Variable, scope, UsageKind::Declaration);
                    }
                    self.declare_block_body(arena, block, scope);
                }
            }
            SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression => {
                self.declare_class_scope(arena, introducer, scope);
            }
            _ => {}
        }
    }

    fn declare_function_scope(&mut self, arena: &NodeArena, func_idx: NodeIndex, scope: ScopeId) {
        let Some(node) = arena.get(func_idx) else {
            return;
        };
        let Some(func) = arena.get_function(node) else {
            return;
        };

        // The name of a function expression is only visible inside it.
        if node.kind == SyntaxKind::FunctionExpression && func.name.is_some() {
            self.declare_identifier(arena, func.name, SymbolKind::Function, scope, UsageKind::Declaration);
        }

        for param in func.parameters.iter() {
            let name = arena
                .get(param)
                .and_then(|param_node| arena.get_parameter(param_node))
                .map_or(NodeIndex::NONE, |data| data.name);
            for ident in collect_binding_identifiers(arena, name) {
                self.declare_identifier(arena, ident, SymbolKind::Parameter, scope, UsageKind::LexicalDeclaration);
            }
        }

        self.declare_builtin("arguments", SymbolKind::Variable, scope);
        // Arrows and class members see the `this` of an enclosing scope.
        if matches!(node.kind, SyntaxKind::FunctionDeclaration | SyntaxKind::FunctionExpression) {
            self.declare_builtin(THIS, SymbolKind::This, scope);
        }

        if let Some(body) = arena.get(func.body)
            && let Some(block) = arena.get_block(body)
        {
            let statements: Vec<NodeIndex> = block.statements.iter().collect();
            self.declare_hoisted(arena, &statements, scope);
            self.declare_lexical(arena, &statements, scope);
        }
    }

    fn declare_class_scope(&mut self, arena: &NodeArena, class_idx: NodeIndex, scope: ScopeId) {
        let Some(node) = arena.get(class_idx) else {
            return;
        };
        let Some(class) = arena.get_class(node) else {
            return;
        };

        if node.kind == SyntaxKind::ClassExpression && class.name.is_some() {
            self.declare_identifier(arena, class.name, SymbolKind::Class, scope, UsageKind::LexicalDeclaration);
        }
        self.declare_builtin(THIS, SymbolKind::This, scope);

        for member in class.members.iter() {
            let Some(member_node) = arena.get(member) else {
                continue;
            };
            if !matches!(
                member_node.kind,
                SyntaxKind::MethodDeclaration
                    | SyntaxKind::GetAccessor
                    | SyntaxKind::SetAccessor
                    | SyntaxKind::Constructor
            ) {
                continue;
            }
            let Some(func) = arena.get_function(member_node) else {
                continue;
            };
            if arena.kind(func.name) != Some(SyntaxKind::IdentifierName) {
                continue;
            }
            // Members never share a symbol with the class name or `this`.
            let shadows_binding = arena
                .identifier_text(func.name)
                .and_then(|name| self.scopes.get(scope)?.lookup(name))
                .and_then(|sym_id| self.symbols.get(sym_id))
                .is_some_and(|symbol| symbol.kind != SymbolKind::Method);
            if shadows_binding {
                trace!(node = func.name.0, "member name matches a class-scope binding, not declared");
                continue;
            }
            self.declare_identifier(arena, func.name, SymbolKind::Method, scope, UsageKind::Declaration);
        }
    }

    /// `let`/`const` bindings of a loop head. `var` heads are hoisted.
    fn declare_loop_head(&mut self, arena: &NodeArena, initializer: NodeIndex, scope: ScopeId) {
        let Some(node) = arena.get(initializer) else {
            return;
        };
        if node.kind == SyntaxKind::VariableDeclarationList && node.flags.intersects(NodeFlags::BLOCK_SCOPED) {
            self.declare_variable_list(arena, initializer, scope);
        }
    }

    /// Lexical declarations of a block that shares its owner's scope.
    fn declare_block_body(&mut self, arena: &NodeArena, body: NodeIndex, scope: ScopeId) {
        if let Some(node) = arena.get(body)
            && node.kind == SyntaxKind::Block
            && let Some(block) = arena.get_block(node)
        {
            let statements: Vec<NodeIndex> = block.statements.iter().collect();
            self.declare_lexical(arena, &statements, scope);
        }
    }

    /// Declare `var` and function declarations found in `statements` and
    /// the statements nested in them, without entering functions or classes.
    fn declare_hoisted(&mut self, arena: &NodeArena, statements: &[NodeIndex], scope: ScopeId) {
        let mut stack: Vec<NodeIndex> = statements.iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            let Some(node) = arena.get(idx) else {
                continue;
            };
            let mut nested = Vec::new();
            match node.kind {
                SyntaxKind::VariableStatement => {
                    if let Some(stmt) = arena.get_variable_statement(node) {
                        nested.push(stmt.declaration_list);
                    }
                }
                SyntaxKind::VariableDeclarationList => {
                    if !node.flags.intersects(NodeFlags::BLOCK_SCOPED) {
                        self.declare_variable_list(arena, idx, scope);
                    }
                }
                SyntaxKind::FunctionDeclaration => {
                    if let Some(func) = arena.get_function(node)
                        && func.name.is_some()
                    {
                        self.declare_identifier(arena, func.name, SymbolKind::Function, scope, UsageKind::Declaration);
                    }
                }
                SyntaxKind::Block => {
                    if let Some(block) = arena.get_block(node) {
                        nested.extend(block.statements.iter());
                    }
                }
                SyntaxKind::IfStatement => {
                    if let Some(data) = arena.get_if_statement(node) {
                        nested.push(data.then_statement);
                        nested.push(data.else_statement);
                    }
                }
                SyntaxKind::DoStatement | SyntaxKind::WhileStatement | SyntaxKind::ForStatement => {
                    if let Some(data) = arena.get_loop(node) {
                        nested.push(data.initializer);
                        nested.push(data.statement);
                    }
                }
                SyntaxKind::ForInStatement | SyntaxKind::ForOfStatement => {
                    if let Some(data) = arena.get_for_in_of(node) {
                        nested.push(data.initializer);
                        nested.push(data.statement);
                    }
                }
                SyntaxKind::TryStatement => {
                    if let Some(data) = arena.get_try(node) {
                        nested.push(data.try_block);
                        if let Some(clause) = arena.get(data.catch_clause)
                            && let Some(catch) = arena.get_catch_clause(clause)
                        {
                            nested.push(catch.block);
                        }
                        nested.push(data.finally_block);
                    }
                }
                SyntaxKind::SwitchStatement => {
                    if let Some(data) = arena.get_switch(node) {
                        nested.push(data.case_block);
                    }
                }
                SyntaxKind::CaseBlock => {
                    if let Some(block) = arena.get_block(node) {
                        nested.extend(block.statements.iter());
                    }
                }
                SyntaxKind::CaseClause | SyntaxKind::DefaultClause => {
                    if let Some(clause) = arena.get_case_clause(node) {
                        nested.extend(clause.statements.iter());
                    }
                }
                SyntaxKind::LabeledStatement => {
                    if let Some(data) = arena.get_labeled_statement(node) {
                        nested.push(data.statement);
                    }
                }
                SyntaxKind::WithStatement => {
                    if let Some(data) = arena.get_with(node) {
                        nested.push(data.statement);
                    }
                }
                _ => {}
            }
            stack.extend(nested.into_iter().filter(|child| child.is_some()).rev());
        }
    }

    /// Declare `let`/`const` and class declarations written directly in
    /// `statements`.
    fn declare_lexical(&mut self, arena: &NodeArena, statements: &[NodeIndex], scope: ScopeId) {
        for &idx in statements {
            let Some(node) = arena.get(idx) else {
                continue;
            };
            match node.kind {
                SyntaxKind::VariableStatement => {
                    let Some(stmt) = arena.get_variable_statement(node) else {
                        continue;
                    };
                    if arena
                        .get(stmt.declaration_list)
                        .is_some_and(|list| list.flags.intersects(NodeFlags::BLOCK_SCOPED))
                    {
                        self.declare_variable_list(arena, stmt.declaration_list, scope);
                    }
                }
                SyntaxKind::ClassDeclaration => {
                    if let Some(class) = arena.get_class(node)
                        && class.name.is_some()
                    {
                        self.declare_identifier(arena, class.name, SymbolKind::Class, scope, UsageKind::LexicalDeclaration);
                    }
                }
                _ => {}
            }
        }
    }

    fn declare_imports(&mut self, arena: &NodeArena, statements: &[NodeIndex], scope: ScopeId) {
        for &idx in statements {
            let Some(node) = arena.get(idx) else {
                continue;
            };
            if node.kind != SyntaxKind::ImportDeclaration {
                continue;
            }
            let Some(import) = arena.get_import_decl(node) else {
                continue;
            };
            let Some(clause_node) = arena.get(import.import_clause) else {
                continue;
            };
            let Some(clause) = arena.get_import_clause(clause_node) else {
                continue;
            };

            let mut names = Vec::new();
            if clause.name.is_some() {
                names.push(clause.name);
            }
            if let Some(bindings) = arena.get(clause.named_bindings) {
                if let Some(namespace) = arena.get_namespace_import(bindings) {
                    names.push(namespace.name);
                } else if let Some(named) = arena.get_named_bindings(bindings) {
                    for specifier in named.elements.iter() {
                        if let Some(spec_node) = arena.get(specifier)
                            && let Some(spec) = arena.get_specifier(spec_node)
                        {
                            names.push(spec.name);
                        }
                    }
                }
            }

            for name in names {
                self.declare_identifier(arena, name, SymbolKind::Import, scope, UsageKind::Declaration);
            }
        }
    }

    /// Declare every binding of a `VariableDeclarationList`.
    ///
    /// `var` bindings get `Declaration`, or `DeclarationWrite` when the
    /// declaration has an initializer; `let`/`const` bindings are lexical
    /// declarations either way.
    fn declare_variable_list(&mut self, arena: &NodeArena, list_idx: NodeIndex, scope: ScopeId) {
        let Some(list_node) = arena.get(list_idx) else {
            return;
        };
        let Some(list) = arena.get_variable(list_node) else {
            return;
        };
        let kind = if list_node.has_flag(NodeFlags::CONST) {
            SymbolKind::ConstVariable
        } else if list_node.has_flag(NodeFlags::LET) {
            SymbolKind::LetVariable
        } else {
            SymbolKind::Variable
        };

        for decl_idx in list.declarations.iter() {
            let Some(decl) = arena
                .get(decl_idx)
                .and_then(|decl_node| arena.get_variable_declaration(decl_node))
            else {
                continue;
            };
            let usage = match kind {
                SymbolKind::Variable if decl.initializer.is_some() => UsageKind::DeclarationWrite,
                SymbolKind::Variable => UsageKind::Declaration,
                _ => UsageKind::LexicalDeclaration,
            };
            for ident in collect_binding_identifiers(arena, decl.name) {
                self.declare_identifier(arena, ident, kind, scope, usage);
            }
        }
    }

    fn declare_identifier(
        &mut self,
        arena: &NodeArena,
        ident: NodeIndex,
        kind: SymbolKind,
        scope: ScopeId,
        usage: UsageKind,
    ) {
        let Some(name) = arena.identifier_text(ident) else {
            return;
        };
        self.declare_symbol(name, kind, scope, ident, usage);
    }
}

/// Binding identifiers introduced by a binding name or pattern, in source
/// order. Default values and computed keys are not part of the result.
pub(crate) fn collect_binding_identifiers(arena: &NodeArena, name: NodeIndex) -> Vec<NodeIndex> {
    let mut out = Vec::new();
    let mut stack = vec![name];
    while let Some(idx) = stack.pop() {
        let Some(node) = arena.get(idx) else {
            continue;
        };
        match node.kind {
            SyntaxKind::BindingIdentifier => out.push(idx),
            SyntaxKind::ObjectBindingPattern | SyntaxKind::ArrayBindingPattern => {
                if let Some(pattern) = arena.get_binding_pattern(node) {
                    let elements: Vec<NodeIndex> = pattern.elements.iter().collect();
                    stack.extend(elements.into_iter().rev());
                }
            }
            SyntaxKind::BindingElement => {
                if let Some(element) = arena.get_binding_element(node) {
                    stack.push(element.name);
                }
            }
            _ => {}
        }
    }
    out
}
