//! Flow-insensitive type inference.
//!
//! A single post-order pass over the tree. Each expression node receives the
//! types it can be shown to have; identifier references read the types of
//! their symbol, and plain assignments and initializers union the value's
//! types into the target symbol; a value with no recognized type marks the
//! target [`Type::UNKNOWN`] instead. Propagation happens at visit time, so a
//! symbol only carries the types written before the point where it is read:
//!
//! ```javascript
//! var a = 1;
//! var b = a;   // b: number
//! a = "s";     // a: number | string, b stays number
//! ```

use crate::heuristics::{self, TypeQuery, model_library};
use crate::options::AnalyzerOptions;
use jsem_binder::{BindResult, ScopeKind, SymbolKind};
use jsem_parser::{NodeArena, NodeIndex};
use jsem_scanner::SyntaxKind;
use jsem_solver::{BuiltInKind, Callability, Type, TypeKind, TypeSet, WebApiKind};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Types recorded on expression nodes, keyed by node.
pub type NodeTypes = FxHashMap<NodeIndex, TypeSet>;

/// Types of the expression at `node`: the current types of the symbol it is
/// bound to, followed by the types recorded on the node itself.
pub fn expression_types(bound: &BindResult, node_types: &NodeTypes, node: NodeIndex) -> TypeSet {
    let mut types = bound
        .node_symbols
        .get(&node)
        .and_then(|&id| bound.symbols.get(id))
        .map(|symbol| symbol.types.clone())
        .unwrap_or_default();
    if let Some(own) = node_types.get(&node) {
        types.union_with(own);
    }
    types
}

pub struct TypeInference<'a> {
    arena: &'a NodeArena,
    options: &'a AnalyzerOptions,
    bound: &'a mut BindResult,
    node_types: NodeTypes,
}

impl<'a> TypeInference<'a> {
    pub fn new(arena: &'a NodeArena, bound: &'a mut BindResult, options: &'a AnalyzerOptions) -> Self {
        TypeInference {
            arena,
            options,
            bound,
            node_types: NodeTypes::default(),
        }
    }

    /// Run the pass over the tree rooted at `root`. Symbol types are written
    /// into the bind result; expression types are returned.
    #[tracing::instrument(level = "debug", skip_all, fields(root = root.0))]
    pub fn infer(mut self, root: NodeIndex) -> NodeTypes {
        self.seed_builtins();

        let mut stack = vec![(root, false)];
        while let Some((node, children_done)) = stack.pop() {
            if children_done {
                self.visit(node);
                continue;
            }
            stack.push((node, true));
            for child in self.arena.get_children(node).into_iter().rev() {
                stack.push((child, false));
            }
        }

        debug!(typed_nodes = self.node_types.len(), "type inference finished");
        self.node_types
    }

    /// The built-in `window` global is a window unless the file declares it.
    /// A class's `this` is an instance of the class; any other `this` is an
    /// object of unknown callability.
    fn seed_builtins(&mut self) {
        let root = self.bound.scopes.root();
        if let Some(id) = self.bound.scopes.get(root).and_then(|scope| scope.lookup("window"))
            && let Some(symbol) = self.bound.symbols.get_mut(id)
            && symbol.is_external
        {
            symbol.add_type(Type::WebApi(WebApiKind::Window));
        }

        let this_symbols: Vec<_> = self
            .bound
            .scopes
            .iter()
            .filter_map(|scope| {
                let ty = match scope.kind {
                    ScopeKind::ClassBody => Type::Instance { class: scope.node },
                    _ => Type::Object {
                        callability: Callability::MaybeCallable,
                    },
                };
                Some((scope.lookup("this")?, ty))
            })
            .collect();
        for (id, ty) in this_symbols {
            if let Some(symbol) = self.bound.symbols.get_mut(id)
                && symbol.kind == SymbolKind::This
            {
                symbol.add_type(ty);
            }
        }
    }

    fn visit(&mut self, node: NodeIndex) {
        let Some(kind) = self.arena.kind(node) else {
            return;
        };
        match kind {
            SyntaxKind::NumericLiteral => self.add_node_type(node, Type::NUMBER),
            SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral
            | SyntaxKind::TemplateExpression => self.add_node_type(node, Type::STRING),
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => self.add_node_type(node, Type::BOOLEAN),
            SyntaxKind::ArrayLiteralExpression => self.add_node_type(node, Type::array()),
            SyntaxKind::ObjectLiteralExpression => self.add_node_type(node, Type::object()),
            SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction => {
                self.add_node_type(node, Type::Function { declaration: node })
            }
            SyntaxKind::FunctionDeclaration => {
                let name = self.arena.get_function_at(node).map_or(NodeIndex::NONE, |f| f.name);
                self.add_declared_type(node, name, Type::Function { declaration: node });
            }
            SyntaxKind::ClassDeclaration => {
                let name = self.class_name(node);
                self.add_declared_type(node, name, Type::Class { declaration: node });
            }
            SyntaxKind::ClassExpression => self.add_node_type(node, Type::Class { declaration: node }),
            SyntaxKind::ParenthesizedExpression => {
                let inner = self
                    .arena
                    .get(node)
                    .and_then(|n| self.arena.get_expression(n))
                    .map_or(NodeIndex::NONE, |e| e.expression);
                let types = self.types_of(inner);
                self.add_node_types(node, types.iter().cloned());
            }
            SyntaxKind::Identifier => {
                let types = heuristics::classify_identifier(self.arena, node, self.options);
                self.add_node_types(node, types);
            }
            SyntaxKind::BinaryExpression => self.visit_assignment(node),
            SyntaxKind::VariableDeclaration | SyntaxKind::Parameter | SyntaxKind::BindingElement => {
                self.visit_initializer(node)
            }
            SyntaxKind::CallExpression => self.visit_call(node),
            SyntaxKind::NewExpression => self.visit_new(node),
            SyntaxKind::PropertyAccessExpression => {
                let types = heuristics::classify_property_access(self.arena, node, &*self);
                self.add_node_types(node, types);
            }
            SyntaxKind::ElementAccessExpression => self.visit_element_access(node),
            _ => {}
        }
    }

    /// `target = value`: the node takes the value's types, and a plain
    /// identifier target's symbol absorbs them.
    fn visit_assignment(&mut self, node: NodeIndex) {
        let arena = self.arena;
        let Some(binary) = arena.get(node).and_then(|n| arena.get_binary_expr(n)) else {
            return;
        };
        if binary.operator_token != SyntaxKind::EqualsToken {
            return;
        }
        let value = self.types_of(binary.right);
        if arena.kind(binary.left) == Some(SyntaxKind::Identifier) {
            self.assign_to_symbol(binary.left, &value);
        }
        self.add_node_types(node, value.iter().cloned());
    }

    /// `var x = value`, `function f(x = value)` and `{ x = value }`.
    fn visit_initializer(&mut self, node: NodeIndex) {
        let arena = self.arena;
        let Some(n) = arena.get(node) else {
            return;
        };
        let (name, initializer) = if let Some(decl) = arena.get_variable_declaration(n) {
            (decl.name, decl.initializer)
        } else if let Some(param) = arena.get_parameter(n) {
            (param.name, param.initializer)
        } else if let Some(element) = arena.get_binding_element(n) {
            (element.name, element.initializer)
        } else {
            return;
        };
        if initializer.is_none() || arena.kind(name) != Some(SyntaxKind::BindingIdentifier) {
            return;
        }
        let value = self.types_of(initializer);
        self.assign_to_symbol(name, &value);
    }

    fn visit_call(&mut self, call: NodeIndex) {
        let types = heuristics::classify_call(self.arena, call, self.options, &*self);
        self.add_node_types(call, types);
        self.propagate_arguments(call);
    }

    /// Arguments flow into the simple parameters of a uniquely known callee.
    fn propagate_arguments(&mut self, call: NodeIndex) {
        let arena = self.arena;
        let Some(callee) = heuristics::callee(arena, call) else {
            return;
        };
        let callee_types = self.types_of(callee);
        let Some(&Type::Function { declaration }) = callee_types.unique(TypeKind::Function) else {
            return;
        };
        let Some(function) = arena.get_function_at(declaration) else {
            return;
        };

        let arguments = heuristics::arguments(arena, call);
        for (argument, parameter) in arguments.into_iter().zip(function.parameters.iter()) {
            if arena.kind(argument) == Some(SyntaxKind::SpreadElement) {
                break;
            }
            let Some(param) = arena.get(parameter).and_then(|n| arena.get_parameter(n)) else {
                continue;
            };
            if param.dot_dot_dot_token
                || param.initializer.is_some()
                || arena.kind(param.name) != Some(SyntaxKind::BindingIdentifier)
            {
                continue;
            }
            let value = self.types_of(argument);
            self.assign_to_symbol(param.name, &value);
        }
    }

    fn visit_new(&mut self, new_expr: NodeIndex) {
        let ty = model_library::new_type(self.arena, new_expr, &*self)
            .or_else(|| self.builtin_constructor(new_expr))
            .unwrap_or(Type::Object {
                callability: Callability::MaybeCallable,
            });
        self.add_node_type(new_expr, ty);
    }

    /// `new String(..)`, `new Number(..)`, `new Boolean(..)` and `new Date(..)`.
    fn builtin_constructor(&self, new_expr: NodeIndex) -> Option<Type> {
        let callee = heuristics::callee(self.arena, new_expr)?;
        if self.arena.kind(callee)? != SyntaxKind::Identifier {
            return None;
        }
        let kind = match self.arena.identifier_text(callee)? {
            "String" => BuiltInKind::StringObject,
            "Number" => BuiltInKind::NumberObject,
            "Boolean" => BuiltInKind::BooleanObject,
            "Date" => BuiltInKind::Date,
            _ => return None,
        };
        Some(Type::BuiltIn(kind))
    }

    /// `list[i]` where `list` is uniquely an array with a known element type.
    fn visit_element_access(&mut self, node: NodeIndex) {
        let Some(access) = self.arena.get_access_expr_at(node) else {
            return;
        };
        let receiver = self.types_of(self.arena.skip_parentheses(access.expression));
        if let Some(element) = receiver.unique(TypeKind::Array).and_then(Type::element_type) {
            self.add_node_type(node, element.clone());
        }
    }

    fn class_name(&self, node: NodeIndex) -> NodeIndex {
        self.arena
            .get(node)
            .and_then(|n| self.arena.get_class(n))
            .map_or(NodeIndex::NONE, |class| class.name)
    }

    /// Declarations type their name's symbol; anonymous ones (`export
    /// default function () {}`) type the node.
    fn add_declared_type(&mut self, node: NodeIndex, name: NodeIndex, ty: Type) {
        if !self.union_into_symbol(name, &TypeSet::single(ty.clone())) {
            self.add_node_type(node, ty);
        }
    }

    /// Record a value flowing into the symbol bound at `name`; an untyped
    /// value adds [`Type::UNKNOWN`].
    fn assign_to_symbol(&mut self, name: NodeIndex, value: &TypeSet) {
        if value.is_empty() {
            self.union_into_symbol(name, &TypeSet::single(Type::UNKNOWN));
        } else {
            self.union_into_symbol(name, value);
        }
    }

    /// Union `types` into the symbol bound at `name`. Returns false when no
    /// symbol is bound there.
    fn union_into_symbol(&mut self, name: NodeIndex, types: &TypeSet) -> bool {
        let Some(&id) = self.bound.node_symbols.get(&name) else {
            return false;
        };
        let Some(symbol) = self.bound.symbols.get_mut(id) else {
            return false;
        };
        if symbol.add_types(types) {
            trace!(symbol = %symbol.name, types = types.len(), "symbol types widened");
        }
        true
    }

    fn types_of(&self, node: NodeIndex) -> TypeSet {
        expression_types(self.bound, &self.node_types, node)
    }

    fn add_node_type(&mut self, node: NodeIndex, ty: Type) {
        self.node_types.entry(node).or_default().add(ty);
    }

    fn add_node_types(&mut self, node: NodeIndex, types: impl IntoIterator<Item = Type>) {
        let mut types = types.into_iter().peekable();
        if types.peek().is_none() {
            return;
        }
        let entry = self.node_types.entry(node).or_default();
        for ty in types {
            entry.add(ty);
        }
    }
}

impl TypeQuery for TypeInference<'_> {
    fn has_kind(&self, node: NodeIndex, kind: TypeKind) -> bool {
        let symbol_has = self
            .bound
            .node_symbols
            .get(&node)
            .and_then(|&id| self.bound.symbols.get(id))
            .is_some_and(|symbol| symbol.types.contains_kind(kind));
        symbol_has || self.node_types.get(&node).is_some_and(|types| types.contains_kind(kind))
    }
}
