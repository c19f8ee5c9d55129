//! Symbols and usages.

use crate::scopes::ScopeId;
use jsem_parser::NodeIndex;
use jsem_solver::{Type, TypeSet};
use serde::Serialize;

/// Index of a symbol in the [`SymbolArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    /// `var` binding, or an implicit global
    Variable,
    LetVariable,
    ConstVariable,
    Function,
    /// Class method, accessor or constructor
    Method,
    Parameter,
    Import,
    Class,
    /// Analyzer-internal: the built-in `this` of a module, function or
    /// class scope
    This,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum UsageKind {
    /// Declaration without initializer (`var x`, function names, imports)
    Declaration,
    /// Declaration with initializer (`var x = e`)
    DeclarationWrite,
    /// `let`/`const`/class declarations and parameters
    LexicalDeclaration,
    Write,
    Read,
    /// Compound assignment target or `++`/`--` operand
    ReadWrite,
}

impl UsageKind {
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            UsageKind::Declaration | UsageKind::DeclarationWrite | UsageKind::LexicalDeclaration
        )
    }

    pub fn is_write(self) -> bool {
        matches!(
            self,
            UsageKind::DeclarationWrite | UsageKind::Write | UsageKind::ReadWrite
        )
    }

    pub fn is_read(self) -> bool {
        matches!(self, UsageKind::Read | UsageKind::ReadWrite)
    }
}

/// One identifier occurrence bound to a symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub node: NodeIndex,
    pub kind: UsageKind,
    pub symbol: SymbolId,
}

#[derive(Clone, Debug, Serialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    /// Built-in, or synthesized for a reference that resolved to nothing
    pub is_external: bool,
    pub scope: ScopeId,
    /// Usages in binding order
    pub usages: Vec<Usage>,
    pub types: TypeSet,
    pub(crate) promoted: bool,
}

impl Symbol {
    /// First usage; navigation uses it as the declaration anchor.
    pub fn first_usage(&self) -> Option<&Usage> {
        self.usages.first()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Usage> {
        self.usages.iter().filter(|usage| usage.kind.is_declaration())
    }

    pub fn is_variable(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Variable | SymbolKind::LetVariable | SymbolKind::ConstVariable
        )
    }

    pub fn add_type(&mut self, ty: Type) -> bool {
        self.types.add(ty)
    }

    pub fn add_types(&mut self, types: &TypeSet) -> bool {
        self.types.union_with(types)
    }
}

/// Arena-based storage for symbols.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> SymbolArena {
        SymbolArena::default()
    }

    pub(crate) fn alloc(&mut self, name: String, kind: SymbolKind, scope: ScopeId, is_external: bool) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            id,
            name,
            kind,
            is_external,
            scope,
            usages: Vec::new(),
            types: TypeSet::new(),
            promoted: false,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
