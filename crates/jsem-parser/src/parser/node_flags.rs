//! Flags recorded on nodes by the parser.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct NodeFlags: u16 {
        /// `let` declaration list
        const LET = 1 << 0;
        /// `const` declaration list
        const CONST = 1 << 1;
        const ASYNC = 1 << 2;
        /// Generator function or delegating `yield*`
        const GENERATOR = 1 << 3;
        /// Static class member
        const STATIC = 1 << 4;
        /// Declaration preceded by `export`
        const EXPORTED = 1 << 5;
        /// Declaration preceded by `export default`
        const DEFAULT_EXPORT = 1 << 6;
        /// Access or call inside an optional chain (`a?.b`)
        const OPTIONAL_CHAIN = 1 << 7;
        /// Parameter, binding element or spread with `...`
        const REST = 1 << 8;
        /// Node contains a syntax error
        const THIS_NODE_HAS_ERROR = 1 << 9;
    }
}

impl NodeFlags {
    pub const BLOCK_SCOPED: NodeFlags = NodeFlags::LET.union(NodeFlags::CONST);
}
