//! Centralized limits for the analyzer.
//!
//! The semantic passes walk bounded trees, so these limits only guard against
//! corrupted parent links and runaway input. Overall input size is filtered
//! by the caller before analysis starts.

/// Maximum number of parent links followed during one scope-chain lookup.
///
/// Scopes form a strict tree, so a lookup terminates at the root long before
/// this bound. Exceeding it means a parent link points back into the chain.
pub const MAX_SCOPE_WALK_ITERATIONS: usize = 10_000;

/// Maximum nesting depth the parser accepts for expressions and statements.
///
/// Deeper input is reported as a syntax error instead of overflowing the
/// stack in the recursive-descent parser.
///
/// ```javascript
/// // ((((((((((((((((((((1))))))))))))))))))) ... thousands of levels
/// ```
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 1_000;
