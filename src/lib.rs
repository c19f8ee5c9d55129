//! jsem: a semantic model builder for JavaScript static analysis.
//!
//! The pipeline is split over the workspace crates:
//!
//! - [`scanner`] and [`parser`]: source text to an arena-stored syntax tree
//! - [`binder`]: scope tree, symbols and classified usages
//! - [`solver`]: the `Type` enumeration and deduplicating `TypeSet`
//! - [`checker`]: heuristic type inference, library matchers and the
//!   read-only [`SymbolModel`]
//!
//! [`analyze_source`] runs the whole pipeline on one file.
//!
//! ```no_run
//! use jsem::{AnalyzerOptions, analyze_source};
//!
//! let analysis = analyze_source("app.js", "var el = $('#main');", &AnalyzerOptions::default())?;
//! for symbol in analysis.model.symbols_named("el") {
//!     println!("{} : {:?}", symbol.name, symbol.types);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub use jsem_binder as binder;
pub use jsem_checker as checker;
pub use jsem_common as common;
pub use jsem_parser as parser;
pub use jsem_scanner as scanner;
pub use jsem_solver as solver;

pub use jsem_checker::{AnalysisError, AnalyzerOptions, SymbolModel};

pub mod tracing_config;

use anyhow::{Context, bail};
use jsem_parser::{NodeArena, NodeIndex, ParseDiagnostic, ParserState};
use tracing::debug;

/// A parsed and analyzed file. The model refers into `arena` by node index.
#[derive(Debug)]
pub struct Analysis {
    pub file_name: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub model: SymbolModel,
}

/// Parse `source` and build its symbol model.
///
/// Fails on the first syntax error, reported as `file:line:column: message`,
/// and on analysis errors.
#[tracing::instrument(level = "debug", skip(source, options), fields(len = source.len()))]
pub fn analyze_source(file_name: &str, source: &str, options: &AnalyzerOptions) -> anyhow::Result<Analysis> {
    let mut parser = ParserState::new(file_name.to_string(), source.to_string());
    let root = parser.parse_source_file();
    if let Some(diagnostic) = parser.get_diagnostics().first() {
        let count = parser.get_diagnostics().len();
        let location = describe_diagnostic(file_name, parser.get_arena(), diagnostic);
        bail!("{location} ({count} syntax error(s))");
    }

    let arena = parser.into_arena();
    let model = SymbolModel::build(&arena, root, options)
        .with_context(|| format!("failed to analyze {file_name}"))?;
    debug!(symbols = model.symbols().len(), "analysis complete");

    Ok(Analysis {
        file_name: file_name.to_string(),
        arena,
        root,
        model,
    })
}

/// Like [`analyze_source`], with options read from a JSON document.
pub fn analyze_source_with_json_options(file_name: &str, source: &str, options_json: &str) -> anyhow::Result<Analysis> {
    let options = AnalyzerOptions::from_json(options_json).context("failed to read analyzer options")?;
    analyze_source(file_name, source, &options)
}

fn describe_diagnostic(file_name: &str, arena: &NodeArena, diagnostic: &ParseDiagnostic) -> String {
    let position = arena.line_map().position_of(diagnostic.pos);
    format!(
        "{file_name}:{}:{}: {}",
        position.line,
        position.column + 1,
        diagnostic.message
    )
}
