use jsem_binder::ValidationError;
use thiserror::Error;

/// Errors that abort an analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid analyzer options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("root node {node} is not in the syntax tree")]
    MissingRoot { node: u32 },

    /// The binder produced tables that disagree with each other.
    #[error("inconsistent symbol table ({} problem(s)), first: {:?}", .problems.len(), .problems.first())]
    InconsistentSymbolTable { problems: Vec<ValidationError> },
}
