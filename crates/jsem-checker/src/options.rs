//! Analyzer configuration.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Default selector library aliases, in the comma-separated property form.
pub const DEFAULT_SELECTOR_ALIASES: &str = "$, jQuery";

/// Options for one analysis run.
///
/// ```json
/// { "selectorAliases": ["$", "jQuery", "Zepto"] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerOptions {
    /// Global names bound to the selector library
    pub selector_aliases: Vec<String>,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        AnalyzerOptions {
            selector_aliases: parse_alias_list(DEFAULT_SELECTOR_ALIASES),
        }
    }
}

impl AnalyzerOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<AnalyzerOptions, AnalysisError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Options with the aliases given as a comma-separated list
    /// (`"$, jQuery"`).
    pub fn with_selector_aliases(list: &str) -> AnalyzerOptions {
        AnalyzerOptions {
            selector_aliases: parse_alias_list(list),
        }
    }

    pub fn is_selector_alias(&self, name: &str) -> bool {
        self.selector_aliases.iter().any(|alias| alias == name)
    }
}

/// Split a comma-separated alias list, trimming blanks and dropping empty
/// entries.
pub fn parse_alias_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|alias| !alias.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aliases() {
        let options = AnalyzerOptions::default();
        assert_eq!(options.selector_aliases, vec!["$", "jQuery"]);
        assert!(options.is_selector_alias("$"));
        assert!(!options.is_selector_alias("jquery"));
    }

    #[test]
    fn test_parse_alias_list() {
        assert_eq!(parse_alias_list(" $ ,jQuery,, Zepto "), vec!["$", "jQuery", "Zepto"]);
        assert!(parse_alias_list(" , ").is_empty());
    }

    #[test]
    fn test_from_json() {
        let options = AnalyzerOptions::from_json(r#"{ "selectorAliases": ["Zepto"] }"#).expect("valid json");
        assert_eq!(options.selector_aliases, vec!["Zepto"]);

        let defaults = AnalyzerOptions::from_json("{}").expect("valid json");
        assert_eq!(defaults, AnalyzerOptions::default());

        assert!(matches!(
            AnalyzerOptions::from_json("{ selectorAliases: 1 }"),
            Err(AnalysisError::InvalidOptions(_))
        ));
    }
}
