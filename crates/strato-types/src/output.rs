use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a command's result value is rendered.
///
/// `Json` is the full-fidelity mode: the result object is passed through
/// unmodified. The tabular modes (`Text`, `Csv`, `Md`) project records
/// onto the command's default properties. `None` suppresses successful
/// result output entirely; errors are never suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Text,
    #[default]
    Json,
    Csv,
    Md,
    None,
}

impl OutputMode {
    pub const ALL: [OutputMode; 5] = [
        OutputMode::Text,
        OutputMode::Json,
        OutputMode::Csv,
        OutputMode::Md,
        OutputMode::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Text => "text",
            OutputMode::Json => "json",
            OutputMode::Csv => "csv",
            OutputMode::Md => "md",
            OutputMode::None => "none",
        }
    }

    /// Candidate values, in declaration order, for autocomplete and
    /// validation messages.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|mode| mode.as_str()).collect()
    }

    /// Whether results are projected onto default properties in this mode.
    pub fn is_tabular(&self) -> bool {
        matches!(self, OutputMode::Text | OutputMode::Csv | OutputMode::Md)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "{} is not a valid output mode. Allowed values: {}",
                    s,
                    Self::names().join(", ")
                )
            })
    }
}
