use crate::output::OutputMode;

/// The closed set of recognized persisted settings.
///
/// Only these keys may be written through the settings store; attempting
/// to set anything else is a validation failure, not a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Default output mode when `--output` is not passed
    Output,
    /// Channel errors are printed to: `stdout` or `stderr`
    ErrorOutput,
    /// How much help is printed when a command fails: `options`,
    /// `examples`, `remarks`, `response` or `full`
    HelpMode,
    /// Skip interactive confirmation prompts for destructive commands
    AutoConfirm,
    /// Include the header row in csv output
    CsvHeader,
    /// Quote all csv fields, not just the ones that need it
    CsvQuoted,
    /// Print errors without color or decoration
    PrintErrorsAsPlainText,
    /// Disable the anonymized usage telemetry sink
    DisableTelemetry,
}

impl SettingKey {
    pub const ALL: [SettingKey; 8] = [
        SettingKey::Output,
        SettingKey::ErrorOutput,
        SettingKey::HelpMode,
        SettingKey::AutoConfirm,
        SettingKey::CsvHeader,
        SettingKey::CsvQuoted,
        SettingKey::PrintErrorsAsPlainText,
        SettingKey::DisableTelemetry,
    ];

    pub const HELP_MODES: [&'static str; 5] =
        ["options", "examples", "remarks", "response", "full"];

    pub const ERROR_OUTPUTS: [&'static str; 2] = ["stdout", "stderr"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Output => "output",
            SettingKey::ErrorOutput => "errorOutput",
            SettingKey::HelpMode => "helpMode",
            SettingKey::AutoConfirm => "autoConfirm",
            SettingKey::CsvHeader => "csvHeader",
            SettingKey::CsvQuoted => "csvQuoted",
            SettingKey::PrintErrorsAsPlainText => "printErrorsAsPlainText",
            SettingKey::DisableTelemetry => "disableTelemetry",
        }
    }

    pub fn from_name(name: &str) -> Option<SettingKey> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// All recognized key names, in declaration order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|key| key.as_str()).collect()
    }

    /// Boolean-typed keys only accept the literals `true` and `false`
    /// and are stored as booleans.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            SettingKey::AutoConfirm
                | SettingKey::CsvHeader
                | SettingKey::CsvQuoted
                | SettingKey::PrintErrorsAsPlainText
                | SettingKey::DisableTelemetry
        )
    }

    /// For enum-constrained keys, the allowed value literals.
    pub fn allowed_values(&self) -> Option<Vec<&'static str>> {
        match self {
            SettingKey::Output => Some(OutputMode::names()),
            SettingKey::ErrorOutput => Some(Self::ERROR_OUTPUTS.to_vec()),
            SettingKey::HelpMode => Some(Self::HELP_MODES.to_vec()),
            _ => None,
        }
    }
}
