use crate::command::CommandArgs;
use crate::validate::ValidationOutcome;

/// Joint presence constraint over a group of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionSetMode {
    /// Exactly one of the named options must be present (mutual
    /// exclusion with a required pick). The default.
    #[default]
    ExactlyOne,
    /// One or more of the named options must be present.
    AtLeastOne,
    /// Either every named option is present, or none of them is.
    AllOrNone,
}

/// A declared group of options with a joint presence constraint.
///
/// Sets are checked before custom validators run, so validators can
/// assume the set invariants hold. Multiple sets on one command are
/// independent; all must pass.
#[derive(Debug, Clone)]
pub struct OptionSet {
    pub options: Vec<String>,
    pub mode: OptionSetMode,
}

impl OptionSet {
    pub fn exactly_one<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_mode(options, OptionSetMode::ExactlyOne)
    }

    pub fn at_least_one<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_mode(options, OptionSetMode::AtLeastOne)
    }

    pub fn all_or_none<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_mode(options, OptionSetMode::AllOrNone)
    }

    pub fn with_mode<I, S>(options: I, mode: OptionSetMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OptionSet {
            options: options.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    pub fn check(&self, args: &CommandArgs) -> ValidationOutcome {
        let present = self
            .options
            .iter()
            .filter(|name| args.has(name))
            .count();
        let names = self.options.join(", ");

        match self.mode {
            OptionSetMode::ExactlyOne => {
                if present == 0 {
                    ValidationOutcome::failure(format!(
                        "Specify one of the following options: {}.",
                        names
                    ))
                } else if present > 1 {
                    ValidationOutcome::failure(format!(
                        "Specify one of the following options: {}, but not multiple.",
                        names
                    ))
                } else {
                    ValidationOutcome::Valid
                }
            }
            OptionSetMode::AtLeastOne => {
                if present == 0 {
                    ValidationOutcome::failure(format!(
                        "Specify at least one of the following options: {}.",
                        names
                    ))
                } else {
                    ValidationOutcome::Valid
                }
            }
            OptionSetMode::AllOrNone => {
                if present == 0 || present == self.options.len() {
                    ValidationOutcome::Valid
                } else {
                    ValidationOutcome::failure(format!(
                        "Specify all or none of the following options: {}.",
                        names
                    ))
                }
            }
        }
    }
}
