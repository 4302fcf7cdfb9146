use async_trait::async_trait;
use is_terminal::IsTerminal;
use std::io::{self, Write};
use strato_types::Result;

/// Result of the confirmation workflow. `Aborted` is not an error: the
/// command performs no side effect and exits successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Confirmed,
    Aborted,
}

/// Pluggable yes/no prompt, so tests can substitute deterministic
/// answers. `default` is returned when no interactive answer can be
/// obtained.
#[async_trait]
pub trait PromptProvider: Send + Sync {
    async fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Prompts on the terminal. The question goes to stderr so that piped
/// stdout stays clean result data; a non-interactive stdin takes the
/// default answer.
pub struct ConsolePrompt;

#[async_trait]
impl PromptProvider for ConsolePrompt {
    async fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        if !io::stdin().is_terminal() {
            return Ok(default);
        }

        let hint = if default { "[Y/n]" } else { "[y/N]" };
        eprint!("{} {} ", message, hint);
        io::stderr().flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let answer = line.trim().to_ascii_lowercase();
        if answer.is_empty() {
            return Ok(default);
        }
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }
}

/// Always answers the same way. Test collaborator.
pub struct StaticPrompt {
    pub answer: bool,
}

#[async_trait]
impl PromptProvider for StaticPrompt {
    async fn confirm(&self, _message: &str, _default: bool) -> Result<bool> {
        Ok(self.answer)
    }
}
