use crate::command::CommandArgs;
use futures::future::BoxFuture;
use std::future::Future;

/// Outcome of a single validator or option-set check.
///
/// The source of truth is the enum variant, not the message text: a
/// failure whose message happens to be the word "true" is still a
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
}

impl ValidationOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        ValidationOutcome::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// An asynchronous predicate over the parsed arguments. Validators may
/// perform I/O (e.g. a remote lookup), which is why they return a
/// future. Each validator receives its own copy of the arguments.
pub type Validator =
    Box<dyn Fn(CommandArgs) -> BoxFuture<'static, ValidationOutcome> + Send + Sync>;

/// Box an async function or closure as a [`Validator`].
pub fn validator<F, Fut>(f: F) -> Validator
where
    F: Fn(CommandArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ValidationOutcome> + Send + 'static,
{
    Box::new(move |args| -> BoxFuture<'static, ValidationOutcome> { Box::pin(f(args)) })
}

/// Run validators strictly in declaration order, stopping at the first
/// failure. The failing message is surfaced verbatim; later validators
/// never run.
pub async fn run_validators(
    validators: &[Validator],
    args: &CommandArgs,
) -> ValidationOutcome {
    for validator in validators {
        let outcome = validator(args.clone()).await;
        if !outcome.is_valid() {
            return outcome;
        }
    }
    ValidationOutcome::Valid
}
