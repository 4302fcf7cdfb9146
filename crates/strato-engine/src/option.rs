use strato_types::{Error, Result};

/// Coercion hint for an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// Presence-only switch, no value
    Flag,
    #[default]
    String,
    Bool,
    Number,
}

/// A single declared option on a command.
///
/// Options are written as declarative flag specs the way they appear in
/// help output: `-w, --webUrl <webUrl>` declares a required value,
/// `-i, --id [id]` an optional one, `--recycle` a bare switch.
#[derive(Debug, Clone)]
pub struct CommandOption {
    pub short: Option<char>,
    pub long: String,
    pub value_name: Option<String>,
    pub required: bool,
    pub kind: ValueKind,
    /// Candidate values for shell completion. Metadata only; candidates
    /// never constrain parsing.
    pub autocomplete: Option<Vec<String>>,
}

impl CommandOption {
    /// Parse a flag spec. Specs are literals written by command authors,
    /// so a malformed one is a bootstrap-time bug and panics.
    pub fn new(spec: &str) -> Self {
        match Self::parse(spec) {
            Ok(option) => option,
            Err(msg) => panic!("invalid option spec '{}': {}", spec, msg),
        }
    }

    pub fn parse(spec: &str) -> std::result::Result<Self, String> {
        let mut rest = spec.trim();
        let mut short = None;

        if rest.starts_with('-') && !rest.starts_with("--") {
            let (flag, tail) = rest
                .split_once(',')
                .ok_or("expected ',' after the short flag")?;
            let flag = flag.trim();
            if flag.len() != 2 {
                return Err(format!("'{}' is not a valid short flag", flag));
            }
            short = flag.chars().nth(1);
            rest = tail.trim();
        }

        let long_spec = rest
            .strip_prefix("--")
            .ok_or("expected a long flag starting with '--'")?;
        let (long, placeholder) = match long_spec.split_once(char::is_whitespace) {
            Some((long, placeholder)) => (long, placeholder.trim()),
            None => (long_spec, ""),
        };
        if long.is_empty() {
            return Err("the long flag name is empty".to_string());
        }

        let (value_name, required, kind) = if placeholder.is_empty() {
            (None, false, ValueKind::Flag)
        } else if let Some(name) = placeholder
            .strip_prefix('<')
            .and_then(|p| p.strip_suffix('>'))
        {
            (Some(name.to_string()), true, ValueKind::String)
        } else if let Some(name) = placeholder
            .strip_prefix('[')
            .and_then(|p| p.strip_suffix(']'))
        {
            (Some(name.to_string()), false, ValueKind::String)
        } else {
            return Err(format!(
                "'{}' is not a valid value placeholder; use <name> or [name]",
                placeholder
            ));
        };

        Ok(CommandOption {
            short,
            long: long.to_string(),
            value_name,
            required,
            kind,
            autocomplete: None,
        })
    }

    /// Mark the value as numeric; parsed into a JSON number.
    pub fn number(mut self) -> Self {
        self.kind = ValueKind::Number;
        self
    }

    /// Mark the value as a boolean literal (`true`/`false`).
    pub fn boolean(mut self) -> Self {
        self.kind = ValueKind::Bool;
        self
    }

    pub fn with_autocomplete<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.autocomplete = Some(candidates.into_iter().map(Into::into).collect());
        self
    }

    pub fn takes_value(&self) -> bool {
        self.kind != ValueKind::Flag
    }
}

/// No two options on one command may share a short or long flag name.
pub fn ensure_unique(options: &[CommandOption]) -> Result<()> {
    for (i, option) in options.iter().enumerate() {
        for other in &options[..i] {
            if option.long == other.long {
                return Err(Error::Config(format!(
                    "option '--{}' is declared more than once",
                    option.long
                )));
            }
            if option.short.is_some() && option.short == other.short {
                return Err(Error::Config(format!(
                    "options '--{}' and '--{}' share the short flag '-{}'",
                    other.long,
                    option.long,
                    option.short.unwrap_or_default()
                )));
            }
        }
    }
    Ok(())
}
