use strato_engine::ValidationOutcome;
use uuid::Uuid;

/// A workspace site URL: https, with a host.
pub(crate) fn is_valid_workspace_url(url: &str) -> ValidationOutcome {
    let host = url.strip_prefix("https://").unwrap_or_default();
    if host.is_empty() || host.starts_with('/') {
        return ValidationOutcome::failure(format!("{} is not a valid workspace URL", url));
    }
    ValidationOutcome::Valid
}

pub(crate) fn is_valid_guid(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}
