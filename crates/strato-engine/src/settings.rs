use crate::validate::ValidationOutcome;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};
use strato_types::{Error, Result, SettingKey};

/// Resolve the strato workspace directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. STRATO_PATH environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.strato (fallback for systems without XDG)
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("STRATO_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("strato"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".strato"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Durable key/value storage underneath the settings store. The store
/// owns the typed contract; the backend only moves bytes.
pub trait SettingsBackend: Send + Sync {
    fn load(&self) -> Result<Map<String, Value>>;
    fn save(&self, values: &Map<String, Value>) -> Result<()>;
}

/// TOML file persistence, the production backend.
pub struct TomlFileBackend {
    path: PathBuf,
}

impl TomlFileBackend {
    pub fn new(path: PathBuf) -> Self {
        TomlFileBackend { path }
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path(None)?.join("config.toml"))
    }
}

impl SettingsBackend for TomlFileBackend {
    fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let table: toml::Table =
            toml::from_str(&content).map_err(|err| Error::Config(err.to_string()))?;
        let value =
            serde_json::to_value(table).map_err(|err| Error::Config(err.to_string()))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    fn save(&self, values: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(values).map_err(|err| Error::Config(err.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory persistence. Test collaborator.
#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<Map<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<Map<String, Value>> {
        Ok(self.values.lock().expect("backend lock poisoned").clone())
    }

    fn save(&self, values: &Map<String, Value>) -> Result<()> {
        *self.values.lock().expect("backend lock poisoned") = values.clone();
        Ok(())
    }
}

/// Typed get/set/default semantics over the persisted key/value store.
///
/// Only keys from the closed [`SettingKey`] enum can be written; typed
/// values are validated and coerced before they reach `set`.
pub struct SettingsStore {
    backend: Box<dyn SettingsBackend>,
    values: RwLock<Map<String, Value>>,
}

impl SettingsStore {
    pub fn open(backend: Box<dyn SettingsBackend>) -> Result<Self> {
        let values = backend.load()?;
        Ok(SettingsStore {
            backend,
            values: RwLock::new(values),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Box::new(TomlFileBackend::new(
            TomlFileBackend::default_path()?,
        )))
    }

    pub fn get(&self, key: SettingKey) -> Option<Value> {
        self.values
            .read()
            .expect("settings lock poisoned")
            .get(key.as_str())
            .cloned()
    }

    pub fn get_with_default(&self, key: SettingKey, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Boolean setting with an explicit fallback for unset keys.
    pub fn get_bool_or(&self, key: SettingKey, default: bool) -> bool {
        self.get(key)
            .and_then(|value| value.as_bool())
            .unwrap_or(default)
    }

    pub fn get_bool(&self, key: SettingKey) -> bool {
        self.get_bool_or(key, false)
    }

    pub fn set(&self, key: SettingKey, value: Value) -> Result<()> {
        let mut values = self.values.write().expect("settings lock poisoned");
        values.insert(key.as_str().to_string(), value);
        self.backend.save(&values)
    }

    /// `set` keyed by raw name; unknown names are rejected, never
    /// silently dropped.
    pub fn set_by_name(&self, name: &str, value: Value) -> Result<()> {
        let key = SettingKey::from_name(name).ok_or_else(|| {
            Error::Config(format!(
                "{} is not a valid setting. Allowed values: {}",
                name,
                SettingKey::names().join(", ")
            ))
        })?;
        self.set(key, value)
    }

    /// Everything currently persisted.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.values.read().expect("settings lock poisoned").clone()
    }
}

/// Check a raw value literal against the key's value domain. Runs in
/// validators, before `set` is ever invoked.
pub fn validate_value(key: SettingKey, raw: &str) -> ValidationOutcome {
    if key.is_boolean() && raw != "true" && raw != "false" {
        return ValidationOutcome::failure(format!(
            "{} is not a valid value for the option {}. Allowed values: true, false",
            raw,
            key.as_str()
        ));
    }

    if let Some(allowed) = key.allowed_values()
        && !allowed.contains(&raw)
    {
        return ValidationOutcome::failure(format!(
            "{} is not a valid value for the option {}. Allowed values: {}",
            raw,
            key.as_str(),
            allowed.join(", ")
        ));
    }

    ValidationOutcome::Valid
}

/// Coerce a validated raw literal into its stored representation.
pub fn coerce_value(key: SettingKey, raw: &str) -> Value {
    if key.is_boolean() {
        Value::Bool(raw == "true")
    } else {
        Value::String(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn memory_store() -> SettingsStore {
        SettingsStore::open(Box::new(MemoryBackend::new())).unwrap()
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = memory_store();
        store.set(SettingKey::Output, json!("json")).unwrap();
        assert_eq!(store.get(SettingKey::Output), Some(json!("json")));
    }

    #[test]
    fn get_with_default_falls_back_for_unset_keys() {
        let store = memory_store();
        assert_eq!(
            store.get_with_default(SettingKey::HelpMode, json!("full")),
            json!("full")
        );
        assert!(store.get_bool_or(SettingKey::CsvHeader, true));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let store = memory_store();
        let err = store.set_by_name("proxyUrl", json!("x")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("proxyUrl is not a valid setting"));
        assert!(message.contains("output, errorOutput"));
    }

    #[test]
    fn boolean_values_validate_and_coerce() {
        assert!(validate_value(SettingKey::AutoConfirm, "true").is_valid());
        assert!(validate_value(SettingKey::AutoConfirm, "false").is_valid());
        assert!(!validate_value(SettingKey::AutoConfirm, "yes").is_valid());

        assert_eq!(coerce_value(SettingKey::AutoConfirm, "true"), json!(true));
        assert_eq!(coerce_value(SettingKey::AutoConfirm, "false"), json!(false));
    }

    #[test]
    fn enum_keys_validate_against_allowed_values() {
        assert!(validate_value(SettingKey::Output, "csv").is_valid());
        let outcome = validate_value(SettingKey::Output, "yaml");
        assert_eq!(
            outcome,
            ValidationOutcome::Invalid(
                "yaml is not a valid value for the option output. Allowed values: text, json, csv, md, none"
                    .to_string()
            )
        );
    }

    #[test]
    fn toml_backend_round_trips_through_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        {
            let store =
                SettingsStore::open(Box::new(TomlFileBackend::new(path.clone()))).unwrap();
            store.set(SettingKey::Output, json!("md")).unwrap();
            store.set(SettingKey::AutoConfirm, json!(true)).unwrap();
        }

        let reopened =
            SettingsStore::open(Box::new(TomlFileBackend::new(path))).unwrap();
        assert_eq!(reopened.get(SettingKey::Output), Some(json!("md")));
        assert_eq!(reopened.get(SettingKey::AutoConfirm), Some(json!(true)));
    }

    #[test]
    fn explicit_workspace_path_wins() {
        let resolved = resolve_workspace_path(Some("/tmp/strato-test")).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/strato-test"));
    }
}
