use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One anonymized usage record, appended per top-level invocation attempt.
///
/// Property values are derived from option presence, never from option
/// content: a record says `title: true`, not which title was passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub command_name: String,
    pub timestamp: DateTime<Utc>,
    pub properties: Map<String, Value>,
}

impl TelemetryRecord {
    pub fn new(command_name: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self {
            command_name: command_name.into(),
            timestamp: Utc::now(),
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_command_name_and_properties() {
        let mut properties = Map::new();
        properties.insert("id".to_string(), Value::Bool(false));
        properties.insert("title".to_string(), Value::Bool(true));

        let record = TelemetryRecord::new("plan remove", properties);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["command_name"], "plan remove");
        assert_eq!(json["properties"]["title"], true);
        assert_eq!(json["properties"]["id"], false);
    }
}
