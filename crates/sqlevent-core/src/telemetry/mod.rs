//! Analytics payloads
//!
//! Shapes an [`SqlEvent`] the way the telemetry pipeline expects it:
//! `{ "action": "<kind>", "properties": { "method", "schema_name", ... } }`.

use serde::{Deserialize, Serialize};

use crate::event::{EventKind, SqlEvent};

/// Method reported for SQL typed into an editor
pub const DEFAULT_METHOD: &str = "sql_editor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub action: EventKind,
    pub properties: TelemetryProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryProperties {
    /// Where the SQL came from (e.g., "sql_editor", "table_editor")
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
}

impl TelemetryEvent {
    pub fn from_sql_event(event: &SqlEvent, method: impl Into<String>) -> Self {
        let (table_name, object_name) = match event {
            SqlEvent::Table(table) => (table.table_name.clone(), None),
            SqlEvent::Object(object) => (None, object.object_name.clone()),
        };

        Self {
            action: event.kind(),
            properties: TelemetryProperties {
                method: method.into(),
                schema_name: event.schema().map(str::to_string),
                table_name,
                object_name,
            },
        }
    }
}

/// Convert parsed events into payloads sharing one `method`
pub fn to_telemetry_events(events: &[SqlEvent], method: &str) -> Vec<TelemetryEvent> {
    events
        .iter()
        .map(|event| TelemetryEvent::from_sql_event(event, method))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ObjectEvent, ObjectEventKind, TableEvent, TableEventKind};

    #[test]
    fn test_table_event_payload() {
        let event: SqlEvent = TableEvent::new(
            TableEventKind::TableCreated,
            Some("public".into()),
            Some("users".into()),
        )
        .into();
        let payload = TelemetryEvent::from_sql_event(&event, DEFAULT_METHOD);

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({
                "action": "table_created",
                "properties": {
                    "method": "sql_editor",
                    "schema_name": "public",
                    "table_name": "users"
                }
            })
        );
    }

    #[test]
    fn test_object_event_payload() {
        let event: SqlEvent =
            ObjectEvent::new(ObjectEventKind::TriggerCreated, None, Some("audit".into())).into();
        let payload = TelemetryEvent::from_sql_event(&event, "migration");

        assert_eq!(payload.action, EventKind::TriggerCreated);
        assert_eq!(payload.properties.method, "migration");
        assert_eq!(payload.properties.schema_name, None);
        assert_eq!(payload.properties.table_name, None);
        assert_eq!(payload.properties.object_name.as_deref(), Some("audit"));
    }

    #[test]
    fn test_to_telemetry_events_preserves_order() {
        let events: Vec<SqlEvent> = vec![
            TableEvent::new(TableEventKind::TableCreated, None, Some("a".into())).into(),
            ObjectEvent::new(ObjectEventKind::ViewCreated, None, Some("b".into())).into(),
        ];
        let payloads = to_telemetry_events(&events, DEFAULT_METHOD);
        let actions: Vec<_> = payloads.iter().map(|p| p.action).collect();
        assert_eq!(actions, vec![EventKind::TableCreated, EventKind::ViewCreated]);
    }
}
