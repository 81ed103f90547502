//! Telemetry event model
//!
//! A classified statement becomes either a [`TableEvent`] or an
//! [`ObjectEvent`]. Both carry a `kind` discriminant, an optional schema
//! and an optional object name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Kinds of events that refer to a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableEventKind {
    TableCreated,
    TableDataInserted,
    TableRlsEnabled,
}

/// Kinds of events that refer to a function, trigger or view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectEventKind {
    FunctionCreated,
    TriggerCreated,
    ViewCreated,
}

/// Every event kind, table and object alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TableCreated,
    TableDataInserted,
    TableRlsEnabled,
    FunctionCreated,
    TriggerCreated,
    ViewCreated,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::TableCreated,
        EventKind::TableDataInserted,
        EventKind::TableRlsEnabled,
        EventKind::FunctionCreated,
        EventKind::TriggerCreated,
        EventKind::ViewCreated,
    ];

    /// Name used in analytics payloads (e.g., "table_created")
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TableCreated => "table_created",
            EventKind::TableDataInserted => "table_data_inserted",
            EventKind::TableRlsEnabled => "table_rls_enabled",
            EventKind::FunctionCreated => "function_created",
            EventKind::TriggerCreated => "trigger_created",
            EventKind::ViewCreated => "view_created",
        }
    }

    pub fn is_table_event(&self) -> bool {
        match self {
            EventKind::TableCreated | EventKind::TableDataInserted | EventKind::TableRlsEnabled => {
                true
            }
            EventKind::FunctionCreated | EventKind::TriggerCreated | EventKind::ViewCreated => {
                false
            }
        }
    }
}

impl From<TableEventKind> for EventKind {
    fn from(kind: TableEventKind) -> Self {
        match kind {
            TableEventKind::TableCreated => EventKind::TableCreated,
            TableEventKind::TableDataInserted => EventKind::TableDataInserted,
            TableEventKind::TableRlsEnabled => EventKind::TableRlsEnabled,
        }
    }
}

impl From<ObjectEventKind> for EventKind {
    fn from(kind: ObjectEventKind) -> Self {
        match kind {
            ObjectEventKind::FunctionCreated => EventKind::FunctionCreated,
            ObjectEventKind::TriggerCreated => EventKind::TriggerCreated,
            ObjectEventKind::ViewCreated => EventKind::ViewCreated,
        }
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::UnknownEventKind(s.to_string()))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event about a table (creation, data insertion, RLS enablement)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TableEvent {
    #[serde(rename = "type")]
    pub kind: TableEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

impl TableEvent {
    pub fn new(kind: TableEventKind, schema: Option<String>, table_name: Option<String>) -> Self {
        Self {
            kind,
            schema,
            table_name,
        }
    }
}

/// Event about a non-table database object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectEvent {
    #[serde(rename = "type")]
    pub kind: ObjectEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
}

impl ObjectEvent {
    pub fn new(kind: ObjectEventKind, schema: Option<String>, object_name: Option<String>) -> Self {
        Self {
            kind,
            schema,
            object_name,
        }
    }
}

/// A telemetry event detected in one SQL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlEvent {
    Table(TableEvent),
    Object(ObjectEvent),
}

impl SqlEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SqlEvent::Table(event) => event.kind.into(),
            SqlEvent::Object(event) => event.kind.into(),
        }
    }

    pub fn schema(&self) -> Option<&str> {
        match self {
            SqlEvent::Table(event) => event.schema.as_deref(),
            SqlEvent::Object(event) => event.schema.as_deref(),
        }
    }

    /// Table name for table events, object name otherwise
    pub fn name(&self) -> Option<&str> {
        match self {
            SqlEvent::Table(event) => event.table_name.as_deref(),
            SqlEvent::Object(event) => event.object_name.as_deref(),
        }
    }

    pub fn as_table(&self) -> Option<&TableEvent> {
        match self {
            SqlEvent::Table(event) => Some(event),
            SqlEvent::Object(_) => None,
        }
    }

    pub fn into_table(self) -> Option<TableEvent> {
        match self {
            SqlEvent::Table(event) => Some(event),
            SqlEvent::Object(_) => None,
        }
    }

    /// Identity used to drop repeated events within one parse
    pub fn dedup_key(&self) -> EventKey {
        EventKey {
            kind: self.kind(),
            schema: self.schema().unwrap_or_default().to_string(),
            name: self.name().unwrap_or_default().to_string(),
        }
    }
}

impl From<TableEvent> for SqlEvent {
    fn from(event: TableEvent) -> Self {
        SqlEvent::Table(event)
    }
}

impl From<ObjectEvent> for SqlEvent {
    fn from(event: ObjectEvent) -> Self {
        SqlEvent::Object(event)
    }
}

impl fmt::Display for SqlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        match (self.schema(), self.name()) {
            (Some(schema), Some(name)) => write!(f, " {}.{}", schema, name),
            (None, Some(name)) => write!(f, " {}", name),
            (Some(schema), None) => write!(f, " {}.", schema),
            (None, None) => Ok(()),
        }
    }
}

/// Deduplication key: `(kind, schema or "", name or "")`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub kind: EventKind,
    pub schema: String,
    pub name: String,
}
