//! sqlevent-core: SQL telemetry event classifier
//!
//! This library detects schema and data changing statements in a batch of
//! SQL text (table creation, inserts, RLS enablement, function, trigger and
//! view creation) and reports them as deduplicated telemetry events. It is a
//! best-effort classifier, not a SQL parser: unrecognized or malformed
//! statements simply produce no event.

pub mod detector;
pub mod error;
pub mod event;
pub mod parser;
pub mod splitter;
pub mod telemetry;

pub use detector::Detector;
pub use error::{Error, Result};
pub use event::{EventKind, ObjectEvent, ObjectEventKind, SqlEvent, TableEvent, TableEventKind};
pub use parser::{contains_event_kind, get_table_events, parse_sql_events, SqlEventParser};
pub use splitter::{split_statements, Splitter};
pub use telemetry::{TelemetryEvent, TelemetryProperties};
