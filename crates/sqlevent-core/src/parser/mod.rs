//! Top-level event parsing
//!
//! Splits a SQL batch into statements, classifies each statement with the
//! first matching detector, and drops repeated events.

use indexmap::IndexMap;

use crate::detector::detect_statement;
use crate::event::{EventKey, EventKind, SqlEvent, TableEvent};
use crate::splitter::Splitter;

/// SQL event parser
///
/// Holds only splitter configuration; every call is independent and the
/// output depends on the input text alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqlEventParser {
    splitter: Splitter,
}

impl SqlEventParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_splitter(splitter: Splitter) -> Self {
        Self { splitter }
    }

    /// Treat dollar-quoted bodies as opaque when splitting
    pub fn with_dollar_quoting(mut self, enabled: bool) -> Self {
        self.splitter = self.splitter.with_dollar_quoting(enabled);
        self
    }

    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }

    /// Statements as the parser sees them
    pub fn split_statements<'a>(&self, sql: &'a str) -> Vec<&'a str> {
        self.splitter.split(sql)
    }

    /// Parse SQL and return deduplicated events in statement order
    pub fn parse_sql_events(&self, sql: &str) -> Vec<SqlEvent> {
        let statements = self.splitter.split(sql);
        let statement_count = statements.len();

        let events = statements.into_iter().filter_map(|statement| {
            let (detector, event) = detect_statement(statement)?;
            tracing::trace!(detector = detector.name(), %event, "statement classified");
            Some(event)
        });
        let events = deduplicate_events(events);

        tracing::debug!(
            statements = statement_count,
            events = events.len(),
            "parsed SQL events"
        );
        events
    }

    /// Only the table events of [`parse_sql_events`](Self::parse_sql_events)
    pub fn get_table_events(&self, sql: &str) -> Vec<TableEvent> {
        self.parse_sql_events(sql)
            .into_iter()
            .filter_map(SqlEvent::into_table)
            .collect()
    }

    /// Whether any event parsed from `sql` has one of `kinds`
    pub fn contains_event_kind(&self, sql: &str, kinds: &[EventKind]) -> bool {
        self.parse_sql_events(sql)
            .iter()
            .any(|event| kinds.contains(&event.kind()))
    }
}

/// Keep the first event for each `(kind, schema, name)` key, in order
pub fn deduplicate_events(events: impl IntoIterator<Item = SqlEvent>) -> Vec<SqlEvent> {
    let mut unique: IndexMap<EventKey, SqlEvent> = IndexMap::new();
    for event in events {
        unique.entry(event.dedup_key()).or_insert(event);
    }
    unique.into_values().collect()
}

/// Parse with the default parser
pub fn parse_sql_events(sql: &str) -> Vec<SqlEvent> {
    SqlEventParser::new().parse_sql_events(sql)
}

/// Table events parsed with the default parser
pub fn get_table_events(sql: &str) -> Vec<TableEvent> {
    SqlEventParser::new().get_table_events(sql)
}

/// Kind check with the default parser
pub fn contains_event_kind(sql: &str, kinds: &[EventKind]) -> bool {
    SqlEventParser::new().contains_event_kind(sql, kinds)
}
