//! Pattern detectors
//!
//! Each detector recognizes one SQL construct in a single statement and
//! extracts the (optionally schema-qualified) name it touches. Matching is
//! case-insensitive and tolerant of any whitespace between keywords.
//!
//! All patterns run on the `regex` crate, whose engines are linear in the
//! input length, so adversarial statements cannot trigger catastrophic
//! backtracking.

mod ident;

use std::sync::LazyLock;

use regex::Regex;

use crate::event::{
    EventKind, ObjectEvent, ObjectEventKind, SqlEvent, TableEvent, TableEventKind,
};

pub use ident::{clean_identifier, Identifiers};

/// Identifier token: ASCII word characters plus `"` and backtick quotes.
/// Non-ASCII identifiers are not matched.
const IDENT: &str = r#"[0-9A-Za-z_"`]+"#;

/// Compile a case-insensitive detector pattern.
///
/// `{schema}` expands to an optional `schema.` capture (separator included),
/// `{table}` and `{object}` to the name capture.
fn compile(template: &str) -> Regex {
    let pattern = template
        .replace("{schema}", &format!(r"(?P<schema>{IDENT}\.)?"))
        .replace("{table}", &format!("(?P<table>{IDENT})"))
        .replace("{object}", &format!("(?P<object>{IDENT})"));
    Regex::new(&format!("(?i){pattern}")).expect("detector pattern must compile")
}

static CREATE_TABLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?{schema}{table}"),
        compile(r"CREATE\s+TEMP(?:ORARY)?\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?{schema}{table}"),
        compile(r"CREATE\s+UNLOGGED\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?{schema}{table}"),
    ]
});

static SELECT_INTO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"(?s)SELECT\s+.*?\s+INTO\s+{schema}{table}"),
        compile(r"CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?{schema}{table}\s+AS\s+SELECT"),
    ]
});

static INSERT_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![compile(r"INSERT\s+INTO\s+{schema}{table}")]);

static COPY_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![compile(r"COPY\s+{schema}{table}\s+FROM")]);

// Other ALTER TABLE clauses may sit between the table name and ENABLE, but
// only on the same line.
static ENABLE_RLS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        compile(r"ALTER\s+TABLE\s+{schema}{table}.*?ENABLE\s+ROW\s+LEVEL\s+SECURITY"),
        compile(r"ALTER\s+TABLE\s+{schema}{table}.*?ENABLE\s+RLS"),
    ]
});

static CREATE_FUNCTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![compile(
        r"CREATE\s+(?:OR\s+REPLACE\s+)?FUNCTION\s+{schema}{object}",
    )]
});

static CREATE_TRIGGER_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![compile(r"CREATE\s+(?:OR\s+REPLACE\s+)?TRIGGER\s+{object}")]);

static CREATE_VIEW_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![compile(
        r"CREATE\s+(?:OR\s+REPLACE\s+)?(?:MATERIALIZED\s+)?VIEW\s+{schema}{object}",
    )]
});

/// A single statement detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detector {
    CreateTable,
    SelectInto,
    Insert,
    Copy,
    EnableRls,
    CreateFunction,
    CreateTrigger,
    CreateView,
}

impl Detector {
    /// Detectors in the order they are tried against each statement
    pub const ALL: [Detector; 8] = [
        Detector::CreateTable,
        Detector::SelectInto,
        Detector::Insert,
        Detector::Copy,
        Detector::EnableRls,
        Detector::CreateFunction,
        Detector::CreateTrigger,
        Detector::CreateView,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Detector::CreateTable => "create-table",
            Detector::SelectInto => "select-into",
            Detector::Insert => "insert",
            Detector::Copy => "copy",
            Detector::EnableRls => "enable-rls",
            Detector::CreateFunction => "create-function",
            Detector::CreateTrigger => "create-trigger",
            Detector::CreateView => "create-view",
        }
    }

    /// Kind of event this detector produces
    pub fn kind(&self) -> EventKind {
        match self {
            Detector::CreateTable | Detector::SelectInto => EventKind::TableCreated,
            Detector::Insert | Detector::Copy => EventKind::TableDataInserted,
            Detector::EnableRls => EventKind::TableRlsEnabled,
            Detector::CreateFunction => EventKind::FunctionCreated,
            Detector::CreateTrigger => EventKind::TriggerCreated,
            Detector::CreateView => EventKind::ViewCreated,
        }
    }

    fn patterns(&self) -> &'static [Regex] {
        match self {
            Detector::CreateTable => CREATE_TABLE_PATTERNS.as_slice(),
            Detector::SelectInto => SELECT_INTO_PATTERNS.as_slice(),
            Detector::Insert => INSERT_PATTERNS.as_slice(),
            Detector::Copy => COPY_PATTERNS.as_slice(),
            Detector::EnableRls => ENABLE_RLS_PATTERNS.as_slice(),
            Detector::CreateFunction => CREATE_FUNCTION_PATTERNS.as_slice(),
            Detector::CreateTrigger => CREATE_TRIGGER_PATTERNS.as_slice(),
            Detector::CreateView => CREATE_VIEW_PATTERNS.as_slice(),
        }
    }

    /// Run this detector against one statement.
    ///
    /// Patterns are tried in order and the first match wins.
    pub fn detect(&self, statement: &str) -> Option<SqlEvent> {
        let captures = self
            .patterns()
            .iter()
            .find_map(|pattern| pattern.captures(statement))?;
        let Identifiers { schema, name } = Identifiers::from_captures(&captures);

        let event: SqlEvent = match self {
            Detector::CreateTable | Detector::SelectInto => {
                TableEvent::new(TableEventKind::TableCreated, schema, name).into()
            }
            Detector::Insert | Detector::Copy => {
                TableEvent::new(TableEventKind::TableDataInserted, schema, name).into()
            }
            Detector::EnableRls => {
                TableEvent::new(TableEventKind::TableRlsEnabled, schema, name).into()
            }
            Detector::CreateFunction => {
                ObjectEvent::new(ObjectEventKind::FunctionCreated, schema, name).into()
            }
            Detector::CreateTrigger => {
                ObjectEvent::new(ObjectEventKind::TriggerCreated, schema, name).into()
            }
            Detector::CreateView => {
                ObjectEvent::new(ObjectEventKind::ViewCreated, schema, name).into()
            }
        };
        Some(event)
    }
}

/// Classify one statement with the first detector that matches
pub fn detect_statement(statement: &str) -> Option<(Detector, SqlEvent)> {
    Detector::ALL
        .iter()
        .find_map(|detector| detector.detect(statement).map(|event| (*detector, event)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(kind: TableEventKind, schema: Option<&str>, name: &str) -> SqlEvent {
        TableEvent::new(kind, schema.map(String::from), Some(name.to_string())).into()
    }

    fn object(kind: ObjectEventKind, schema: Option<&str>, name: &str) -> SqlEvent {
        ObjectEvent::new(kind, schema.map(String::from), Some(name.to_string())).into()
    }

    #[test]
    fn test_create_table_basic() {
        assert_eq!(
            Detector::CreateTable.detect("CREATE TABLE users (id INT PRIMARY KEY)"),
            Some(table(TableEventKind::TableCreated, None, "users"))
        );
    }

    #[test]
    fn test_create_table_modifiers() {
        let cases = [
            "CREATE TABLE public.users (id INT)",
            "CREATE TABLE IF NOT EXISTS public.users (id INT)",
            "CREATE TEMP TABLE public.users (id INT)",
            "CREATE TEMPORARY TABLE public.users (id INT)",
            "CREATE UNLOGGED TABLE public.users (id INT)",
            "CREATE TEMP TABLE IF NOT EXISTS public.users (id INT)",
            "CREATE TEMPORARY TABLE IF NOT EXISTS public.users (id INT)",
            "CREATE UNLOGGED TABLE IF NOT EXISTS public.users (id INT)",
            "create   unlogged\n\ttable if  not exists public.users(id int)",
        ];
        for sql in cases {
            assert_eq!(
                Detector::CreateTable.detect(sql),
                Some(table(TableEventKind::TableCreated, Some("public"), "users")),
                "{}",
                sql
            );
        }
    }

    #[test]
    fn test_create_table_quoted_identifiers() {
        assert_eq!(
            Detector::CreateTable.detect(r#"CREATE TABLE "public"."user_table" (id INT)"#),
            Some(table(TableEventKind::TableCreated, Some("public"), "user_table"))
        );
        assert_eq!(
            Detector::CreateTable.detect("CREATE TABLE `users` (id INT)"),
            Some(table(TableEventKind::TableCreated, None, "users"))
        );
    }

    #[test]
    fn test_create_table_non_ascii_name_not_matched() {
        assert_eq!(Detector::CreateTable.detect("CREATE TABLE ユーザー (id INT)"), None);
    }

    #[test]
    fn test_create_table_no_match() {
        assert_eq!(Detector::CreateTable.detect("SELECT * FROM users"), None);
        assert_eq!(Detector::CreateTable.detect("CREATE TABL users"), None);
    }

    #[test]
    fn test_select_into() {
        assert_eq!(
            Detector::SelectInto.detect("SELECT * INTO new_users FROM users"),
            Some(table(TableEventKind::TableCreated, None, "new_users"))
        );
        assert_eq!(
            Detector::SelectInto.detect("SELECT id, name INTO public.new_users FROM users"),
            Some(table(TableEventKind::TableCreated, Some("public"), "new_users"))
        );
        assert_eq!(
            Detector::SelectInto.detect(r#"SELECT * INTO "backup"."users_2024" FROM users"#),
            Some(table(TableEventKind::TableCreated, Some("backup"), "users_2024"))
        );
    }

    #[test]
    fn test_select_into_spans_lines() {
        assert_eq!(
            Detector::SelectInto.detect("SELECT id,\n  name\nINTO archive\nFROM users"),
            Some(table(TableEventKind::TableCreated, None, "archive"))
        );
    }

    #[test]
    fn test_create_table_as_select() {
        assert_eq!(
            Detector::SelectInto.detect(
                "CREATE TABLE IF NOT EXISTS new_users AS SELECT * FROM users WHERE active = true"
            ),
            Some(table(TableEventKind::TableCreated, None, "new_users"))
        );
    }

    #[test]
    fn test_select_into_plain_select_no_match() {
        assert_eq!(Detector::SelectInto.detect("SELECT * FROM users"), None);
    }

    #[test]
    fn test_insert() {
        assert_eq!(
            Detector::Insert.detect("INSERT INTO public.users (name) VALUES ('John')"),
            Some(table(TableEventKind::TableDataInserted, Some("public"), "users"))
        );
        assert_eq!(
            Detector::Insert.detect(r#"INSERT INTO "auth"."users" (id) VALUES (1)"#),
            Some(table(TableEventKind::TableDataInserted, Some("auth"), "users"))
        );
        assert_eq!(Detector::Insert.detect(r#"UPDATE users SET name = "John""#), None);
    }

    #[test]
    fn test_copy_from_only() {
        assert_eq!(
            Detector::Copy.detect("COPY public.users FROM '/tmp/users.csv' WITH CSV HEADER"),
            Some(table(TableEventKind::TableDataInserted, Some("public"), "users"))
        );
        assert_eq!(
            Detector::Copy.detect(r#"COPY "auth"."users" FROM STDIN"#),
            Some(table(TableEventKind::TableDataInserted, Some("auth"), "users"))
        );
        assert_eq!(Detector::Copy.detect("COPY users TO '/tmp/users.csv'"), None);
    }

    #[test]
    fn test_enable_rls() {
        assert_eq!(
            Detector::EnableRls.detect("ALTER TABLE public.users ENABLE ROW LEVEL SECURITY"),
            Some(table(TableEventKind::TableRlsEnabled, Some("public"), "users"))
        );
        assert_eq!(
            Detector::EnableRls.detect("ALTER TABLE users ENABLE RLS"),
            Some(table(TableEventKind::TableRlsEnabled, None, "users"))
        );
        assert_eq!(
            Detector::EnableRls
                .detect("ALTER TABLE users ADD COLUMN test INT, ENABLE ROW LEVEL SECURITY"),
            Some(table(TableEventKind::TableRlsEnabled, None, "users"))
        );
        assert_eq!(
            Detector::EnableRls.detect("ALTER TABLE users ENABLE\nROW LEVEL SECURITY"),
            Some(table(TableEventKind::TableRlsEnabled, None, "users"))
        );
    }

    #[test]
    fn test_enable_rls_clauses_stop_at_line_break() {
        assert_eq!(
            Detector::EnableRls.detect("ALTER TABLE users\n  ENABLE ROW LEVEL SECURITY"),
            None
        );
        assert_eq!(
            Detector::EnableRls.detect("ALTER TABLE users ADD COLUMN x INT,\nENABLE RLS"),
            None
        );
    }

    #[test]
    fn test_disable_rls_no_match() {
        assert_eq!(
            Detector::EnableRls.detect("ALTER TABLE users DISABLE ROW LEVEL SECURITY"),
            None
        );
    }

    #[test]
    fn test_create_function() {
        assert_eq!(
            Detector::CreateFunction
                .detect("CREATE OR REPLACE FUNCTION public.handle_new_user() RETURNS trigger"),
            Some(object(
                ObjectEventKind::FunctionCreated,
                Some("public"),
                "handle_new_user"
            ))
        );
    }

    #[test]
    fn test_create_trigger_has_no_schema() {
        assert_eq!(
            Detector::CreateTrigger
                .detect("CREATE TRIGGER on_auth_user_created AFTER INSERT ON auth.users"),
            Some(object(
                ObjectEventKind::TriggerCreated,
                None,
                "on_auth_user_created"
            ))
        );
    }

    #[test]
    fn test_create_view() {
        assert_eq!(
            Detector::CreateView
                .detect("CREATE OR REPLACE MATERIALIZED VIEW reports.daily AS SELECT 1"),
            Some(object(ObjectEventKind::ViewCreated, Some("reports"), "daily"))
        );
        assert_eq!(
            Detector::CreateView.detect("create view user_view as select * from users"),
            Some(object(ObjectEventKind::ViewCreated, None, "user_view"))
        );
    }

    #[test]
    fn test_detector_kind_matches_detected_event() {
        let samples = [
            (Detector::CreateTable, "CREATE TABLE t (id INT)"),
            (Detector::SelectInto, "SELECT * INTO t FROM s"),
            (Detector::Insert, "INSERT INTO t VALUES (1)"),
            (Detector::Copy, "COPY t FROM STDIN"),
            (Detector::EnableRls, "ALTER TABLE t ENABLE RLS"),
            (Detector::CreateFunction, "CREATE FUNCTION f()"),
            (Detector::CreateTrigger, "CREATE TRIGGER tr"),
            (Detector::CreateView, "CREATE VIEW v AS SELECT 1"),
        ];
        for (detector, sql) in samples {
            let event = detector.detect(sql).unwrap();
            assert_eq!(event.kind(), detector.kind(), "{}", detector.name());
        }
    }

    #[test]
    fn test_detect_statement_priority() {
        // CREATE TABLE wins over the CREATE TABLE AS SELECT form
        let (detector, _) = detect_statement("CREATE TABLE backup AS SELECT * FROM users").unwrap();
        assert_eq!(detector, Detector::CreateTable);

        // SELECT INTO wins over INSERT when both appear
        let (detector, event) =
            detect_statement("SELECT 1 INTO scratch; INSERT INTO other VALUES (1)").unwrap();
        assert_eq!(detector, Detector::SelectInto);
        assert_eq!(event.name(), Some("scratch"));

        assert!(detect_statement("DROP TABLE users").is_none());
    }
}
