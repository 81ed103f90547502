//! Error types
//!
//! Classifying SQL never fails; these errors only cover the string
//! conversions callers use to name event kinds.

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum Error {
    /// A string did not name any known event kind
    #[error("unknown event kind: '{0}'")]
    #[diagnostic(
        code(sqlevent::unknown_kind),
        help(
            "supported kinds: table_created, table_data_inserted, table_rls_enabled, \
             function_created, trigger_created, view_created"
        )
    )]
    UnknownEventKind(String),
}
