//! Identifier cleaning for matched schema and object names

use regex::Captures;

/// Characters removed from a matched identifier
const QUOTE_CHARS: [char; 3] = ['"', '`', '\''];

/// Cleaned schema and object name taken from a detector match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifiers {
    pub schema: Option<String>,
    pub name: Option<String>,
}

impl Identifiers {
    /// Read the `schema` group and the `table` (or else `object`) group
    pub fn from_captures(captures: &Captures<'_>) -> Self {
        let schema = captures.name("schema").map(|m| m.as_str());
        let name = captures
            .name("table")
            .or_else(|| captures.name("object"))
            .map(|m| m.as_str());

        Self {
            schema: clean_identifier(schema),
            name: clean_identifier(name),
        }
    }
}

/// Strip every quote character and one trailing `.` from a raw token.
///
/// Doubled quotes are removed rather than collapsed, so `"user""table"`
/// becomes `usertable`. A token that is empty after cleaning is treated as
/// absent.
pub fn clean_identifier(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|s| !s.is_empty())?;
    let mut cleaned: String = raw.chars().filter(|c| !QUOTE_CHARS.contains(c)).collect();
    if cleaned.ends_with('.') {
        cleaned.pop();
    }
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
