//! Statement splitting
//!
//! Splits a SQL batch on `;` while leaving semicolons inside single- or
//! double-quoted literals alone. A doubled delimiter (`''` or `""`) inside a
//! literal is an escaped quote and does not close it.
//!
//! Dollar-quoted bodies (`$$ ... $$`) are not opaque unless the splitter is
//! built with [`Splitter::with_dollar_quoting`].

/// Quote-aware statement splitter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Splitter {
    dollar_quoting: bool,
}

impl Splitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `$$ ... $$` and `$tag$ ... $tag$` bodies as opaque literals
    pub fn with_dollar_quoting(mut self, enabled: bool) -> Self {
        self.dollar_quoting = enabled;
        self
    }

    pub fn dollar_quoting(&self) -> bool {
        self.dollar_quoting
    }

    /// Split `sql` into trimmed, non-empty statements borrowed from the input
    pub fn split<'a>(&self, sql: &'a str) -> Vec<&'a str> {
        let mut statements = Vec::new();
        let bytes = sql.as_bytes();
        let len = bytes.len();
        let mut start = 0;
        let mut i = 0;
        // Delimiter of the literal we are inside, if any
        let mut delimiter: Option<u8> = None;

        while i < len {
            let byte = bytes[i];
            match delimiter {
                Some(quote) => {
                    if byte == quote {
                        if i + 1 < len && bytes[i + 1] == quote {
                            i += 2; // escaped quote
                            continue;
                        }
                        delimiter = None;
                    }
                    i += 1;
                }
                None => match byte {
                    b'\'' | b'"' => {
                        delimiter = Some(byte);
                        i += 1;
                    }
                    b'$' if self.dollar_quoting => {
                        i = skip_dollar_quoted(sql, i);
                    }
                    b';' => {
                        push_statement(&mut statements, &sql[start..i]);
                        start = i + 1;
                        i += 1;
                    }
                    _ => {
                        i += 1;
                    }
                },
            }
        }

        // Trailing statement without a terminating semicolon
        push_statement(&mut statements, &sql[start..]);

        statements
    }
}

/// Split with the default configuration
pub fn split_statements(sql: &str) -> Vec<&str> {
    Splitter::new().split(sql)
}

fn push_statement<'a>(statements: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed);
    }
}

/// Returns the index just past a dollar-quoted body starting at `start`,
/// or `start + 1` when the `$` does not open one.
fn skip_dollar_quoted(sql: &str, start: usize) -> usize {
    let Some(tag_end) = find_dollar_tag_end(sql, start) else {
        return start + 1;
    };
    let tag = &sql[start..=tag_end];
    let body_start = tag_end + 1;
    match sql[body_start..].find(tag) {
        Some(close_pos) => body_start + close_pos + tag.len(),
        None => sql.len(), // unterminated, consume rest
    }
}

/// Find the closing `$` of a `$$` or `$tag$` opener at `start`.
/// Positional parameters such as `$1` are not tags.
fn find_dollar_tag_end(sql: &str, start: usize) -> Option<usize> {
    let bytes = sql.as_bytes();
    let len = bytes.len();
    let mut i = start + 1;
    if i < len && bytes[i] == b'$' {
        return Some(i);
    }
    if i >= len || !(bytes[i].is_ascii_alphabetic() || bytes[i] == b'_') {
        return None;
    }
    while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i < len && bytes[i] == b'$' {
        Some(i)
    } else {
        None
    }
}
