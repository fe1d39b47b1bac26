//! Statement quoting for password change commands
//!
//! Neither MySQL's `ALTER USER` nor PostgreSQL's `ALTER ROLE` accepts bind
//! parameters, so both the account name and the password are quoted client
//! side following each server's documented literal and identifier rules.
//!
//! Output buffers are sized up front for the worst case so escaping never
//! reallocates and leaves a stray copy of the password on the heap; callers
//! wrap the finished statement in [`zeroize::Zeroizing`].

use thiserror::Error;

/// Quoting failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// PostgreSQL text cannot contain NUL
    #[error("{what} contains a NUL byte")]
    NulByte {
        /// Which value was rejected (`"username"`, `"password"`)
        what: &'static str,
    },
}

/// How a MySQL session interprets backslashes in string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MySqlEscaping {
    /// Default server behaviour: backslash starts an escape sequence
    #[default]
    Backslash,
    /// `sql_mode` contains `NO_BACKSLASH_ESCAPES`: only `'` needs doubling
    QuoteDoubling,
}

fn worst_case_capacity(value: &str) -> usize {
    value.len() * 2 + 4
}

/// Single-quoted MySQL string literal
///
/// With [`MySqlEscaping::Backslash`] this escapes the same characters as
/// `mysql_real_escape_string`.
pub fn mysql_literal(value: &str, escaping: MySqlEscaping) -> String {
    let mut out = String::with_capacity(worst_case_capacity(value));
    out.push('\'');
    match escaping {
        MySqlEscaping::Backslash => {
            for ch in value.chars() {
                match ch {
                    '\0' => out.push_str("\\0"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\\' => out.push_str("\\\\"),
                    '\'' => out.push_str("\\'"),
                    '"' => out.push_str("\\\""),
                    '\x1a' => out.push_str("\\Z"),
                    other => out.push(other),
                }
            }
        }
        MySqlEscaping::QuoteDoubling => {
            for ch in value.chars() {
                if ch == '\'' {
                    out.push_str("''");
                } else {
                    out.push(ch);
                }
            }
        }
    }
    out.push('\'');
    out
}

/// Double-quoted PostgreSQL identifier
pub fn postgres_identifier(ident: &str) -> Result<String, QuoteError> {
    if ident.contains('\0') {
        return Err(QuoteError::NulByte { what: "username" });
    }

    let mut out = String::with_capacity(worst_case_capacity(ident));
    out.push('"');
    for ch in ident.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
    Ok(out)
}

/// PostgreSQL string literal, valid whatever `standard_conforming_strings`
/// is set to: values containing a backslash use the `E'...'` form.
pub fn postgres_literal(value: &str) -> Result<String, QuoteError> {
    if value.contains('\0') {
        return Err(QuoteError::NulByte { what: "password" });
    }

    let escape_form = value.contains('\\');
    let mut out = String::with_capacity(worst_case_capacity(value));
    if escape_form {
        out.push('E');
    }
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('\'');
    Ok(out)
}
