//! Validation and orchestration between the HTTP handlers and the store.
//! Services are synchronous; handlers call them on the blocking pool.

pub mod accounts;
pub mod messages;

pub use accounts::{AccountError, AccountService};
pub use messages::{MessageError, MessageService};

/// Whitespace for blank and length checks. No-break spaces and NEL count
/// as content; the information separators U+001C..U+001F do not.
pub(crate) fn is_space(c: char) -> bool {
    match c {
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{0085}' => false,
        '\u{001C}'..='\u{001F}' => true,
        c => c.is_whitespace(),
    }
}

pub(crate) fn trim_space(s: &str) -> &str {
    s.trim_matches(is_space)
}
