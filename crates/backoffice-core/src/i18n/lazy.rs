//! Lazy translation strings.
//!
//! [`LazyString`] defers the translation lookup until the string is actually
//! displayed. This matters for module-level constants and endpoint names
//! that must be declared before any language is active.

use std::fmt;

/// A lazily-translated string.
///
/// The translation is evaluated each time `Display::fmt` or
/// [`evaluate`](LazyString::evaluate) is called, using whatever language is
/// active on the calling thread at that moment.
#[derive(Clone)]
pub struct LazyString {
    msgid: String,
}

impl LazyString {
    /// Creates a new `LazyString` with the given message ID.
    pub const fn new(msgid: String) -> Self {
        Self { msgid }
    }

    /// Returns the message ID (the untranslated string).
    pub fn msgid(&self) -> &str {
        &self.msgid
    }

    /// Evaluates the translation using the current thread's active language.
    pub fn evaluate(&self) -> String {
        super::gettext(&self.msgid)
    }
}

impl fmt::Display for LazyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.evaluate())
    }
}

impl fmt::Debug for LazyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyString")
            .field("msgid", &self.msgid)
            .finish()
    }
}

impl PartialEq for LazyString {
    fn eq(&self, other: &Self) -> bool {
        self.msgid == other.msgid
    }
}

impl Eq for LazyString {}

impl From<LazyString> for String {
    fn from(lazy: LazyString) -> Self {
        lazy.evaluate()
    }
}
