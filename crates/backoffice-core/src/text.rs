//! Display names and the text helpers used to derive them.
//!
//! [`DisplayName`] is an explicit sum type distinguishing literal strings
//! from lazily-translated ones, so callers can branch on laziness without a
//! runtime type sniff: structural identifiers (basenames) must never be
//! derived from a value whose rendering depends on the active locale.

use std::fmt;

use crate::i18n::lazy::LazyString;

/// The ordered list of view-class suffixes stripped when deriving a display
/// name. Checked in this order; at most one suffix is stripped (first match
/// wins), so `"FooViewSetView"` loses only the trailing `"View"`.
pub const VIEW_SUFFIXES: [&str; 4] = ["ViewSet", "View", "API", "Admin"];

/// A human-readable name that is either a literal string or a deferred
/// translation.
///
/// `raw()` never forces evaluation; `render()` does. Derivation logic that
/// feeds structural identifiers must use `raw()` only when the value is a
/// literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayName {
    /// An ordinary, already-evaluated string.
    Literal(String),
    /// A deferred translation, evaluated at render time.
    Lazy(LazyString),
}

impl DisplayName {
    /// Creates a literal display name.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates a lazily-translated display name from a message id.
    pub fn lazy(msgid: impl Into<String>) -> Self {
        Self::Lazy(LazyString::new(msgid.into()))
    }

    /// Returns `true` if this name is a deferred translation.
    pub const fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    /// Returns the underlying string without forcing evaluation.
    ///
    /// For lazy names this is the untranslated message id.
    pub fn raw(&self) -> &str {
        match self {
            Self::Literal(value) => value,
            Self::Lazy(lazy) => lazy.msgid(),
        }
    }

    /// Renders the name, evaluating the translation for lazy values.
    pub fn render(&self) -> String {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Lazy(lazy) => lazy.evaluate(),
        }
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<&str> for DisplayName {
    fn from(value: &str) -> Self {
        Self::literal(value)
    }
}

impl From<String> for DisplayName {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

impl From<LazyString> for DisplayName {
    fn from(value: LazyString) -> Self {
        Self::Lazy(value)
    }
}

/// Strips at most one of [`VIEW_SUFFIXES`] from the end of a type name.
///
/// Suffixes are checked in declaration order and only the first match is
/// stripped. A name consisting solely of a suffix is left untouched.
///
/// # Examples
///
/// ```
/// use backoffice_core::text::strip_view_suffix;
///
/// assert_eq!(strip_view_suffix("AppleViewSet"), "Apple");
/// assert_eq!(strip_view_suffix("FooAPI"), "Foo");
/// // "ViewSet" is checked first but does not match the trailing text,
/// // so only "View" is stripped.
/// assert_eq!(strip_view_suffix("FooViewSetView"), "FooViewSet");
/// ```
pub fn strip_view_suffix(name: &str) -> &str {
    for suffix in VIEW_SUFFIXES {
        if name.len() > suffix.len() && name.ends_with(suffix) {
            return &name[..name.len() - suffix.len()];
        }
    }
    name
}

/// Converts a camel-cased type name into space-separated words.
///
/// Runs of uppercase letters are kept together (`"HTTPResponse"` becomes
/// `"HTTP Response"`).
pub fn camelcase_to_spaces(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev != ' ' && (prev.is_lowercase() || (prev.is_uppercase() && next_is_lower)) {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out.trim().to_string()
}

/// Capitalizes a string: first character uppercased, the rest lowercased.
pub fn capitalize(content: &str) -> String {
    let mut chars = content.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    })
}

/// Humanizes an action name: underscores become spaces, then capitalized.
///
/// # Examples
///
/// ```
/// use backoffice_core::text::humanize;
///
/// assert_eq!(humanize("send_invoice"), "Send invoice");
/// ```
pub fn humanize(action: &str) -> String {
    capitalize(&action.replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_view_suffix_viewset() {
        assert_eq!(strip_view_suffix("AppleViewSet"), "Apple");
    }

    #[test]
    fn test_strip_view_suffix_api() {
        assert_eq!(strip_view_suffix("FooAPI"), "Foo");
    }

    #[test]
    fn test_strip_view_suffix_admin() {
        assert_eq!(strip_view_suffix("ReportAdmin"), "Report");
    }

    #[test]
    fn test_strip_view_suffix_order_is_pinned() {
        // Only one suffix is stripped, first match in declaration order.
        assert_eq!(strip_view_suffix("FooViewSetView"), "FooViewSet");
        assert_eq!(strip_view_suffix("FooAPIView"), "FooAPI");
    }

    #[test]
    fn test_strip_view_suffix_no_match() {
        assert_eq!(strip_view_suffix("Dashboard"), "Dashboard");
    }

    #[test]
    fn test_strip_view_suffix_bare_suffix_untouched() {
        assert_eq!(strip_view_suffix("View"), "View");
        assert_eq!(strip_view_suffix("ViewSet"), "ViewSet");
    }

    #[test]
    fn test_camelcase_to_spaces_basic() {
        assert_eq!(camelcase_to_spaces("CamelCase"), "Camel Case");
        assert_eq!(camelcase_to_spaces("Apple"), "Apple");
    }

    #[test]
    fn test_camelcase_to_spaces_acronym() {
        assert_eq!(camelcase_to_spaces("HTTPResponse"), "HTTP Response");
    }

    #[test]
    fn test_camelcase_to_spaces_lower_start() {
        assert_eq!(camelcase_to_spaces("camelCase"), "camel Case");
    }

    #[test]
    fn test_camelcase_to_spaces_multiword() {
        assert_eq!(camelcase_to_spaces("ChangePassword"), "Change Password");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("apple"), "Apple");
        assert_eq!(capitalize("APPLE"), "Apple");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("send_invoice"), "Send invoice");
        assert_eq!(humanize("bar"), "Bar");
    }

    #[test]
    fn test_display_name_literal() {
        let name = DisplayName::literal("Apple");
        assert!(!name.is_lazy());
        assert_eq!(name.raw(), "Apple");
        assert_eq!(name.render(), "Apple");
    }

    #[test]
    fn test_display_name_lazy_raw_does_not_translate() {
        crate::i18n::catalog::register_translations(
            "text_test_lang",
            vec![("Log in", "Logga in")],
        );
        let name = DisplayName::lazy("Log in");
        assert!(name.is_lazy());

        crate::i18n::activate("text_test_lang");
        // raw() returns the msgid regardless of the active language
        assert_eq!(name.raw(), "Log in");
        assert_eq!(name.render(), "Logga in");
        crate::i18n::deactivate();
    }

    #[test]
    fn test_display_name_from_str() {
        let name: DisplayName = "Apple".into();
        assert_eq!(name.raw(), "Apple");
    }

    #[test]
    fn test_display_name_display_impl() {
        crate::i18n::deactivate();
        let name = DisplayName::lazy("Untranslated");
        assert_eq!(name.to_string(), "Untranslated");
    }
}
