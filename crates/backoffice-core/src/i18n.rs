//! Internationalization support.
//!
//! Provides the pieces the toolkit needs from a translation framework:
//!
//! - **Translation catalog**: process-wide message translations per language.
//! - **Lazy translations**: [`gettext_lazy`] defers lookup until render time.
//! - **Language activation**: thread-local [`activate`] / [`deactivate`].
//!
//! ## Quick Start
//!
//! ```
//! use backoffice_core::i18n;
//!
//! i18n::catalog::register_translations("es", vec![("Log in", "Iniciar sesión")]);
//!
//! i18n::activate("es");
//! assert_eq!(i18n::gettext("Log in"), "Iniciar sesión");
//! i18n::deactivate();
//! assert_eq!(i18n::gettext("Log in"), "Log in");
//! ```

pub mod catalog;
pub mod lazy;

use std::cell::RefCell;

thread_local! {
    static CURRENT_LANGUAGE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Activates the given language code for the current thread.
pub fn activate(language_code: &str) {
    CURRENT_LANGUAGE.with(|cell| {
        *cell.borrow_mut() = Some(language_code.to_string());
    });
}

/// Deactivates the current thread's language setting, reverting to the
/// default (`"en"`).
pub fn deactivate() {
    CURRENT_LANGUAGE.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Returns the language code active on the current thread.
pub fn get_language() -> String {
    CURRENT_LANGUAGE.with(|cell| cell.borrow().clone().unwrap_or_else(|| "en".to_string()))
}

/// Translates a message using the current thread's active language.
///
/// If no translation is found, returns the original `msgid`.
pub fn gettext(msgid: &str) -> String {
    let lang = get_language();
    catalog::translate(&lang, msgid).unwrap_or_else(|| msgid.to_string())
}

/// Returns a lazy translation that defers `gettext` until the value is
/// rendered.
pub fn gettext_lazy(msgid: &str) -> lazy::LazyString {
    lazy::LazyString::new(msgid.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_get_language() {
        deactivate();
        assert_eq!(get_language(), "en");
        activate("fr");
        assert_eq!(get_language(), "fr");
        deactivate();
        assert_eq!(get_language(), "en");
    }

    #[test]
    fn test_gettext_no_translation() {
        deactivate();
        assert_eq!(gettext("untranslated"), "untranslated");
    }

    #[test]
    fn test_gettext_with_translation() {
        deactivate();
        catalog::register_translations("i18n_test_sv", vec![("Log out", "Logga ut")]);
        activate("i18n_test_sv");
        assert_eq!(gettext("Log out"), "Logga ut");
        deactivate();
        assert_eq!(gettext("Log out"), "Log out");
    }

    #[test]
    fn test_gettext_lazy_defers() {
        deactivate();
        catalog::register_translations("i18n_test_it", vec![("Goodbye", "Arrivederci")]);
        let lazy = gettext_lazy("Goodbye");
        assert_eq!(lazy.to_string(), "Goodbye");
        activate("i18n_test_it");
        assert_eq!(lazy.to_string(), "Arrivederci");
        deactivate();
    }

    #[test]
    fn test_activate_unknown_language() {
        deactivate();
        activate("zz");
        assert_eq!(get_language(), "zz");
        assert_eq!(gettext("Hello"), "Hello");
        deactivate();
    }
}
