//! Translation catalog: a process-wide registry of message translations
//! keyed by language code.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

/// The global translation catalog registry, keyed by language code.
static CATALOGS: Lazy<RwLock<HashMap<String, HashMap<String, String>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers message translations for a language.
///
/// Each entry is a `(msgid, translated)` pair. Existing entries for the
/// language are merged, overwriting duplicates.
///
/// # Examples
///
/// ```
/// use backoffice_core::i18n::catalog;
///
/// catalog::register_translations("fr", vec![("Log in", "Connexion")]);
/// ```
pub fn register_translations(language: &str, entries: Vec<(&str, &str)>) {
    let mut catalogs = CATALOGS.write().expect("catalog lock poisoned");
    let catalog = catalogs.entry(language.to_string()).or_default();
    for (msgid, translated) in entries {
        catalog.insert(msgid.to_string(), translated.to_string());
    }
}

/// Looks up a translation for the given language and message id.
pub fn translate(language: &str, msgid: &str) -> Option<String> {
    let catalogs = CATALOGS.read().expect("catalog lock poisoned");
    catalogs.get(language).and_then(|c| c.get(msgid).cloned())
}

/// Returns the full message catalog for a language, sorted by message id.
///
/// Languages without registered translations yield an empty catalog.
pub fn raw_catalog(language: &str) -> Vec<(String, String)> {
    let catalogs = CATALOGS.read().expect("catalog lock poisoned");
    let mut entries: Vec<(String, String)> = catalogs
        .get(language)
        .map(|c| c.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();
    entries.sort();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_translate() {
        register_translations("catalog_test_de", vec![("Yes", "Ja"), ("No", "Nein")]);
        assert_eq!(translate("catalog_test_de", "Yes"), Some("Ja".to_string()));
        assert_eq!(translate("catalog_test_de", "No"), Some("Nein".to_string()));
        assert_eq!(translate("catalog_test_de", "Maybe"), None);
    }

    #[test]
    fn test_translate_unknown_language() {
        assert_eq!(translate("catalog_test_missing", "Yes"), None);
    }

    #[test]
    fn test_register_merges() {
        register_translations("catalog_test_merge", vec![("One", "Eins")]);
        register_translations("catalog_test_merge", vec![("Two", "Zwei")]);
        assert_eq!(
            translate("catalog_test_merge", "One"),
            Some("Eins".to_string())
        );
        assert_eq!(
            translate("catalog_test_merge", "Two"),
            Some("Zwei".to_string())
        );
    }

    #[test]
    fn test_raw_catalog_sorted() {
        register_translations("catalog_test_raw", vec![("b", "2"), ("a", "1")]);
        let entries = raw_catalog("catalog_test_raw");
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_raw_catalog_empty_for_unknown() {
        assert!(raw_catalog("catalog_test_nothing").is_empty());
    }
}
