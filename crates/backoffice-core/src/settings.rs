//! Site configuration.
//!
//! This module provides the [`SiteSettings`] struct, which holds the
//! branding and runtime configuration for a backoffice deployment. Settings
//! can be built programmatically or read from `BACKOFFICE_*` environment
//! variables via [`SiteSettings::from_env`].

use std::env;

use serde::{Deserialize, Serialize};

/// Horizontal alignment of the site logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoAlign {
    /// Logo left-aligned in the header.
    Left,
    /// Logo centered in the header.
    Middle,
}

/// The complete set of site settings.
///
/// Branding fields are exposed to templates and to the admin context so a
/// deployment can restyle the interface without code changes.
///
/// # Examples
///
/// ```
/// use backoffice_core::settings::SiteSettings;
///
/// let settings = SiteSettings::default();
/// assert_eq!(settings.site_title, "Backoffice");
/// assert_eq!(settings.primary_color, "#34A77B");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    // ── Branding ─────────────────────────────────────────────────────
    /// The title shown in the browser tab.
    pub site_title: String,
    /// The header shown at the top of every admin page.
    pub site_header: String,
    /// The title of the admin index page.
    pub index_title: String,
    /// Primary brand color, as a CSS hex value.
    pub primary_color: String,
    /// Secondary brand color, as a CSS hex value.
    pub secondary_color: String,
    /// Optional URL of the site logo.
    pub logo: Option<String>,
    /// Horizontal alignment of the logo.
    pub logo_align: LogoAlign,
    /// Inline CSS applied to the logo element.
    pub logo_style: Option<String>,
    /// Version string displayed in the admin footer.
    pub site_version: Option<String>,

    // ── Sessions ─────────────────────────────────────────────────────
    /// The name of the session cookie.
    pub session_cookie_name: String,

    // ── Runtime ──────────────────────────────────────────────────────
    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_title: "Backoffice".to_string(),
            site_header: "Backoffice".to_string(),
            index_title: "Home".to_string(),
            primary_color: "#34A77B".to_string(),
            secondary_color: "#20AA76".to_string(),
            logo: None,
            logo_align: LogoAlign::Left,
            logo_style: None,
            site_version: None,
            session_cookie_name: "sessionid".to_string(),
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

impl SiteSettings {
    /// Builds settings from `BACKOFFICE_*` environment variables, falling
    /// back to the defaults for anything unset.
    ///
    /// Recognized variables: `BACKOFFICE_SITE_TITLE`,
    /// `BACKOFFICE_SITE_HEADER`, `BACKOFFICE_INDEX_TITLE`,
    /// `BACKOFFICE_PRIMARY_COLOR`, `BACKOFFICE_SECONDARY_COLOR`,
    /// `BACKOFFICE_LOGO`, `BACKOFFICE_LOGO_ALIGN` (`left` or `middle`),
    /// `BACKOFFICE_LOGO_STYLE`, `BACKOFFICE_SITE_VERSION`,
    /// `BACKOFFICE_DEBUG` (`1`/`true`), and `BACKOFFICE_LOG_LEVEL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            site_title: env_or("BACKOFFICE_SITE_TITLE", defaults.site_title),
            site_header: env_or("BACKOFFICE_SITE_HEADER", defaults.site_header),
            index_title: env_or("BACKOFFICE_INDEX_TITLE", defaults.index_title),
            primary_color: env_or("BACKOFFICE_PRIMARY_COLOR", defaults.primary_color),
            secondary_color: env_or("BACKOFFICE_SECONDARY_COLOR", defaults.secondary_color),
            logo: env::var("BACKOFFICE_LOGO").ok(),
            logo_align: match env::var("BACKOFFICE_LOGO_ALIGN").as_deref() {
                Ok("middle") => LogoAlign::Middle,
                _ => LogoAlign::Left,
            },
            logo_style: env::var("BACKOFFICE_LOGO_STYLE").ok(),
            site_version: env::var("BACKOFFICE_SITE_VERSION").ok(),
            session_cookie_name: defaults.session_cookie_name,
            debug: matches!(
                env::var("BACKOFFICE_DEBUG").as_deref(),
                Ok("1") | Ok("true")
            ),
            log_level: env_or("BACKOFFICE_LOG_LEVEL", defaults.log_level),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = SiteSettings::default();
        assert_eq!(s.site_title, "Backoffice");
        assert_eq!(s.site_header, "Backoffice");
        assert_eq!(s.index_title, "Home");
        assert_eq!(s.primary_color, "#34A77B");
        assert_eq!(s.secondary_color, "#20AA76");
        assert!(s.logo.is_none());
        assert_eq!(s.logo_align, LogoAlign::Left);
        assert!(s.logo_style.is_none());
        assert!(s.site_version.is_none());
        assert_eq!(s.session_cookie_name, "sessionid");
        assert!(!s.debug);
        assert_eq!(s.log_level, "info");
    }

    #[test]
    fn test_logo_align_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LogoAlign::Middle).unwrap(),
            "\"middle\""
        );
        assert_eq!(serde_json::to_string(&LogoAlign::Left).unwrap(), "\"left\"");
    }

    #[test]
    fn test_settings_round_trip() {
        let s = SiteSettings {
            logo: Some("/static/logo.svg".to_string()),
            site_version: Some("1.2.3".to_string()),
            ..SiteSettings::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: SiteSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.logo.as_deref(), Some("/static/logo.svg"));
        assert_eq!(back.site_version.as_deref(), Some("1.2.3"));
    }
}
