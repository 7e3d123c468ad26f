//! Endpoint metadata derivation.
//!
//! Every endpoint gets an [`EndpointMeta`] derived once from what the type
//! declares ([`EndpointInfo`]) plus typed overrides ([`AdminOptions`]). The
//! derivation is deterministic and idempotent; results are cached in a
//! [`MetaRegistry`] keyed by the endpoint's `TypeId`, never by mutating the
//! endpoint itself.
//!
//! Lazy display names are respected throughout: a lazy name is carried
//! verbatim and is never evaluated to feed the basename. When a basename
//! must be derived and the name is lazy, derivation falls back to the type
//! name, which is locale-independent by construction.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use backoffice_core::apps::app_label_from_module;
use backoffice_core::error::BackofficeResult;
use backoffice_core::text::{camelcase_to_spaces, strip_view_suffix, DisplayName};

/// What an endpoint type declares about itself.
#[derive(Debug, Clone)]
pub struct EndpointInfo {
    /// The endpoint's type name (e.g. `"AppleViewSet"`).
    pub type_name: &'static str,
    /// The declaring module path, from `module_path!()`.
    pub module_path: &'static str,
    /// An explicitly declared display name, if any.
    pub name: Option<DisplayName>,
    /// An explicitly declared local basename, if any.
    pub basename: Option<String>,
    /// A suffix appended to the derived name (e.g. `"List"`).
    pub suffix: Option<String>,
}

impl EndpointInfo {
    /// Creates an info block with no declared name, basename, or suffix.
    pub const fn new(type_name: &'static str, module_path: &'static str) -> Self {
        Self {
            type_name,
            module_path,
            name: None,
            basename: None,
            suffix: None,
        }
    }

    /// Declares a display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<DisplayName>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declares a local basename.
    #[must_use]
    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = Some(basename.into());
        self
    }

    /// Declares a name suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

/// A three-state override: leave the derived value, clear the declared
/// value (falling back to derivation), or set a replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Override<T> {
    /// No override; keep whatever derivation produced.
    #[default]
    Unset,
    /// Discard the declared value and fall back to derivation.
    Clear,
    /// Replace with this value.
    Set(T),
}

impl<T> Override<T> {
    /// Returns the replacement value, if set.
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset | Self::Clear => None,
        }
    }
}

/// Typed admin overrides for an endpoint, replacing derivation where set.
#[derive(Debug, Clone, Default)]
pub struct AdminOptions {
    /// Overrides the display name.
    pub name: Override<DisplayName>,
    /// Overrides the local basename.
    pub basename: Override<String>,
    /// Overrides the verbose name (defaults to none).
    pub verbose_name: Override<DisplayName>,
    /// Overrides the plural verbose name (defaults to the name).
    pub verbose_name_plural: Override<DisplayName>,
    /// Tags stripped from every operation of this endpoint.
    pub exclude_tags: Override<Vec<String>>,
    /// Overrides the owning application label.
    pub app_label: Override<String>,
}

impl AdminOptions {
    /// Creates options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name override.
    #[must_use]
    pub fn name(mut self, name: impl Into<DisplayName>) -> Self {
        self.name = Override::Set(name.into());
        self
    }

    /// Sets the local basename override.
    #[must_use]
    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = Override::Set(basename.into());
        self
    }

    /// Sets the verbose name override.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<DisplayName>) -> Self {
        self.verbose_name = Override::Set(name.into());
        self
    }

    /// Sets the plural verbose name override.
    #[must_use]
    pub fn verbose_name_plural(mut self, name: impl Into<DisplayName>) -> Self {
        self.verbose_name_plural = Override::Set(name.into());
        self
    }

    /// Sets the endpoint-level excluded tags.
    #[must_use]
    pub fn exclude_tags(mut self, tags: Vec<&str>) -> Self {
        self.exclude_tags = Override::Set(tags.into_iter().map(String::from).collect());
        self
    }

    /// Sets the application label override.
    #[must_use]
    pub fn app_label(mut self, label: impl Into<String>) -> Self {
        self.app_label = Override::Set(label.into());
        self
    }
}

/// The derived, immutable metadata for an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointMeta {
    /// The owning application label.
    pub app_label: String,
    /// The final qualified basename, `"{app_label}.{local}"`.
    pub basename: String,
    /// The display name. Lazy values stay lazy.
    pub name: DisplayName,
    /// The singular verbose name, if declared.
    pub verbose_name: Option<DisplayName>,
    /// The plural verbose name; defaults to the name.
    pub verbose_name_plural: DisplayName,
    /// Tags stripped from every operation of this endpoint.
    pub exclude_tags: Vec<String>,
}

/// Derives metadata from an info block and overrides.
///
/// The steps, in order: application label from the module path, display
/// name (declared verbatim or derived from the type name), local basename
/// (declared, or from the name unless it is lazy), overrides, then the
/// final qualified basename.
///
/// # Errors
///
/// Returns a configuration error if the module path yields no application
/// label and none is set in the options.
pub fn derive(info: &EndpointInfo, options: &AdminOptions) -> BackofficeResult<EndpointMeta> {
    let app_label = match options.app_label.as_set() {
        Some(label) => label.to_lowercase(),
        None => app_label_from_module(info.module_path)?,
    };

    let name = match &options.name {
        Override::Set(name) => name.clone(),
        Override::Clear => DisplayName::literal(name_from_type(info)),
        Override::Unset => info
            .name
            .clone()
            .unwrap_or_else(|| DisplayName::literal(name_from_type(info))),
    };

    let local = match &options.basename {
        Override::Set(basename) => basename.clone(),
        Override::Clear => basename_from(&name, info),
        Override::Unset => info
            .basename
            .clone()
            .unwrap_or_else(|| basename_from(&name, info)),
    };

    let verbose_name = options.verbose_name.as_set().cloned();
    let verbose_name_plural = options
        .verbose_name_plural
        .as_set()
        .cloned()
        .unwrap_or_else(|| name.clone());
    let exclude_tags = options.exclude_tags.as_set().cloned().unwrap_or_default();

    Ok(EndpointMeta {
        basename: format!("{app_label}.{local}"),
        app_label,
        name,
        verbose_name,
        verbose_name_plural,
        exclude_tags,
    })
}

/// Derives a display name from the type name: strip one view suffix,
/// space out the camel case, append the declared suffix if any.
fn name_from_type(info: &EndpointInfo) -> String {
    let mut name = camelcase_to_spaces(strip_view_suffix(info.type_name));
    if let Some(suffix) = &info.suffix {
        name.push(' ');
        name.push_str(suffix);
    }
    name
}

/// Derives a local basename from a name. Lazy names are never evaluated;
/// the fallback is the type-derived name, which cannot vary by locale.
fn basename_from(name: &DisplayName, info: &EndpointInfo) -> String {
    let source = if name.is_lazy() {
        name_from_type(info)
    } else {
        name.raw().to_string()
    };
    source.to_lowercase().replace(' ', "_")
}

/// A `TypeId`-keyed cache of derived metadata.
///
/// Populated at registration; [`reset`](MetaRegistry::reset) exists for
/// test isolation.
#[derive(Debug, Default)]
pub struct MetaRegistry {
    cache: RwLock<HashMap<TypeId, Arc<EndpointMeta>>>,
}

impl MetaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached metadata for a type, deriving and caching it on
    /// first access.
    ///
    /// # Errors
    ///
    /// Propagates derivation errors; nothing is cached on failure.
    pub fn get_or_derive(
        &self,
        key: TypeId,
        info: &EndpointInfo,
        options: &AdminOptions,
    ) -> BackofficeResult<Arc<EndpointMeta>> {
        if let Some(meta) = self.cache.read().expect("meta cache lock poisoned").get(&key) {
            return Ok(Arc::clone(meta));
        }
        let meta = Arc::new(derive(info, options)?);
        self.cache
            .write()
            .expect("meta cache lock poisoned")
            .insert(key, Arc::clone(&meta));
        Ok(meta)
    }

    /// Clears the cache. Test isolation only.
    pub fn reset(&self) {
        self.cache.write().expect("meta cache lock poisoned").clear();
    }
}
