//! Schema and tag assembly.
//!
//! Every operation in the schema document gets an operation id, a summary
//! title, and a tag set. A [`SchemaAssembler`] is created per operation and
//! memoizes the navigation-eligibility decision: the state machine moves
//! from `Unknown` to a terminal `Eligible` or `NotEligible` on first
//! consultation and never changes afterwards.
//!
//! An operation is navigation-eligible iff it is a `GET`, it is the
//! endpoint's `list` action (or the endpoint has none), and the
//! conventional `{basename}-list` route reverses in the current namespace.
//! Reversing the list route is a proxy for "this endpoint has a natural
//! entry point"; the conflation is inherited behavior, kept deliberately.

use std::collections::{BTreeSet, HashMap};

use http::Method;
use serde_json::{json, Value};

use backoffice_core::routes::RouteTable;
use backoffice_core::text::humanize;

use crate::endpoint::{Action, ActionKind};
use crate::meta::EndpointMeta;
use crate::router::RegisteredEndpoint;

/// The memoized navigation-eligibility state. Terminal once decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    /// Not yet consulted.
    #[default]
    Unknown,
    /// The operation belongs in navigation.
    Eligible,
    /// The operation does not belong in navigation.
    NotEligible,
}

/// Per-operation assembler for navigation eligibility and tags.
#[derive(Debug)]
pub struct SchemaAssembler<'a> {
    routes: &'a RouteTable,
    namespace: &'a str,
    nav_state: NavState,
}

impl<'a> SchemaAssembler<'a> {
    /// Creates an assembler for one operation. `namespace` is the
    /// route-name namespace (e.g. `"admin:v1.0"`).
    pub const fn new(routes: &'a RouteTable, namespace: &'a str) -> Self {
        Self {
            routes,
            namespace,
            nav_state: NavState::Unknown,
        }
    }

    /// Returns whether the operation is navigation-eligible, deciding and
    /// memoizing on first call.
    pub fn is_navigation(&mut self, meta: &EndpointMeta, action: &Action, has_list: bool) -> bool {
        if self.nav_state == NavState::Unknown {
            let eligible = action.method == Method::GET
                && (action.name == "list" || !has_list)
                && self.list_route_reverses(meta);
            self.nav_state = if eligible {
                NavState::Eligible
            } else {
                NavState::NotEligible
            };
        }
        self.nav_state == NavState::Eligible
    }

    /// Returns the current state without deciding.
    pub const fn state(&self) -> NavState {
        self.nav_state
    }

    fn list_route_reverses(&self, meta: &EndpointMeta) -> bool {
        let name = format!("{}:{}-list", self.namespace, meta.basename);
        self.routes.reverse(&name, &HashMap::new()).is_ok()
    }

    /// Assembles the operation's tag set, rendered in lexicographic order.
    ///
    /// Assembly order: the `app:{label}` tag, `navigation` when eligible,
    /// `crud` for the full-CRUD family, action-level includes, action-level
    /// excludes (exclusion wins), and endpoint-level `exclude_tags` last.
    pub fn tags(
        &mut self,
        meta: &EndpointMeta,
        action: &Action,
        has_list: bool,
        is_crud: bool,
    ) -> Vec<String> {
        let mut set: BTreeSet<String> = BTreeSet::new();
        set.insert(format!("app:{}", meta.app_label));
        if self.is_navigation(meta, action, has_list) {
            set.insert("navigation".to_string());
        }
        if is_crud {
            set.insert("crud".to_string());
        }
        for tag in action.tags.included() {
            set.insert(tag.clone());
        }
        for tag in action.tags.excluded() {
            set.remove(tag);
        }
        for tag in &meta.exclude_tags {
            set.remove(tag);
        }
        set.into_iter().collect()
    }
}

/// Builds the operation id: `{basename}:{dotted action path}`.
///
/// A custom action exposed under several methods expands per method, so a
/// two-method `baz` yields `baz.read` and `baz.create`.
pub fn operation_id(meta: &EndpointMeta, action: &Action, multi_method: bool) -> String {
    let dotted = if action.kind == ActionKind::Custom && multi_method {
        format!("{}.{}", action.name, method_verb(&action.method))
    } else {
        action.name.clone()
    };
    format!("{}:{dotted}", meta.basename)
}

/// Maps an HTTP method to its dotted-path verb.
fn method_verb(method: &Method) -> &'static str {
    match *method {
        Method::POST => "create",
        Method::PUT => "update",
        Method::PATCH => "partial_update",
        Method::DELETE => "delete",
        _ => "read",
    }
}

/// Derives the operation's summary title.
///
/// Precedence: the action's explicit title, then the humanized custom
/// action name, then a per-kind derivation from the endpoint's verbose
/// names, falling back to the display name.
pub fn title(meta: &EndpointMeta, action: &Action) -> String {
    if let Some(explicit) = &action.title {
        return explicit.clone();
    }
    match action.kind {
        ActionKind::Custom => humanize(&action.name),
        ActionKind::Retrieve | ActionKind::Update | ActionKind::PartialUpdate => meta
            .verbose_name
            .as_ref()
            .map_or_else(|| meta.name.render(), backoffice_core::text::DisplayName::render),
        ActionKind::Create => meta.verbose_name.as_ref().map_or_else(
            || meta.name.render(),
            |verbose| format!("Add {}", verbose.render().to_lowercase()),
        ),
        ActionKind::List => meta.verbose_name_plural.render(),
        ActionKind::Destroy => meta.name.render(),
    }
}

/// Builds the schema document: a JSON mapping of path to method to
/// operation descriptor, with version metadata.
pub fn build_document(
    endpoints: &[RegisteredEndpoint],
    routes: &RouteTable,
    namespace: &str,
    version: &str,
    site_title: &str,
) -> Value {
    let mut paths: serde_json::Map<String, Value> = serde_json::Map::new();

    for registered in endpoints {
        let has_list = registered.has_list();
        for action in &registered.actions {
            let path = format!("/{version}{}", registered.action_path(action));
            let mut assembler = SchemaAssembler::new(routes, namespace);
            let multi = registered.is_multi_method(&action.name);

            let operation = json!({
                "operationId": operation_id(&registered.meta, action, multi),
                "summary": title(&registered.meta, action),
                "tags": assembler.tags(&registered.meta, action, has_list, registered.endpoint.is_crud()),
            });

            let entry = paths
                .entry(path)
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            if let Value::Object(methods) = entry {
                methods.insert(action.method.as_str().to_lowercase(), operation);
            }
        }
    }

    json!({
        "info": {
            "title": site_title,
            "version": version,
        },
        "paths": Value::Object(paths),
    })
}
