//! Request-time navigation aggregation.
//!
//! The navigation listing is assembled per request, against the calling
//! principal. A single endpoint's misconfiguration never aborts the
//! listing: entries that cannot be reversed are skipped with a warning,
//! and endpoints the principal may not access are silently omitted.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use backoffice_core::principal::Principal;
use backoffice_core::routes::RouteTable;

use crate::endpoint::endpoint_permits;
use crate::router::RegisteredEndpoint;
use crate::schema::SchemaAssembler;

/// One navigation entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NavigationEntry {
    /// The rendered display name.
    pub name: String,
    /// The qualified basename.
    pub basename: String,
    /// The version-relative path (e.g. `"/v1.0/fruit/apple/"`).
    pub path: String,
    /// The namespace-absolute URL (e.g. `"/admin/v1.0/fruit/apple/"`).
    pub endpoint: String,
}

/// Builds the navigation listing for a principal: entries grouped by
/// application label (sorted keys), each group sorted by rendered name.
pub fn list_navigation(
    endpoints: &[RegisteredEndpoint],
    routes: &RouteTable,
    route_namespace: &str,
    namespace: &str,
    principal: &Principal,
) -> BTreeMap<String, Vec<NavigationEntry>> {
    let mut groups: BTreeMap<String, Vec<NavigationEntry>> = BTreeMap::new();
    let namespace_prefix = format!("/{namespace}");

    for registered in endpoints {
        if !endpoint_permits(registered.endpoint.as_ref(), principal) {
            continue;
        }
        if registered
            .meta
            .exclude_tags
            .iter()
            .any(|tag| tag == "navigation")
        {
            continue;
        }
        let Some(list_action) = registered.actions.iter().find(|a| a.name == "list") else {
            continue;
        };
        let mut assembler = SchemaAssembler::new(routes, route_namespace);
        if !assembler.is_navigation(&registered.meta, list_action, true) {
            continue;
        }

        let route_name = format!("{route_namespace}:{}-list", registered.meta.basename);
        let absolute = match routes.reverse(&route_name, &HashMap::new()) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(basename = %registered.meta.basename, %err, "skipping navigation entry");
                continue;
            }
        };
        let path = absolute
            .strip_prefix(&namespace_prefix)
            .unwrap_or(&absolute)
            .to_string();

        groups
            .entry(registered.meta.app_label.clone())
            .or_default()
            .push(NavigationEntry {
                name: registered.meta.name.render(),
                basename: registered.meta.basename.clone(),
                path,
                endpoint: absolute,
            });
    }

    for entries in groups.values_mut() {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;
    use std::sync::Arc;

    use serde_json::json;

    use crate::endpoint::{AccessPolicy, Action, AdminEndpoint, ApiResponse};
    use crate::meta::{derive, AdminOptions, EndpointInfo};

    struct NavEndpoint {
        type_name: &'static str,
        module_path: &'static str,
        permission: Option<String>,
    }

    impl AdminEndpoint for NavEndpoint {
        fn info(&self) -> EndpointInfo {
            EndpointInfo::new(self.type_name, self.module_path)
        }

        fn meta_key(&self) -> TypeId {
            TypeId::of::<Self>()
        }

        fn access(&self) -> AccessPolicy {
            AccessPolicy::StaffOnly
        }

        fn required_permission(&self) -> Option<String> {
            self.permission.clone()
        }

        fn actions(&self) -> Vec<Action> {
            vec![Action::list(|_req| async { Ok(ApiResponse::ok(json!([]))) })]
        }
    }

    fn registered(
        type_name: &'static str,
        module_path: &'static str,
        permission: Option<&str>,
        routes: &mut RouteTable,
        with_route: bool,
    ) -> RegisteredEndpoint {
        let meta = derive(
            &EndpointInfo::new(type_name, module_path),
            &AdminOptions::new(),
        )
        .unwrap();
        let prefix = format!("/{}", meta.basename.replace('.', "/"));
        if with_route {
            routes
                .register(
                    Some("admin:v1.0"),
                    &format!("{}-list", meta.basename),
                    &format!("/admin/v1.0{prefix}/"),
                )
                .unwrap();
        }
        let endpoint = NavEndpoint {
            type_name,
            module_path,
            permission: permission.map(String::from),
        };
        RegisteredEndpoint {
            actions: endpoint.actions(),
            meta: Arc::new(meta),
            endpoint: Arc::new(endpoint),
            prefix,
        }
    }

    fn staff() -> Principal {
        Principal::new("staff", "staff@example.com").staff()
    }

    #[test]
    fn test_groups_by_app_label_sorted() {
        let mut routes = RouteTable::new();
        let endpoints = vec![
            registered("PearViewSet", "fruit::api", None, &mut routes, true),
            registered("AppleViewSet", "fruit::api", None, &mut routes, true),
            registered("InvoiceViewSet", "billing::api", None, &mut routes, true),
        ];

        let nav = list_navigation(&endpoints, &routes, "admin:v1.0", "admin", &staff());
        let apps: Vec<&String> = nav.keys().collect();
        assert_eq!(apps, vec!["billing", "fruit"]);

        // Entries within a group sorted by rendered name.
        let fruit: Vec<&str> = nav["fruit"].iter().map(|e| e.name.as_str()).collect();
        assert_eq!(fruit, vec!["Apple", "Pear"]);
    }

    #[test]
    fn test_entry_paths() {
        let mut routes = RouteTable::new();
        let endpoints = vec![registered("AppleViewSet", "fruit::api", None, &mut routes, true)];
        let nav = list_navigation(&endpoints, &routes, "admin:v1.0", "admin", &staff());

        let entry = &nav["fruit"][0];
        assert_eq!(entry.basename, "fruit.apple");
        assert_eq!(entry.path, "/v1.0/fruit/apple/");
        assert_eq!(entry.endpoint, "/admin/v1.0/fruit/apple/");
    }

    #[test]
    fn test_permission_denied_is_silent_skip() {
        let mut routes = RouteTable::new();
        let endpoints = vec![
            registered("AppleViewSet", "fruit::api", None, &mut routes, true),
            registered(
                "SecretViewSet",
                "fruit::api",
                Some("fruit.can_see_secret"),
                &mut routes,
                true,
            ),
        ];

        let nav = list_navigation(&endpoints, &routes, "admin:v1.0", "admin", &staff());
        assert_eq!(nav["fruit"].len(), 1);
        assert_eq!(nav["fruit"][0].basename, "fruit.apple");

        let privileged = staff().with_perm("fruit.can_see_secret");
        let nav = list_navigation(&endpoints, &routes, "admin:v1.0", "admin", &privileged);
        assert_eq!(nav["fruit"].len(), 2);
    }

    #[test]
    fn test_unreversible_entry_skipped_others_survive() {
        let mut routes = RouteTable::new();
        let endpoints = vec![
            registered("AppleViewSet", "fruit::api", None, &mut routes, true),
            // No list route registered for this one.
            registered("PearViewSet", "fruit::api", None, &mut routes, false),
        ];

        let nav = list_navigation(&endpoints, &routes, "admin:v1.0", "admin", &staff());
        assert_eq!(nav["fruit"].len(), 1);
        assert_eq!(nav["fruit"][0].basename, "fruit.apple");
    }

    #[test]
    fn test_anonymous_sees_nothing_staff_only() {
        let mut routes = RouteTable::new();
        let endpoints = vec![registered("AppleViewSet", "fruit::api", None, &mut routes, true)];
        let nav = list_navigation(
            &endpoints,
            &routes,
            "admin:v1.0",
            "admin",
            &Principal::anonymous(),
        );
        assert!(nav.is_empty());
    }

    #[test]
    fn test_navigation_exclude_tag_omits_endpoint() {
        let mut routes = RouteTable::new();
        let meta = derive(
            &EndpointInfo::new("MeAPI", "accounts::api"),
            &AdminOptions::new().exclude_tags(vec!["navigation"]),
        )
        .unwrap();
        routes
            .register(Some("admin:v1.0"), "accounts.me-list", "/admin/v1.0/accounts/me/")
            .unwrap();
        let endpoint = NavEndpoint {
            type_name: "MeAPI",
            module_path: "accounts::api",
            permission: None,
        };
        let endpoints = vec![RegisteredEndpoint {
            actions: endpoint.actions(),
            meta: Arc::new(meta),
            endpoint: Arc::new(endpoint),
            prefix: "/accounts/me".to_string(),
        }];

        let nav = list_navigation(&endpoints, &routes, "admin:v1.0", "admin", &staff());
        assert!(nav.is_empty());
    }
}
