//! The admin API router.
//!
//! [`ApiRouter`] is the registration surface: endpoints are registered at
//! boot, metadata is derived once, route names land in the shared
//! [`RouteTable`], and [`into_axum_router`](ApiRouter::into_axum_router)
//! produces the servable axum router with the navigation root and schema
//! endpoints mounted alongside every action.
//!
//! URL layout: an endpoint's prefix is its qualified basename with dots
//! replaced by slashes, so `fruit.apple` serves under
//! `/{version}/fruit/apple/`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, MethodFilter, MethodRouter};
use axum::{Json, Router};
use http::{header, Method, StatusCode};
use serde_json::{json, Value};
use tracing::Instrument;

use backoffice_core::error::{BackofficeError, BackofficeResult};
use backoffice_core::logging::dispatch_span;
use backoffice_core::routes::RouteTable;

use crate::auth::{resolve_principal, ApiContext};
use crate::endpoint::{
    Action, AdminEndpoint, ApiRequest, ApiResponse, SessionDirective,
};
use crate::meta::{EndpointMeta, MetaRegistry};
use crate::navigation::list_navigation;
use crate::schema::build_document;

/// An endpoint as the router sees it: derived metadata, the endpoint
/// itself, its materialized actions, and its URL prefix.
pub struct RegisteredEndpoint {
    /// The derived metadata.
    pub meta: Arc<EndpointMeta>,
    /// The endpoint.
    pub endpoint: Arc<dyn AdminEndpoint>,
    /// The actions, materialized once at registration.
    pub actions: Vec<Action>,
    /// The URL prefix relative to the version root (e.g. `"/fruit/apple"`).
    pub prefix: String,
}

impl RegisteredEndpoint {
    /// Returns whether the endpoint exposes a `list` action.
    pub fn has_list(&self) -> bool {
        self.actions.iter().any(|a| a.name == "list")
    }

    /// Returns whether more than one action shares this name (a
    /// multi-method custom action).
    pub fn is_multi_method(&self, name: &str) -> bool {
        self.actions.iter().filter(|a| a.name == name).count() > 1
    }

    /// Returns the version-relative path for an action, with `{pk}`
    /// placeholders in axum syntax.
    pub fn action_path(&self, action: &Action) -> String {
        match (action.detail, &action.kind) {
            (false, crate::endpoint::ActionKind::Custom) => {
                format!("{}/{}/", self.prefix, action.name)
            }
            (false, _) => format!("{}/", self.prefix),
            (true, crate::endpoint::ActionKind::Custom) => {
                format!("{}/{{pk}}/{}/", self.prefix, action.name)
            }
            (true, _) => format!("{}/{{pk}}/", self.prefix),
        }
    }
}

impl std::fmt::Debug for RegisteredEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredEndpoint")
            .field("basename", &self.meta.basename)
            .field("prefix", &self.prefix)
            .field("actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

/// The registration-time router.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use backoffice_api::auth::ApiContext;
/// use backoffice_api::router::ApiRouter;
/// use backoffice_api::views::MeEndpoint;
///
/// let mut router = ApiRouter::new("admin", "v1.0", Arc::new(ApiContext::in_memory()));
/// router.register(Arc::new(MeEndpoint)).unwrap();
/// let app = router.into_axum_router();
/// # let _ = app;
/// ```
pub struct ApiRouter {
    namespace: String,
    version: String,
    routes: RouteTable,
    meta_registry: MetaRegistry,
    endpoints: Vec<RegisteredEndpoint>,
    context: Arc<ApiContext>,
}

impl ApiRouter {
    /// Creates a router serving under `/{namespace}/{version}/`.
    pub fn new(namespace: &str, version: &str, context: Arc<ApiContext>) -> Self {
        let mut routes = RouteTable::new();
        let ns = format!("{namespace}:{version}");
        // The synthesized navigation root. It is served by the router
        // itself and never appears in its own listing.
        routes
            .register(Some(&ns), "api-root", &format!("/{namespace}/{version}/"))
            .expect("fresh route table cannot hold duplicates");
        Self {
            namespace: namespace.to_string(),
            version: version.to_string(),
            routes,
            meta_registry: MetaRegistry::new(),
            endpoints: Vec::new(),
            context,
        }
    }

    /// Returns the route-name namespace, `"{namespace}:{version}"`.
    pub fn route_namespace(&self) -> String {
        format!("{}:{}", self.namespace, self.version)
    }

    /// Returns the route table.
    pub const fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Returns the registered endpoints.
    pub fn endpoints(&self) -> &[RegisteredEndpoint] {
        &self.endpoints
    }

    /// Registers an endpoint.
    ///
    /// Metadata is derived (and cached) here; a duplicate basename is a
    /// configuration error raised immediately, not at request time.
    ///
    /// # Errors
    ///
    /// Returns [`BackofficeError::ImproperlyConfigured`] on a duplicate
    /// basename and propagates metadata derivation failures.
    pub fn register(&mut self, endpoint: Arc<dyn AdminEndpoint>) -> BackofficeResult<()> {
        let info = endpoint.info();
        let options = endpoint.admin();
        let meta = self
            .meta_registry
            .get_or_derive(endpoint.meta_key(), &info, &options)?;

        if self.endpoints.iter().any(|e| e.meta.basename == meta.basename) {
            return Err(BackofficeError::ImproperlyConfigured(format!(
                "An endpoint with basename '{}' is already registered",
                meta.basename
            )));
        }

        let prefix = format!("/{}", meta.basename.replace('.', "/"));
        let registered = RegisteredEndpoint {
            meta: Arc::clone(&meta),
            endpoint,
            actions: Vec::new(),
            prefix,
        };
        let actions = registered.endpoint.actions();

        let ns = self.route_namespace();
        let mut named: Vec<&str> = Vec::new();
        for action in &actions {
            // Multi-method actions share one route name.
            if named.contains(&action.name.as_str()) {
                continue;
            }
            named.push(&action.name);
            let pattern = format!(
                "/{}/{}{}",
                self.namespace,
                self.version,
                registered
                    .action_path(action)
                    .replace('{', "<")
                    .replace('}', ">")
            );
            self.routes.register(
                Some(&ns),
                &format!("{}-{}", meta.basename, action.name),
                &pattern,
            )?;
        }

        tracing::debug!(basename = %meta.basename, prefix = %registered.prefix, "registered endpoint");
        self.endpoints.push(RegisteredEndpoint {
            actions,
            ..registered
        });
        Ok(())
    }

    /// Clears every registration. Test isolation only.
    pub fn reset(&mut self) {
        self.endpoints.clear();
        self.meta_registry.reset();
        self.routes.reset();
        let ns = self.route_namespace();
        self.routes
            .register(
                Some(&ns),
                "api-root",
                &format!("/{}/{}/", self.namespace, self.version),
            )
            .expect("fresh route table cannot hold duplicates");
    }

    /// Converts the registrations into a servable axum router.
    ///
    /// The returned router serves, relative to its mount point:
    /// `GET /` (navigation), `GET /schema.json`, and every action route.
    pub fn into_axum_router(self) -> Router {
        let ns = self.route_namespace();
        let schema = build_document(
            &self.endpoints,
            &self.routes,
            &ns,
            &self.version,
            &self.context.settings.site_title,
        );

        let state = Arc::new(RouterState {
            endpoints: self.endpoints,
            routes: self.routes,
            route_namespace: ns,
            namespace: self.namespace,
            context: self.context,
            schema,
        });

        let mut method_routers: HashMap<String, MethodRouter<Arc<RouterState>>> = HashMap::new();
        for registered in &state.endpoints {
            for action in &registered.actions {
                let path = format!("/{}", registered.action_path(action).trim_start_matches('/'));
                let endpoint = Arc::clone(&registered.endpoint);
                let action = action.clone();
                let basename = registered.meta.basename.clone();
                let filter = method_filter(&action.method);

                let handler = move |State(state): State<Arc<RouterState>>,
                                    headers: HeaderMap,
                                    body: Bytes| {
                    let endpoint = Arc::clone(&endpoint);
                    let action = action.clone();
                    let basename = basename.clone();
                    async move { dispatch(state, endpoint, action, basename, headers, body).await }
                };

                let router = method_routers.remove(&path).unwrap_or_default();
                method_routers.insert(path, router.on(filter, handler));
            }
        }

        let mut app = Router::new()
            .route("/", get(navigation_handler))
            .route("/schema.json", get(schema_handler));
        for (path, method_router) in method_routers {
            app = app.route(&path, method_router);
        }
        app.with_state(state)
    }
}

impl std::fmt::Debug for ApiRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRouter")
            .field("namespace", &self.namespace)
            .field("version", &self.version)
            .field("endpoints", &self.endpoints.len())
            .finish_non_exhaustive()
    }
}

/// Shared state for the axum handlers.
pub(crate) struct RouterState {
    pub(crate) endpoints: Vec<RegisteredEndpoint>,
    pub(crate) routes: RouteTable,
    pub(crate) route_namespace: String,
    pub(crate) namespace: String,
    pub(crate) context: Arc<ApiContext>,
    pub(crate) schema: Value,
}

/// Maps an HTTP method to the axum method filter.
fn method_filter(method: &Method) -> MethodFilter {
    match *method {
        Method::POST => MethodFilter::POST,
        Method::PUT => MethodFilter::PUT,
        Method::PATCH => MethodFilter::PATCH,
        Method::DELETE => MethodFilter::DELETE,
        _ => MethodFilter::GET,
    }
}

/// Extracts the session key from the request's cookies.
fn session_key_from(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name).then(|| value.to_string())
    })
}

/// The per-request pipeline: resolve the principal, run the access check,
/// parse the payload, invoke the handler, and translate the outcome.
async fn dispatch(
    state: Arc<RouterState>,
    endpoint: Arc<dyn AdminEndpoint>,
    action: Action,
    basename: String,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let span = dispatch_span(&basename, &action.name);
    dispatch_inner(state, endpoint, action, headers, body)
        .instrument(span)
        .await
}

async fn dispatch_inner(
    state: Arc<RouterState>,
    endpoint: Arc<dyn AdminEndpoint>,
    action: Action,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let cookie_name = state.context.settings.session_cookie_name.clone();
    let session_key = session_key_from(&headers, &cookie_name);
    let principal = resolve_principal(&state.context, session_key.as_deref()).await;

    if !crate::endpoint::endpoint_permits(endpoint.as_ref(), &principal) {
        let (status, detail) = if principal.is_authenticated {
            (StatusCode::FORBIDDEN, "You do not have permission to perform this action.")
        } else {
            (StatusCode::UNAUTHORIZED, "Authentication credentials were not provided.")
        };
        tracing::debug!(%status, "access denied");
        return (status, Json(json!({ "detail": detail }))).into_response();
    }

    let payload = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(err) => {
                return error_response(&BackofficeError::BadRequest(format!(
                    "Malformed JSON body: {err}"
                )));
            }
        }
    };

    let request = ApiRequest {
        principal,
        session_key,
        payload,
        context: Arc::clone(&state.context),
    };

    match (action.handler)(request).await {
        Ok(response) => success_response(response, &cookie_name),
        Err(err) => error_response(&err),
    }
}

/// Translates an [`ApiResponse`] into an HTTP response, applying the
/// session directive as a `Set-Cookie` header.
fn success_response(response: ApiResponse, cookie_name: &str) -> Response {
    let mut http = match response.body {
        Some(body) => (response.status, Json(body)).into_response(),
        None => response.status.into_response(),
    };
    let cookie = match response.session {
        SessionDirective::Keep => None,
        SessionDirective::Establish(key) => {
            Some(format!("{cookie_name}={key}; Path=/; HttpOnly"))
        }
        SessionDirective::Clear => {
            Some(format!("{cookie_name}=; Path=/; Max-Age=0; HttpOnly"))
        }
    };
    if let Some(cookie) = cookie {
        if let Ok(value) = cookie.parse() {
            http.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    http
}

/// Translates an error into the wire shape: validation errors keep their
/// per-field structure, everything else is `{"detail": ...}`.
fn error_response(err: &BackofficeError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match err {
        BackofficeError::Validation(validation) => validation.as_json(),
        other => json!({ "detail": other.to_string() }),
    };
    (status, Json(body)).into_response()
}

/// `GET /` - the navigation listing for the current principal.
async fn navigation_handler(
    State(state): State<Arc<RouterState>>,
    headers: HeaderMap,
) -> Response {
    let session_key = session_key_from(&headers, &state.context.settings.session_cookie_name);
    let principal = resolve_principal(&state.context, session_key.as_deref()).await;
    let navigation = list_navigation(
        &state.endpoints,
        &state.routes,
        &state.route_namespace,
        &state.namespace,
        &principal,
    );
    Json(navigation).into_response()
}

/// `GET /schema.json` - the assembled schema document.
async fn schema_handler(State(state): State<Arc<RouterState>>) -> Response {
    Json(state.schema.clone()).into_response()
}
