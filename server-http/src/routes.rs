use crate::handlers;
use crate::middleware::{rate_limit, require_admin, require_authenticated, resolve_session};
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{any, delete, get, post},
    Router,
};
use shared::config::Config;
use tower::Layer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Build and configure the application router
pub fn build_router(state: AppState, config: &Config) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route_layer(from_fn_with_state(state.clone(), rate_limit));

    let member_routes = Router::new()
        .route(
            "/",
            post(handlers::create_profile).get(handlers::list_profiles),
        )
        .route(
            "/{id}",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route_layer(from_fn(require_authenticated));

    let admin_routes = Router::new()
        .route("/{id}", delete(handlers::delete_profile))
        .route_layer(from_fn(require_admin));

    Router::new()
        // Health check
        .route("/", any(handlers::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/users", member_routes.merge(admin_routes))
        // Session resolution runs before every handler and route guard
        .layer(from_fn_with_state(state.clone(), resolve_session))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Trailing slashes must be trimmed before routing, so this wraps the whole router.
pub fn with_normalized_paths(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}
