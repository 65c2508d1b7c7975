use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::{ApiKeyRepository, HealthCheck, SelectedCalendarRepository, UserRepository};
use crate::handlers::{root, selected_calendars};
use crate::middleware::api_key_middleware;

/// Shared handler state: the storage collaborators plus auth settings
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub selected_calendars: Arc<dyn SelectedCalendarRepository>,
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pub health: Arc<dyn HealthCheck>,
    pub api_key_prefix: Arc<str>,
}

impl AppState {
    /// Wires every repository to one backing store
    pub fn new<S>(store: Arc<S>, config: &AppConfig) -> Self
    where
        S: UserRepository + SelectedCalendarRepository + ApiKeyRepository + HealthCheck + 'static,
    {
        Self {
            users: store.clone(),
            selected_calendars: store.clone(),
            api_keys: store.clone(),
            health: store,
            api_key_prefix: Arc::from(config.security.api_key_prefix.as_str()),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root::root))
        .route("/health", get(root::health))
        // API key protected
        .merge(selected_calendar_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn selected_calendar_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/selected-calendars",
            get(selected_calendars::list).post(selected_calendars::create),
        )
        .route_layer(middleware::from_fn_with_state(state, api_key_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if security.cors_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
