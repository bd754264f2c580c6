use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, validate_company_middleware};
use crate::relay::relay_socket;
use crate::state::AppState;

/// Full HTTP surface: public routes, the relay socket, and the JWT-protected API
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/auth/login", post(public::auth::login))
        // Socket upgrades carry the JWT in the query string
        .route("/api/relay", get(relay_socket))
        // Protected API
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, broadcasts, companies, dashboard, technicians, tickets};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/tickets", get(tickets::list).post(tickets::create))
        .route("/api/tickets/:id", get(tickets::show).patch(tickets::update))
        .route("/api/tickets/:id/assign", put(tickets::assign))
        .route("/api/tickets/:id/rating", post(tickets::rate))
        .route("/api/tickets/:id/suggestions", get(tickets::suggestions))
        .route("/api/technicians", get(technicians::list))
        .route("/api/technicians/:id/duty", put(technicians::update_duty))
        .route("/api/broadcasts", post(broadcasts::send))
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/companies", get(companies::list))
        // Elevated
        .route("/api/root/companies", post(elevated::root::company_create))
        // Layers run bottom-up: JWT first, then company validation
        .layer(middleware::from_fn_with_state(state, validate_company_middleware))
        .layer(middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;

    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
