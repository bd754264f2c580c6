use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Mesob Help Desk",
            "version": version,
            "description": "Multi-tenant IT help desk API with realtime ticket relay",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "login": "/auth/login (public - token acquisition)",
                "auth": "/api/auth/whoami (protected)",
                "tickets": "/api/tickets[/:id[/assign|/rating|/suggestions]] (protected)",
                "technicians": "/api/technicians[/:id/duty] (protected)",
                "broadcasts": "/api/broadcasts (protected, admins)",
                "dashboard": "/api/dashboard/stats (protected, admins)",
                "companies": "/api/companies (protected)",
                "relay": "/api/relay?token=... (websocket)",
                "root": "/api/root/companies (system admin)",
            }
        }
    }))
}

/// GET /health - liveness plus store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}
