//! HTTP route handlers.

pub mod cart;
pub mod checkout;
pub mod functions;
pub mod product;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Storefront API, notification functions and health check under one router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/product", get(product::show))
        .route("/cart/:session", get(cart::show).delete(cart::clear))
        .route("/cart/:session/items", post(cart::add_item))
        .route("/cart/:session/items/:id", put(cart::update_item).delete(cart::remove_item))
        .route("/cart/:session/drawer", put(cart::set_drawer))
        .route("/cart/:session/proceed", post(cart::proceed))
        .route("/checkout/:session", post(checkout::submit))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .nest("/functions/v1", functions::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "urban-athletics-storefront" }))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Router test helpers.

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::checkout::pipeline::testing::{Script, ScriptedChannel};
    use crate::checkout::NotificationPipeline;
    use crate::notifications::ChannelKind;
    use crate::state::AppState;
    use crate::store::InMemoryCartStore;

    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
        pub whatsapp: Arc<ScriptedChannel>,
        pub email: Arc<ScriptedChannel>,
    }

    pub fn app(w: Script, e: Script) -> TestApp {
        let whatsapp = Arc::new(ScriptedChannel::new(ChannelKind::WhatsApp, w));
        let email = Arc::new(ScriptedChannel::new(ChannelKind::Email, e));
        let state = AppState::new(
            Arc::new(InMemoryCartStore::new()),
            NotificationPipeline::new(whatsapp.clone(), email.clone()),
            None,
            None,
        );
        TestApp { router: super::router(state.clone()), state, whatsapp, email }
    }

    /// Sends one request and returns the status with the parsed JSON body
    /// (`Null` for an empty body).
    pub async fn call(router: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header("content-type", "application/json");
        }
        let request = request.body(body.map_or_else(Body::empty, |b| Body::from(b.to_string()))).unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() { serde_json::Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{app, call};
    use crate::checkout::pipeline::testing::Script;
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_health() {
        let t = app(Script::Succeed, Script::Succeed);
        let (status, body) = call(&t.router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let t = app(Script::Succeed, Script::Succeed);
        let (status, _) = call(&t.router, Method::GET, "/api/v1/products", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
