use std::sync::Arc;

use axum::{
    extract::FromRequest,
    http::{header, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::{auth::require_auth, error::ApiError, AppState};

mod assets;
mod auth;
mod records;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self' 'unsafe-eval' cdnjs.cloudflare.com; \
     style-src 'self' https://fonts.googleapis.com https://cdnjs.cloudflare.com; \
     font-src 'self' https://fonts.gstatic.com https://cdnjs.cloudflare.com";

/// JSON body extractor whose rejections render like every other API error.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

async fn root() -> &'static str {
    "it works!"
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(records::router())
        .merge(assets::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let public = Router::new()
        .route("/", get(root))
        .route("/auth", post(auth::login));

    public
        .merge(protected)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
