//! 路由与中间件装配

use axum::{
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::middleware::request_logging_middleware;
use crate::app::product::handler::{self, AppState};
use crate::infrastructure::config::{AppConfig, ConfigError, CorsConfig};

/// 只对配置的前端来源回写 Allow-Origin 并允许携带凭证，方法和请求头按预检请求回显
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(&config.allowed_origin)
        .map_err(|_| ConfigError::InvalidOrigin(config.allowed_origin.clone()))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::greet))
        .route("/health", get(handler::health_check))
        .route(
            "/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route(
            "/products/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
}

pub fn build_app(state: AppState, config: &AppConfig) -> Result<Router, ConfigError> {
    Ok(create_routes()
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors)?)
        .with_state(state))
}
