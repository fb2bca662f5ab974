//! 产品处理器

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::{
    model::{Product, ProductPayload},
    repository::ProductRepository,
    service::ProductService,
};
use crate::core::{
    error::CoreError,
    extract::{PathParam, ValidatedJson},
    response::{HealthResponse, MessageResponse},
};

pub const GREETING: &str = "Welcome to the product service!";

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self {
            product_service: ProductService::new(repository),
        }
    }
}

pub async fn greet() -> Json<&'static str> {
    Json(GREETING)
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, CoreError> {
    state.product_service.check_store().await?;
    Ok(Json(HealthResponse::healthy()))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let products = state.product_service.list_products().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Product>, CoreError> {
    let product = state.product_service.get_product(id).await?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let product = state.product_service.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    ValidatedJson(payload): ValidatedJson<ProductPayload>,
) -> Result<Json<Product>, CoreError> {
    let product = state.product_service.update_product(id, payload).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<MessageResponse>, CoreError> {
    state.product_service.delete_product(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
