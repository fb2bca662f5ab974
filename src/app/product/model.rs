//! 产品数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 持久化的产品行，`id` 由存储分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

/// 创建/更新请求体。请求中的 `id` 字段会被忽略。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,
}

impl Product {
    pub fn from_payload(id: i32, payload: ProductPayload) -> Self {
        Self {
            id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            quantity: payload.quantity,
        }
    }

    /// 整体覆盖除 `id` 之外的所有字段
    pub fn overwrite(&mut self, payload: ProductPayload) {
        let ProductPayload {
            name,
            description,
            price,
            quantity,
        } = payload;
        self.name = name;
        self.description = description;
        self.price = price;
        self.quantity = quantity;
    }
}
