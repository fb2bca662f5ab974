//! 产品业务服务

use std::sync::Arc;
use tracing::info;

use super::model::{Product, ProductPayload};
use super::repository::ProductRepository;
use crate::core::error::CoreError;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.repository.list().await?)
    }

    pub async fn get_product(&self, id: i32) -> Result<Product, CoreError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create_product(&self, payload: ProductPayload) -> Result<Product, CoreError> {
        let product = self.repository.create(payload).await?;
        info!("Created product: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: i32,
        payload: ProductPayload,
    ) -> Result<Product, CoreError> {
        let product = self
            .repository
            .update(id, payload)
            .await?
            .ok_or_else(not_found)?;
        info!("Updated product: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn delete_product(&self, id: i32) -> Result<(), CoreError> {
        if !self.repository.delete(id).await? {
            return Err(not_found());
        }
        info!("Deleted product: {}", id);
        Ok(())
    }

    pub async fn check_store(&self) -> Result<(), CoreError> {
        Ok(self.repository.ping().await?)
    }
}

fn not_found() -> CoreError {
    CoreError::NotFound(PRODUCT_NOT_FOUND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::repository::MemoryProductRepository;

    fn service() -> ProductService {
        ProductService::new(Arc::new(MemoryProductRepository::new()))
    }

    fn payload(name: &str, price: f64, quantity: i32) -> ProductPayload {
        ProductPayload {
            name: name.to_string(),
            description: Some("desc".to_string()),
            price,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let service = service();
        let created = service.create_product(payload("Chair", 45.0, 4)).await.unwrap();
        let fetched = service.get_product(created.id).await.unwrap();
        assert_eq!(fetched, Product::from_payload(created.id, payload("Chair", 45.0, 4)));
    }

    #[tokio::test]
    async fn test_not_found_after_delete() {
        let service = service();
        let created = service.create_product(payload("Chair", 45.0, 4)).await.unwrap();
        service.delete_product(created.id).await.unwrap();

        assert!(matches!(
            service.get_product(created.id).await,
            Err(CoreError::NotFound(msg)) if msg == PRODUCT_NOT_FOUND
        ));
        assert!(matches!(
            service.update_product(created.id, payload("x", 1.0, 1)).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_product(created.id).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(service.list_products().await.unwrap().is_empty());
    }
}
