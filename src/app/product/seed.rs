//! 启动时的初始数据
//!
//! 只有在表为空时才插入，重复启动不会产生重复数据。

use tracing::info;

use super::model::Product;
use super::repository::ProductRepository;
use crate::infrastructure::database::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(u64),
    Skipped { existing: i64 },
}

pub fn sample_products() -> Vec<Product> {
    let rows = [
        (1, "Laptop", "A high-performance laptop", 999.99, 10),
        (2, "Mouse", "Wireless optical mouse", 29.99, 50),
        (3, "Keyboard", "Mechanical keyboard", 79.99, 30),
        (4, "Monitor", "24-inch LED monitor", 199.99, 20),
    ];

    rows.into_iter()
        .map(|(id, name, description, price, quantity)| Product {
            id,
            name: name.to_string(),
            description: Some(description.to_string()),
            price,
            quantity,
        })
        .collect()
}

pub async fn initialize(repository: &dyn ProductRepository) -> Result<SeedOutcome, StoreError> {
    repository.ensure_schema().await?;

    let existing = repository.count().await?;
    if existing > 0 {
        info!("Database already contains {} products, skipping seed", existing);
        return Ok(SeedOutcome::Skipped { existing });
    }

    let inserted = repository.insert_with_ids(&sample_products()).await?;
    info!("Seeded database with {} sample products", inserted);
    Ok(SeedOutcome::Inserted(inserted))
}
