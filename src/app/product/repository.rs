//! 产品存储
//!
//! 每个操作获取自己的会话（连接或事务），完成一次存储交互后释放。
//! 查询不到记录返回 `None`/`false`，不是错误。

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::model::{Product, ProductPayload};
use crate::infrastructure::database::{DatabaseManager, StoreError};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 表不存在时创建
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    /// 按给定 id 原样插入（用于初始数据），后续分配的 id 不会与之冲突
    async fn insert_with_ids(&self, products: &[Product]) -> Result<u64, StoreError>;

    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn get(&self, id: i32) -> Result<Option<Product>, StoreError>;

    async fn create(&self, payload: ProductPayload) -> Result<Product, StoreError>;

    async fn update(&self, id: i32, payload: ProductPayload)
        -> Result<Option<Product>, StoreError>;

    /// 删除成功返回 true，记录不存在返回 false
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    /// 连通性检查
    async fn ping(&self) -> Result<(), StoreError>;
}

const SELECT_COLUMNS: &str = "id, name, description, price, quantity";

/// PostgreSQL 实现
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseManager,
}

impl PgProductRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        info!("Creating products table if missing...");
        let mut conn = self.db.acquire().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                price DOUBLE PRECISION NOT NULL,
                quantity INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let mut conn = self.db.acquire().await?;
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count.0)
    }

    async fn insert_with_ids(&self, products: &[Product]) -> Result<u64, StoreError> {
        let mut tx = self.db.begin().await?;
        let mut inserted = 0;

        for product in products {
            inserted += sqlx::query(
                "INSERT INTO products (id, name, description, price, quantity) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.quantity)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        // 显式插入的 id 不会推进序列
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('products', 'id'), COALESCE((SELECT MAX(id) FROM products), 1))",
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(inserted)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.db.acquire().await?;
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&mut *conn)
        .await?;
        Ok(products)
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, StoreError> {
        let mut conn = self.db.acquire().await?;
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(product)
    }

    async fn create(&self, payload: ProductPayload) -> Result<Product, StoreError> {
        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, description, price, quantity) VALUES ($1, $2, $3, $4) RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.quantity)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Inserted product row {}", product.id);
        Ok(product)
    }

    async fn update(
        &self,
        id: i32,
        payload: ProductPayload,
    ) -> Result<Option<Product>, StoreError> {
        let mut tx = self.db.begin().await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET name = $1, description = $2, price = $3, quantity = $4 WHERE id = $5 RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.quantity)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        // 未命中时 tx 被 drop，自动回滚
        if product.is_some() {
            tx.commit().await?;
        }
        Ok(product)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.db.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryTable {
    rows: BTreeMap<i32, Product>,
    last_id: i32,
}

/// 内存实现，不需要数据库即可运行
#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    table: RwLock<MemoryTable>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.table.read().await.rows.len() as i64)
    }

    async fn insert_with_ids(&self, products: &[Product]) -> Result<u64, StoreError> {
        let mut table = self.table.write().await;
        for product in products {
            table.last_id = table.last_id.max(product.id);
            table.rows.insert(product.id, product.clone());
        }
        Ok(products.len() as u64)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, payload: ProductPayload) -> Result<Product, StoreError> {
        let mut table = self.table.write().await;
        let id = table
            .last_id
            .checked_add(1)
            .ok_or(StoreError::IdExhausted)?;
        table.last_id = id;
        let product = Product::from_payload(id, payload);
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: i32,
        payload: ProductPayload,
    ) -> Result<Option<Product>, StoreError> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id).map(|product| {
            product.overwrite(payload);
            product.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
