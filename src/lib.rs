//! # 产品服务
//!
//! 基于 Axum + SQLx 的产品 CRUD 服务：
//! - 请求级数据库会话（连接池连接/事务，离开作用域即释放）
//! - 启动时幂等写入示例数据
//! - 列表、查询、创建、整体更新、删除

pub mod app;
pub mod core;
pub mod infrastructure;

use std::sync::Arc;

use app::product::repository::{MemoryProductRepository, PgProductRepository, ProductRepository};
use infrastructure::{
    config::{DatabaseConfig, StoreBackend},
    database::{DatabaseManager, StoreError},
};

/// 按配置选择存储后端
pub async fn connect_repository(
    config: &DatabaseConfig,
) -> Result<Arc<dyn ProductRepository>, StoreError> {
    match config.backend {
        StoreBackend::Postgres => {
            let db = DatabaseManager::new(config).await?;
            Ok(Arc::new(PgProductRepository::new(db)))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryProductRepository::new())),
    }
}
