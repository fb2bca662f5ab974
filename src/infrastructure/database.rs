//! 数据库基础设施
//!
//! 连接池在启动时按配置创建；每个请求从池中取出自己的连接或事务，
//! 句柄被 drop 时归还连接池，未提交的事务自动回滚。

use sqlx::{
    pool::PoolConnection,
    postgres::{PgPool, PgPoolOptions},
    Postgres, Transaction,
};
use thiserror::Error;
use tracing::info;

use super::config::DatabaseConfig;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 无法连接存储（连接池超时、关闭、网络错误）
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    /// 其余数据库错误，包括约束冲突
    #[error("store query failed: {0}")]
    Query(#[source] sqlx::Error),
    /// 无可分配的新 id
    #[error("product id space exhausted")]
    IdExhausted,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err),
            other => StoreError::Query(other),
        }
    }
}

#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, StoreError> {
        info!("Connecting to database: {}", config.redacted_url());

        let pool = Self::pool_options(config)
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// 不立即建立连接，首次使用时才连接
    pub fn new_lazy(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = Self::pool_options(config).connect_lazy(&config.url)?;
        Ok(Self { pool })
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 只读会话：一个池连接
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        Ok(self.pool.acquire().await?)
    }

    /// 写会话：一个事务，必须显式 commit
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        Ok(self.pool.begin().await?)
    }
}
