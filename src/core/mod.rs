//! 核心层：错误、提取器、中间件、响应与路由

pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod router;
