//! 产品资源：模型、存储、服务、处理器与初始数据

pub mod handler;
pub mod model;
pub mod repository;
pub mod seed;
pub mod service;
