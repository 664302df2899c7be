//! 订单处理服务
//!
//! 对外提供订单的创建/查询/取消 REST API，内部由编排服务组合
//! PostgreSQL（持久化）、Redis（cache-aside 读缓存）和 Kafka
//! （订单创建事件 + 异步处理 worker 池）。

pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod publisher;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;
pub mod worker;

pub use error::ApiError;
pub use models::{Order, OrderStatus};
