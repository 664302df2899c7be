//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use orderhub_shared::cache::Cache;
use orderhub_shared::database::Database;

use crate::repository::OrderRepository;
use crate::service::OrderService;

/// Axum 应用共享状态
///
/// 编排服务供业务处理器使用；数据库与缓存句柄单独保留，
/// 供健康检查直接探活。
#[derive(Clone)]
pub struct AppState {
    /// 订单编排服务
    pub orders: Arc<OrderService<OrderRepository>>,
    /// PostgreSQL 连接池包装
    pub db: Database,
    /// Redis 缓存客户端
    pub cache: Arc<Cache>,
}

impl AppState {
    pub fn new(orders: Arc<OrderService<OrderRepository>>, db: Database, cache: Arc<Cache>) -> Self {
        Self { orders, db, cache }
    }
}
