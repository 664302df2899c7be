//! 仓储层 trait 定义
//!
//! 编排服务和 worker 只依赖本 trait，便于单元测试中用 mock 替换
//! 真实数据库访问。

use async_trait::async_trait;

use orderhub_shared::error::Result;

use crate::models::{Order, OrderStatus};

/// 订单存储契约
///
/// 持久层是订单状态的单一事实来源。实现必须内部线程安全，
/// 支持任意并发调用（PgPool 天然满足）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// 插入新订单，初始状态 Created，返回数据库分配的 id
    ///
    /// 失败即「订单未创建」，不存在部分写入状态。
    async fn insert(&self, product: &str, quantity: i32) -> Result<i32>;

    /// 按 id 读取订单，不存在返回 None
    async fn find_by_id(&self, id: i32) -> Result<Option<Order>>;

    /// 无条件覆盖订单状态，返回匹配行数
    ///
    /// 没有 compare-and-swap，也不校验当前状态；调用方通过返回值
    /// 判断订单是否存在。
    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<u64>;
}
