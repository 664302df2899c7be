//! 订单编排服务
//!
//! 组合持久层、缓存层和事件发布器，是 HTTP 处理器唯一直接依赖的组件。
//! 一致性取舍（与既有 API 契约保持一致，详见 DESIGN.md）：
//! - 缓存只在取消路径失效，worker 改状态不失效，命中可能读到旧状态，
//!   直到 TTL 过期；
//! - 落库与发事件之间没有事务，事件可能丢失；
//! - 基础设施故障在本层退化为布尔/哨兵信号，不向调用方区分
//!   「不存在」与「存储不可达」。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use orderhub_shared::cache::{Cache, CacheKey};

use crate::models::{Order, OrderStatus};
use crate::publisher::OrderEventPublisher;
use crate::repository::OrderStore;

/// 订单缓存条目的固定过期时间
const ORDER_CACHE_TTL: Duration = Duration::from_secs(300);

/// 订单编排服务
///
/// 所有方法都是 `&self` 异步方法，内部客户端自带并发安全，
/// 可被任意多的请求任务并发调用，无需外部加锁。
pub struct OrderService<S: OrderStore> {
    store: Arc<S>,
    cache: Arc<Cache>,
    publisher: OrderEventPublisher,
}

impl<S: OrderStore> OrderService<S> {
    pub fn new(store: Arc<S>, cache: Arc<Cache>, publisher: OrderEventPublisher) -> Self {
        Self {
            store,
            cache,
            publisher,
        }
    }

    /// 创建订单
    ///
    /// 落库成功后 fire-and-forget 发布创建事件并返回新 id；
    /// 落库失败返回 0 哨兵值。serial 主键从 1 起分配，0 不会与
    /// 真实订单冲突。
    pub async fn create_order(&self, product: &str, quantity: i32) -> i32 {
        match self.store.insert(product, quantity).await {
            Ok(id) => {
                info!(order_id = id, product, quantity, "订单已创建");
                self.publisher.announce(id);
                id
            }
            Err(e) => {
                error!(error = %e, product, quantity, "创建订单失败");
                0
            }
        }
    }

    /// 查询订单（cache-aside）
    ///
    /// 命中缓存直接返回，不回源——命中值可能落后于 worker 的状态更新。
    /// 未命中（含缓存不可达、负载损坏）回源数据库，读到后以固定 TTL
    /// 回填缓存。存储层错误按不存在处理。
    pub async fn get_order(&self, id: i32) -> Option<Order> {
        let key = CacheKey::order(id);

        match self.cache.get::<Order>(&key).await {
            Ok(Some(order)) => {
                debug!(order_id = id, "缓存命中");
                return Some(order);
            }
            Ok(None) => {}
            Err(e) => {
                debug!(order_id = id, error = %e, "缓存不可用，回源数据库");
            }
        }

        let order = match self.store.find_by_id(id).await {
            Ok(found) => found?,
            Err(e) => {
                error!(order_id = id, error = %e, "读取订单失败");
                return None;
            }
        };

        // 回填是尽力而为的优化，失败不影响本次读取
        if let Err(e) = self.cache.set(&key, &order, ORDER_CACHE_TTL).await {
            debug!(order_id = id, error = %e, "回填缓存失败");
        }

        debug!(order_id = id, "缓存未命中，已从数据库加载并回填");
        Some(order)
    }

    /// 取消订单
    ///
    /// 无条件覆盖状态为 Canceled（不校验当前状态，重复取消等价于
    /// 取消一次），随后使缓存条目失效——无论是否有行被匹配——并返回
    /// 是否有行被匹配。存储层错误返回 false，此时不触碰缓存。
    pub async fn cancel_order(&self, id: i32) -> bool {
        let affected = match self.store.update_status(id, OrderStatus::Canceled).await {
            Ok(n) => n,
            Err(e) => {
                error!(order_id = id, error = %e, "取消订单失败");
                return false;
            }
        };

        let key = CacheKey::order(id);
        if let Err(e) = self.cache.delete(&key).await {
            debug!(order_id = id, error = %e, "缓存失效失败");
        }

        if affected > 0 {
            info!(order_id = id, "订单已取消");
            true
        } else {
            false
        }
    }
}
