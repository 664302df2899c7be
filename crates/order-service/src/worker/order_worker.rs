//! 订单处理 worker
//!
//! 消费 `orders` topic 的订单创建事件，把对应订单状态置为 Processed。
//! 解码失败和更新失败都只记日志并继续——消息仍视为已消费，没有
//! 失败重投：配合无条件状态覆盖，重复/乱序事件无害但也不做去重。

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use orderhub_shared::config::KafkaConfig;
use orderhub_shared::error::HubError;
use orderhub_shared::events::OrderCreatedEvent;
use orderhub_shared::kafka::{ConsumerMessage, KafkaConsumer, topics};

use crate::models::OrderStatus;
use crate::repository::OrderStore;

/// 订单处理 worker
///
/// 池中每个实例持有独立的消费者连接；消费循环通过 shutdown
/// 信号可取消，不存在无法终止的阻塞拉取。
pub struct OrderWorker {
    worker_id: usize,
    consumer: KafkaConsumer,
}

impl OrderWorker {
    pub fn new(worker_id: usize, config: &KafkaConfig) -> Result<Self, HubError> {
        let consumer = KafkaConsumer::new(config)?;
        Ok(Self {
            worker_id,
            consumer,
        })
    }

    /// 启动消费循环，直到收到 shutdown 信号
    pub async fn run<S: OrderStore>(self, store: Arc<S>, shutdown: watch::Receiver<bool>) {
        let Self {
            worker_id,
            consumer,
        } = self;

        if let Err(e) = consumer.subscribe(&[topics::ORDERS]) {
            error!(worker_id, error = %e, "订阅失败，worker 退出");
            return;
        }

        info!(worker_id, topic = topics::ORDERS, "订单 worker 已启动");

        consumer
            .start(shutdown, |msg| {
                let store = &store;
                async move {
                    if let Err(e) = handle_message(worker_id, store.as_ref(), &msg).await {
                        error!(
                            worker_id,
                            error = %e,
                            partition = msg.partition,
                            offset = msg.offset,
                            "处理订单创建事件失败"
                        );
                    }
                    Ok(())
                }
            })
            .await;

        info!(worker_id, "订单 worker 已停止");
    }
}

/// 处理单条订单创建事件
///
/// 拆分为独立函数而非方法，便于在测试中直接调用而无需构造完整的 worker。
async fn handle_message<S: OrderStore>(
    worker_id: usize,
    store: &S,
    msg: &ConsumerMessage,
) -> Result<(), HubError> {
    let event: OrderCreatedEvent = msg.deserialize_payload()?;

    info!(worker_id, order_id = event.order_id, "处理订单创建事件");

    let affected = store
        .update_status(event.order_id, OrderStatus::Processed)
        .await?;

    if affected == 0 {
        // 订单不存在（可能已被删除或事件先于落库可见），事件直接丢弃
        warn!(worker_id, order_id = event.order_id, "订单不存在，事件被丢弃");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use orderhub_shared::error::HubError;

    use crate::repository::MockOrderStore;

    fn make_message(payload: &[u8]) -> ConsumerMessage {
        ConsumerMessage {
            topic: topics::ORDERS.to_string(),
            partition: 0,
            offset: 1,
            key: None,
            payload: payload.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_handle_message_marks_order_processed() {
        let mut store = MockOrderStore::new();
        store
            .expect_update_status()
            .with(eq(42), eq(OrderStatus::Processed))
            .times(1)
            .returning(|_, _| Ok(1));

        let msg = make_message(br#"{"order_id": 42}"#);
        handle_message(1, &store, &msg).await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_message_decode_failure_skips_update() {
        let mut store = MockOrderStore::new();
        store.expect_update_status().times(0);

        let msg = make_message(b"not json");
        let result = handle_message(1, &store, &msg).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_handle_message_missing_order_is_not_an_error() {
        // 更新 0 行不算失败：事件被消费、被丢弃，不触发重投
        let mut store = MockOrderStore::new();
        store
            .expect_update_status()
            .with(eq(7), eq(OrderStatus::Processed))
            .times(1)
            .returning(|_, _| Ok(0));

        let msg = make_message(br#"{"order_id": 7}"#);
        handle_message(1, &store, &msg).await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_message_update_failure_propagates() {
        let mut store = MockOrderStore::new();
        store
            .expect_update_status()
            .times(1)
            .returning(|_, _| Err(HubError::Database(sqlx::Error::PoolTimedOut)));

        let msg = make_message(br#"{"order_id": 8}"#);
        assert!(handle_message(1, &store, &msg).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_events_are_harmless() {
        // at-least-once：同一事件消费两次，两次都是无条件覆盖
        let mut store = MockOrderStore::new();
        store
            .expect_update_status()
            .with(eq(9), eq(OrderStatus::Processed))
            .times(2)
            .returning(|_, _| Ok(1));

        let msg = make_message(br#"{"order_id": 9}"#);
        handle_message(1, &store, &msg).await.unwrap();
        handle_message(2, &store, &msg).await.unwrap();
    }
}
