//! 订单处理 worker 池
//!
//! 固定数量的独立消费者，同属一个消费组，由 broker 按分区做负载均衡。
//! 每个 worker 消费订单创建事件并把订单状态推进到 Processed。

pub mod order_worker;

pub use order_worker::OrderWorker;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use orderhub_shared::config::AppConfig;
use orderhub_shared::error::HubError;

use crate::repository::OrderRepository;

/// 启动 worker 池
///
/// 每个 worker 持有独立的 Kafka 消费者连接，共享同一个仓储。
/// 返回的句柄供进程退出时 join，确保在途消息处理完成。
pub fn spawn_pool(
    config: &AppConfig,
    store: Arc<OrderRepository>,
    shutdown: watch::Receiver<bool>,
) -> Result<Vec<JoinHandle<()>>, HubError> {
    let mut handles = Vec::with_capacity(config.worker.count);

    for worker_id in 1..=config.worker.count {
        let worker = OrderWorker::new(worker_id, &config.kafka)?;
        let store = store.clone();
        let shutdown = shutdown.clone();
        handles.push(tokio::spawn(async move {
            worker.run(store, shutdown).await;
        }));
    }

    Ok(handles)
}
