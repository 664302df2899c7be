//! 订单事件发布器
//!
//! 订单落库成功后以 fire-and-forget 方式向 `orders` topic 发布创建事件：
//! 发布调用只做本地入队即返回，不等待 broker 确认，写路径延迟与 broker
//! 延迟解耦。投递结果（成功/失败）由进程内唯一的 delivery report 监听
//! 任务异步记录日志——不重试、不回联原请求。因此从编排层视角，事件对
//! broker 是 at-most-once 的：订单可以创建成功而事件最终未送达。

use rdkafka::producer::DeliveryFuture;
use rdkafka::producer::future_producer::OwnedDeliveryResult;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use orderhub_shared::events::OrderCreatedEvent;
use orderhub_shared::kafka::{KafkaProducer, topics};

/// 投递结果
///
/// 成功与失败建模为和类型，由 delivery report 任务统一消化。
#[derive(Debug)]
pub enum DeliveryReport {
    Delivered { partition: i32, offset: i64 },
    Failed { reason: String },
}

impl DeliveryReport {
    fn from_result(result: OwnedDeliveryResult) -> Self {
        match result {
            Ok(delivery) => Self::Delivered {
                partition: delivery.partition,
                offset: delivery.offset,
            },
            Err((e, _msg)) => Self::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// 订单事件发布器
///
/// 内部可廉价克隆（生产者与通道发送端都是 Arc 语义）。
#[derive(Clone)]
pub struct OrderEventPublisher {
    producer: KafkaProducer,
    reports: mpsc::UnboundedSender<DeliveryFuture>,
}

impl OrderEventPublisher {
    /// 创建发布器，返回配套的投递结果接收端
    ///
    /// 调用方须将接收端交给 `drain_delivery_reports` 任务，
    /// 否则投递结果无人记录。
    pub fn new(producer: KafkaProducer) -> (Self, mpsc::UnboundedReceiver<DeliveryFuture>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                producer,
                reports: tx,
            },
            rx,
        )
    }

    /// 发布订单创建事件（fire-and-forget）
    ///
    /// 以订单 id 作为消息 key，同一订单的事件落在同一分区。
    /// 入队失败（如本地队列满）只记日志，事件被丢弃。
    pub fn announce(&self, order_id: i32) {
        let event = OrderCreatedEvent::new(order_id);

        match self
            .producer
            .enqueue_json(topics::ORDERS, &order_id.to_string(), &event)
        {
            Ok(delivery) => {
                if self.reports.send(delivery).is_err() {
                    debug!(order_id, "delivery report 任务已退出，投递结果不再记录");
                }
            }
            Err(e) => {
                error!(order_id, error = %e, "订单创建事件入队失败，事件被丢弃");
            }
        }
    }
}

/// 投递结果监听任务
///
/// 进程生命周期内只运行一个实例，逐条等待投递结果并记录日志。
/// 所有发布器克隆体被丢弃后通道关闭，任务自然退出。
pub async fn drain_delivery_reports(mut reports: mpsc::UnboundedReceiver<DeliveryFuture>) {
    info!("delivery report 监听任务已启动");

    while let Some(delivery) = reports.recv().await {
        match delivery.await {
            Ok(result) => match DeliveryReport::from_result(result) {
                DeliveryReport::Delivered { partition, offset } => {
                    debug!(partition, offset, "订单创建事件已投递");
                }
                DeliveryReport::Failed { reason } => {
                    error!(%reason, "订单创建事件投递失败");
                }
            },
            // 生产者在投递完成前被销毁
            Err(_) => warn!("投递结果被取消"),
        }
    }

    info!("delivery report 监听任务已退出");
}
