//! 事件模型
//!
//! 定义跨服务传递的 Kafka 事件结构。订单创建事件只携带订单 ID，
//! 消费方按需回源数据库读取完整订单。

use serde::{Deserialize, Serialize};

/// 订单创建事件
///
/// 每次成功落库产生一条，broker 提供 at-least-once 语义：
/// 消费方可能收到重复事件，状态更新是无条件覆盖，重复无害。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    /// 订单主键，与 orders 表的 serial 主键同宽
    pub order_id: i32,
}

impl OrderCreatedEvent {
    pub fn new(order_id: i32) -> Self {
        Self { order_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        // 线上格式是跨语言契约，字段名锁定为 order_id
        let event = OrderCreatedEvent::new(7);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"order_id":7}"#);
    }

    #[test]
    fn test_deserialize() {
        let event: OrderCreatedEvent = serde_json::from_str(r#"{"order_id": 42}"#).unwrap();
        assert_eq!(event, OrderCreatedEvent::new(42));
    }

    #[test]
    fn test_deserialize_invalid_payload() {
        let result: Result<OrderCreatedEvent, _> = serde_json::from_str(r#"{"id": 42}"#);
        assert!(result.is_err());
    }
}
