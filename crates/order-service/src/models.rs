//! 订单数据模型
//!
//! 所有类型同时支持数据库（sqlx）和 JSON（serde）序列化。

use serde::{Deserialize, Serialize};

/// 订单状态
///
/// 存储为 text 列，字面量即变体名。状态之间没有状态机约束：
/// 任意覆盖（包括 Processed -> Canceled、重复取消）都被允许，
/// 与 at-least-once 事件投递配合时重复覆盖无害。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum OrderStatus {
    /// 已创建 - 落库成功后的初始状态
    #[default]
    Created,
    /// 已处理 - worker 消费订单创建事件后置位
    Processed,
    /// 已取消 - 取消接口无条件置位
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Processed => "Processed",
            Self::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 订单
///
/// id 由数据库 serial 主键分配，创建后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i32,
    pub product: String,
    pub quantity: i32,
    pub status: OrderStatus,
}
