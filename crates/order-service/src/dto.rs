//! 请求/响应 DTO 定义

use serde::{Deserialize, Serialize};

use crate::models::OrderStatus;

/// 创建订单请求
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub product: String,
    pub quantity: i32,
}

/// 创建订单响应
///
/// 插入失败时 id 为 0 哨兵值（沿用既有 API 契约，见 DESIGN.md）。
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub id: i32,
    pub status: OrderStatus,
}

/// 取消订单响应
#[derive(Debug, Serialize)]
pub struct CancelOrderResponse {
    pub status: OrderStatus,
}
