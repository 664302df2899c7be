//! 订单 API 处理器
//!
//! 薄 HTTP 层：解析请求、调用编排服务、映射状态码。
//! 业务语义（缓存策略、事件发布、错误退化）都在编排层。

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use crate::dto::{CancelOrderResponse, CreateOrderRequest, CreateOrderResponse};
use crate::error::ApiError;
use crate::models::{Order, OrderStatus};
use crate::state::AppState;

/// 创建订单
///
/// POST /orders
///
/// 请求体无法解析（语法或字段类型错误）统一返回 400。
/// 插入失败沿用既有契约：HTTP 200，id 为 0 哨兵值。
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let id = state.orders.create_order(&req.product, req.quantity).await;

    Ok(Json(CreateOrderResponse {
        id,
        status: OrderStatus::Created,
    }))
}

/// 查询订单
///
/// GET /orders/get/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Order>, ApiError> {
    match state.orders.get_order(id).await {
        Some(order) => Ok(Json(order)),
        None => Err(ApiError::OrderNotFound(id)),
    }
}

/// 取消订单
///
/// PUT /orders/cancel/{id}
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CancelOrderResponse>, ApiError> {
    if state.orders.cancel_order(id).await {
        Ok(Json(CancelOrderResponse {
            status: OrderStatus::Canceled,
        }))
    } else {
        Err(ApiError::OrderNotFound(id))
    }
}
