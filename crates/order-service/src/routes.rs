//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射。方法不匹配（如对 cancel 路径
//! 发 GET）由 axum 的方法路由返回 405；路径参数解析失败返回 400。

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// 构建应用路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/orders", post(handlers::order::create_order))
        .route("/orders/get/{id}", get(handlers::order::get_order))
        .route("/orders/cancel/{id}", put(handlers::order::cancel_order))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
