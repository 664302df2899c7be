//! 订单服务 HTTP 边界错误类型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use orderhub_shared::error::HubError;

/// HTTP 边界错误类型
///
/// 注意：多数基础设施故障在编排层已经退化为布尔/哨兵信号
/// （见 service::OrderService），只有少数路径会走到这里。
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 验证错误
    #[error("请求格式无效: {0}")]
    InvalidRequest(String),

    // 资源不存在
    #[error("订单不存在: {0}")]
    OrderNotFound(i32),

    // 依赖不可用（健康检查）
    #[error("依赖服务不可用: {0}")]
    Unavailable(String),

    // 系统错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::OrderNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::OrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::Unavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Unavailable(e) => {
                tracing::error!(error = %e, "依赖服务不可用");
                "服务暂时不可用，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "code": self.error_code(),
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<HubError> for ApiError {
    fn from(err: HubError) -> Self {
        Self::Internal(err.to_string())
    }
}
