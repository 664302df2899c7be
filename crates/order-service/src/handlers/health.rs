//! 健康检查处理器

use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

/// 健康检查
///
/// GET /health
///
/// 只探活硬依赖（数据库、缓存）；Kafka 投递故障不影响读写路径的
/// 可用性，不纳入探活。
pub async fn health(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state
        .db
        .health_check()
        .await
        .map_err(|e| ApiError::Unavailable(format!("database: {e}")))?;

    state
        .cache
        .health_check()
        .await
        .map_err(|e| ApiError::Unavailable(format!("redis: {e}")))?;

    Ok("ok")
}
