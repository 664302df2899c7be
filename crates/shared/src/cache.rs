//! Redis 缓存管理模块
//!
//! 提供 Redis 连接管理和常用缓存操作封装。缓存只是读路径的优化，
//! 不是正确性依赖：损坏的缓存负载在本层按未命中处理，连接类错误
//! 以 Err 返回，由调用方决定吞掉还是上报。

use crate::config::RedisConfig;
use crate::error::{HubError, Result};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Redis 缓存客户端
#[derive(Clone)]
pub struct Cache {
    client: Client,
}

impl Cache {
    /// 创建 Redis 客户端
    ///
    /// 只解析 URL，不建立连接；连接在首次操作时惰性建立。
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        info!("Redis client created");
        Ok(Self { client })
    }

    /// 获取连接
    async fn get_conn(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(HubError::from)
    }

    /// 健康检查
    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(HubError::from)
    }

    /// 获取值
    ///
    /// 键不存在或负载无法反序列化（缓存格式升级、写入损坏）都返回
    /// `Ok(None)`，后者记录 warn 日志。只有连接层故障才返回 Err。
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(v) => match serde_json::from_str::<T>(&v) {
                Ok(parsed) => Ok(Some(parsed)),
                Err(e) => {
                    warn!(key, error = %e, "缓存负载损坏，按未命中处理");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// 设置值并指定 TTL
    #[instrument(skip(self, value))]
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let serialized = serde_json::to_string(value)
            .map_err(|e| HubError::Serialization(format!("缓存序列化失败: {}", e)))?;

        let _: () = conn.set_ex(key, serialized, ttl.as_secs()).await?;
        Ok(())
    }

    /// 删除值
    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

/// 缓存键生成器
///
/// 集中管理键格式，防止字符串插值散落各处导致拼写不一致。
pub struct CacheKey;

impl CacheKey {
    pub fn order(order_id: i32) -> String {
        format!("order:{}", order_id)
    }
}
