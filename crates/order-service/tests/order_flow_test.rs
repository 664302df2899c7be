//! 订单全链路集成测试
//!
//! 使用真实 PostgreSQL / Redis / Kafka 验证创建 → 查询 → 处理 → 取消
//! 的完整链路，覆盖缓存一致性与 worker 异步处理等无法用 mock 覆盖的
//! 行为。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... REDIS_URL=redis://... KAFKA_BROKERS=localhost:9092 \
//!   cargo test --test order_flow_test -- --ignored
//! ```

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::watch;

use order_service::models::{Order, OrderStatus};
use order_service::publisher::{self, OrderEventPublisher};
use order_service::repository::{OrderRepository, OrderStore};
use order_service::service::OrderService;
use order_service::worker::OrderWorker;
use orderhub_shared::cache::{Cache, CacheKey};
use orderhub_shared::config::{KafkaConfig, RedisConfig};
use orderhub_shared::kafka::KafkaProducer;

// ==================== 辅助函数 ====================

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

fn kafka_config() -> KafkaConfig {
    KafkaConfig {
        brokers: std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string()),
        // 每次测试运行用独立消费组，避免与常驻服务或并行运行互抢分区
        consumer_group: format!("order-workers-test-{}", std::process::id()),
        auto_offset_reset: "latest".to_string(),
    }
}

async fn connect_pool() -> PgPool {
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&database_url())
        .await
        .expect("数据库连接失败");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("执行迁移失败");

    pool
}

fn make_cache() -> Arc<Cache> {
    let config = RedisConfig { url: redis_url() };
    Arc::new(Cache::new(&config).expect("Redis 客户端创建失败"))
}

/// 构造完整的编排服务（真实存储 + 真实缓存 + 真实 Kafka 生产者），
/// 并启动 delivery report 监听任务。
async fn setup_service(pool: &PgPool) -> (OrderService<OrderRepository>, Arc<OrderRepository>, Arc<Cache>) {
    let repo = Arc::new(OrderRepository::new(pool.clone()));
    let cache = make_cache();
    let producer = KafkaProducer::new(&kafka_config()).expect("Kafka 生产者创建失败");
    let (event_publisher, reports) = OrderEventPublisher::new(producer);
    tokio::spawn(publisher::drain_delivery_reports(reports));

    (
        OrderService::new(repo.clone(), cache.clone(), event_publisher),
        repo,
        cache,
    )
}

/// 直接读数据库的订单状态，绕过缓存
async fn store_status(repo: &OrderRepository, id: i32) -> Option<OrderStatus> {
    repo.find_by_id(id).await.unwrap().map(|o| o.status)
}

// ==================== 测试 ====================

#[tokio::test]
#[ignore] // 需要 PostgreSQL + Redis
async fn test_create_then_get_returns_created_order() {
    let pool = connect_pool().await;
    let (service, _repo, _cache) = setup_service(&pool).await;

    let id = service.create_order("widget", 3).await;
    assert!(id > 0, "创建成功必须返回正的新 id");

    let order = service.get_order(id).await.expect("刚创建的订单应可读");
    assert_eq!(order.id, id);
    assert_eq!(order.product, "widget");
    assert_eq!(order.quantity, 3);
    assert_eq!(order.status, OrderStatus::Created);
}

#[tokio::test]
#[ignore] // 需要 PostgreSQL + Redis
async fn test_get_nonexistent_order_returns_none() {
    let pool = connect_pool().await;
    let (service, _repo, _cache) = setup_service(&pool).await;

    assert!(service.get_order(i32::MAX).await.is_none());
}

#[tokio::test]
#[ignore] // 需要 PostgreSQL + Redis
async fn test_cancel_invalidates_cache_and_persists_status() {
    let pool = connect_pool().await;
    let (service, repo, cache) = setup_service(&pool).await;

    let id = service.create_order("gadget", 1).await;
    assert!(id > 0);

    // 第一次读取回填缓存
    let _ = service.get_order(id).await.expect("订单应存在");
    let cached: Option<Order> = cache.get(&CacheKey::order(id)).await.unwrap();
    assert!(cached.is_some(), "读取后缓存应已回填");

    // 取消：状态落库 + 缓存条目立即消失
    assert!(service.cancel_order(id).await);
    assert_eq!(store_status(&repo, id).await, Some(OrderStatus::Canceled));

    let cached: Option<Order> = cache.get(&CacheKey::order(id)).await.unwrap();
    assert!(cached.is_none(), "取消后缓存条目必须已失效");

    // 随后的读取只能来自数据库，看到的是 Canceled 而非缓存旧值
    let order = service.get_order(id).await.expect("订单应存在");
    assert_eq!(order.status, OrderStatus::Canceled);
}

#[tokio::test]
#[ignore] // 需要 PostgreSQL + Redis
async fn test_cancel_nonexistent_order_returns_false() {
    let pool = connect_pool().await;
    let (service, _repo, _cache) = setup_service(&pool).await;

    assert!(!service.cancel_order(i32::MAX).await);
}

#[tokio::test]
#[ignore] // 需要 PostgreSQL + Redis
async fn test_cancel_twice_yields_same_end_state() {
    let pool = connect_pool().await;
    let (service, repo, _cache) = setup_service(&pool).await;

    let id = service.create_order("repeat", 2).await;
    assert!(id > 0);

    assert!(service.cancel_order(id).await);
    // 无条件覆盖：第二次取消仍匹配到行
    assert!(service.cancel_order(id).await);
    assert_eq!(store_status(&repo, id).await, Some(OrderStatus::Canceled));
}

#[tokio::test]
#[ignore] // 需要 PostgreSQL + Redis + Kafka
async fn test_worker_marks_order_processed() {
    let pool = connect_pool().await;
    let kafka = kafka_config();
    let (service, repo, _cache) = setup_service(&pool).await;

    // 先启动 worker 再创建订单，消费组从 latest 开始只会看到新事件
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = OrderWorker::new(1, &kafka).expect("worker 创建失败");
    let store = repo.clone();
    let handle = tokio::spawn(async move {
        worker.run(store, shutdown_rx).await;
    });

    // 给消费组留出分区分配时间
    tokio::time::sleep(Duration::from_secs(5)).await;

    let id = service.create_order("async-widget", 4).await;
    assert!(id > 0);

    // 有界等待 worker 把状态推进到 Processed（直接读库，缓存可能仍是 Created）
    let mut processed = false;
    for _ in 0..60 {
        if store_status(&repo, id).await == Some(OrderStatus::Processed) {
            processed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    assert!(processed, "worker 应在有界等待内把订单置为 Processed");

    let _ = shutdown_tx.send(true);
    let _ = handle.await;
}
