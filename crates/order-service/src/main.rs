//! 订单处理服务入口
//!
//! 装配顺序：配置 → 日志 → PostgreSQL（含迁移）→ Redis → Kafka 生产者
//! 与 delivery report 任务 → worker 池 → HTTP 服务。收到 SIGINT/SIGTERM
//! 后先停 HTTP，再通过 watch 信号关停 worker 池并 join，最后关闭连接池。

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use order_service::publisher::{self, OrderEventPublisher};
use order_service::repository::OrderRepository;
use order_service::service::OrderService;
use order_service::state::AppState;
use order_service::{routes, worker};
use orderhub_shared::cache::Cache;
use orderhub_shared::config::AppConfig;
use orderhub_shared::database::Database;
use orderhub_shared::kafka::KafkaProducer;
use orderhub_shared::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("order-service").unwrap_or_default();
    observability::init(&config.observability)?;

    info!("Starting order-service on {}", config.server_addr());

    // 数据库
    let db = Database::connect(&config.database).await?;
    sqlx::migrate!("./migrations").run(db.pool()).await?;

    // Redis：不可达时直接拒绝启动
    let cache = Arc::new(Cache::new(&config.redis)?);
    cache.health_check().await?;
    info!("Connected to Redis");

    // Kafka 生产者与进程级 delivery report 监听任务
    let producer = KafkaProducer::new(&config.kafka)?;
    let (event_publisher, delivery_reports) = OrderEventPublisher::new(producer);
    tokio::spawn(publisher::drain_delivery_reports(delivery_reports));

    // 关闭信号：HTTP 退出后广播给 worker 池
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // worker 池
    let repo = Arc::new(OrderRepository::new(db.pool().clone()));
    let worker_handles = worker::spawn_pool(&config, repo.clone(), shutdown_rx)?;
    info!(count = config.worker.count, "Order workers started");

    // 编排服务与 HTTP 层
    let orders = Arc::new(OrderService::new(repo, cache.clone(), event_publisher));
    let state = AppState::new(orders, db.clone(), cache);
    let app = routes::build_router(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully...");
    let _ = shutdown_tx.send(true);
    for handle in worker_handles {
        let _ = handle.await;
    }

    db.close().await;
    info!("Server exited cleanly");
    Ok(())
}

/// 等待 SIGINT 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
