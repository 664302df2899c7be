//! 订单仓储
//!
//! 基于 PostgreSQL 的 OrderStore 实现。表结构见 migrations/。

use async_trait::async_trait;
use sqlx::PgPool;

use orderhub_shared::error::Result;

use super::traits::OrderStore;
use crate::models::{Order, OrderStatus};

/// 订单仓储
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert(&self, product: &str, quantity: i32) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (product, quantity, status)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(product)
        .bind(quantity)
        .bind(OrderStatus::Created)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, product, quantity, status
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
