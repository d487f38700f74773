//! 订单聚合 PostgreSQL 实现

use std::time::Duration;

use async_trait::async_trait;
use ims_adapter_postgres::{
    IsolationLevel, TransactionManager, TransactionOptions, map_sqlx_error,
};
use ims_common::{OrderId, PagedResult, Pagination};
use ims_errors::{AppError, AppResult};
use metrics::counter;
use tracing::info;

use crate::domain::{NewOrder, Order, OrderStatus, OrderStore};

use super::aggregate::{assemble_orders, load_items, load_order};
use super::rows::OrderRow;

/// 基于 `orders` / `order_items` 的订单聚合 Store
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    transactions: TransactionManager,
    deadline: Duration,
}

impl PostgresOrderStore {
    pub fn new(transactions: TransactionManager, deadline: Duration) -> Self {
        Self {
            transactions,
            deadline,
        }
    }

    /// 返回使用另一截止时间的句柄
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        Self {
            transactions: self.transactions.clone(),
            deadline,
        }
    }

    fn options(&self) -> TransactionOptions {
        TransactionOptions::new().with_timeout(self.deadline)
    }
}

/// 超出 BIGINT 的分页参数按最大值处理，结果为空页
fn clamp_to_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        order.validate()?;

        let created = self
            .transactions
            .run("order_create", &self.options(), move |conn| {
                Box::pin(async move {
                    let (order_id,): (i64,) = sqlx::query_as(
                        r#"
                        INSERT INTO orders (payment_reference, customer_name, customer_contact, status)
                        VALUES ($1, $2, $3, $4)
                        RETURNING id
                        "#,
                    )
                    .bind(&order.payment_reference)
                    .bind(&order.customer_name)
                    .bind(&order.customer_contact)
                    .bind(OrderStatus::Pending.as_str())
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(map_sqlx_error)?;

                    sqlx::query(
                        r#"
                        INSERT INTO order_items (order_id, product_id, quantity)
                        SELECT $1, item.product_id, item.quantity
                        FROM UNNEST($2::BIGINT[], $3::BIGINT[]) WITH ORDINALITY
                            AS item (product_id, quantity, position)
                        ORDER BY item.position
                        "#,
                    )
                    .bind(order_id)
                    .bind(order.product_ids())
                    .bind(order.quantities())
                    .execute(&mut *conn)
                    .await
                    .map_err(map_sqlx_error)?;

                    load_order(conn, order_id).await?.ok_or_else(|| {
                        AppError::internal(format!("order {} vanished before commit", order_id))
                    })
                })
            })
            .await?;

        counter!("ims_orders_created_total").increment(1);
        info!(
            order_id = %created.id,
            items = created.items.len(),
            payment_reference = %created.payment_reference,
            "Order created"
        );

        Ok(created)
    }

    async fn get(&self, id: OrderId) -> AppResult<Option<Order>> {
        let options = self.options().read_only();

        self.transactions
            .run("order_get", &options, move |conn| {
                Box::pin(async move { load_order(conn, id.0).await })
            })
            .await
    }

    async fn list(&self, pagination: Pagination) -> AppResult<PagedResult<Order>> {
        let options = self
            .options()
            .with_isolation_level(IsolationLevel::RepeatableRead)
            .read_only();

        self.transactions
            .run("order_list", &options, move |conn| {
                Box::pin(async move {
                    let headers = sqlx::query_as::<_, OrderRow>(
                        r#"
                        SELECT id, payment_reference, customer_name, customer_contact, status, created_at
                        FROM orders
                        ORDER BY created_at DESC, id DESC
                        LIMIT $1 OFFSET $2
                        "#,
                    )
                    .bind(clamp_to_bigint(pagination.limit()))
                    .bind(clamp_to_bigint(pagination.offset()))
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(map_sqlx_error)?;

                    let ids: Vec<i64> = headers.iter().map(|h| h.id).collect();
                    let items = load_items(&mut *conn, &ids).await?;

                    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
                        .fetch_one(&mut *conn)
                        .await
                        .map_err(map_sqlx_error)?;

                    let orders = assemble_orders(headers, items)?;
                    Ok(PagedResult::new(orders, total.max(0) as u64, &pagination))
                })
            })
            .await
    }

    async fn change_status(&self, id: OrderId, status: OrderStatus) -> AppResult<Order> {
        let order = self
            .transactions
            .run("order_change_status", &self.options(), move |conn| {
                Box::pin(async move {
                    let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
                        .bind(id.0)
                        .bind(status.as_str())
                        .execute(&mut *conn)
                        .await
                        .map_err(map_sqlx_error)?;

                    if result.rows_affected() == 0 {
                        return Err(AppError::not_found(format!("order {} does not exist", id)));
                    }

                    load_order(conn, id.0).await?.ok_or_else(|| {
                        AppError::internal(format!("order {} vanished before commit", id))
                    })
                })
            })
            .await?;

        counter!("ims_order_status_changes_total", "status" => status.as_str()).increment(1);
        info!(order_id = %id, status = %status, "Order status changed");

        Ok(order)
    }

    async fn delete(&self, id: OrderId) -> AppResult<bool> {
        let deleted = self
            .transactions
            .run("order_delete", &self.options(), move |conn| {
                Box::pin(async move {
                    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
                        .bind(id.0)
                        .execute(&mut *conn)
                        .await
                        .map_err(map_sqlx_error)?;

                    Ok(result.rows_affected() > 0)
                })
            })
            .await?;

        if deleted {
            info!(order_id = %id, "Order deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_bigint() {
        assert_eq!(clamp_to_bigint(0), 0);
        assert_eq!(clamp_to_bigint(40), 40);
        assert_eq!(clamp_to_bigint(i64::MAX as u64), i64::MAX);
        assert_eq!(clamp_to_bigint(u64::MAX), i64::MAX);

        let far = Pagination::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(clamp_to_bigint(far.offset()), i64::MAX);
    }
}
