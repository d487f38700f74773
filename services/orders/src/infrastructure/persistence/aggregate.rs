//! 订单聚合重建
//!
//! 订单头与明细分两次查询读取，再按 `order_id` 归组。

use std::collections::HashMap;

use ims_common::{OrderId, ProductId};
use ims_errors::{AppError, AppResult};
use sqlx::PgConnection;

use ims_adapter_postgres::map_sqlx_error;

use crate::domain::{Order, OrderItem, OrderStatus};

use super::rows::{OrderItemRow, OrderRow};

/// 把明细归到各自的订单头下，保持订单头的顺序与明细的插入顺序
pub fn assemble_orders(headers: Vec<OrderRow>, items: Vec<OrderItemRow>) -> AppResult<Vec<Order>> {
    let mut grouped: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in items {
        grouped.entry(item.order_id).or_default().push(OrderItem {
            product_id: ProductId(item.product_id),
            quantity: item.quantity,
        });
    }

    headers
        .into_iter()
        .map(|header| {
            let status: OrderStatus = header.status.parse().map_err(|_| {
                AppError::internal(format!(
                    "order {} has unknown status {}",
                    header.id, header.status
                ))
            })?;

            Ok(Order {
                id: OrderId(header.id),
                items: grouped.remove(&header.id).unwrap_or_default(),
                payment_reference: header.payment_reference,
                customer_name: header.customer_name,
                customer_contact: header.customer_contact,
                status,
                created_at: header.created_at,
            })
        })
        .collect()
}

/// 读取给定订单头对应的全部明细
pub async fn load_items(conn: &mut PgConnection, order_ids: &[i64]) -> AppResult<Vec<OrderItemRow>> {
    sqlx::query_as::<_, OrderItemRow>(
        r#"
        SELECT order_id, product_id, quantity
        FROM order_items
        WHERE order_id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(order_ids)
    .fetch_all(conn)
    .await
    .map_err(map_sqlx_error)
}

/// 在当前事务中读取单个订单聚合
pub async fn load_order(conn: &mut PgConnection, id: i64) -> AppResult<Option<Order>> {
    let header = sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT id, payment_reference, customer_name, customer_contact, status, created_at
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    let Some(header) = header else {
        return Ok(None);
    };

    let items = load_items(conn, &[id]).await?;
    Ok(assemble_orders(vec![header], items)?.pop())
}
