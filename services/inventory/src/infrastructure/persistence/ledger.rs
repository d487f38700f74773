//! 库存流水账 PostgreSQL 实现

use std::time::Duration;

use async_trait::async_trait;
use ims_adapter_postgres::{TransactionManager, TransactionOptions, map_sqlx_error};
use ims_common::ProductId;
use ims_errors::{AppError, AppResult};
use metrics::counter;
use tracing::info;

use crate::domain::{MovementType, StockAdjustment, StockLedger, StockMovement};

use super::rows::StockMovementRow;

/// 基于 `products.stock_quantity` 与 `stock_movements` 的流水账
///
/// 出库/入库是单条相对 UPDATE；盘点修正是无条件的绝对覆盖，
/// 与并发的出入库交错时以最后提交者为准。
#[derive(Debug, Clone)]
pub struct PostgresStockLedger {
    transactions: TransactionManager,
    deadline: Duration,
}

impl PostgresStockLedger {
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

fn balance_update_sql(movement_type: MovementType) -> &'static str {
    match movement_type {
        MovementType::Purchase => {
            "UPDATE products SET stock_quantity = stock_quantity - $1 WHERE id = $2"
        }
        MovementType::Supply => {
            "UPDATE products SET stock_quantity = stock_quantity + $1 WHERE id = $2"
        }
        MovementType::Correction => "UPDATE products SET stock_quantity = $1 WHERE id = $2",
    }
}

#[async_trait]
impl StockLedger for PostgresStockLedger {
    async fn adjust(&self, adjustment: StockAdjustment) -> AppResult<StockMovement> {
        adjustment.validate()?;

        let movement = self
            .transactions
            .run("stock_adjust", &self.options(), move |conn| {
                Box::pin(async move {
                    let result = sqlx::query(balance_update_sql(adjustment.movement_type))
                        .bind(adjustment.quantity)
                        .bind(adjustment.product_id.0)
                        .execute(&mut *conn)
                        .await
                        .map_err(map_sqlx_error)?;

                    if result.rows_affected() == 0 {
                        return Err(AppError::not_found(format!(
                            "product {} does not exist",
                            adjustment.product_id
                        )));
                    }

                    let row = sqlx::query_as::<_, StockMovementRow>(
                        r#"
                        INSERT INTO stock_movements (product_id, quantity_change, type, reference, note)
                        VALUES ($1, $2, $3, $4, $5)
                        RETURNING id, product_id, quantity_change, type, reference, note, created_at
                        "#,
                    )
                    .bind(adjustment.product_id.0)
                    .bind(adjustment.quantity)
                    .bind(adjustment.movement_type.as_str())
                    .bind(&adjustment.reference)
                    .bind(&adjustment.note)
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(map_sqlx_error)?;

                    StockMovement::try_from(row)
                })
            })
            .await?;

        counter!("ims_stock_movements_total", "type" => movement.movement_type.as_str())
            .increment(1);
        info!(
            movement_id = %movement.id,
            product_id = %movement.product_id,
            movement_type = %movement.movement_type,
            quantity = movement.quantity_change,
            "Stock adjusted"
        );

        Ok(movement)
    }

    async fn list_movements(&self, product_id: Option<ProductId>) -> AppResult<Vec<StockMovement>> {
        let product_id = product_id.map(|id| id.0);
        let options = self.options().read_only();

        self.transactions
            .run("stock_list_movements", &options, move |conn| {
                Box::pin(async move {
                    let rows = sqlx::query_as::<_, StockMovementRow>(
                        r#"
                        SELECT id, product_id, quantity_change, type, reference, note, created_at
                        FROM stock_movements
                        WHERE $1::BIGINT IS NULL OR product_id = $1
                        ORDER BY id ASC
                        "#,
                    )
                    .bind(product_id)
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(map_sqlx_error)?;

                    rows.into_iter().map(StockMovement::try_from).collect()
                })
            })
            .await
    }
}
