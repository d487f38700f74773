//! 数据库行映射结构

use chrono::{DateTime, Utc};
use ims_common::{MovementId, ProductId};
use ims_errors::{AppError, AppResult};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::domain::{MovementType, Product, StockMovement};

/// 产品数据库行
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub reorder_level: i32,
    pub reorder_quantity: i32,
    pub stock_quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId(row.id),
            name: row.name,
            sku: row.sku,
            description: row.description,
            price: row.price,
            reorder_level: row.reorder_level,
            reorder_quantity: row.reorder_quantity,
            stock_quantity: row.stock_quantity,
            created_at: row.created_at,
        }
    }
}

/// 库存流水数据库行
#[derive(Debug, FromRow)]
pub struct StockMovementRow {
    pub id: i64,
    pub product_id: i64,
    pub quantity_change: i64,
    #[sqlx(rename = "type")]
    pub movement_type: String,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<StockMovementRow> for StockMovement {
    type Error = AppError;

    fn try_from(row: StockMovementRow) -> AppResult<Self> {
        let movement_type: MovementType = row.movement_type.parse().map_err(|_| {
            AppError::internal(format!(
                "stock movement {} has unknown type {}",
                row.id, row.movement_type
            ))
        })?;

        Ok(Self {
            id: MovementId(row.id),
            product_id: ProductId(row.product_id),
            quantity_change: row.quantity_change,
            movement_type,
            reference: row.reference,
            note: row.note,
            created_at: row.created_at,
        })
    }
}
