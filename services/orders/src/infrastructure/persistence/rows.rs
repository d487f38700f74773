//! 数据库行映射结构

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// 订单头数据库行
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub payment_reference: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// 订单明细数据库行
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}
