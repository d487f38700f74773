//! 订单聚合

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use ims_common::{OrderId, ProductId};
use ims_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 订单状态，任意状态之间都可以互相切换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::validation(format!("unknown order status: {}", other))),
        }
    }
}

/// 订单明细
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// 订单聚合：订单头 + 全部明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub payment_reference: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// 新建订单
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub payment_reference: String,
    pub customer_name: String,
    pub customer_contact: String,
}

impl NewOrder {
    pub fn validate(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::validation("order must contain at least one item"));
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity <= 0) {
            return Err(AppError::validation(format!(
                "quantity for product {} must be greater than zero",
                item.product_id
            )));
        }
        Ok(())
    }

    pub fn product_ids(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.product_id.0).collect()
    }

    pub fn quantities(&self) -> Vec<i64> {
        self.items.iter().map(|item| item.quantity).collect()
    }
}
