//! 产品实体

use chrono::{DateTime, Utc};
use ims_common::ProductId;
use ims_errors::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 产品
///
/// `stock_quantity` 只由库存流水修改，目录操作从不写入它（创建时的初始库存除外）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub reorder_level: i32,
    pub reorder_quantity: i32,
    pub stock_quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// 产品可编辑属性
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub reorder_level: i32,
    pub reorder_quantity: i32,
}

impl ProductDetails {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        if self.price <= Decimal::ZERO {
            return Err(AppError::validation("price must be greater than zero"));
        }
        if self.reorder_level < 0 {
            return Err(AppError::validation("reorder_level must not be negative"));
        }
        if self.reorder_quantity < 0 {
            return Err(AppError::validation("reorder_quantity must not be negative"));
        }
        Ok(())
    }
}

/// 新建产品
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub details: ProductDetails,
    /// 初始库存，直接写为起始余额
    pub initial_quantity: i64,
}

impl NewProduct {
    pub fn validate(&self) -> AppResult<()> {
        self.details.validate()?;
        if self.initial_quantity < 0 {
            return Err(AppError::validation("initial_quantity must not be negative"));
        }
        Ok(())
    }
}
