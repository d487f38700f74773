//! 库存流水

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use ims_common::{MovementId, ProductId};
use ims_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 流水类型
///
/// 方向和绝对/相对语义由类型决定，`quantity_change` 永远是非负数量。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// 出库：余额减少
    Purchase,
    /// 入库：余额增加
    Supply,
    /// 盘点修正：余额直接覆盖
    Correction,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Purchase => "purchase",
            MovementType::Supply => "supply",
            MovementType::Correction => "correction",
        }
    }

    /// 对余额应用一次数量变动
    pub fn apply(&self, balance: i64, quantity: i64) -> i64 {
        match self {
            MovementType::Purchase => balance.saturating_sub(quantity),
            MovementType::Supply => balance.saturating_add(quantity),
            MovementType::Correction => quantity,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "purchase" => Ok(MovementType::Purchase),
            "supply" => Ok(MovementType::Supply),
            "correction" => Ok(MovementType::Correction),
            other => Err(AppError::validation(format!(
                "unknown movement type: {}",
                other
            ))),
        }
    }
}

/// 已落库的库存流水（只追加）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub quantity_change: i64,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 一次库存调整请求
#[derive(Debug, Clone, PartialEq)]
pub struct StockAdjustment {
    pub product_id: ProductId,
    pub quantity: i64,
    pub movement_type: MovementType,
    pub reference: Option<String>,
    pub note: Option<String>,
}

impl StockAdjustment {
    pub fn new(product_id: ProductId, quantity: i64, movement_type: MovementType) -> Self {
        Self {
            product_id,
            quantity,
            movement_type,
            reference: None,
            note: None,
        }
    }

    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.quantity <= 0 {
            return Err(AppError::validation(format!(
                "quantity must be greater than zero, got {}",
                self.quantity
            )));
        }
        Ok(())
    }
}

/// 从初始余额重放一组流水，得到期望余额
pub fn replay(initial: i64, movements: impl IntoIterator<Item = (MovementType, i64)>) -> i64 {
    movements
        .into_iter()
        .fold(initial, |balance, (movement_type, quantity)| {
            movement_type.apply(balance, quantity)
        })
}
