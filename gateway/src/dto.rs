//! 请求 DTO 与边界校验

use ims_common::ProductId;
use ims_errors::{AppError, AppResult};
use ims_inventory::{NewProduct, ProductDetails};
use ims_orders::{NewOrder, OrderItem, OrderStatus};
use rust_decimal::Decimal;
use serde::Deserialize;

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    Ok(())
}

// ========== 产品 ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub reorder_level: i32,
    #[serde(default)]
    pub reorder_quantity: i32,
}

impl ProductRequest {
    pub fn into_details(self) -> AppResult<ProductDetails> {
        require("name", &self.name)?;
        let details = ProductDetails {
            name: self.name,
            sku: self.sku.filter(|s| !s.trim().is_empty()),
            description: self.description,
            price: self.price,
            reorder_level: self.reorder_level,
            reorder_quantity: self.reorder_quantity,
        };
        details.validate()?;
        Ok(details)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(flatten)]
    pub product: ProductRequest,
    #[serde(default)]
    pub initial_quantity: i64,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> AppResult<NewProduct> {
        let product = NewProduct {
            details: self.product.into_details()?,
            initial_quantity: self.initial_quantity,
        };
        product.validate()?;
        Ok(product)
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// 逗号分隔的产品 ID
    pub ids: Option<String>,
}

impl ProductListQuery {
    pub fn product_ids(&self) -> AppResult<Vec<ProductId>> {
        let Some(ids) = self.ids.as_deref() else {
            return Ok(vec![]);
        };
        ids.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i64>()
                    .map(ProductId)
                    .map_err(|_| AppError::validation(format!("invalid product id: {}", s)))
            })
            .collect()
    }
}

// ========== 库存 ==========

#[derive(Debug, Deserialize)]
pub struct StockAdjustmentRequest {
    pub quantity: i64,
    pub reference: Option<String>,
    pub note: Option<String>,
}

impl StockAdjustmentRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.quantity <= 0 {
            return Err(AppError::validation("quantity must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    pub product_id: Option<i64>,
}

// ========== 订单 ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub payment_reference: String,
    pub customer_name: String,
    pub customer_contact: String,
}

impl CreateOrderRequest {
    pub fn into_new_order(self) -> AppResult<NewOrder> {
        require("paymentReference", &self.payment_reference)?;
        require("customerName", &self.customer_name)?;
        require("customerContact", &self.customer_contact)?;

        let order = NewOrder {
            items: self
                .items
                .into_iter()
                .map(|item| OrderItem {
                    product_id: ProductId(item.product_id),
                    quantity: item.quantity,
                })
                .collect(),
            payment_reference: self.payment_reference,
            customer_name: self.customer_name,
            customer_contact: self.customer_contact,
        };
        order.validate()?;
        Ok(order)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListOrdersQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(10)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.page() < 1 {
            return Err(AppError::validation("page must be at least 1"));
        }
        if self.page_size() < 1 {
            return Err(AppError::validation("page_size must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

impl ChangeStatusRequest {
    pub fn status(&self) -> AppResult<OrderStatus> {
        self.status.parse()
    }
}
