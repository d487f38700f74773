//! 订单服务门面

use std::sync::Arc;

use ims_common::{OrderId, PagedResult, Pagination};
use ims_errors::{AppError, AppResult};

use crate::domain::{NewOrder, Order, OrderStatus, OrderStore};

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn create_order(&self, order: NewOrder) -> AppResult<Order> {
        order.validate()?;
        self.store.create(order).await
    }

    pub async fn get_order(&self, id: OrderId) -> AppResult<Order> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| order_not_found(id))
    }

    /// `page` 与 `page_size` 从 1 开始
    pub async fn list_orders(&self, page: u32, page_size: u32) -> AppResult<PagedResult<Order>> {
        let pagination = Pagination::new(page, page_size)?;
        self.store.list(pagination).await
    }

    pub async fn change_status(&self, id: OrderId, status: OrderStatus) -> AppResult<Order> {
        self.store.change_status(id, status).await
    }

    pub async fn delete_order(&self, id: OrderId) -> AppResult<()> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(order_not_found(id))
        }
    }
}

fn order_not_found(id: OrderId) -> AppError {
    AppError::not_found(format!("order {} does not exist", id))
}
