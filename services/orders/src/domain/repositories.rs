//! Store 接口

use async_trait::async_trait;
use ims_common::{OrderId, PagedResult, Pagination};
use ims_errors::AppResult;

use super::order::{NewOrder, Order, OrderStatus};

/// 订单聚合 Store，订单状态的唯一写入方
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// 在一个事务中写入订单头与全部明细，并在提交前回读聚合
    async fn create(&self, order: NewOrder) -> AppResult<Order>;

    /// `None` 表示不存在，`Err` 表示存储故障
    async fn get(&self, id: OrderId) -> AppResult<Option<Order>>;

    /// 按 `created_at DESC, id DESC` 分页，总数在同一快照中读取
    async fn list(&self, pagination: Pagination) -> AppResult<PagedResult<Order>>;

    /// 不存在时返回 `NotFound`
    async fn change_status(&self, id: OrderId, status: OrderStatus) -> AppResult<Order>;

    /// 明细级联删除；返回是否删除了记录
    async fn delete(&self, id: OrderId) -> AppResult<bool>;
}
