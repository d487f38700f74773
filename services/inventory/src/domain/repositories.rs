//! Store 接口

use async_trait::async_trait;
use ims_common::ProductId;
use ims_errors::AppResult;

use super::movement::{StockAdjustment, StockMovement};
use super::product::{NewProduct, Product, ProductDetails};

/// 产品目录
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// 创建产品，初始库存直接作为起始余额
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// `None` 表示不存在
    async fn get(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// 按 ID 列表查询，空列表返回全部；按 id 升序
    async fn list(&self, ids: Vec<ProductId>) -> AppResult<Vec<Product>>;

    /// 更新可编辑属性，不修改库存
    async fn update(&self, id: ProductId, details: ProductDetails) -> AppResult<Option<Product>>;

    /// 删除产品，流水与订单明细级联删除；返回是否删除了记录
    async fn delete(&self, id: ProductId) -> AppResult<bool>;
}

/// 库存流水账，库存数量的唯一写入方
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// 在同一事务中更新余额并追加流水，返回落库后的流水
    ///
    /// 产品不存在时返回 `NotFound`，不写入任何流水。
    async fn adjust(&self, adjustment: StockAdjustment) -> AppResult<StockMovement>;

    /// 按创建顺序列出流水，可按产品过滤
    async fn list_movements(&self, product_id: Option<ProductId>) -> AppResult<Vec<StockMovement>>;
}
