//! 库存服务门面
//!
//! 每个请求只调用一次 Store 操作；Store 返回的 `None` / `false` 在这里转换为 `NotFound`。

use std::sync::Arc;

use ims_common::ProductId;
use ims_errors::{AppError, AppResult};

use crate::domain::{
    MovementType, NewProduct, Product, ProductCatalog, ProductDetails, StockAdjustment,
    StockLedger, StockMovement,
};

#[derive(Clone)]
pub struct InventoryService {
    catalog: Arc<dyn ProductCatalog>,
    ledger: Arc<dyn StockLedger>,
}

impl InventoryService {
    pub fn new(catalog: Arc<dyn ProductCatalog>, ledger: Arc<dyn StockLedger>) -> Self {
        Self { catalog, ledger }
    }

    // ========== 产品目录 ==========

    pub async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        self.catalog.create(product).await
    }

    pub async fn get_product(&self, id: ProductId) -> AppResult<Product> {
        self.catalog
            .get(id)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    pub async fn list_products(&self, ids: Vec<ProductId>) -> AppResult<Vec<Product>> {
        self.catalog.list(ids).await
    }

    pub async fn update_product(&self, id: ProductId, details: ProductDetails) -> AppResult<Product> {
        self.catalog
            .update(id, details)
            .await?
            .ok_or_else(|| product_not_found(id))
    }

    pub async fn delete_product(&self, id: ProductId) -> AppResult<()> {
        if self.catalog.delete(id).await? {
            Ok(())
        } else {
            Err(product_not_found(id))
        }
    }

    // ========== 库存流水 ==========

    /// 出库：余额减少
    pub async fn purchase(
        &self,
        product_id: ProductId,
        quantity: i64,
        reference: Option<String>,
        note: Option<String>,
    ) -> AppResult<StockMovement> {
        self.adjust(product_id, quantity, MovementType::Purchase, reference, note)
            .await
    }

    /// 入库：余额增加
    pub async fn supply(
        &self,
        product_id: ProductId,
        quantity: i64,
        reference: Option<String>,
        note: Option<String>,
    ) -> AppResult<StockMovement> {
        self.adjust(product_id, quantity, MovementType::Supply, reference, note)
            .await
    }

    /// 盘点修正：余额直接设为 `quantity`
    pub async fn correct(
        &self,
        product_id: ProductId,
        quantity: i64,
        reference: Option<String>,
        note: Option<String>,
    ) -> AppResult<StockMovement> {
        self.adjust(product_id, quantity, MovementType::Correction, reference, note)
            .await
    }

    pub async fn list_movements(&self, product_id: Option<ProductId>) -> AppResult<Vec<StockMovement>> {
        self.ledger.list_movements(product_id).await
    }

    async fn adjust(
        &self,
        product_id: ProductId,
        quantity: i64,
        movement_type: MovementType,
        reference: Option<String>,
        note: Option<String>,
    ) -> AppResult<StockMovement> {
        let adjustment = StockAdjustment::new(product_id, quantity, movement_type)
            .with_reference(reference)
            .with_note(note);
        adjustment.validate()?;

        self.ledger.adjust(adjustment).await
    }
}

fn product_not_found(id: ProductId) -> AppError {
    AppError::not_found(format!("product {} does not exist", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockProductCatalog, MockStockLedger};
    use chrono::Utc;
    use ims_common::MovementId;
    use mockall::predicate::eq;

    fn service(catalog: MockProductCatalog, ledger: MockStockLedger) -> InventoryService {
        InventoryService::new(Arc::new(catalog), Arc::new(ledger))
    }

    fn movement(adjustment: &StockAdjustment) -> StockMovement {
        StockMovement {
            id: MovementId(1),
            product_id: adjustment.product_id,
            quantity_change: adjustment.quantity,
            movement_type: adjustment.movement_type,
            reference: adjustment.reference.clone(),
            note: adjustment.note.clone(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_product_maps_none_to_not_found() {
        let mut catalog = MockProductCatalog::new();
        catalog
            .expect_get()
            .with(eq(ProductId(42)))
            .times(1)
            .returning(|_| Ok(None));

        let err = service(catalog, MockStockLedger::new())
            .get_product(ProductId(42))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("42"));
    }

    #[tokio::test]
    async fn test_delete_product_maps_false_to_not_found() {
        let mut catalog = MockProductCatalog::new();
        catalog.expect_delete().times(1).returning(|_| Ok(false));

        let err = service(catalog, MockStockLedger::new())
            .delete_product(ProductId(7))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_supply_builds_adjustment() {
        let mut ledger = MockStockLedger::new();
        ledger
            .expect_adjust()
            .withf(|a| {
                a.product_id == ProductId(3)
                    && a.quantity == 10
                    && a.movement_type == MovementType::Supply
                    && a.reference.as_deref() == Some("PO-1")
            })
            .times(1)
            .returning(|a| Ok(movement(&a)));

        let result = service(MockProductCatalog::new(), ledger)
            .supply(ProductId(3), 10, Some("PO-1".to_string()), None)
            .await
            .unwrap();

        assert_eq!(result.quantity_change, 10);
        assert_eq!(result.movement_type, MovementType::Supply);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_never_reaches_store() {
        let mut ledger = MockStockLedger::new();
        ledger.expect_adjust().times(0);

        let svc = service(MockProductCatalog::new(), ledger);
        for quantity in [0, -5] {
            let err = svc
                .purchase(ProductId(1), quantity, None, None)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_store_not_found_is_propagated() {
        let mut ledger = MockStockLedger::new();
        ledger
            .expect_adjust()
            .returning(|a| Err(AppError::not_found(format!("product {} does not exist", a.product_id))));

        let err = service(MockProductCatalog::new(), ledger)
            .correct(ProductId(99), 5, None, None)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
    }
}
