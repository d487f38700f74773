//! 路由共享状态

use std::sync::Arc;

use ims_bootstrap::{HealthChecker, Infrastructure};
use ims_inventory::{InventoryService, PostgresProductCatalog, PostgresStockLedger};
use ims_orders::{OrderService, PostgresOrderStore};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    pub orders: OrderService,
    pub health: HealthChecker,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn from_infrastructure(infra: &Infrastructure, metrics: PrometheusHandle) -> Self {
        let transactions = infra.transaction_manager();
        let deadline = infra.transaction_timeout();

        let inventory = InventoryService::new(
            Arc::new(PostgresProductCatalog::new(transactions.clone(), deadline)),
            Arc::new(PostgresStockLedger::new(transactions.clone(), deadline)),
        );
        let orders = OrderService::new(Arc::new(PostgresOrderStore::new(transactions, deadline)));

        Self {
            inventory,
            orders,
            health: HealthChecker::new(infra.postgres_pool()),
            metrics,
        }
    }
}
