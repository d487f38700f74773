//! 服务启动器
//!
//! 统一的 HTTP 服务启动流程

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use ims_config::AppConfig;
use ims_telemetry::init_metrics;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 1. 加载配置
/// 2. 初始化日志与 Prometheus recorder
/// 3. 创建基础设施（连接带重试）并执行迁移
/// 4. 调用 `app_builder` 构建路由
/// 5. 启动服务器，收到关闭信号后优雅退出
pub async fn run<F, Fut>(config_dir: &str, app_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure, PrometheusHandle) -> Fut,
    Fut: Future<Output = Router>,
{
    let config = AppConfig::load(config_dir)?;

    init_runtime(&config);
    info!("Starting {} service", config.app_name);

    let metrics = init_metrics()?;

    let infra = Infrastructure::from_config(config.clone()).await?;
    infra.migrate().await?;

    let app = app_builder(infra, metrics).await;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");
    Ok(())
}
