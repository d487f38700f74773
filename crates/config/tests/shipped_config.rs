//! 仓库自带的 `config/` 目录必须能被完整解析

use std::time::Duration;

use ims_config::AppConfig;

fn config_dir() -> String {
    format!("{}/../../config", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn test_shipped_default_config_loads() {
    let config = AppConfig::from_figment(AppConfig::figment(&config_dir(), "development"))
        .expect("default config should load");

    assert_eq!(config.app_name, "ims");
    assert!(config.is_development());
    assert_eq!(config.store.transaction_timeout(), Duration::from_secs(5));
}

#[test]
fn test_shipped_production_overrides() {
    let config = AppConfig::from_figment(AppConfig::figment(&config_dir(), "production"))
        .expect("production config should load");

    assert!(config.is_production());
    assert_eq!(config.database.max_connections, 50);
    assert_eq!(config.telemetry.log_level, "info,sqlx=warn");
}
