// ==========================================
// 配置集成测试
// ==========================================
// 测试范围:
// 1. config_kv 覆盖默认参数
// 2. 非法配置值在装配阶段报错
// 3. 配置快照
// ==========================================


use tb_caremap::api::{ApiError, DashboardRequest};
use tb_caremap::app::AppState;
use tb_caremap::config::{config_keys, ConfigManager, DashboardConfigReader, DashboardSettings};
use tb_caremap::domain::types::FetchMode;
use test_helpers::{create_seeded_db, create_test_db, set_config};

#[tokio::test]
async fn test_defaults_without_overrides() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = AppState::new(&db_path).await.unwrap();

    assert_eq!(state.dashboard_api.settings(), &DashboardSettings::default());
    assert_eq!(state.cache.ttl().as_secs(), 600);
}

#[tokio::test]
async fn test_config_kv_overrides_settings() {
    let (_temp_file, db_path) = create_seeded_db().unwrap();
    set_config(&db_path, config_keys::RISK_THRESHOLD, "10").unwrap();
    set_config(&db_path, config_keys::CACHE_TTL_SECS, "0").unwrap();
    set_config(&db_path, config_keys::FETCH_MODE, "best_effort").unwrap();

    let state = AppState::new(&db_path).await.unwrap();
    let settings = state.dashboard_api.settings();
    assert_eq!(settings.risk_threshold, 10.0);
    assert_eq!(settings.cache_ttl_secs, 0);
    assert_eq!(settings.fetch_mode, FetchMode::BestEffort);

    // 阈值 10 时仅 Jakarta/RegimenA (12) 为高风险
    let view = state
        .dashboard_api
        .load_dashboard(&DashboardRequest::default())
        .await
        .unwrap();
    assert_eq!(view.risk_threshold, 10.0);
    assert_eq!(view.kpi.high_risk_count, 1);
}

#[tokio::test]
async fn test_invalid_config_value_fails_startup() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    set_config(&db_path, config_keys::RISK_THRESHOLD, "12.5").unwrap();

    match AppState::new(&db_path).await {
        Err(ApiError::ConfigError(message)) => {
            assert!(message.contains(config_keys::RISK_THRESHOLD));
        }
        Err(other) => panic!("Expected ConfigError, got {:?}", other),
        Ok(_) => panic!("Expected ConfigError, got Ok"),
    }
}

#[tokio::test]
async fn test_config_manager_roundtrip_and_snapshot() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    manager
        .set_global_config_value(config_keys::WARNING_DISPLAY_LIMIT, "3")
        .unwrap();
    manager
        .set_global_config_value(config_keys::WARNING_DISPLAY_LIMIT, "5")
        .unwrap();

    assert_eq!(manager.get_warning_display_limit().await.unwrap(), 5);
    assert_eq!(
        manager.get_config_snapshot().unwrap(),
        r#"{"warning_display_limit":"5"}"#
    );
}
