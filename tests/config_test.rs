// ==========================================
// AppConfig 集成测试
// ==========================================
// 测试目标: 配置文件读写、环境变量覆写、错误报告
// ==========================================


use denda_sim::api::{ApiError, DendaApi};
use denda_sim::config::{AppConfig, ConfigError};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.main_sheet, "FREK & ALAT");
    assert_eq!(config.reference_sheet, "Referensi");
    assert!(config.placeholder_row);
}

#[test]
fn test_save_and_reload_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = AppConfig {
        data_dir: PathBuf::from("/srv/denda"),
        locale: "en".to_string(),
        placeholder_row: false,
        ..Default::default()
    };
    config.save_to(&path).unwrap();
    assert_eq!(AppConfig::load_from(&path).unwrap(), config);

    // 缺失字段使用默认值
    std::fs::write(&path, r#"{ "main_sheet": "Tabel" }"#).unwrap();
    let partial = AppConfig::load_from(&path).unwrap();
    assert_eq!(partial.main_sheet, "Tabel");
    assert_eq!(partial.locale, "id");
}

#[test]
fn test_malformed_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ bukan json").unwrap();

    let err = AppConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(ApiError::from(err).code(), "CONFIG_ERROR");
}

#[test]
fn test_env_overrides_ignore_blank_values() {
    let mut config = AppConfig::default();
    config.apply_overrides(|key| match key {
        "DENDA_SIM_DATA_DIR" => Some(" /data/denda ".to_string()),
        "DENDA_SIM_LOCALE" => Some("   ".to_string()),
        _ => None,
    });
    assert_eq!(config.data_dir, PathBuf::from("/data/denda"));
    assert_eq!(config.locale, "id");
}

#[test]
fn test_api_uses_configured_sheet_names() {
    let (dir, mut config) = test_helpers::temp_config().unwrap();
    config.main_sheet = "Tabel".to_string();
    let api = DendaApi::new(config);
    assert_eq!(api.config().main_sheet, "Tabel");
    assert_eq!(api.config().data_dir, dir.path());
}
