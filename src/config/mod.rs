// ==========================================
// denda-sim - 配置层
// ==========================================
// 职责: 应用配置加载（默认值 / JSON 文件 / 环境变量）
// ==========================================

pub mod app_config;

pub use app_config::{AppConfig, ConfigError, ConfigResult};
