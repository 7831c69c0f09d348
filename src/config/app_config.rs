// ==========================================
// denda-sim - 应用配置
// ==========================================
// 加载顺序: 内置默认值 → JSON 配置文件（可选）→ 环境变量覆写
// 配置文件: DENDA_SIM_CONFIG 或 <config_dir>/denda-sim/config.json
// 环境变量: DENDA_SIM_DATA_DIR, DENDA_SIM_LOCALE
// ==========================================
// 配置文件不存在不是错误；格式错误在加载时报错
// ==========================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const ENV_CONFIG_PATH: &str = "DENDA_SIM_CONFIG";
pub const ENV_DATA_DIR: &str = "DENDA_SIM_DATA_DIR";
pub const ENV_LOCALE: &str = "DENDA_SIM_LOCALE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置文件写入失败: {0}")]
    Write(#[from] std::io::Error),

    #[error("配置序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 工作簿所在目录
    pub data_dir: PathBuf,
    /// 主数据表名
    pub main_sheet: String,
    /// 参考百分比表名
    pub reference_sheet: String,
    /// 界面语言（id / en）
    pub locale: String,
    /// 无匹配行时是否使用占位记录
    pub placeholder_row: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Data"),
            main_sheet: "FREK & ALAT".to_string(),
            reference_sheet: "Referensi".to_string(),
            locale: "id".to_string(),
            placeholder_row: true,
        }
    }
}

impl AppConfig {
    /// 默认配置文件路径
    ///
    /// 优先使用环境变量 DENDA_SIM_CONFIG，否则为用户配置目录下的 denda-sim/config.json
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        match dirs::config_dir() {
            Some(dir) => dir.join("denda-sim").join("config.json"),
            None => PathBuf::from("./denda-sim.json"),
        }
    }

    /// 按完整顺序加载（默认值 → 文件 → 环境变量）
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        info!(
            path = %path.display(),
            data_dir = %config.data_dir.display(),
            locale = %config.locale,
            "配置加载完成"
        );
        Ok(config)
    }

    /// 从 JSON 文件加载（文件不存在 → 默认值）
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// 环境变量覆写（空值忽略）
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(dir) = non_empty(ENV_DATA_DIR) {
            debug!(data_dir = %dir, "环境变量覆写 data_dir");
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(locale) = non_empty(ENV_LOCALE) {
            debug!(locale = %locale, "环境变量覆写 locale");
            self.locale = locale;
        }
    }

    /// 保存为 JSON 文件
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
