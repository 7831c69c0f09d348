// ==========================================
// denda-sim - 核心库
// ==========================================
// 用途: 无线电频率/电信设备违规罚金 (denda) 模拟计算
// 数据源: Excel 工作簿（主数据表 + 参考百分比表）
// 系统定位: 计算辅助工具（结果供人工核对）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "id");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 数据结构与常量表
pub mod domain;

// 导入层 - 工作簿解析/规范化/缓存
pub mod importer;

// 引擎层 - 过滤与计算
pub mod engine;

// 导出层 - CSV / XLSX
pub mod export;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CalculationResult, CellValue, Column, JenisPelanggaran, PercentageTable, PermitTypeTable,
    ResultTable, ViolationRecord, ViolationTable, ANY_VALUE,
};

// 引擎
pub use engine::{
    DendaCalculator, DendaOrchestrator, DendaQuery, FilterOptions, FilterSelection, RowFilter,
};

// API
pub use api::{CalculationOutcome, CalculationRequest, DendaApi, Notice};

// 配置
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Simulasi Perhitungan Denda";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
