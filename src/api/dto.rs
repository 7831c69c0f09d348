// ==========================================
// denda-sim - API 请求/响应结构
// ==========================================

use crate::api::notice::Notice;
use crate::domain::calculation::{CalculationResult, ResultTable};
use crate::domain::percentage::PercentageTable;
use crate::engine::filter_options::FilterOptions;
use crate::engine::orchestrator::DendaQuery;
use crate::engine::visualization::VisualizationSeries;
use crate::importer::CacheStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 数据目录文件列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileListing {
    pub data_dir: String,
    /// 文件名（相对数据目录）
    pub files: Vec<String>,
    pub notices: Vec<Notice>,
}

/// 文件加载结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadOutcome {
    pub file: String,
    pub sheet_names: Vec<String>,
    pub table_sheet: Option<String>,
    /// 数据表是否可用于计算
    pub table_available: bool,
    pub columns: Vec<String>,
    pub records: usize,
    pub percentages: PercentageTable,
    pub cache_status: Option<CacheStatus>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub notices: Vec<Notice>,
}

/// 下拉选项结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsOutcome {
    pub file: String,
    pub options: FilterOptions,
    pub notices: Vec<Notice>,
}

/// 计算请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// 文件名（相对数据目录）或路径
    pub file: String,
    #[serde(flatten)]
    pub query: DendaQuery,
}

/// 计算结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub file: String,
    pub query: DendaQuery,
    /// 参与计算的许可类型（记录中没有时为空）
    pub jenis_izin: Option<String>,
    /// 许可类型默认 MAKS POIN
    pub maks_poin_default: f64,
    /// 期间百分比
    pub persentase: f64,
    pub matched_rows: usize,
    pub used_placeholder: bool,
    pub result: Option<CalculationResult>,
    /// 格式化的总额，如 "Rp 3,600,000.00"
    pub total_label: Option<String>,
    pub table: ResultTable,
    pub formula: Vec<String>,
    pub filter_summary: String,
    pub visualization: Option<VisualizationSeries>,
    pub notices: Vec<Notice>,
}

impl CalculationOutcome {
    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }
}

/// 导出结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub format: String,
    /// 实际写入的路径（失败时为空）
    pub path: Option<String>,
    pub bytes: usize,
    pub notices: Vec<Notice>,
}
