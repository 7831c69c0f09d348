// ==========================================
// denda-sim - 计算流程编排器
// ==========================================
// 用途: 协调过滤 → 占位 → 计算 → 结果表 → 可视化的执行顺序
// 输入: 已加载的数据表 + 百分比表 + 用户查询
// 输出: DendaRun（不含任何文件 IO）
// ==========================================

use crate::domain::calculation::{CalculationResult, ResultTable};
use crate::domain::percentage::{PercentageTable, FALLBACK_PERCENTAGE};
use crate::domain::types::JenisPelanggaran;
use crate::domain::violation::{ViolationRecord, ViolationTable};
use crate::engine::denda_calculator::{CalculationInput, DendaCalculator};
use crate::engine::error::CalculationError;
use crate::engine::filter_options::FilterSelection;
use crate::engine::result_builder::ResultBuilder;
use crate::engine::row_filter::{FilterEntry, RowFilter};
use crate::engine::visualization::{build_visualization, VisualizationSeries};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// 用户查询（过滤选择 + 计算参数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DendaQuery {
    #[serde(flatten)]
    pub selection: FilterSelection,
    pub jenis_pelanggaran: JenisPelanggaran,
    pub jumlah_frekuensi: i64,
    pub jumlah_perangkat: i64,
}

impl Default for DendaQuery {
    fn default() -> Self {
        Self {
            selection: FilterSelection::default(),
            jenis_pelanggaran: JenisPelanggaran::FirstOffense,
            jumlah_frekuensi: 1,
            jumlah_perangkat: 1,
        }
    }
}

// ==========================================
// DendaRun - 单次计算流程的输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DendaRun {
    /// 实际使用的过滤条件
    pub filters: Vec<FilterEntry>,
    /// 过滤命中的行数（占位前）
    pub matched_rows: usize,
    /// 是否使用了占位记录
    pub used_placeholder: bool,
    pub persentase: f64,
    /// 补全后参与计算的记录
    pub selected_record: Option<ViolationRecord>,
    pub result: Option<CalculationResult>,
    #[serde(skip)]
    pub calculation_error: Option<CalculationError>,
    pub table: ResultTable,
    pub formula: Vec<String>,
    pub filter_summary: String,
    pub visualization: Option<VisualizationSeries>,
}

impl DendaRun {
    /// 没有任何可计算的行
    pub fn is_empty(&self) -> bool {
        self.result.is_none()
    }
}

// ==========================================
// DendaOrchestrator - 计算流程编排器
// ==========================================
pub struct DendaOrchestrator {
    filter: RowFilter,
    calculator: DendaCalculator,
    builder: ResultBuilder,
    placeholder_row: bool,
}

impl DendaOrchestrator {
    /// # 参数
    /// - placeholder_row: 无匹配行且已选择许可类型时是否使用占位记录
    pub fn new(placeholder_row: bool) -> Self {
        Self {
            filter: RowFilter,
            calculator: DendaCalculator,
            builder: ResultBuilder,
            placeholder_row,
        }
    }

    #[instrument(skip(self, table, percentages), fields(rows = table.len()))]
    pub fn run(
        &self,
        table: &ViolationTable,
        percentages: &PercentageTable,
        query: &DendaQuery,
    ) -> DendaRun {
        let selection = &query.selection;

        // ==========================================
        // 步骤1: 过滤
        // ==========================================
        let filters = selection.to_filters(table);
        let mut filtered = self.filter.apply(table, &filters);
        let matched_rows = filtered.len();
        debug!(matched_rows, "过滤完成");

        // ==========================================
        // 步骤2: 占位记录
        // ==========================================
        let mut used_placeholder = false;
        if filtered.is_empty() && selection.has_jenis_izin() && self.placeholder_row {
            warn!(jenis_izin = %selection.jenis_izin, "无匹配数据，使用占位记录");
            filtered = self
                .builder
                .placeholder_table(&selection.jenis_izin, &filters);
            used_placeholder = true;
        }

        // ==========================================
        // 步骤3: 期间百分比
        // ==========================================
        let persentase = if selection.has_jml_bulan() {
            percentages.percentage_for(&selection.jml_bulan)
        } else {
            FALLBACK_PERCENTAGE
        };

        let filter_summary = self.builder.filter_summary(&filters);

        let first = match filtered.records.first() {
            Some(record) => record,
            None => {
                warn!("无匹配数据，跳过计算");
                return DendaRun {
                    filters,
                    matched_rows,
                    used_placeholder,
                    persentase,
                    selected_record: None,
                    result: None,
                    calculation_error: None,
                    table: ResultTable::default(),
                    formula: Vec::new(),
                    filter_summary,
                    visualization: None,
                };
            }
        };

        // ==========================================
        // 步骤4-5: 补全首行并计算
        // ==========================================
        let selected = self
            .builder
            .prepare_record(&filtered, first, &selection.jenis_izin);
        let input = CalculationInput {
            jumlah_frekuensi: query.jumlah_frekuensi,
            jumlah_perangkat: query.jumlah_perangkat,
            persentase,
            jenis_pelanggaran: query.jenis_pelanggaran,
        };
        let (result, calculation_error) = self.calculator.calculate(&selected, &input);

        // ==========================================
        // 步骤6-7: 结果表 + 公式 + 可视化
        // ==========================================
        let result_table =
            self.builder
                .build_table(&filtered, &result, &input, &selection.jenis_izin);
        let formula = self.builder.formula_lines(&result, &input);
        let visualization =
            build_visualization(&result, query.jumlah_frekuensi, query.jumlah_perangkat);

        info!(
            matched_rows,
            used_placeholder,
            total_tagihan_denda = result.total_tagihan_denda,
            "罚金计算流程完成"
        );

        DendaRun {
            filters,
            matched_rows,
            used_placeholder,
            persentase,
            selected_record: Some(selected),
            result: Some(result),
            calculation_error,
            table: result_table,
            formula,
            filter_summary,
            visualization: Some(visualization),
        }
    }
}
