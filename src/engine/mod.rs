// ==========================================
// denda-sim - 引擎层
// ==========================================
// 职责: 行过滤、下拉选项、罚金计算、结果表与可视化数据
// 红线: Engine 不读文件，所有输入来自已加载的数据表
// ==========================================

pub mod denda_calculator;
pub mod error;
pub mod filter_options;
pub mod orchestrator;
pub mod result_builder;
pub mod row_filter;
pub mod visualization;

// 重导出核心引擎
pub use denda_calculator::{CalculationInput, DendaCalculator};
pub use error::CalculationError;
pub use filter_options::{build_filter_options, FilterOptions, FilterSelection};
pub use orchestrator::{DendaOrchestrator, DendaQuery, DendaRun};
pub use result_builder::{format_rupiah, ResultBuilder, DISPLAY_COLUMNS};
pub use row_filter::{FilterEntry, RowFilter};
pub use visualization::{build_visualization, VisualizationSeries};
