// ==========================================
// denda-sim - 领域模型层
// ==========================================
// 职责: 定义原始表格、违规数据表、百分比表、计算结果等领域类型
// 红线: 不含文件读取逻辑,不含计算逻辑
// ==========================================

pub mod calculation;
pub mod percentage;
pub mod sheet;
pub mod types;
pub mod violation;

// 重导出核心类型
pub use calculation::{CalculationResult, ResultTable};
pub use percentage::PercentageTable;
pub use sheet::{CellValue, RawSheet, RawWorkbook};
pub use types::{Column, JenisPelanggaran, PermitTypeTable, ANY_VALUE};
pub use violation::{ViolationRecord, ViolationTable};
