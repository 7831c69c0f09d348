// ==========================================
// denda-sim - 导入层
// ==========================================
// 职责: 外部工作簿 → 领域数据（违规数据表 + 参考百分比）
// 支持: Excel (.xlsx/.xls)
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_discovery;
pub mod file_parser;
pub mod reference_extractor;
pub mod table_normalizer;
pub mod workbook_cache;
pub mod workbook_loader;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_discovery::{discover_workbooks, DataDirListing};
pub use file_parser::{ExcelParser, WorkbookParser};
pub use reference_extractor::ReferenceExtractor;
pub use table_normalizer::{NormalizeOutcome, NormalizeWarning, TableNormalizer};
pub use workbook_cache::{CacheStatus, WorkbookCache};
pub use workbook_loader::{LoadIssue, LoadedWorkbook, WorkbookLoader};
