// ==========================================
// denda-sim - 导出层
// ==========================================
// 职责: 结果表导出为 CSV（始终可用）与 XLSX（xlsx-export 特性）
// ==========================================

pub mod csv_export;
pub mod error;
pub mod xlsx_export;

pub use csv_export::{export_file_name, CsvExporter};
pub use error::{ExportError, ExportResult};
pub use xlsx_export::{XlsxExporter, RESULT_SHEET_NAME};
