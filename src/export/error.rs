// ==========================================
// denda-sim - 导出错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("没有可导出的结果")]
    EmptyResult,

    #[error("CSV 写入失败: {0}")]
    CsvWrite(#[from] csv::Error),

    #[error("XLSX 写入失败: {0}")]
    XlsxWrite(String),

    #[error("{format} 导出不可用: {hint}")]
    ExportUnavailable { format: String, hint: String },

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
