// ==========================================
// denda-sim - API层错误类型
// ==========================================
// 职责: 汇总各层错误，提供稳定的错误码供展示层使用
// ==========================================

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::importer::ImportError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("数据表不可用: {file}")]
    TableUnavailable { file: String },

    #[error("导出失败: {0}")]
    Export(#[from] ExportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定错误码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Import(ImportError::HeaderNotFound { .. }) => "HEADER_NOT_FOUND",
            ApiError::Import(ImportError::DataDirError { .. }) => "DATA_DIR_ERROR",
            ApiError::Import(_) => "FILE_READ_ERROR",
            ApiError::TableUnavailable { .. } => "TABLE_UNAVAILABLE",
            ApiError::Export(ExportError::ExportUnavailable { .. }) => "EXPORT_UNAVAILABLE",
            ApiError::Export(ExportError::EmptyResult) => "EXPORT_NO_RESULT",
            ApiError::Export(_) => "EXPORT_ERROR",
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// 错误响应（CLI / 展示层）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
