// ==========================================
// denda-sim - 用户诊断信息 (Notice)
// ==========================================
// 所有非致命问题都转换为 Notice 附加到操作结果中
// message 通过 i18n 生成（当前语言）
// ==========================================

use crate::api::error::ApiError;
use crate::export::ExportError;
use crate::i18n::t_with_args;
use crate::importer::{ImportError, LoadIssue, NormalizeWarning};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub code: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, code: &str, key: &str, args: &[(&str, &str)]) -> Self {
        let message = t_with_args(key, args);
        match level {
            NoticeLevel::Info => info!(code, message = %message, "notice"),
            NoticeLevel::Warning => warn!(code, message = %message, "notice"),
            NoticeLevel::Error => error!(code, message = %message, "notice"),
        }
        Self {
            level,
            code: code.to_string(),
            message,
        }
    }

    pub fn info(code: &str, key: &str, args: &[(&str, &str)]) -> Self {
        Self::new(NoticeLevel::Info, code, key, args)
    }

    pub fn warning(code: &str, key: &str, args: &[(&str, &str)]) -> Self {
        Self::new(NoticeLevel::Warning, code, key, args)
    }

    pub fn error(code: &str, key: &str, args: &[(&str, &str)]) -> Self {
        Self::new(NoticeLevel::Error, code, key, args)
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// 加载问题 → Notice
    pub fn from_load_issue(issue: &LoadIssue) -> Self {
        match issue {
            LoadIssue::MainSheetMissing {
                expected,
                used: Some(used),
            } => Self::warning(
                "MAIN_SHEET_MISSING",
                "load.main_sheet_missing",
                &[("expected", expected.as_str()), ("used", used.as_str())],
            ),
            LoadIssue::MainSheetMissing { expected, used: None } => Self::error(
                "MAIN_SHEET_MISSING",
                "load.main_sheet_unusable",
                &[("expected", expected.as_str())],
            ),
            LoadIssue::HeaderNotFound { sheet } => Self::error(
                "HEADER_NOT_FOUND",
                "load.header_not_found",
                &[("sheet", sheet.as_str())],
            ),
            LoadIssue::Normalize {
                warning: NormalizeWarning::MissingPermitTypeColumn,
            } => Self::warning(
                "MISSING_PERMIT_TYPE_COLUMN",
                "load.missing_permit_column",
                &[],
            ),
            LoadIssue::Normalize {
                warning: NormalizeWarning::DroppedColumns { count },
            } => Self::info(
                "DROPPED_COLUMNS",
                "load.dropped_columns",
                &[("count", count.to_string().as_str())],
            ),
        }
    }

    /// API 错误 → Notice
    pub fn from_api_error(err: &ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Import(ImportError::DataDirError { path, message }) => Self::error(
                err.code(),
                "data_dir.error",
                &[("path", path.as_str()), ("message", message.as_str())],
            ),
            ApiError::Import(ImportError::HeaderNotFound { sheet, .. }) => Self::error(
                err.code(),
                "load.header_not_found",
                &[("sheet", sheet.as_str())],
            ),
            ApiError::Import(inner) => Self::error(
                err.code(),
                "load.file_error",
                &[
                    ("file", import_subject(inner).as_str()),
                    ("message", inner.to_string().as_str()),
                ],
            ),
            ApiError::TableUnavailable { file } => {
                Self::error(err.code(), "load.table_unavailable", &[("file", file.as_str())])
            }
            ApiError::Export(ExportError::ExportUnavailable { format, hint }) => Self::warning(
                err.code(),
                "export.unavailable",
                &[("format", format.as_str()), ("hint", hint.as_str())],
            ),
            ApiError::Export(ExportError::EmptyResult) => {
                Self::warning(err.code(), "export.no_result", &[])
            }
            ApiError::Export(inner) => {
                let format = match inner {
                    ExportError::CsvWrite(_) => "CSV",
                    ExportError::XlsxWrite(_) => "XLSX",
                    _ => "-",
                };
                Self::error(
                    err.code(),
                    "export.error",
                    &[("format", format), ("message", inner.to_string().as_str())],
                )
            }
            ApiError::Config(_) => {
                Self::error(err.code(), "config.error", &[("message", message.as_str())])
            }
            _ => Self::error(
                err.code(),
                "load.file_error",
                &[("file", "-"), ("message", message.as_str())],
            ),
        }
    }
}

/// 导入错误涉及的文件（无法确定时为 "-"）
fn import_subject(err: &ImportError) -> String {
    match err {
        ImportError::FileNotFound(path) | ImportError::UnsupportedFormat(path) => path.clone(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_issue_levels() {
        let n = Notice::from_load_issue(&LoadIssue::HeaderNotFound {
            sheet: "FREK & ALAT".to_string(),
        });
        assert_eq!(n.code, "HEADER_NOT_FOUND");
        assert!(n.is_error());
        assert!(n.message.contains("FREK & ALAT"));

        let n = Notice::from_load_issue(&LoadIssue::Normalize {
            warning: NormalizeWarning::DroppedColumns { count: 3 },
        });
        assert_eq!(n.level, NoticeLevel::Info);
        assert!(n.message.contains('3'));

        let n = Notice::from_load_issue(&LoadIssue::MainSheetMissing {
            expected: "FREK & ALAT".to_string(),
            used: Some("Lampiran".to_string()),
        });
        assert_eq!(n.level, NoticeLevel::Warning);
    }

    #[test]
    fn test_from_api_error() {
        let err = ApiError::Export(ExportError::ExportUnavailable {
            format: "XLSX".to_string(),
            hint: "xlsx-export".to_string(),
        });
        let n = Notice::from_api_error(&err);
        assert_eq!(n.code, "EXPORT_UNAVAILABLE");
        assert_eq!(n.level, NoticeLevel::Warning);
        assert!(n.message.contains("xlsx-export"));

        let err = ApiError::Import(ImportError::FileNotFound("a.xlsx".to_string()));
        let n = Notice::from_api_error(&err);
        assert_eq!(n.code, "FILE_READ_ERROR");
        assert!(n.message.contains("a.xlsx"));
    }
}
