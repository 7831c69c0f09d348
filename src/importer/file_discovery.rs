// ==========================================
// denda-sim - 数据目录扫描
// ==========================================
// 职责: 在配置的数据目录中查找 Excel 文件（.xlsx 在前，.xls 在后，按文件名排序）
// 目录不存在时自动创建，返回空列表
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::is_supported_workbook;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// 数据目录扫描结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataDirListing {
    pub files: Vec<PathBuf>,
    /// 本次扫描时新建了数据目录
    pub created: bool,
}

#[instrument(fields(data_dir = %data_dir.display()))]
pub fn discover_workbooks(data_dir: &Path) -> ImportResult<DataDirListing> {
    let dir_error = |e: std::io::Error| ImportError::DataDirError {
        path: data_dir.display().to_string(),
        message: e.to_string(),
    };

    if !data_dir.exists() {
        std::fs::create_dir_all(data_dir).map_err(dir_error)?;
        info!("数据目录不存在，已创建");
        return Ok(DataDirListing {
            files: Vec::new(),
            created: true,
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(data_dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        if path.is_file() && is_supported_workbook(&path) {
            files.push(path);
        }
    }

    files.sort_by_key(|p| (extension_rank(p), file_name(p)));
    info!(count = files.len(), "数据目录扫描完成");

    Ok(DataDirListing {
        files,
        created: false,
    })
}

/// 文件名（用于展示与排序）
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn extension_rank(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("xlsx") => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_dir() {
        let root = TempDir::new().unwrap();
        let data_dir = root.path().join("Data");
        let listing = discover_workbooks(&data_dir).unwrap();
        assert!(listing.created);
        assert!(listing.files.is_empty());
        assert!(data_dir.is_dir());
    }

    #[test]
    fn test_lists_excel_files_only() {
        let root = TempDir::new().unwrap();
        for name in ["b.xlsx", "a.xls", "c.csv", "a.xlsx", "catatan.txt"] {
            std::fs::write(root.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(root.path().join("sub.xlsx")).unwrap();

        let listing = discover_workbooks(root.path()).unwrap();
        let names: Vec<String> = listing.files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.xlsx", "b.xlsx", "a.xls"]);
        assert!(!listing.created);
    }
}
