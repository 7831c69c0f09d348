// ==========================================
// denda-sim - 文件解析器实现
// ==========================================
// 职责: Excel 工作簿 → RawWorkbook（所有工作表，原始网格）
// 支持: Excel (.xlsx/.xls)
// ==========================================

use crate::domain::sheet::{CellValue, RawSheet, RawWorkbook};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::{debug, instrument};

/// 支持的工作簿扩展名（小写）
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

// ==========================================
// WorkbookParser Trait
// ==========================================
// 用途: 工作簿解析接口
// 实现者: ExcelParser（测试中可替换为内存实现）
pub trait WorkbookParser: Send + Sync {
    /// 解析整个工作簿
    ///
    /// # 返回
    /// - Ok(RawWorkbook): 按原顺序的全部工作表
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<RawWorkbook>;
}

/// 扩展名是否为受支持的 Excel 格式（大小写不敏感）
pub fn is_supported_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl WorkbookParser for ExcelParser {
    #[instrument(skip(self), fields(file = %file_path.display()))]
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<RawWorkbook> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if !is_supported_workbook(path) {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            return Err(ImportError::UnsupportedFormat(ext.to_string()));
        }

        // 打开 Excel 文件（按扩展名自动选择 xlsx/xls 读取器）
        let mut workbook = open_workbook_auto(path)?;

        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name)?;
            let sheet = range_to_sheet(&name, &range);
            debug!(sheet = %name, rows = sheet.row_count(), "工作表读取完成");
            sheets.push(sheet);
        }

        Ok(RawWorkbook::new(sheets))
    }
}

/// calamine Range → RawSheet
///
/// Range 从第一个非空单元格开始，这里补齐前导空行/空列，
/// 使行列号与工作表中的实际位置一致
fn range_to_sheet(name: &str, range: &Range<Data>) -> RawSheet {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for data_row in range.rows() {
        let mut cells = vec![CellValue::Empty; col_offset];
        cells.extend(data_row.iter().map(convert_cell));
        rows.push(cells);
    }

    RawSheet::new(name, rows)
}

/// calamine 单元格 → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // 日期/时长按文本保留
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::Builder;

    #[test]
    fn test_excel_parser_file_not_found() {
        let parser = ExcelParser;
        let result = parser.parse_workbook(Path::new("tidak_ada.xlsx"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_excel_parser_unsupported_format() {
        let temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        let parser = ExcelParser;
        let result = parser.parse_workbook(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "csv"));
    }

    #[test]
    fn test_excel_parser_corrupt_file() {
        let temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        std::fs::write(temp_file.path(), b"bukan file excel").unwrap();
        let parser = ExcelParser;
        assert!(parser.parse_workbook(temp_file.path()).is_err());
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_workbook(Path::new("Data/denda.xlsx")));
        assert!(is_supported_workbook(Path::new("Data/DENDA.XLS")));
        assert!(!is_supported_workbook(Path::new("Data/denda.csv")));
        assert!(!is_supported_workbook(Path::new("Data/denda")));
    }

    #[test]
    fn test_convert_cell() {
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(convert_cell(&Data::Float(0.5)), CellValue::Number(0.5));
        assert_eq!(
            convert_cell(&Data::String("DINAS".to_string())),
            CellValue::text("DINAS")
        );
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
    }
}
