// ==========================================
// denda-sim - XLSX 导出
// ==========================================
// 单个工作表 "Hasil Perhitungan": 表头一行 + 结果行，数值写为数值单元格
// 未启用 xlsx-export 特性时返回 ExportUnavailable，CSV 导出不受影响
// ==========================================

use crate::domain::calculation::ResultTable;
use crate::export::error::{ExportError, ExportResult};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

pub const RESULT_SHEET_NAME: &str = "Hasil Perhitungan";

pub struct XlsxExporter;

impl XlsxExporter {
    /// 当前构建是否支持 XLSX 导出
    pub fn is_available(&self) -> bool {
        cfg!(feature = "xlsx-export")
    }

    #[cfg(feature = "xlsx-export")]
    pub fn to_bytes(&self, table: &ResultTable) -> ExportResult<Vec<u8>> {
        use crate::domain::sheet::CellValue;

        if table.columns.is_empty() {
            return Err(ExportError::EmptyResult);
        }

        let mut book = umya_spreadsheet::new_file_empty_worksheet();
        let ws = book
            .new_sheet(RESULT_SHEET_NAME)
            .map_err(|e| ExportError::XlsxWrite(e.to_string()))?;

        // 坐标 (列, 行)，均从 1 开始
        for (j, header) in table.columns.iter().enumerate() {
            ws.get_cell_mut((j as u32 + 1, 1))
                .set_value_string(header.clone());
        }
        for (i, row) in table.rows.iter().enumerate() {
            let row_no = i as u32 + 2;
            for (j, cell) in row.iter().enumerate() {
                let target = ws.get_cell_mut((j as u32 + 1, row_no));
                match cell {
                    CellValue::Number(n) => {
                        target.set_value_number(*n);
                    }
                    CellValue::Empty => {}
                    other => {
                        target.set_value_string(other.display_text());
                    }
                }
            }
        }

        let mut out: Vec<u8> = Vec::new();
        umya_spreadsheet::writer::xlsx::write_writer(&book, &mut out)
            .map_err(|e| ExportError::XlsxWrite(e.to_string()))?;
        Ok(out)
    }

    #[cfg(not(feature = "xlsx-export"))]
    pub fn to_bytes(&self, _table: &ResultTable) -> ExportResult<Vec<u8>> {
        Err(ExportError::ExportUnavailable {
            format: "XLSX".to_string(),
            hint: "使用 `--features xlsx-export` 重新构建，或改用 CSV 导出".to_string(),
        })
    }

    #[instrument(skip(self, table), fields(rows = table.len(), path = %path.display()))]
    pub fn export_to_path(&self, table: &ResultTable, path: &Path) -> ExportResult<usize> {
        let bytes = self.to_bytes(table)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;
        info!(bytes = bytes.len(), "XLSX 导出完成");
        Ok(bytes.len())
    }
}
