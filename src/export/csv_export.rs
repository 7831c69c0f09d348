// ==========================================
// denda-sim - CSV 导出
// ==========================================
// 表头一行 + 每个结果行一条记录，列顺序与展示表一致
// 数值按字面输出（整数不带小数），缺失为空，标准引号规则
// ==========================================

use crate::domain::calculation::ResultTable;
use crate::domain::sheet::CellValue;
use crate::domain::types::ANY_VALUE;
use crate::export::error::{ExportError, ExportResult};
use csv::WriterBuilder;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// 导出文件名: hasil_perhitungan_denda_<JENIS IZIN>.<ext>
///
/// JENIS IZIN 为空时使用 "Semua"；路径分隔符替换为下划线，文件始终落在目标目录内
pub fn export_file_name(jenis_izin: &str, extension: &str) -> String {
    let jenis_izin = jenis_izin.trim();
    let label = if jenis_izin.is_empty() { ANY_VALUE } else { jenis_izin };
    let label: String = label
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("hasil_perhitungan_denda_{}.{}", label, extension)
}

pub struct CsvExporter;

impl CsvExporter {
    /// 结果表 → CSV 字节
    pub fn to_bytes(&self, table: &ResultTable) -> ExportResult<Vec<u8>> {
        if table.columns.is_empty() {
            return Err(ExportError::EmptyResult);
        }

        let mut wtr = WriterBuilder::new().from_writer(vec![]);
        wtr.write_record(&table.columns)?;
        for row in &table.rows {
            wtr.write_record(row.iter().map(CellValue::display_text))?;
        }
        wtr.into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }

    /// 写入文件（父目录不存在时创建）
    #[instrument(skip(self, table), fields(rows = table.len(), path = %path.display()))]
    pub fn export_to_path(&self, table: &ResultTable, path: &Path) -> ExportResult<usize> {
        let bytes = self.to_bytes(table)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;
        info!(bytes = bytes.len(), "CSV 导出完成");
        Ok(bytes.len())
    }
}
