// ==========================================
// denda-sim - 表头定位与表格规范化
// ==========================================
// 流程: 定位表头行 → 提升为列名 → 丢弃无名列 → 数值列强制转换 → JENIS IZIN 标准化
// 输入: RawSheet（表头位置未知）
// 输出: ViolationTable + 非致命警告
// ==========================================

use crate::domain::sheet::{CellValue, RawSheet};
use crate::domain::types::Column;
use crate::domain::violation::{ViolationRecord, ViolationTable};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// 无名列标记（列名包含该子串即丢弃）
pub const UNNAMED_MARKER: &str = "Unnamed";

/// 规范化过程中的非致命警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalizeWarning {
    /// 缺少 JENIS IZIN 列，许可类型按未知处理
    MissingPermitTypeColumn,
    /// 表头为空/无名/重复的列已丢弃
    DroppedColumns { count: usize },
}

/// 规范化结果
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOutcome {
    pub table: ViolationTable,
    /// 表头所在行（0 起）
    pub header_row: usize,
    pub warnings: Vec<NormalizeWarning>,
}

// ==========================================
// TableNormalizer - 表格规范化器
// ==========================================
pub struct TableNormalizer {
    cleaner: DataCleaner,
}

impl Default for TableNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableNormalizer {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 定位表头行
    ///
    /// 自上而下扫描，第一行同时包含全部哨兵值（文本精确匹配）的行即为表头行
    pub fn find_header_row(&self, sheet: &RawSheet, sentinels: &[&str]) -> Option<usize> {
        sheet.rows.iter().position(|row| {
            sentinels
                .iter()
                .all(|s| row.iter().any(|cell| cell.as_str() == Some(*s)))
        })
    }

    /// 规范化工作表
    ///
    /// # 返回
    /// - Ok(NormalizeOutcome): 规范化后的数据表与警告
    /// - Err(HeaderNotFound): 工作表中不存在表头行
    #[instrument(skip(self, sheet), fields(sheet = %sheet.name, rows = sheet.row_count()))]
    pub fn normalize(&self, sheet: &RawSheet) -> ImportResult<NormalizeOutcome> {
        let sentinels: Vec<&str> = Column::HEADER_SENTINELS.iter().map(|c| c.header()).collect();

        // === 步骤 1: 定位表头 ===
        let header_row = self
            .find_header_row(sheet, &sentinels)
            .ok_or_else(|| ImportError::HeaderNotFound {
                sheet: sheet.name.clone(),
                sentinels: sentinels.join(", "),
            })?;
        debug!(header_row, "表头行定位完成");

        // === 步骤 2: 列名提取 + 无名列过滤 ===
        let header_cells = sheet.row(header_row).unwrap_or(&[]);
        let mut columns: Vec<(usize, String)> = Vec::new();
        let mut dropped = 0usize;
        for (idx, cell) in header_cells.iter().enumerate() {
            match self.column_name(cell) {
                Some(name) if !columns.iter().any(|(_, n)| *n == name) => {
                    columns.push((idx, name))
                }
                _ => dropped += 1,
            }
        }

        // === 步骤 3: 逐行映射 ===
        let mut records = Vec::new();
        for row in sheet.rows.iter().skip(header_row + 1) {
            // 跳过完全空白的行
            if row.iter().all(CellValue::is_empty) {
                continue;
            }
            records.push(self.map_row(row, &columns));
        }

        let table = ViolationTable::new(
            columns.into_iter().map(|(_, name)| name).collect(),
            records,
        );

        // === 步骤 4: 警告 ===
        let mut warnings = Vec::new();
        if dropped > 0 {
            debug!(dropped, "丢弃无名列");
            warnings.push(NormalizeWarning::DroppedColumns { count: dropped });
        }
        if !table.has(Column::JenisIzin) {
            warn!("未找到 JENIS IZIN 列，许可类型按未知处理");
            warnings.push(NormalizeWarning::MissingPermitTypeColumn);
        }

        info!(
            header_row,
            columns = table.columns.len(),
            records = table.len(),
            "表格规范化完成"
        );

        Ok(NormalizeOutcome {
            table,
            header_row,
            warnings,
        })
    }

    /// 表头单元格 → 列名（空白或无名 → None）
    fn column_name(&self, cell: &CellValue) -> Option<String> {
        let name = self.cleaner.cell_to_text(cell, false)?;
        if name.contains(UNNAMED_MARKER) {
            None
        } else {
            Some(name)
        }
    }

    /// 数据行 → ViolationRecord
    fn map_row(&self, row: &[CellValue], columns: &[(usize, String)]) -> ViolationRecord {
        let mut record = ViolationRecord::default();
        for (idx, name) in columns {
            let cell = row.get(*idx).cloned().unwrap_or_default();
            match Column::from_header(name) {
                Some(c) if c.is_numeric() => {
                    record.set_number(c, self.cleaner.coerce_numeric(&cell));
                }
                Some(Column::JenisIzin) => {
                    record.set_text(Column::JenisIzin, self.cleaner.cell_to_text(&cell, true));
                }
                Some(c) => {
                    let text = if cell.is_empty() {
                        None
                    } else {
                        Some(cell.display_text())
                    };
                    record.set_text(c, text);
                }
                None => {
                    record.extra.insert(name.clone(), cell);
                }
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> CellValue {
        CellValue::text(s)
    }

    fn n(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn sample_sheet() -> RawSheet {
        RawSheet::new(
            "FREK & ALAT",
            vec![
                vec![t("TABEL DENDA"), CellValue::Empty],
                vec![CellValue::Empty, CellValue::Empty],
                vec![
                    t("DINAS"),
                    t("KATEGORI"),
                    t("BAND"),
                    t("JENIS IZIN"),
                    t("ZONA"),
                    CellValue::Empty,
                    t("TARIF DENDA"),
                    t("Unnamed: 7"),
                    t("KETERANGAN"),
                ],
                vec![
                    t("Maritim"),
                    t("Kapal"),
                    t("VHF"),
                    t(" isr "),
                    t("2"),
                    t("sampah"),
                    n(1500.0),
                    t("x"),
                    t("catatan"),
                ],
                vec![CellValue::Empty; 9],
                vec![
                    t("Penerbangan"),
                    t("Pesawat"),
                    t("HF"),
                    t("IPFR"),
                    t("dua"),
                    CellValue::Empty,
                    t("abc"),
                ],
            ],
        )
    }

    #[test]
    fn test_find_header_row() {
        let normalizer = TableNormalizer::new();
        let sheet = sample_sheet();
        assert_eq!(
            normalizer.find_header_row(&sheet, &["DINAS", "KATEGORI", "BAND"]),
            Some(2)
        );
    }

    #[test]
    fn test_header_requires_all_sentinels_exact() {
        let normalizer = TableNormalizer::new();
        let sheet = RawSheet::new(
            "S",
            vec![
                vec![t("DINAS"), t("KATEGORI")],
                vec![t("dinas"), t("KATEGORI"), t("BAND")],
                vec![t("DINAS "), t("KATEGORI"), t("BAND")],
            ],
        );
        let result = normalizer.normalize(&sheet);
        assert!(matches!(result, Err(ImportError::HeaderNotFound { .. })));
    }

    #[test]
    fn test_first_matching_row_wins() {
        let normalizer = TableNormalizer::new();
        let sheet = RawSheet::new(
            "S",
            vec![
                vec![t("BAND"), t("DINAS"), t("KATEGORI"), t("LAIN")],
                vec![t("DINAS"), t("KATEGORI"), t("BAND")],
            ],
        );
        let outcome = normalizer.normalize(&sheet).unwrap();
        assert_eq!(outcome.header_row, 0);
        assert_eq!(outcome.table.columns, vec!["BAND", "DINAS", "KATEGORI", "LAIN"]);
        // 第二个表头样式的行被当作数据
        assert_eq!(outcome.table.len(), 1);
    }

    #[test]
    fn test_normalize_columns_and_values() {
        let normalizer = TableNormalizer::new();
        let outcome = normalizer.normalize(&sample_sheet()).unwrap();
        let table = &outcome.table;

        assert_eq!(
            table.columns,
            vec![
                "DINAS",
                "KATEGORI",
                "BAND",
                "JENIS IZIN",
                "ZONA",
                "TARIF DENDA",
                "KETERANGAN"
            ]
        );
        // 空白行被跳过
        assert_eq!(table.len(), 2);

        let first = &table.records[0];
        assert_eq!(first.jenis_izin.as_deref(), Some("ISR"));
        assert_eq!(first.zona, Some(2.0));
        assert_eq!(first.tarif_denda, Some(1500.0));
        assert_eq!(first.extra.get("KETERANGAN"), Some(&t("catatan")));

        let second = &table.records[1];
        assert_eq!(second.zona, None);
        assert_eq!(second.tarif_denda, None);
        // 缺失的尾部单元格
        assert_eq!(second.extra.get("KETERANGAN"), Some(&CellValue::Empty));

        assert_eq!(
            outcome.warnings,
            vec![NormalizeWarning::DroppedColumns { count: 2 }]
        );
    }

    #[test]
    fn test_missing_permit_type_warning() {
        let normalizer = TableNormalizer::new();
        let sheet = RawSheet::new(
            "S",
            vec![
                vec![t("DINAS"), t("KATEGORI"), t("BAND"), t("MAKS POIN")],
                vec![t("A"), t("B"), t("C"), n(0.0)],
            ],
        );
        let outcome = normalizer.normalize(&sheet).unwrap();
        assert!(outcome
            .warnings
            .contains(&NormalizeWarning::MissingPermitTypeColumn));
        // 真实的 0 与缺失可区分
        assert_eq!(outcome.table.records[0].maks_poin, Some(0.0));
        assert_eq!(outcome.table.records[0].jenis_izin, None);
    }
}
