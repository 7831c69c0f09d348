// ==========================================
// denda-sim - 参考百分比提取器
// ==========================================
// 输入: "Referensi" 工作表（可选）
// 规则:
// 1) 行文本（TRIM + 空格拼接 + 小写）包含任一期间档标签 → 候选行
// 2) 候选行中单元格文本（TRIM 后）与期间档标签完全相等 → 该列为期间档列
// 3) 下一行同列的值即百分比: 数值或数字文本（允许小数逗号），> 1 时除以 100
// 4) 无法解析的值跳过，保留默认；多个候选行时后者覆盖前者
// 输出: PercentageTable（始终包含三个期间档）
// ==========================================

use crate::domain::percentage::{PercentageTable, PERIOD_BUCKETS};
use crate::domain::sheet::{CellValue, RawSheet, RawWorkbook};
use crate::importer::data_cleaner::DataCleaner;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

pub struct ReferenceExtractor {
    cleaner: DataCleaner,
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceExtractor {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 从工作簿中指定名称的参考表提取百分比（工作表不存在 → 默认值）
    pub fn extract(&self, workbook: &RawWorkbook, sheet_name: &str) -> PercentageTable {
        match workbook.sheet(sheet_name) {
            Some(sheet) => self.extract_from_sheet(sheet),
            None => {
                debug!(sheet = sheet_name, "参考表不存在，使用默认百分比");
                PercentageTable::default()
            }
        }
    }

    #[instrument(skip(self, sheet), fields(sheet = %sheet.name))]
    pub fn extract_from_sheet(&self, sheet: &RawSheet) -> PercentageTable {
        let mut table = PercentageTable::default();

        for (i, row) in sheet.rows.iter().enumerate() {
            if !self.mentions_period(row) {
                continue;
            }

            // 期间档列（完全相等；同一标签出现多次时取最后一列）
            let period_indices: BTreeMap<&str, usize> = row
                .iter()
                .enumerate()
                .filter_map(|(j, cell)| {
                    let text = cell.display_text();
                    let text = text.trim();
                    PERIOD_BUCKETS
                        .iter()
                        .copied()
                        .find(|p| *p == text)
                        .map(|p| (p, j))
                })
                .collect();

            if period_indices.is_empty() || i + 1 >= sheet.row_count() {
                continue;
            }

            for (period, idx) in period_indices {
                match sheet.cell(i + 1, idx).and_then(|c| self.parse_percentage(c)) {
                    Some(value) => {
                        debug!(row = i, period, value, "读取期间百分比");
                        table.set(period, value);
                    }
                    None => debug!(row = i, period, "期间百分比无法解析，保留默认值"),
                }
            }
        }

        info!(percentages = ?table, "参考百分比提取完成");
        table
    }

    /// 行文本是否提及任一期间档（子串，大小写不敏感）
    fn mentions_period(&self, row: &[CellValue]) -> bool {
        let joined = row
            .iter()
            .map(|c| c.display_text().trim().to_string())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        PERIOD_BUCKETS
            .iter()
            .any(|p| joined.contains(&p.to_lowercase()))
    }

    /// 百分比单元格 → 小数（负数与非数值跳过）
    fn parse_percentage(&self, cell: &CellValue) -> Option<f64> {
        let raw = match cell {
            CellValue::Number(n) if n.is_finite() && *n >= 0.0 => *n,
            CellValue::Text(s) => self.cleaner.parse_percentage_text(s)?,
            _ => return None,
        };
        Some(self.cleaner.normalize_fraction(raw))
    }
}
