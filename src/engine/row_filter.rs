// ==========================================
// denda-sim - 行过滤器
// ==========================================
// 规则:
// 1) 列不存在 / 值为空 / 值为 "Semua" → 该条件忽略
// 2) ZONA 列: 过滤值先转为整数再比较；转换失败只忽略该条件
// 3) 其他列: 文本完全相等
// 4) 多个条件取交集，保持原有顺序
// ==========================================

use crate::domain::sheet::CellValue;
use crate::domain::types::{Column, ANY_VALUE};
use crate::domain::violation::{ViolationRecord, ViolationTable};
use tracing::{debug, instrument};

/// 过滤条件（列名 → 期望值）
pub type FilterEntry = (String, String);

/// 过滤值是否表示"不限制"
pub fn is_unconstrained(value: &str) -> bool {
    value.is_empty() || value == ANY_VALUE
}

pub struct RowFilter;

impl RowFilter {
    #[instrument(skip(self, table, filters), fields(rows = table.len(), filters = filters.len()))]
    pub fn apply(&self, table: &ViolationTable, filters: &[FilterEntry]) -> ViolationTable {
        let mut records: Vec<&ViolationRecord> = table.records.iter().collect();

        for (column, value) in filters {
            if !table.has_column(column) || is_unconstrained(value) {
                continue;
            }

            if column == Column::Zona.header() {
                match value.trim().parse::<i64>() {
                    Ok(zona) => records.retain(|r| r.zona == Some(zona as f64)),
                    Err(_) => {
                        debug!(value = %value, "ZONA 过滤值不是整数，忽略该条件");
                        continue;
                    }
                }
            } else {
                let expected = CellValue::text(value.as_str());
                records.retain(|r| r.value(column) == expected);
            }
            debug!(column = %column, value = %value, remaining = records.len(), "应用过滤条件");
        }

        table.with_records(records.into_iter().cloned().collect())
    }
}
