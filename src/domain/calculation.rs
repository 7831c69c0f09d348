// ==========================================
// denda-sim - 计算结果模型
// ==========================================
// CalculationResult: 单次计算的全部中间量（不可变，不落库）
// ResultTable: 带计算结果注释的通用表格（展示/导出用）
// ==========================================

use crate::domain::sheet::CellValue;
use serde::{Deserialize, Serialize};

// ==========================================
// CalculationResult - 计算结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    pub indeks: f64,
    pub persentase: f64, // 小数形式
    pub maks_poin: f64,
    pub total_poin: f64,
    pub tarif_denda: f64,
    pub denda: f64,
    pub total_tagihan_denda: f64,
}

impl CalculationResult {
    /// 计算异常时的兜底结果（全部为 0）
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn is_zeroed(&self) -> bool {
        *self == Self::zeroed()
    }
}

// ==========================================
// ResultTable - 结果表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == header)
    }

    /// 读取指定行列（列名不存在或越界 → None）
    pub fn get(&self, row: usize, header: &str) -> Option<&CellValue> {
        let col = self.column_index(header)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
