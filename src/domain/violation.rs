// ==========================================
// denda-sim - 违规数据表模型
// ==========================================
// ViolationRecord: 强类型可选字段记录（标准列）+ 其他列原样保留
// ViolationTable: 表头规范化之后的记录序列，所有记录列集合一致
// ==========================================
// 约束: 数值列只会是有限数或缺失（None），缺失与 0 可区分
// ==========================================

use crate::domain::sheet::CellValue;
use crate::domain::types::Column;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ViolationRecord - 单行违规数据
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationRecord {
    // ===== 文本列 =====
    pub dinas: Option<String>,
    pub kategori: Option<String>,
    pub band: Option<String>,
    pub jenis_izin: Option<String>, // TRIM + UPPER

    // ===== 数值列 =====
    pub zona: Option<f64>,
    pub maks_poin: Option<f64>,
    pub indeks_pertama: Option<f64>,
    pub indeks_berulang: Option<f64>,
    pub persen: Option<f64>,
    pub total_poin: Option<f64>,
    pub tarif_denda: Option<f64>,
    pub denda: Option<f64>,
    pub jumlah_frekuensi: Option<f64>,
    pub jumlah_perangkat: Option<f64>,

    // ===== 非标准列（原样保留）=====
    #[serde(default)]
    pub extra: BTreeMap<String, CellValue>,
}

impl ViolationRecord {
    /// 读取文本列
    pub fn text(&self, column: Column) -> Option<&str> {
        let slot = match column {
            Column::Dinas => &self.dinas,
            Column::Kategori => &self.kategori,
            Column::Band => &self.band,
            Column::JenisIzin => &self.jenis_izin,
            _ => return None,
        };
        slot.as_deref()
    }

    /// 读取数值列（缺失 → None）
    pub fn number(&self, column: Column) -> Option<f64> {
        match column {
            Column::Zona => self.zona,
            Column::MaksPoin => self.maks_poin,
            Column::IndeksPertama => self.indeks_pertama,
            Column::IndeksBerulang => self.indeks_berulang,
            Column::Persen => self.persen,
            Column::TotalPoin => self.total_poin,
            Column::TarifDenda => self.tarif_denda,
            Column::Denda => self.denda,
            Column::JumlahFrekuensi => self.jumlah_frekuensi,
            Column::JumlahPerangkat => self.jumlah_perangkat,
            _ => None,
        }
    }

    /// 读取数值列，缺失时返回默认值
    pub fn number_or(&self, column: Column, default: f64) -> f64 {
        self.number(column).unwrap_or(default)
    }

    pub fn set_text(&mut self, column: Column, value: Option<String>) {
        match column {
            Column::Dinas => self.dinas = value,
            Column::Kategori => self.kategori = value,
            Column::Band => self.band = value,
            Column::JenisIzin => self.jenis_izin = value,
            _ => {}
        }
    }

    pub fn set_number(&mut self, column: Column, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        match column {
            Column::Zona => self.zona = value,
            Column::MaksPoin => self.maks_poin = value,
            Column::IndeksPertama => self.indeks_pertama = value,
            Column::IndeksBerulang => self.indeks_berulang = value,
            Column::Persen => self.persen = value,
            Column::TotalPoin => self.total_poin = value,
            Column::TarifDenda => self.tarif_denda = value,
            Column::Denda => self.denda = value,
            Column::JumlahFrekuensi => self.jumlah_frekuensi = value,
            Column::JumlahPerangkat => self.jumlah_perangkat = value,
            _ => {}
        }
    }

    /// 按表头名读取单元格（标准列与非标准列统一入口）
    pub fn value(&self, header: &str) -> CellValue {
        match Column::from_header(header) {
            Some(c) if c.is_numeric() => self.number(c).into(),
            Some(c) => self.text(c).into(),
            None => self.extra.get(header).cloned().unwrap_or_default(),
        }
    }

    /// 按表头名写入单元格
    ///
    /// 标准数值列只接受数值单元格，其余内容写为缺失
    pub fn set_value(&mut self, header: &str, value: CellValue) {
        match Column::from_header(header) {
            Some(c) if c.is_numeric() => self.set_number(c, value.as_number()),
            Some(c) => {
                let text = if value.is_empty() {
                    None
                } else {
                    Some(value.display_text())
                };
                self.set_text(c, text);
            }
            None => {
                self.extra.insert(header.to_string(), value);
            }
        }
    }
}

// ==========================================
// ViolationTable - 违规数据表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViolationTable {
    /// 规范化后的列名（保持源表顺序）
    pub columns: Vec<String>,
    pub records: Vec<ViolationRecord>,
}

impl ViolationTable {
    pub fn new(columns: Vec<String>, records: Vec<ViolationRecord>) -> Self {
        Self { columns, records }
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.columns.iter().any(|c| c == header)
    }

    pub fn has(&self, column: Column) -> bool {
        self.has_column(column.header())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViolationRecord> {
        self.records.iter()
    }

    /// 保持列集合，替换记录
    pub fn with_records(&self, records: Vec<ViolationRecord>) -> Self {
        Self {
            columns: self.columns.clone(),
            records,
        }
    }
}
