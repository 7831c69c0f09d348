// ==========================================
// denda-sim - 过滤选项（级联下拉）
// ==========================================
// JENIS IZIN: 数据中的值 ∪ {IPFR, ISR, APT}
// DINAS → KATEGORI → BAND: 逐级受上一级选择限制
// ZONA: 数据中的值（按数值排序，整数不带小数）
// JML BULAN: 百分比表中的期间档
// 每个列表以 "Semua" 开头
// ==========================================

use crate::domain::percentage::PercentageTable;
use crate::domain::sheet::CellValue;
use crate::domain::types::{Column, PermitTypeTable, ANY_VALUE};
use crate::domain::violation::{ViolationRecord, ViolationTable};
use crate::engine::row_filter::{is_unconstrained, FilterEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 用户当前的过滤选择（"Semua" 表示不限制）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub jenis_izin: String,
    pub dinas: String,
    pub kategori: String,
    pub band: String,
    pub zona: String,
    pub jml_bulan: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        let any = ANY_VALUE.to_string();
        Self {
            jenis_izin: any.clone(),
            dinas: any.clone(),
            kategori: any.clone(),
            band: any.clone(),
            zona: any.clone(),
            jml_bulan: any,
        }
    }
}

impl FilterSelection {
    /// 选择了具体的许可类型
    pub fn has_jenis_izin(&self) -> bool {
        !is_unconstrained(&self.jenis_izin)
    }

    pub fn has_jml_bulan(&self) -> bool {
        !is_unconstrained(&self.jml_bulan)
    }

    /// 转为行过滤条件
    ///
    /// DINAS/KATEGORI/BAND/ZONA 始终参与；JENIS IZIN 仅在数据表有该列且已选择时参与
    pub fn to_filters(&self, table: &ViolationTable) -> Vec<FilterEntry> {
        let mut filters = vec![
            (Column::Dinas.header().to_string(), self.dinas.clone()),
            (Column::Kategori.header().to_string(), self.kategori.clone()),
            (Column::Band.header().to_string(), self.band.clone()),
            (Column::Zona.header().to_string(), self.zona.clone()),
        ];
        if table.has(Column::JenisIzin) && self.has_jenis_izin() {
            filters.push((
                Column::JenisIzin.header().to_string(),
                self.jenis_izin.trim().to_uppercase(),
            ));
        }
        filters
    }
}

/// 各下拉框的可选值
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub jenis_izin: Vec<String>,
    pub dinas: Vec<String>,
    pub kategori: Vec<String>,
    pub band: Vec<String>,
    pub zona: Vec<String>,
    pub jml_bulan: Vec<String>,
}

pub fn build_filter_options(
    table: &ViolationTable,
    percentages: &PercentageTable,
    selection: &FilterSelection,
) -> FilterOptions {
    // JENIS IZIN: 数据值 ∪ 已知编码
    let mut jenis_izin: BTreeSet<String> = PermitTypeTable::codes().map(String::from).collect();
    if table.has(Column::JenisIzin) {
        jenis_izin.extend(
            table
                .iter()
                .filter_map(|r| r.jenis_izin.as_deref())
                .map(|v| v.trim().to_uppercase()),
        );
    }

    // 级联: DINAS → KATEGORI → BAND
    let by_dinas: Vec<&ViolationRecord> = table
        .iter()
        .filter(|r| matches_text(r, Column::Dinas, &selection.dinas))
        .collect();
    let by_kategori: Vec<&ViolationRecord> = by_dinas
        .iter()
        .copied()
        .filter(|r| matches_text(r, Column::Kategori, &selection.kategori))
        .collect();

    // ZONA: 数值排序后渲染
    let mut zona_values: Vec<f64> = table.iter().filter_map(|r| r.zona).collect();
    zona_values.sort_by(|a, b| a.total_cmp(b));
    zona_values.dedup();

    FilterOptions {
        jenis_izin: with_any(jenis_izin),
        dinas: with_any(distinct_text(table.iter(), Column::Dinas)),
        kategori: with_any(distinct_text(by_dinas.iter().copied(), Column::Kategori)),
        band: with_any(distinct_text(by_kategori.iter().copied(), Column::Band)),
        zona: with_any(
            zona_values
                .into_iter()
                .map(|z| CellValue::Number(z).display_text()),
        ),
        jml_bulan: with_any(percentages.buckets()),
    }
}

fn matches_text(record: &ViolationRecord, column: Column, selected: &str) -> bool {
    is_unconstrained(selected) || record.text(column) == Some(selected)
}

fn distinct_text<'a>(
    records: impl Iterator<Item = &'a ViolationRecord>,
    column: Column,
) -> BTreeSet<String> {
    records
        .filter_map(|r| r.text(column))
        .map(String::from)
        .collect()
}

fn with_any(values: impl IntoIterator<Item = String>) -> Vec<String> {
    std::iter::once(ANY_VALUE.to_string())
        .chain(values)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dinas: &str, kategori: &str, band: &str, zona: f64, izin: &str) -> ViolationRecord {
        ViolationRecord {
            dinas: Some(dinas.to_string()),
            kategori: Some(kategori.to_string()),
            band: Some(band.to_string()),
            zona: Some(zona),
            jenis_izin: Some(izin.to_string()),
            ..Default::default()
        }
    }

    fn table() -> ViolationTable {
        ViolationTable::new(
            ["DINAS", "KATEGORI", "BAND", "ZONA", "JENIS IZIN"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![
                record("Maritim", "Kapal", "VHF", 10.0, "ISR"),
                record("Maritim", "Pantai", "HF", 2.0, "ISR"),
                record("Penerbangan", "Pesawat", "VHF", 2.0, "SKAR"),
            ],
        )
    }

    #[test]
    fn test_unrestricted_options() {
        let options = build_filter_options(
            &table(),
            &PercentageTable::default(),
            &FilterSelection::default(),
        );
        assert_eq!(options.jenis_izin, vec!["Semua", "APT", "IPFR", "ISR", "SKAR"]);
        assert_eq!(options.dinas, vec!["Semua", "Maritim", "Penerbangan"]);
        assert_eq!(options.kategori, vec!["Semua", "Kapal", "Pantai", "Pesawat"]);
        assert_eq!(options.zona, vec!["Semua", "2", "10"]);
        assert_eq!(options.jml_bulan, vec!["Semua", "0-12", "13-24", ">25"]);
    }

    #[test]
    fn test_cascading_options() {
        let selection = FilterSelection {
            dinas: "Maritim".to_string(),
            kategori: "Kapal".to_string(),
            ..Default::default()
        };
        let options = build_filter_options(&table(), &PercentageTable::default(), &selection);
        assert_eq!(options.kategori, vec!["Semua", "Kapal", "Pantai"]);
        assert_eq!(options.band, vec!["Semua", "VHF"]);
        // DINAS 与 ZONA 不受级联限制
        assert_eq!(options.dinas.len(), 3);
        assert_eq!(options.zona.len(), 3);
    }

    #[test]
    fn test_permit_type_column_missing() {
        let table = ViolationTable::new(vec!["DINAS".into()], vec![]);
        let options =
            build_filter_options(&table, &PercentageTable::default(), &FilterSelection::default());
        assert_eq!(options.jenis_izin, vec!["Semua", "APT", "IPFR", "ISR"]);
        assert_eq!(options.dinas, vec!["Semua"]);
    }

    #[test]
    fn test_to_filters() {
        let selection = FilterSelection {
            jenis_izin: " isr".to_string(),
            zona: "2".to_string(),
            ..Default::default()
        };
        let filters = selection.to_filters(&table());
        assert_eq!(filters.len(), 5);
        assert_eq!(filters[4], ("JENIS IZIN".to_string(), "ISR".to_string()));

        let no_izin_column = ViolationTable::new(vec!["DINAS".into()], vec![]);
        assert_eq!(selection.to_filters(&no_izin_column).len(), 4);
    }
}
