// ==========================================
// denda-sim - 结果表构建
// ==========================================
// 职责:
// - 无匹配行时生成占位记录
// - 计算前补全所选记录（许可类型 / MAKS POIN / 指数）
// - 生成带计算结果的展示表（固定列顺序）
// - 公式说明文本与金额格式化
// ==========================================

use crate::domain::calculation::{CalculationResult, ResultTable};
use crate::domain::sheet::CellValue;
use crate::domain::types::{Column, PermitTypeTable};
use crate::domain::violation::{ViolationRecord, ViolationTable};
use crate::engine::denda_calculator::CalculationInput;
use crate::engine::row_filter::{is_unconstrained, FilterEntry};

// ===== 结果列 =====
pub const COL_JENIS_PELANGGARAN: &str = "JENIS PELANGGARAN";
pub const COL_INDEKS_DIGUNAKAN: &str = "INDEKS YANG DIGUNAKAN";
pub const COL_PERSENTASE: &str = "PERSENTASE";
pub const COL_TOTAL_TAGIHAN: &str = "TOTAL TAGIHAN DENDA";

/// 展示列顺序（只输出实际存在的列）
pub const DISPLAY_COLUMNS: [&str; 15] = [
    "JENIS IZIN",
    "DINAS",
    "KATEGORI",
    "BAND",
    "ZONA",
    COL_JENIS_PELANGGARAN,
    COL_INDEKS_DIGUNAKAN,
    COL_PERSENTASE,
    "MAKS POIN",
    "TOTAL POIN",
    "TARIF DENDA",
    "DENDA",
    "JUMLAH FREKUENSI",
    "JUMLAH PERANGKAT",
    COL_TOTAL_TAGIHAN,
];

// ===== 占位记录默认值 =====
pub const PLACEHOLDER_INDEKS_PERTAMA: f64 = 1.0;
pub const PLACEHOLDER_INDEKS_BERULANG: f64 = 1.5;
pub const PLACEHOLDER_PERSEN: f64 = 1.0;
pub const PLACEHOLDER_TARIF_DENDA: f64 = 0.0;

pub struct ResultBuilder;

impl ResultBuilder {
    /// 无匹配行时的占位表
    ///
    /// 包含所选许可类型及其默认 MAKS POIN、默认指数与百分比，TARIF DENDA 为 0，
    /// 以及其他已选择的过滤值
    pub fn placeholder_table(&self, jenis_izin: &str, filters: &[FilterEntry]) -> ViolationTable {
        let code = jenis_izin.trim().to_uppercase();
        let mut record = ViolationRecord {
            maks_poin: Some(PermitTypeTable::maks_poin(&code)),
            jenis_izin: Some(code),
            indeks_pertama: Some(PLACEHOLDER_INDEKS_PERTAMA),
            indeks_berulang: Some(PLACEHOLDER_INDEKS_BERULANG),
            persen: Some(PLACEHOLDER_PERSEN),
            tarif_denda: Some(PLACEHOLDER_TARIF_DENDA),
            ..Default::default()
        };
        let mut columns: Vec<String> = [
            Column::JenisIzin,
            Column::MaksPoin,
            Column::IndeksPertama,
            Column::IndeksBerulang,
            Column::Persen,
            Column::TarifDenda,
        ]
        .iter()
        .map(|c| c.header().to_string())
        .collect();

        for (column, value) in filters {
            if is_unconstrained(value) || column == Column::JenisIzin.header() {
                continue;
            }
            let cell = match Column::from_header(column) {
                Some(c) if c.is_numeric() => match value.trim().parse::<f64>() {
                    Ok(n) => CellValue::Number(n),
                    Err(_) => continue,
                },
                _ => CellValue::text(value.as_str()),
            };
            record.set_value(column, cell);
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }

        ViolationTable::new(columns, vec![record])
    }

    /// 计算前补全所选记录
    pub fn prepare_record(
        &self,
        table: &ViolationTable,
        record: &ViolationRecord,
        selected_jenis_izin: &str,
    ) -> ViolationRecord {
        let mut record = record.clone();

        if record.jenis_izin.is_none() && !is_unconstrained(selected_jenis_izin) {
            record.jenis_izin = Some(selected_jenis_izin.trim().to_uppercase());
        }

        let code = record.jenis_izin.clone().unwrap_or_default();
        if record.maks_poin.map_or(true, |v| v == 0.0) {
            record.maks_poin = Some(PermitTypeTable::maks_poin(&code));
        }

        // 指数列缺失时使用默认值（列存在但单元格为空时不补）
        if !table.has(Column::IndeksPertama) {
            record.indeks_pertama = Some(PLACEHOLDER_INDEKS_PERTAMA);
        }
        if !table.has(Column::IndeksBerulang) {
            record.indeks_berulang = Some(PLACEHOLDER_INDEKS_BERULANG);
        }

        record
    }

    /// 生成展示表
    ///
    /// 计算列对所有行写入相同的计算值；数量列为用户输入的原值（未做下限处理）
    pub fn build_table(
        &self,
        filtered: &ViolationTable,
        result: &CalculationResult,
        input: &CalculationInput,
        selected_jenis_izin: &str,
    ) -> ResultTable {
        let mut available: Vec<&str> = filtered.columns.iter().map(String::as_str).collect();
        available.extend([
            COL_JENIS_PELANGGARAN,
            COL_INDEKS_DIGUNAKAN,
            COL_PERSENTASE,
            Column::TotalPoin.header(),
            Column::Denda.header(),
            Column::JumlahFrekuensi.header(),
            Column::JumlahPerangkat.header(),
            COL_TOTAL_TAGIHAN,
        ]);

        let fill_jenis_izin =
            !filtered.has(Column::JenisIzin) && !is_unconstrained(selected_jenis_izin);
        if fill_jenis_izin {
            available.push(Column::JenisIzin.header());
        }

        // MAKS POIN 列缺失，或首行值为 0 → 整列使用计算所用的 MAKS POIN
        let fill_maks_poin = !filtered.has(Column::MaksPoin)
            || filtered.records.first().and_then(|r| r.maks_poin) == Some(0.0);
        if fill_maks_poin {
            available.push(Column::MaksPoin.header());
        }

        let columns: Vec<String> = DISPLAY_COLUMNS
            .iter()
            .filter(|c| available.contains(*c))
            .map(|c| c.to_string())
            .collect();

        let rows = filtered
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| match column.as_str() {
                        COL_JENIS_PELANGGARAN => {
                            CellValue::text(input.jenis_pelanggaran.label())
                        }
                        COL_INDEKS_DIGUNAKAN => CellValue::Number(result.indeks),
                        COL_PERSENTASE => CellValue::Number(result.persentase),
                        COL_TOTAL_TAGIHAN => CellValue::Number(result.total_tagihan_denda),
                        "TOTAL POIN" => CellValue::Number(result.total_poin),
                        "DENDA" => CellValue::Number(result.denda),
                        "JUMLAH FREKUENSI" => CellValue::Number(input.jumlah_frekuensi as f64),
                        "JUMLAH PERANGKAT" => CellValue::Number(input.jumlah_perangkat as f64),
                        "MAKS POIN" if fill_maks_poin => CellValue::Number(result.maks_poin),
                        "JENIS IZIN" if fill_jenis_izin => {
                            CellValue::text(selected_jenis_izin.trim().to_uppercase())
                        }
                        other => record.value(other),
                    })
                    .collect()
            })
            .collect();

        ResultTable::new(columns, rows)
    }

    /// 公式说明（三行）
    pub fn formula_lines(&self, result: &CalculationResult, input: &CalculationInput) -> Vec<String> {
        vec![
            format!(
                "TOTAL POIN = INDEKS PELANGGARAN ({}) * % ({:.0}%) * MAKS POIN ({}) = {:.2}",
                result.indeks,
                result.persentase * 100.0,
                result.maks_poin,
                result.total_poin
            ),
            format!(
                "DENDA = TOTAL POIN ({:.2}) * TARIF DENDA ({:.2}) = {:.2}",
                result.total_poin, result.tarif_denda, result.denda
            ),
            format!(
                "TOTAL TAGIHAN DENDA = DENDA ({:.2}) * JUMLAH FREKUENSI ({}) * JUMLAH PERANGKAT ({}) = {:.2}",
                result.denda, input.jumlah_frekuensi, input.jumlah_perangkat, result.total_tagihan_denda
            ),
        ]
    }

    /// 已生效的过滤条件摘要，如 "DINAS: Maritim, ZONA: 2"
    pub fn filter_summary(&self, filters: &[FilterEntry]) -> String {
        filters
            .iter()
            .filter(|(_, v)| !is_unconstrained(v))
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 金额格式: "Rp 3,600,000.00"
pub fn format_rupiah(value: f64) -> String {
    let text = format!("{:.2}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("Rp {}{}.{}", sign, grouped, frac_part)
}
