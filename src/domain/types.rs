// ==========================================
// denda-sim - 领域类型定义
// ==========================================
// 列名、违规类型、许可类型上限表
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 过滤器中的"全部"哨兵值（不限制该列）
pub const ANY_VALUE: &str = "Semua";

// ==========================================
// 标准列 (Column)
// ==========================================
// 序列化格式: 与表头文本一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "DINAS")]
    Dinas,
    #[serde(rename = "KATEGORI")]
    Kategori,
    #[serde(rename = "BAND")]
    Band,
    #[serde(rename = "JENIS IZIN")]
    JenisIzin,
    #[serde(rename = "ZONA")]
    Zona,
    #[serde(rename = "MAKS POIN")]
    MaksPoin,
    #[serde(rename = "INDEKS PELANGGARAN PERTAMA")]
    IndeksPertama,
    #[serde(rename = "INDEKS PELANGGARAN BERULANG")]
    IndeksBerulang,
    #[serde(rename = "%")]
    Persen,
    #[serde(rename = "TOTAL POIN")]
    TotalPoin,
    #[serde(rename = "TARIF DENDA")]
    TarifDenda,
    #[serde(rename = "DENDA")]
    Denda,
    #[serde(rename = "JUMLAH FREKUENSI")]
    JumlahFrekuensi,
    #[serde(rename = "JUMLAH PERANGKAT")]
    JumlahPerangkat,
}

impl Column {
    /// 表头定位用的哨兵列（必须全部出现在同一行）
    pub const HEADER_SENTINELS: [Column; 3] = [Column::Dinas, Column::Kategori, Column::Band];

    /// 文本列
    pub const CATEGORICAL: [Column; 4] = [
        Column::Dinas,
        Column::Kategori,
        Column::Band,
        Column::JenisIzin,
    ];

    /// 需要数值化的列（顺序与源表一致）
    pub const NUMERIC: [Column; 10] = [
        Column::Zona,
        Column::MaksPoin,
        Column::IndeksPertama,
        Column::IndeksBerulang,
        Column::Persen,
        Column::TotalPoin,
        Column::TarifDenda,
        Column::Denda,
        Column::JumlahFrekuensi,
        Column::JumlahPerangkat,
    ];

    /// 表头文本
    pub fn header(self) -> &'static str {
        match self {
            Column::Dinas => "DINAS",
            Column::Kategori => "KATEGORI",
            Column::Band => "BAND",
            Column::JenisIzin => "JENIS IZIN",
            Column::Zona => "ZONA",
            Column::MaksPoin => "MAKS POIN",
            Column::IndeksPertama => "INDEKS PELANGGARAN PERTAMA",
            Column::IndeksBerulang => "INDEKS PELANGGARAN BERULANG",
            Column::Persen => "%",
            Column::TotalPoin => "TOTAL POIN",
            Column::TarifDenda => "TARIF DENDA",
            Column::Denda => "DENDA",
            Column::JumlahFrekuensi => "JUMLAH FREKUENSI",
            Column::JumlahPerangkat => "JUMLAH PERANGKAT",
        }
    }

    /// 由表头文本反查（精确匹配）
    pub fn from_header(header: &str) -> Option<Column> {
        Column::CATEGORICAL
            .iter()
            .chain(Column::NUMERIC.iter())
            .copied()
            .find(|c| c.header() == header)
    }

    pub fn is_numeric(self) -> bool {
        Column::NUMERIC.contains(&self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ==========================================
// 违规类型 (Jenis Pelanggaran)
// ==========================================
// 决定使用哪一个违规指数列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JenisPelanggaran {
    #[default]
    FirstOffense,  // 首次违规
    RepeatOffense, // 重复违规
}

impl JenisPelanggaran {
    /// 对应的违规指数列
    pub fn indeks_column(self) -> Column {
        match self {
            JenisPelanggaran::FirstOffense => Column::IndeksPertama,
            JenisPelanggaran::RepeatOffense => Column::IndeksBerulang,
        }
    }

    /// 结果表中展示的文本
    pub fn label(self) -> &'static str {
        match self {
            JenisPelanggaran::FirstOffense => "Pelanggaran Pertama",
            JenisPelanggaran::RepeatOffense => "Pelanggaran Berulang",
        }
    }
}

impl fmt::Display for JenisPelanggaran {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// 许可类型上限表 (Permit Type Table)
// ==========================================
// IPFR=600000, ISR=7000, APT=5000, 其他=0
pub struct PermitTypeTable;

impl PermitTypeTable {
    pub const ENTRIES: [(&'static str, f64); 3] =
        [("IPFR", 600_000.0), ("ISR", 7_000.0), ("APT", 5_000.0)];

    /// 许可类型编码 → 默认 MAKS POIN（编码先 TRIM + UPPER）
    pub fn maks_poin(code: &str) -> f64 {
        let normalized = code.trim().to_uppercase();
        Self::ENTRIES
            .iter()
            .find(|(k, _)| *k == normalized)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    /// 已知许可类型编码
    pub fn codes() -> impl Iterator<Item = &'static str> {
        Self::ENTRIES.iter().map(|(k, _)| *k)
    }
}
