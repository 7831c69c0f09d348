// ==========================================
// denda-sim - 罚金计算引擎
// ==========================================
// 公式:
//   TOTAL POIN = INDEKS × % × MAKS POIN
//   DENDA = TOTAL POIN × TARIF DENDA
//   TOTAL TAGIHAN DENDA = DENDA × JUMLAH FREKUENSI × JUMLAH PERANGKAT
// ==========================================
// 优先级:
// - MAKS POIN: 行内非零值 > 许可类型默认值 > 1
// - %: 行内正值（> 1 时除以 100）> 调用方传入的期间百分比
// - TOTAL POIN / DENDA: 行内正值直接采用，否则计算
//   (行内 0 或负数视同未计算)
// - 数量: ≤ 0 按 1 计
// ==========================================

use crate::domain::calculation::CalculationResult;
use crate::domain::types::{Column, JenisPelanggaran, PermitTypeTable};
use crate::domain::violation::ViolationRecord;
use crate::engine::error::{CalculationError, CalcResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// 用户输入的计算参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub jumlah_frekuensi: i64,
    pub jumlah_perangkat: i64,
    /// 期间百分比（小数），仅在行内没有 % 时使用
    pub persentase: f64,
    pub jenis_pelanggaran: JenisPelanggaran,
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            jumlah_frekuensi: 1,
            jumlah_perangkat: 1,
            persentase: 1.0,
            jenis_pelanggaran: JenisPelanggaran::FirstOffense,
        }
    }
}

/// 数量下限: ≤ 0 → 1
pub fn clamp_quantity(quantity: i64) -> f64 {
    if quantity <= 0 {
        1.0
    } else {
        quantity as f64
    }
}

// ==========================================
// DendaCalculator - 罚金计算器
// ==========================================
pub struct DendaCalculator;

impl DendaCalculator {
    /// 计算（失败时返回全零结果与错误）
    pub fn calculate(
        &self,
        record: &ViolationRecord,
        input: &CalculationInput,
    ) -> (CalculationResult, Option<CalculationError>) {
        match self.try_calculate(record, input) {
            Ok(result) => (result, None),
            Err(e) => {
                warn!(error = %e, "罚金计算失败，返回全零结果");
                (CalculationResult::zeroed(), Some(e))
            }
        }
    }

    #[instrument(skip(self, record), fields(jenis_izin = ?record.jenis_izin))]
    pub fn try_calculate(
        &self,
        record: &ViolationRecord,
        input: &CalculationInput,
    ) -> CalcResult<CalculationResult> {
        // === 步骤 1-2: MAKS POIN ===
        let code = record
            .jenis_izin
            .as_deref()
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_default();
        let default_maks_poin = PermitTypeTable::maks_poin(&code);
        let mut maks_poin = match record.maks_poin {
            Some(v) if v != 0.0 => v,
            _ => default_maks_poin,
        };
        if maks_poin == 0.0 {
            maks_poin = 1.0;
        }

        // === 步骤 3: INDEKS ===
        let indeks = record.number_or(input.jenis_pelanggaran.indeks_column(), 0.0);

        // === 步骤 4: % ===
        let persentase = match record.persen {
            Some(p) => {
                let p = if p > 1.0 { p / 100.0 } else { p };
                if p > 0.0 {
                    p
                } else {
                    input.persentase
                }
            }
            None => input.persentase,
        };

        // === 步骤 5: TARIF DENDA ===
        let tarif_denda = record.number_or(Column::TarifDenda, 0.0);

        // === 步骤 6: TOTAL POIN（行内正值优先）===
        let total_poin = match record.total_poin {
            Some(v) if v > 0.0 => v,
            _ => indeks * persentase * maks_poin,
        };

        // === 步骤 7: DENDA（行内正值优先）===
        let denda = match record.denda {
            Some(v) if v > 0.0 => v,
            _ => total_poin * tarif_denda,
        };

        // === 步骤 8-9: 数量下限 + 总额 ===
        let total_tagihan_denda = denda
            * clamp_quantity(input.jumlah_frekuensi)
            * clamp_quantity(input.jumlah_perangkat);

        let result = CalculationResult {
            indeks,
            persentase,
            maks_poin,
            total_poin,
            tarif_denda,
            denda,
            total_tagihan_denda,
        };
        ensure_finite(&result)?;

        debug!(
            maks_poin,
            indeks,
            persentase,
            total_poin,
            denda,
            total_tagihan_denda,
            "罚金计算完成"
        );
        Ok(result)
    }
}

fn ensure_finite(result: &CalculationResult) -> CalcResult<()> {
    let fields = [
        ("indeks", result.indeks),
        ("persentase", result.persentase),
        ("maks_poin", result.maks_poin),
        ("total_poin", result.total_poin),
        ("tarif_denda", result.tarif_denda),
        ("denda", result.denda),
        ("total_tagihan_denda", result.total_tagihan_denda),
    ];
    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(field, value)) => Err(CalculationError::NonFiniteValue {
            field,
            value,
        }),
        None => Ok(()),
    }
}
