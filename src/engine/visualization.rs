// ==========================================
// denda-sim - 可视化数据序列
// ==========================================
// 只产出数据，渲染由展示层负责
// - 组成柱状图: 8 个计算分量（固定顺序）
// - 占比饼图: TOTAL POIN / TARIF DENDA / 数量，总和 ≤ 0 时全部为 0
// - 流向图 (Sankey): 9 个节点，数值按最大值归一化到 100
// ==========================================

use crate::domain::calculation::CalculationResult;
use serde::{Deserialize, Serialize};

/// 流向图节点
pub const FLOW_NODES: [&str; 9] = [
    "Indeks",
    "Persentase",
    "MAKS POIN",
    "TOTAL POIN",
    "TARIF DENDA",
    "DENDA",
    "Jumlah Frekuensi",
    "Jumlah Perangkat",
    "TOTAL TAGIHAN DENDA",
];

/// 流向图连线: 源节点 → 目标节点
pub const FLOW_SOURCES: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];
pub const FLOW_TARGETS: [usize; 8] = [3, 3, 3, 5, 5, 8, 8, 8];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    fn new(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLinks {
    pub nodes: Vec<String>,
    pub sources: Vec<usize>,
    pub targets: Vec<usize>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationSeries {
    pub components: Vec<SeriesPoint>,
    pub proportions: Vec<SeriesPoint>,
    pub flow: FlowLinks,
}

/// 由计算结果与用户输入数量（未做下限处理）生成可视化数据
pub fn build_visualization(
    result: &CalculationResult,
    jumlah_frekuensi: i64,
    jumlah_perangkat: i64,
) -> VisualizationSeries {
    let frek = jumlah_frekuensi as f64;
    let perangkat = jumlah_perangkat as f64;

    let components = vec![
        SeriesPoint::new("Indeks Pelanggaran", result.indeks),
        SeriesPoint::new("% Faktor", result.persentase),
        SeriesPoint::new("MAKS POIN", result.maks_poin),
        SeriesPoint::new("TOTAL POIN", result.total_poin),
        SeriesPoint::new("TARIF DENDA", result.tarif_denda),
        SeriesPoint::new("DENDA", result.denda),
        SeriesPoint::new("Jumlah Frekuensi", frek),
        SeriesPoint::new("Jumlah Perangkat", perangkat),
    ];

    // === 占比 ===
    let parts = [
        ("TOTAL POIN", result.total_poin),
        ("TARIF DENDA", result.tarif_denda),
        ("Jumlah Frekuensi", frek),
        ("Jumlah Perangkat", perangkat),
    ];
    let total: f64 = parts.iter().map(|(_, v)| v).sum();
    let proportions = parts
        .iter()
        .map(|(label, v)| SeriesPoint::new(label, if total > 0.0 { v / total } else { 0.0 }))
        .collect();

    // === 流向 ===
    let raw: Vec<f64> = components.iter().map(|p| p.value).collect();
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    let flow = FlowLinks {
        nodes: FLOW_NODES.iter().map(|s| s.to_string()).collect(),
        sources: FLOW_SOURCES.to_vec(),
        targets: FLOW_TARGETS.to_vec(),
        values: raw.iter().map(|v| v / max * 100.0).collect(),
    };

    VisualizationSeries {
        components,
        proportions,
        flow,
    }
}
