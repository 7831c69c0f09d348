// ==========================================
// denda-sim - 期间百分比表
// ==========================================
// JML BULAN 期间档 → 百分比系数（小数形式）
// 默认: 0-12 → 1.0, 13-24 → 0.5, >25 → 0.25
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 期间档标签（固定三档）
pub const PERIOD_BUCKETS: [&str; 3] = ["0-12", "13-24", ">25"];

/// 内置默认系数
pub const DEFAULT_PERCENTAGES: [(&str, f64); 3] = [("0-12", 1.0), ("13-24", 0.5), (">25", 0.25)];

/// 未选择期间档（或期间档未知）时使用的系数
pub const FALLBACK_PERCENTAGE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentageTable(BTreeMap<String, f64>);

impl Default for PercentageTable {
    fn default() -> Self {
        Self(
            DEFAULT_PERCENTAGES
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        )
    }
}

impl PercentageTable {
    pub fn get(&self, bucket: &str) -> Option<f64> {
        self.0.get(bucket).copied()
    }

    /// 期间档 → 系数，未知期间档返回 1.0
    pub fn percentage_for(&self, bucket: &str) -> f64 {
        self.get(bucket).unwrap_or(FALLBACK_PERCENTAGE)
    }

    pub fn set(&mut self, bucket: &str, value: f64) {
        self.0.insert(bucket.to_string(), value);
    }

    /// 期间档标签（字典序，与下拉框顺序一致）
    pub fn buckets(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fully_populated() {
        let table = PercentageTable::default();
        for bucket in PERIOD_BUCKETS {
            assert!(table.get(bucket).is_some());
        }
        assert_eq!(table.get("13-24"), Some(0.5));
        assert_eq!(table.buckets(), vec!["0-12", "13-24", ">25"]);
    }

    #[test]
    fn test_unknown_bucket_falls_back() {
        let table = PercentageTable::default();
        assert_eq!(table.percentage_for(">25"), 0.25);
        assert_eq!(table.percentage_for("99-100"), 1.0);
    }
}
