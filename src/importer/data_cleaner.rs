// ==========================================
// denda-sim - 数据清洗器实现
// ==========================================
// 职责: TRIM / UPPER / NULL 标准化 / 数值强制转换 / 百分比归一化
// ==========================================

use crate::domain::sheet::CellValue;

pub struct DataCleaner;

impl DataCleaner {
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 单元格 → 文本列值（空值 → None；数值按展示文本）
    pub fn cell_to_text(&self, cell: &CellValue, uppercase: bool) -> Option<String> {
        if cell.is_empty() {
            return None;
        }
        self.normalize_null(Some(self.clean_text(&cell.display_text(), uppercase)))
    }

    /// 数值强制转换
    ///
    /// - 数值单元格: 有限数原样返回
    /// - 文本单元格: TRIM 后按浮点数解析
    /// - 其他（空值、布尔、无法解析的文本、NaN/inf）: None
    pub fn coerce_numeric(&self, cell: &CellValue) -> Option<f64> {
        match cell {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// 整数百分比归一化（> 1 视为百分数，除以 100）
    pub fn normalize_fraction(&self, value: f64) -> f64 {
        if value > 1.0 {
            value / 100.0
        } else {
            value
        }
    }

    /// 解析百分比文本（允许一个小数点和一个小数逗号，其余必须全为数字）
    ///
    /// "50" → 50.0, "0,5" → 0.5, "12.5" → 12.5; " 50", "50%", "-5" → None
    pub fn parse_percentage_text(&self, value: &str) -> Option<f64> {
        let digits = value.replacen('.', "", 1).replacen(',', "", 1);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        value
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  hello  ", false), "hello");
        assert_eq!(cleaner.clean_text("  ipfr  ", true), "IPFR");
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ".to_string())), None);
        assert_eq!(cleaner.normalize_null(Some("".to_string())), None);
        assert_eq!(
            cleaner.normalize_null(Some("  value  ".to_string())),
            Some("value".to_string())
        );
        assert_eq!(cleaner.normalize_null(None), None);
    }

    #[test]
    fn test_cell_to_text() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.cell_to_text(&CellValue::text(" isr "), true),
            Some("ISR".to_string())
        );
        assert_eq!(
            cleaner.cell_to_text(&CellValue::Number(900.0), false),
            Some("900".to_string())
        );
        assert_eq!(cleaner.cell_to_text(&CellValue::Empty, true), None);
    }

    #[test]
    fn test_coerce_numeric() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.coerce_numeric(&CellValue::Number(2.0)), Some(2.0));
        assert_eq!(cleaner.coerce_numeric(&CellValue::text(" 2 ")), Some(2.0));
        assert_eq!(cleaner.coerce_numeric(&CellValue::text("1.5")), Some(1.5));
        assert_eq!(cleaner.coerce_numeric(&CellValue::text("abc")), None);
        assert_eq!(cleaner.coerce_numeric(&CellValue::text("NaN")), None);
        assert_eq!(cleaner.coerce_numeric(&CellValue::text("1,000")), None);
        assert_eq!(cleaner.coerce_numeric(&CellValue::Bool(true)), None);
        assert_eq!(cleaner.coerce_numeric(&CellValue::Empty), None);
    }

    #[test]
    fn test_parse_percentage_text() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_percentage_text("50"), Some(50.0));
        assert_eq!(cleaner.parse_percentage_text("0,5"), Some(0.5));
        assert_eq!(cleaner.parse_percentage_text("12.5"), Some(12.5));
        assert_eq!(cleaner.parse_percentage_text("50%"), None);
        assert_eq!(cleaner.parse_percentage_text(" 50"), None);
        assert_eq!(cleaner.parse_percentage_text("-5"), None);
        assert_eq!(cleaner.parse_percentage_text(""), None);
        // 通过字符检查但无法解析
        assert_eq!(cleaner.parse_percentage_text("1.5,0"), None);
    }

    #[test]
    fn test_normalize_fraction() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_fraction(50.0), 0.5);
        assert_eq!(cleaner.normalize_fraction(1.0), 1.0);
        assert_eq!(cleaner.normalize_fraction(0.25), 0.25);
    }
}
