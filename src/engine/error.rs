// ==========================================
// denda-sim - 计算错误类型
// ==========================================
// 计算错误不中断流程: 调用方得到全零结果 + 诊断信息
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("计算值无效: {field} = {value}")]
    NonFiniteValue { field: &'static str, value: f64 },
}

pub type CalcResult<T> = Result<T, CalculationError>;
