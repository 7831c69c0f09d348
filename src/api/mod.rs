// ==========================================
// denda-sim - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 CLI 及其他展示层调用
// ==========================================

pub mod denda_api;
pub mod dto;
pub mod error;
pub mod notice;

// 重导出核心类型
pub use denda_api::DendaApi;
pub use dto::{
    CalculationOutcome, CalculationRequest, ExportOutcome, FileListing, LoadOutcome,
    OptionsOutcome,
};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use notice::{Notice, NoticeLevel};
