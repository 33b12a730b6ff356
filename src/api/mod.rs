// ==========================================
// 船舶性能报告校验系统 - API 层
// ==========================================
// 职责: 提供校验 API 接口，供 CLI 调用
// ==========================================

pub mod error;
pub mod validation_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use validation_api::{AlertDispatchReport, ValidationApi};
