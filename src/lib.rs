// ==========================================
// 船舶性能报告校验系统 - 核心库
// ==========================================
// 系统定位: 主机性能报告合理性校验（规则引擎 + 薄 I/O 外壳）
// 流程: 导入 → 结构标准化 → 派生指标 → 规则判定 → 输出 / 告警
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 列名与报告模型
pub mod domain;

// 导入层 - 外部表格
pub mod importer;

// 引擎层 - 派生指标与规则
pub mod engine;

// 配置层 - 规则阈值与收件人
pub mod config;

// 导出层 - CSV 与告警
pub mod export;

// API 层 - 对外接口（含结果缓存）
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Cell, ReportType};

// 领域实体
pub use domain::{AnnotatedRow, DerivedMetrics, OutputTable, ReportRecord, ValidationOutcome};

// 引擎
pub use engine::{validate_dataset, RuleEvaluator, ValidationRun, ValidationSummary};

// API
pub use api::{ApiError, ValidationApi};

// 配置
pub use config::{ConfigLoader, ValidationConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "船舶性能报告校验系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
