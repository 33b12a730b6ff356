// ==========================================
// 船舶性能报告校验系统 - 领域模型层
// ==========================================
// 职责: 定义列名、报告行、派生指标、校验结果
// 红线: 不含文件 I/O，不含规则逻辑
// ==========================================

pub mod columns;
pub mod report;
pub mod types;

// 重导出核心类型
pub use report::{
    AnnotatedRow, DerivedMetrics, ExhaustReading, OutputTable, RawTable, ReportRecord,
    ValidationOutcome,
};
pub use types::{Cell, ReportType};
