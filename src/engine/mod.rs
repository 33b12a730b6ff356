// ==========================================
// 船舶性能报告校验系统 - 引擎层
// ==========================================
// 职责: 派生指标计算 + 合理性规则判定 + 汇总
// 红线: 引擎不做文件 I/O，所有失败行必须输出 reason
// ==========================================

pub mod metric_deriver;
pub mod rule_evaluator;
pub mod summary;
pub mod validation;

// 重导出核心引擎
pub use metric_deriver::{MetricDerivationService, MetricDeriver};
pub use rule_evaluator::RuleEvaluator;
pub use summary::{ReasonCount, ValidationSummary};
pub use validation::{validate_dataset, ValidationRun};
