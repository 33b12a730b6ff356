// ==========================================
// 船舶性能报告校验系统 - 配置层
// ==========================================
// 职责: 规则阈值与运行参数（JSON 文件 + 内置默认）
// ==========================================

pub mod validation_config;

// 重导出核心配置类型
pub use validation_config::{
    ConfigError, ConfigLoader, ConfigResult, OutputFormat, RuleThresholds, ValidationConfig,
    CONFIG_ENV_VAR,
};
