// ==========================================
// 船舶性能报告校验系统 - 导入层
// ==========================================
// 职责: 外部表格 → 类型化报告行
// 支持: Excel（按工作表名）, CSV
// 流程: 解析 → 必需列检查 → 补齐缺失列 → 单元格清洗与映射
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod report_importer_trait;
pub mod schema_normalizer;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use schema_normalizer::{NormalizedRow, NormalizedTable, SchemaNormalizer};

// 重导出 Trait 接口
pub use report_importer_trait::{DataCleaner, FileParser};
