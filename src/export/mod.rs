// ==========================================
// 船舶性能报告校验系统 - 导出层
// ==========================================
// 职责: 校验结果 → CSV / XLSX 文件 / 告警邮件
// ==========================================

pub mod alert;
pub mod error;
pub mod report_writer;

pub use alert::{
    AlertAttachment, AlertComposer, AlertDispatcher, AlertMessage, LogDispatcher,
    OutboxDispatcher,
};
pub use error::{ExportError, ExportResult};
pub use report_writer::{
    encode_table, to_csv_bytes, to_xlsx_bytes, write_run, WrittenReports, FAILED_SHEET_NAME,
};
