// ==========================================
// 船舶性能报告校验系统 - 导出错误类型
// ==========================================

use thiserror::Error;

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("输出目录创建失败 ({path}): {message}")]
    DirectoryError { path: String, message: String },

    #[error("文件写入失败 ({path}): {message}")]
    WriteError { path: String, message: String },

    #[error("CSV 编码失败: {0}")]
    CsvError(String),

    #[error("XLSX 编码失败: {0}")]
    XlsxError(String),

    #[error("告警发送失败 (IMO: {imo}): {message}")]
    DispatchError { imo: String, message: String },
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::XlsxError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
