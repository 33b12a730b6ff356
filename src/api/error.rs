// ==========================================
// 船舶性能报告校验系统 - API层错误类型
// ==========================================
// 职责: 将导入/配置/导出层错误转换为面向用户的错误消息
// 红线: 上传格式错误必须给出可操作的提示（缺哪个工作表/哪一列）
// ==========================================

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 上传格式错误
    // ==========================================
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    // ==========================================
    // 读取 / 配置 / 输出错误
    // ==========================================
    #[error("文件读取失败: {0}")]
    ImportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("结果输出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// 目的: 上传格式错误与技术错误分开呈现
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::SheetNotFound { sheet, available } => ApiError::InvalidUpload(format!(
                "expected sheet '{}' not found (available sheets: {})",
                sheet, available
            )),
            ImportError::MissingColumn(columns) => {
                ApiError::InvalidUpload(format!("expected column missing: {}", columns))
            }
            ImportError::EmptyWorksheet(sheet) => {
                ApiError::InvalidUpload(format!("worksheet '{}' has no header row", sheet))
            }
            ImportError::UnsupportedFormat(ext) => ApiError::InvalidUpload(format!(
                "unsupported file format '{}' (expected .xlsx, .xls or .csv)",
                ext
            )),
            ImportError::FileNotFound(path) => ApiError::FileNotFound(path),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_errors_are_actionable() {
        let err: ApiError = ImportError::MissingColumn("Report Type".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Invalid upload: expected column missing: Report Type"
        );

        let err: ApiError = ImportError::SheetNotFound {
            sheet: "All Reports".to_string(),
            available: "Sheet1".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::InvalidUpload(_)));
        assert!(err.to_string().contains("'All Reports' not found"));
    }

    #[test]
    fn test_technical_errors_keep_detail() {
        let err: ApiError = ImportError::CsvParseError("bad quote".to_string()).into();
        assert!(matches!(err, ApiError::ImportError(ref m) if m.contains("bad quote")));
    }
}
