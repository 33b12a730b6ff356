// ==========================================
// 船舶性能报告校验系统 - 校验API
// ==========================================
// 职责: 解析 → 标准化 → 校验 → 输出/告警 的对外入口
// 缓存: 以 (文件内容 SHA-256, 工作表名, 格式) 为键，同一上传只校验一次
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ValidationConfig;
use crate::engine::{validate_dataset, ValidationRun};
use crate::export::{write_run, AlertComposer, AlertDispatcher, WrittenReports};
use crate::importer::file_parser::extension_of;
use crate::importer::{SchemaNormalizer, UniversalFileParser};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// 告警发送结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertDispatchReport {
    /// 已发送的 IMO 号
    pub sent: Vec<String>,
    /// 发送失败的 (IMO 号, 原因)
    pub failed: Vec<(String, String)>,
}

/// 校验API
pub struct ValidationApi {
    config: ValidationConfig,
    cache: HashMap<String, Arc<ValidationRun>>,
}

impl ValidationApi {
    /// 创建新的ValidationApi实例
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// 校验本地文件
    ///
    /// # 参数
    /// - path: .xlsx / .xls / .csv 文件路径
    ///
    /// # 返回
    /// - Ok(Arc<ValidationRun>): 校验结果（相同内容直接返回缓存）
    /// - Err(ApiError): 文件不存在 / 上传格式错误 / 读取失败
    pub fn validate_file(&mut self, path: &Path) -> ApiResult<Arc<ValidationRun>> {
        if !path.exists() {
            return Err(ApiError::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path).map_err(|e| {
            ApiError::ImportError(format!("{}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        self.validate_bytes(&file_name, &bytes)
    }

    /// 校验上传缓冲区
    ///
    /// # 参数
    /// - file_name: 仅用于判断格式
    /// - bytes: 文件内容
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub fn validate_bytes(&mut self, file_name: &str, bytes: &[u8]) -> ApiResult<Arc<ValidationRun>> {
        let key = cache_key(bytes, &self.config.sheet_name, &extension_of(Path::new(file_name)));

        if let Some(run) = self.cache.get(&key) {
            debug!(run_id = %run.run_id, "命中校验缓存");
            return Ok(Arc::clone(run));
        }

        let raw = UniversalFileParser::new(self.config.sheet_name.clone())
            .parse_bytes(file_name, bytes)?;
        let normalized = SchemaNormalizer::new(self.config.required_columns.clone()).normalize(raw)?;
        let run = Arc::new(validate_dataset(normalized, &self.config));

        info!(
            run_id = %run.run_id,
            rows = run.summary.total_rows,
            failed = run.summary.failed_rows,
            "上传校验完成"
        );
        self.cache.insert(key, Arc::clone(&run));
        Ok(run)
    }

    /// 写出全量标注表与失败子表（格式取自配置 output_format）
    pub fn export(&self, run: &ValidationRun, out_dir: &Path) -> ApiResult<WrittenReports> {
        Ok(write_run(
            run,
            out_dir,
            self.config.output_format,
            &self.config.sheet_name,
        )?)
    }

    /// 组装并发送告警（单船发送失败不影响其他船）
    #[instrument(skip_all, fields(run_id = %run.run_id))]
    pub fn send_alerts(
        &self,
        run: &ValidationRun,
        dispatcher: &dyn AlertDispatcher,
    ) -> ApiResult<AlertDispatchReport> {
        let alerts = AlertComposer::new(&self.config).compose(run)?;

        let mut report = AlertDispatchReport::default();
        for alert in &alerts {
            match dispatcher.dispatch(alert) {
                Ok(()) => report.sent.push(alert.imo_no.clone()),
                Err(e) => {
                    error!(imo = %alert.imo_no, error = %e, "告警发送失败");
                    report.failed.push((alert.imo_no.clone(), e.to_string()));
                }
            }
        }

        info!(
            sent = report.sent.len(),
            failed = report.failed.len(),
            "告警发送完成"
        );
        Ok(report)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// 缓存键: 内容哈希 + 工作表名 + 格式
fn cache_key(bytes: &[u8], sheet_name: &str, extension: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}:{}:{}", hasher.finalize(), sheet_name, extension)
}
