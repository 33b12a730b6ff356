// ==========================================
// 船舶性能报告校验系统 - 校验配置
// ==========================================
// 职责: 规则阈值 / 工作表名 / 必需列 / 告警收件人
// 存储: JSON 文件（缺省时使用内置默认值）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_ENV_VAR: &str = "VESSEL_VALIDATOR_CONFIG";

/// 用户配置目录下的子目录名
const CONFIG_DIR_NAME: &str = "vessel-report-validator";
const CONFIG_FILE_NAME: &str = "config.json";

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// RuleThresholds - 规则阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    /// 海上规则（1-3）生效的主机运行小时下限（严格大于）
    pub me_rhrs_min_at_sea: f64,

    /// SFOC 合理区间 [min, max]（g/kWh）
    pub sfoc_min: f64,
    pub sfoc_max: f64,

    /// 平均航速合理区间 [min, max]（kn）
    pub speed_min: f64,
    pub speed_max: f64,

    /// 单缸排温偏离行均值的上限（°C）
    pub exhaust_deviation_max: f64,

    /// 主机运行小时超出报告时长的容差（h）
    pub me_rhrs_margin_hours: f64,

    /// 辅机运行小时 / 报告时长 比值上限
    pub ae_hours_ratio_max: f64,

    /// 辅机规则的主机负荷下限（%，严格大于）
    pub ae_load_pct_min: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            me_rhrs_min_at_sea: 12.0,
            sfoc_min: 150.0,
            sfoc_max: 200.0,
            speed_min: 0.0,
            speed_max: 20.0,
            exhaust_deviation_max: 50.0,
            me_rhrs_margin_hours: 1.0,
            ae_hours_ratio_max: 1.25,
            ae_load_pct_min: 40.0,
        }
    }
}

// ==========================================
// OutputFormat - 输出文件格式
// ==========================================
// 作用于标注表、失败子表与告警附件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Xlsx,
}

impl OutputFormat {
    /// 文件扩展名（不含点）
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "xlsx" => Ok(OutputFormat::Xlsx),
            other => Err(format!("unsupported output format: {} (expected csv or xlsx)", other)),
        }
    }
}

// ==========================================
// ValidationConfig - 校验配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Excel 工作表名
    pub sheet_name: String,

    /// 必需列（缺失即视为上传格式错误）
    pub required_columns: Vec<String>,

    /// 规则阈值
    pub rules: RuleThresholds,

    /// 按 IMO 号配置的告警收件人
    pub alert_recipients: HashMap<String, Vec<String>>,

    /// 未单独配置时的默认收件人
    pub default_recipients: Vec<String>,

    /// 输出文件格式
    pub output_format: OutputFormat,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            sheet_name: "All Reports".to_string(),
            required_columns: vec![crate::domain::columns::REPORT_TYPE.to_string()],
            rules: RuleThresholds::default(),
            alert_recipients: HashMap::new(),
            default_recipients: Vec::new(),
            output_format: OutputFormat::default(),
        }
    }
}

impl ValidationConfig {
    /// 从 JSON 文件加载（缺省字段使用默认值）
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: ValidationConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置值（区间不可倒置、比值必须为正）
    pub fn validate(&self) -> ConfigResult<()> {
        let r = &self.rules;
        if r.sfoc_min > r.sfoc_max {
            return Err(ConfigError::InvalidValue {
                key: "rules.sfoc_min".to_string(),
                message: format!("sfoc_min ({}) > sfoc_max ({})", r.sfoc_min, r.sfoc_max),
            });
        }
        if r.speed_min > r.speed_max {
            return Err(ConfigError::InvalidValue {
                key: "rules.speed_min".to_string(),
                message: format!("speed_min ({}) > speed_max ({})", r.speed_min, r.speed_max),
            });
        }
        if r.ae_hours_ratio_max <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "rules.ae_hours_ratio_max".to_string(),
                message: format!("必须为正数: {}", r.ae_hours_ratio_max),
            });
        }
        if r.exhaust_deviation_max < 0.0 || r.me_rhrs_margin_hours < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "rules".to_string(),
                message: "排温偏差/运行小时容差不可为负".to_string(),
            });
        }
        if self.sheet_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "sheet_name".to_string(),
                message: "工作表名不可为空".to_string(),
            });
        }
        Ok(())
    }

    /// 某船的告警收件人（未配置时回落到默认收件人）
    pub fn recipients_for(&self, imo_no: &str) -> Vec<String> {
        match self.alert_recipients.get(imo_no) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => self.default_recipients.clone(),
        }
    }
}

// ==========================================
// ConfigLoader - 配置路径解析
// ==========================================
// 优先级: 显式路径 > 环境变量 > 用户配置目录 > 内置默认
pub struct ConfigLoader;

impl ConfigLoader {
    /// 用户配置目录下的默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// 加载配置
    ///
    /// # 规则
    /// - 显式路径或环境变量指定的文件必须存在，否则报错
    /// - 用户配置目录下的文件不存在时静默使用默认值
    pub fn load(explicit: Option<&Path>) -> ConfigResult<ValidationConfig> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "加载配置文件（命令行指定）");
            return ValidationConfig::from_json_file(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                info!(path = %trimmed, "加载配置文件（环境变量指定）");
                return ValidationConfig::from_json_file(Path::new(trimmed));
            }
        }

        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                info!(path = %path.display(), "加载配置文件（用户配置目录）");
                return ValidationConfig::from_json_file(&path);
            }
        }

        debug!("未找到配置文件，使用内置默认配置");
        Ok(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.sheet_name, "All Reports");
        assert_eq!(config.required_columns, vec!["Report Type".to_string()]);
        assert_eq!(config.rules.sfoc_min, 150.0);
        assert_eq!(config.rules.ae_hours_ratio_max, 1.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("xlsx".parse::<OutputFormat>(), Ok(OutputFormat::Xlsx));
        assert_eq!(" CSV ".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert!("json".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Xlsx.extension(), "xlsx");

        let config: ValidationConfig = serde_json::from_str(r#"{"output_format": "xlsx"}"#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Xlsx);
        assert_eq!(ValidationConfig::default().output_format, OutputFormat::Csv);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"{{"sheet_name": "Noon Reports", "rules": {{"sfoc_max": 210.0}}}}"#
        )
        .unwrap();

        let config = ValidationConfig::from_json_file(temp_file.path()).unwrap();
        assert_eq!(config.sheet_name, "Noon Reports");
        assert_eq!(config.rules.sfoc_max, 210.0);
        // 未指定字段保持默认
        assert_eq!(config.rules.sfoc_min, 150.0);
        assert_eq!(config.rules.speed_max, 20.0);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = ValidationConfig::default();
        config.rules.sfoc_min = 250.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{{ not json").unwrap();
        let result = ValidationConfig::from_json_file(temp_file.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_recipients_fallback() {
        let mut config = ValidationConfig::default();
        config.default_recipients = vec!["fleet@example.com".to_string()];
        config
            .alert_recipients
            .insert("9123456".to_string(), vec!["master@example.com".to_string()]);

        assert_eq!(
            config.recipients_for("9123456"),
            vec!["master@example.com".to_string()]
        );
        assert_eq!(
            config.recipients_for("9000000"),
            vec!["fleet@example.com".to_string()]
        );
    }

    #[test]
    fn test_loader_explicit_missing_file() {
        let result = ConfigLoader::load(Some(Path::new("/nonexistent/config.json")));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
