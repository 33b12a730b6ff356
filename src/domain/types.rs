// ==========================================
// 船舶性能报告校验系统 - 领域类型定义
// ==========================================
// 职责: 报告类型枚举 / 单元格解析结果
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 报告类型 (Report Type)
// ==========================================
// 规则只区分三种工况；其余取值原样保留，不触发海上规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportType {
    AtSea,       // 航行
    AtPort,      // 靠港
    AtAnchorage, // 锚泊
    Other(String),
}

impl ReportType {
    /// 从单元格文本解析（仅去首尾空白，其余须与标准写法完全一致）
    pub fn from_cell(value: &str) -> Self {
        match value.trim() {
            "At Sea" => ReportType::AtSea,
            "At Port" => ReportType::AtPort,
            "At Anchorage" => ReportType::AtAnchorage,
            other => ReportType::Other(other.to_string()),
        }
    }

    pub fn is_at_sea(&self) -> bool {
        matches!(self, ReportType::AtSea)
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::AtSea => write!(f, "At Sea"),
            ReportType::AtPort => write!(f, "At Port"),
            ReportType::AtAnchorage => write!(f, "At Anchorage"),
            ReportType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

// ==========================================
// 单元格解析结果 (Cell)
// ==========================================
// Parsed: 解析成功
// Defaulted: 缺失/占位符/无法解析 → 由调用方使用中性默认值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<T> {
    Parsed(T),
    Defaulted,
}

impl<T> Cell<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Cell::Parsed(_))
    }

    pub fn parsed(self) -> Option<T> {
        match self {
            Cell::Parsed(v) => Some(v),
            Cell::Defaulted => None,
        }
    }
}

impl<T: Default> Cell<T> {
    /// 取值；Defaulted 时返回 T::default()（数值即 0）
    pub fn value_or_default(self) -> T {
        self.parsed().unwrap_or_default()
    }
}
