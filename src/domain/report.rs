// ==========================================
// 船舶性能报告校验系统 - 报告领域模型
// ==========================================
// 职责: 原始表 / 类型化报告行 / 派生指标 / 校验结果 / 输出表
// 红线: 派生字段只由原始字段计算，绝不回写原始字段
// ==========================================

use crate::domain::types::{Cell, ReportType};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// RawTable - 文件解析产物
// ==========================================
// 用途: 文件解析 → 结构标准化之间的中间产物
// headers 保留原始列顺序（HashMap 不保序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// ExhaustReading - 单缸排温读数
// ==========================================
// 仅为输入表中存在的排温列生成
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExhaustReading {
    pub unit: u8,      // 缸号（取自列名，1..=16）
    pub celsius: f64,  // 排温（缺失/无法解析 → 0）
}

// ==========================================
// ReportRecord - 类型化报告行
// ==========================================
// 用途: 结构标准化后的行，规则只读此结构，不再按列名查找
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    pub row_number: usize, // 原始文件行号（表头为第 1 行）

    // ===== 身份 =====
    pub imo_no: String,
    pub report_type: ReportType,

    // ===== 时间窗口 =====
    pub start_date: Cell<NaiveDate>,
    pub start_time: Cell<NaiveTime>,
    pub end_date: Cell<NaiveDate>,
    pub end_time: Cell<NaiveTime>,
    pub time_shift_hours: f64,

    // ===== 主机工况 =====
    pub average_load_kw: f64,
    pub average_load_pct: f64,
    pub me_rhrs: f64,
    pub avg_speed: f64,

    // ===== 分项读数 =====
    pub exhaust_temps: Vec<ExhaustReading>,
    pub aux_engine_rhrs: Vec<f64>,
    pub me_fuel_mt: Vec<f64>,
    pub sub_consumption_mt: Vec<f64>,
}

// ==========================================
// DerivedMetrics - 派生指标
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub report_hours: f64,          // 报告时长（小时，2 位小数）
    pub sfoc: f64,                  // 燃油消耗率（g/kWh）
    pub total_ae_rhrs: f64,         // 辅机运行小时合计
    pub total_sub_consumption: f64, // 辅助消耗合计（MT）
}

// ==========================================
// ValidationOutcome - 单行校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub messages: Vec<String>, // 触发规则消息（按规则顺序）
    pub ae_anomaly: bool,      // 辅机异常标志（规则 5）
}

impl ValidationOutcome {
    /// 原因字符串（"; " 连接，空串 = 通过）
    pub fn reason(&self) -> String {
        self.messages.join("; ")
    }

    pub fn is_failed(&self) -> bool {
        !self.messages.is_empty()
    }
}

// ==========================================
// AnnotatedRow - 带派生字段与结果的行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRow {
    pub raw: HashMap<String, String>, // 原始单元格（只读）
    pub record: ReportRecord,
    pub derived: DerivedMetrics,
    pub outcome: ValidationOutcome,
}

// ==========================================
// OutputTable - 输出表（写出 CSV / 邮件附件）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// 读取某行某列（列不存在返回 None）
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx)).map(String::as_str)
    }
}
