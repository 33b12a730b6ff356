// ==========================================
// 船舶性能报告校验系统 - 校验汇总
// ==========================================
// 职责: 通过率 / 辅机异常计数 / 原因频次统计
// 用途: CLI 输出与告警邮件正文
// ==========================================

use crate::domain::report::AnnotatedRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use uuid::Uuid;

/// 单条原因的出现次数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCount {
    pub message: String,
    pub count: usize,
}

// ==========================================
// ValidationSummary - 校验汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub run_id: Uuid,
    pub validated_at: DateTime<Utc>,
    pub total_rows: usize,
    pub failed_rows: usize,
    pub passed_rows: usize,
    pub pass_rate: f64, // 百分比，2 位小数；无数据行时为 100
    pub ae_anomalies: usize,
    pub reason_frequencies: Vec<ReasonCount>, // 次数降序，同次数按消息升序
}

impl ValidationSummary {
    /// 从已判定的行构建汇总
    pub fn from_rows(run_id: Uuid, validated_at: DateTime<Utc>, rows: &[AnnotatedRow]) -> Self {
        let total_rows = rows.len();
        let failed_rows = rows.iter().filter(|r| r.outcome.is_failed()).count();
        let passed_rows = total_rows - failed_rows;
        let ae_anomalies = rows.iter().filter(|r| r.outcome.ae_anomaly).count();

        let pass_rate = if total_rows == 0 {
            100.0
        } else {
            crate::engine::metric_deriver::round2(passed_rows as f64 * 100.0 / total_rows as f64)
        };

        Self {
            run_id,
            validated_at,
            total_rows,
            failed_rows,
            passed_rows,
            pass_rate,
            ae_anomalies,
            reason_frequencies: reason_frequencies(rows),
        }
    }

    /// 渲染为纯文本
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // 写入 String 不会失败
        let _ = writeln!(out, "Validation run {}", self.run_id);
        let _ = writeln!(
            out,
            "Validated at: {}",
            self.validated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(out, "Total rows: {}", self.total_rows);
        let _ = writeln!(out, "Failed rows: {}", self.failed_rows);
        let _ = writeln!(out, "Passed rows: {}", self.passed_rows);
        let _ = writeln!(out, "Pass rate: {:.2}%", self.pass_rate);
        let _ = writeln!(out, "AE anomalies: {}", self.ae_anomalies);

        if self.reason_frequencies.is_empty() {
            let _ = writeln!(out, "No validation issues found.");
        } else {
            let _ = writeln!(out, "Reasons:");
            for entry in &self.reason_frequencies {
                let _ = writeln!(out, "  {:>5}  {}", entry.count, entry.message);
            }
        }
        out
    }
}

/// 原因频次（按单条消息计数）
pub fn reason_frequencies<'a, I>(rows: I) -> Vec<ReasonCount>
where
    I: IntoIterator<Item = &'a AnnotatedRow>,
{
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    for row in rows {
        for message in &row.outcome.messages {
            *counts.entry(message.as_str()).or_insert(0) += 1;
        }
    }

    let mut frequencies: Vec<ReasonCount> = counts
        .into_iter()
        .map(|(message, count)| ReasonCount {
            message: message.to_string(),
            count,
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.message.cmp(&b.message)));
    frequencies
}
