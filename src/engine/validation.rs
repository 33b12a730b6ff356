// ==========================================
// 船舶性能报告校验系统 - 校验编排
// ==========================================
// 职责: 派生指标 → 规则判定 → 汇总，产出 ValidationRun
// 输入: NormalizedTable + ValidationConfig
// 输出: ValidationRun（全量标注表 + 失败子表 + 汇总）
// 红线: 纯函数；缓存由 api 层负责，不在此处
// ==========================================

use crate::config::ValidationConfig;
use crate::domain::columns;
use crate::domain::report::{AnnotatedRow, OutputTable};
use crate::engine::metric_deriver::{MetricDerivationService, MetricDeriver};
use crate::engine::rule_evaluator::RuleEvaluator;
use crate::engine::summary::ValidationSummary;
use crate::importer::NormalizedTable;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// ValidationRun - 一次校验的完整结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRun {
    pub run_id: Uuid,
    pub validated_at: DateTime<Utc>,
    /// 上传文件中的列（已剔除派生/结果列），保持原始顺序
    pub headers: Vec<String>,
    pub present_exhaust_units: Vec<u8>,
    pub rows: Vec<AnnotatedRow>,
    pub summary: ValidationSummary,
}

impl ValidationRun {
    pub fn failed_rows(&self) -> impl Iterator<Item = &AnnotatedRow> {
        self.rows.iter().filter(|r| r.outcome.is_failed())
    }

    /// 全量标注表: 原始列（原顺序）+ 派生/结果列，行顺序不变
    pub fn annotated_table(&self) -> OutputTable {
        let mut headers = self.headers.clone();
        headers.extend(columns::OUTPUT_ONLY_COLUMNS.iter().map(|c| c.to_string()));

        let rows = self
            .rows
            .iter()
            .map(|row| headers.iter().map(|h| cell_value(row, h)).collect())
            .collect();

        OutputTable { headers, rows }
    }

    /// 失败子表（全部船舶）
    pub fn failed_table(&self) -> OutputTable {
        self.failed_table_where(|_| true)
    }

    /// 某船的失败子表（告警附件）
    pub fn failed_table_for(&self, imo_no: &str) -> OutputTable {
        self.failed_table_where(|row| row.record.imo_no == imo_no)
    }

    /// 有失败行的 IMO 号（按首次出现顺序，去重）
    pub fn failed_imos(&self) -> Vec<String> {
        let mut imos: Vec<String> = Vec::new();
        for row in self.failed_rows() {
            if !imos.contains(&row.record.imo_no) {
                imos.push(row.record.imo_no.clone());
            }
        }
        imos
    }

    /// 失败子表的列白名单
    ///
    /// # 规则
    /// 1. 上下文列（IMO_No 在首位），仅保留上传文件中存在的
    /// 2. 上传文件中存在的排温列（按缸号）
    /// 3. 派生/结果列（总是包含）
    pub fn failed_table_headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = columns::CONTEXT_COLUMNS
            .iter()
            .filter(|c| self.headers.iter().any(|h| h == *c))
            .map(|c| c.to_string())
            .collect();
        headers.extend(
            self.present_exhaust_units
                .iter()
                .map(|unit| columns::exhaust_temp(*unit)),
        );
        headers.extend(columns::OUTPUT_ONLY_COLUMNS.iter().map(|c| c.to_string()));
        headers
    }

    fn failed_table_where<F>(&self, predicate: F) -> OutputTable
    where
        F: Fn(&AnnotatedRow) -> bool,
    {
        let headers = self.failed_table_headers();
        let rows = self
            .failed_rows()
            .filter(|row| predicate(row))
            .map(|row| headers.iter().map(|h| cell_value(row, h)).collect())
            .collect();

        OutputTable { headers, rows }
    }
}

/// 输出单元格: 派生/结果列取计算值，其余取原始单元格
fn cell_value(row: &AnnotatedRow, column: &str) -> String {
    match column {
        columns::REPORT_HOURS => format!("{:.2}", row.derived.report_hours),
        columns::SFOC => format!("{:.2}", row.derived.sfoc),
        columns::TOTAL_AE_RHRS => format!("{:.2}", row.derived.total_ae_rhrs),
        columns::TOTAL_SUB_CONSUMPTION => format!("{:.2}", row.derived.total_sub_consumption),
        columns::REASON => row.outcome.reason(),
        columns::AE_ANOMALY => {
            if row.outcome.ae_anomaly {
                "True".to_string()
            } else {
                "False".to_string()
            }
        }
        other => row.raw.get(other).cloned().unwrap_or_default(),
    }
}

// ==========================================
// validate_dataset - 校验入口
// ==========================================

/// 对标准化后的数据集执行完整校验
///
/// # 参数
/// - table: 结构标准化后的数据集
/// - config: 规则阈值来源
///
/// # 返回
/// - ValidationRun: 行顺序与输入一致；单行异常不会中断批次
#[instrument(skip_all, fields(rows = table.len()))]
pub fn validate_dataset(table: NormalizedTable, config: &ValidationConfig) -> ValidationRun {
    let run_id = Uuid::new_v4();
    let validated_at = Utc::now();

    let deriver = MetricDerivationService;
    let evaluator = RuleEvaluator::new(config.rules.clone());

    let rows: Vec<AnnotatedRow> = table
        .rows
        .into_iter()
        .map(|normalized| {
            let derived = deriver.derive(&normalized.record);
            let outcome = evaluator.evaluate(&normalized.record, &derived);
            AnnotatedRow {
                raw: normalized.raw,
                record: normalized.record,
                derived,
                outcome,
            }
        })
        .collect();

    let summary = ValidationSummary::from_rows(run_id, validated_at, &rows);

    info!(
        run_id = %run_id,
        total = summary.total_rows,
        failed = summary.failed_rows,
        ae_anomalies = summary.ae_anomalies,
        pass_rate = summary.pass_rate,
        "校验完成"
    );

    ValidationRun {
        run_id,
        validated_at,
        headers: table.headers,
        present_exhaust_units: table.present_exhaust_units,
        rows,
        summary,
    }
}
