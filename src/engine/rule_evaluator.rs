// ==========================================
// 船舶性能报告校验系统 - 规则判定引擎
// ==========================================
// 红线: 规则顺序固定，消息文本由阈值渲染；任何一行都不会中断批次
// ==========================================
// 职责: 对单行执行 5 条合理性规则，生成原因列表与辅机异常标志
// 输入: ReportRecord + DerivedMetrics
// 输出: ValidationOutcome (messages, ae_anomaly)
// ==========================================

use crate::config::RuleThresholds;
use crate::domain::report::{DerivedMetrics, ReportRecord, ValidationOutcome};
use tracing::debug;

// ==========================================
// RuleEvaluator - 规则判定引擎
// ==========================================
pub struct RuleEvaluator {
    thresholds: RuleThresholds,
}

impl RuleEvaluator {
    /// 创建规则判定引擎
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RuleThresholds {
        &self.thresholds
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单行判定
    ///
    /// # 规则（按顺序，消息按此顺序以 "; " 连接）
    /// 1. 海上且主机运行小时 > 下限: SFOC 不在 [min, max]
    /// 2. 海上且主机运行小时 > 下限: 平均航速不在 [min, max]
    /// 3. 海上且主机运行小时 > 下限: 单缸排温偏离行均值超限（每缸一条）
    /// 4. 报告时长 > 0: 主机运行小时超出报告时长且超过容差
    /// 5. 海上且报告时长 > 0: 辅机小时比值 / 负荷 / 零辅助消耗同时成立
    ///
    /// # 返回
    /// - messages 为空 = 通过
    /// - ae_anomaly 仅由规则 5 置位
    pub fn evaluate(&self, record: &ReportRecord, derived: &DerivedMetrics) -> ValidationOutcome {
        let mut messages = Vec::new();

        if self.sea_rules_apply(record) {
            messages.extend(self.check_sfoc(derived.sfoc));
            messages.extend(self.check_speed(record.avg_speed));
            messages.extend(self.check_exhaust_deviation(record));
        }

        messages.extend(self.check_me_rhrs_vs_report_hours(record.me_rhrs, derived.report_hours));

        let ae_anomaly = self.is_ae_anomaly(record, derived);
        if ae_anomaly {
            messages.push(self.ae_anomaly_message());
        }

        if !messages.is_empty() {
            debug!(
                row = record.row_number,
                imo = %record.imo_no,
                count = messages.len(),
                ae_anomaly,
                "规则触发"
            );
        }

        ValidationOutcome {
            messages,
            ae_anomaly,
        }
    }

    // ==========================================
    // 规则 1-3: 海上工况
    // ==========================================

    /// 规则 1-3 的前置条件
    fn sea_rules_apply(&self, record: &ReportRecord) -> bool {
        record.report_type.is_at_sea() && record.me_rhrs > self.thresholds.me_rhrs_min_at_sea
    }

    /// 规则 1: SFOC 区间
    fn check_sfoc(&self, sfoc: f64) -> Option<String> {
        let t = &self.thresholds;
        if sfoc < t.sfoc_min || sfoc > t.sfoc_max {
            Some(format!(
                "SFOC out of {}–{} at sea with ME Rhrs > {}",
                t.sfoc_min, t.sfoc_max, t.me_rhrs_min_at_sea
            ))
        } else {
            None
        }
    }

    /// 规则 2: 航速区间
    fn check_speed(&self, avg_speed: f64) -> Option<String> {
        let t = &self.thresholds;
        if avg_speed < t.speed_min || avg_speed > t.speed_max {
            Some(format!(
                "Avg. Speed out of {}–{} at sea with ME Rhrs > {}",
                t.speed_min, t.speed_max, t.me_rhrs_min_at_sea
            ))
        } else {
            None
        }
    }

    /// 规则 3: 单缸排温偏差
    ///
    /// 均值只取非零读数（0 视为未安装/未运行），读数为 0 的缸不参与判定。
    /// 消息中的 Unit 编号是该列在已上传排温列中的位次（从 1 开始），
    /// 读数为 0 的列同样占位
    fn check_exhaust_deviation(&self, record: &ReportRecord) -> Vec<String> {
        let running: Vec<(usize, f64)> = record
            .exhaust_temps
            .iter()
            .enumerate()
            .filter(|(_, r)| r.celsius != 0.0)
            .map(|(idx, r)| (idx + 1, r.celsius))
            .collect();
        if running.is_empty() {
            return Vec::new();
        }

        let mean = running.iter().map(|(_, t)| t).sum::<f64>() / running.len() as f64;
        let max_dev = self.thresholds.exhaust_deviation_max;

        running
            .iter()
            .filter(|(_, t)| (t - mean).abs() > max_dev)
            .map(|(position, _)| {
                format!(
                    "Exhaust temp deviation > ±{} from avg at Unit {}",
                    max_dev, position
                )
            })
            .collect()
    }

    // ==========================================
    // 规则 4: 运行小时一致性
    // ==========================================

    fn check_me_rhrs_vs_report_hours(&self, me_rhrs: f64, report_hours: f64) -> Option<String> {
        if report_hours <= 0.0 {
            return None;
        }
        let margin = self.thresholds.me_rhrs_margin_hours;
        let excess = me_rhrs - report_hours;
        if excess > margin {
            Some(format!(
                "ME Rhrs ({:.2}) exceeds Report Hours ({:.2}) by {:.2}h (margin: ±{}h)",
                me_rhrs, report_hours, excess, margin
            ))
        } else {
            None
        }
    }

    // ==========================================
    // 规则 5: 辅机异常
    // ==========================================

    /// 辅机异常判定（五个子条件同时成立）
    pub fn is_ae_anomaly(&self, record: &ReportRecord, derived: &DerivedMetrics) -> bool {
        let t = &self.thresholds;
        record.report_type.is_at_sea()
            && derived.report_hours > 0.0
            && derived.total_ae_rhrs / derived.report_hours > t.ae_hours_ratio_max
            && record.average_load_pct > t.ae_load_pct_min
            && derived.total_sub_consumption == 0.0
    }

    fn ae_anomaly_message(&self) -> String {
        format!(
            "AE Rhrs exceed {}× Report Hours at sea with load > {}% and zero sub-consumption \
             (check AE running hours or sub-consumption entries)",
            self.thresholds.ae_hours_ratio_max, self.thresholds.ae_load_pct_min
        )
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new(RuleThresholds::default())
    }
}
