// ==========================================
// 船舶性能报告校验系统 - 派生指标计算
// ==========================================
// 职责: 报告时长 / SFOC / 辅机运行小时合计 / 辅助消耗合计
// 红线: 纯函数；输入异常一律降级为 0，不中断批次
// ==========================================

use crate::domain::report::{DerivedMetrics, ReportRecord};
use crate::domain::types::Cell;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// MT → g 的换算系数（SFOC 单位 g/kWh）
const GRAMS_PER_TONNE: f64 = 1_000_000.0;

// ==========================================
// MetricDeriver Trait
// ==========================================
// 用途: 派生指标接口
// 实现者: MetricDerivationService
pub trait MetricDeriver: Send + Sync {
    /// 计算一行的全部派生指标
    fn derive(&self, record: &ReportRecord) -> DerivedMetrics;
}

pub struct MetricDerivationService;

impl MetricDeriver for MetricDerivationService {
    fn derive(&self, record: &ReportRecord) -> DerivedMetrics {
        DerivedMetrics {
            report_hours: report_duration_hours(
                record.start_date,
                record.start_time,
                record.end_date,
                record.end_time,
                record.time_shift_hours,
            ),
            sfoc: specific_fuel_consumption(
                record.me_fuel_mt.iter().sum(),
                record.average_load_kw,
                record.me_rhrs,
            ),
            total_ae_rhrs: finite_or_zero(record.aux_engine_rhrs.iter().sum()),
            total_sub_consumption: finite_or_zero(record.sub_consumption_mt.iter().sum()),
        }
    }
}

/// 报告时长（小时，2 位小数）
///
/// # 规则
/// - (结束时刻 - 开始时刻) 的小时数 + 时差修正，四舍五入到 2 位小数
/// - 任一日期/时间缺失或无法解析 → 0
pub fn report_duration_hours(
    start_date: Cell<NaiveDate>,
    start_time: Cell<NaiveTime>,
    end_date: Cell<NaiveDate>,
    end_time: Cell<NaiveTime>,
    time_shift_hours: f64,
) -> f64 {
    let (start, end) = match (start_date, start_time, end_date, end_time) {
        (Cell::Parsed(sd), Cell::Parsed(st), Cell::Parsed(ed), Cell::Parsed(et)) => {
            (NaiveDateTime::new(sd, st), NaiveDateTime::new(ed, et))
        }
        _ => return 0.0,
    };

    let elapsed_hours = end.signed_duration_since(start).num_seconds() as f64 / 3600.0;
    round2(finite_or_zero(elapsed_hours + time_shift_hours))
}

/// 燃油消耗率 SFOC（g/kWh）
///
/// # 规则
/// - SFOC = 燃油合计[MT] × 1,000,000 / (平均负荷[kW] × 主机运行小时)
/// - 负荷或运行小时为 0 → 0（不产生 inf/NaN）
pub fn specific_fuel_consumption(fuel_mt: f64, average_load_kw: f64, me_rhrs: f64) -> f64 {
    let energy_kwh = average_load_kw * me_rhrs;
    if energy_kwh == 0.0 {
        return 0.0;
    }
    finite_or_zero(fuel_mt * GRAMS_PER_TONNE / energy_kwh)
}

/// 四舍五入到 2 位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ReportType;

    fn date(y: i32, m: u32, d: u32) -> Cell<NaiveDate> {
        Cell::Parsed(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn time(h: u32, m: u32) -> Cell<NaiveTime> {
        Cell::Parsed(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn test_report_duration_basic() {
        // 2025-09-13 12:00 → 2025-09-14 12:00 = 24h
        let hours = report_duration_hours(
            date(2025, 9, 13),
            time(12, 0),
            date(2025, 9, 14),
            time(12, 0),
            0.0,
        );
        assert_eq!(hours, 24.0);
    }

    #[test]
    fn test_report_duration_with_time_shift() {
        // 向东航行拨快 1 小时
        let hours = report_duration_hours(
            date(2025, 9, 13),
            time(12, 0),
            date(2025, 9, 14),
            time(12, 0),
            -1.0,
        );
        assert_eq!(hours, 23.0);
    }

    #[test]
    fn test_report_duration_rounding() {
        // 20 分钟 = 0.3333h → 0.33
        let hours = report_duration_hours(
            date(2025, 9, 13),
            time(12, 0),
            date(2025, 9, 13),
            time(12, 20),
            0.0,
        );
        assert_eq!(hours, 0.33);
    }

    #[test]
    fn test_report_duration_zero_when_unparseable() {
        let hours = report_duration_hours(
            Cell::Defaulted,
            time(12, 0),
            date(2025, 9, 14),
            time(12, 0),
            5.0,
        );
        assert_eq!(hours, 0.0);

        let hours = report_duration_hours(
            date(2025, 9, 13),
            time(12, 0),
            date(2025, 9, 14),
            Cell::Defaulted,
            5.0,
        );
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn test_sfoc_formula() {
        // 33.6 MT / (7000 kW × 24 h) = 200 g/kWh
        assert!((specific_fuel_consumption(33.6, 7000.0, 24.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_sfoc_zero_division() {
        assert_eq!(specific_fuel_consumption(30.0, 0.0, 24.0), 0.0);
        assert_eq!(specific_fuel_consumption(30.0, 7000.0, 0.0), 0.0);
        assert_eq!(specific_fuel_consumption(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_derive_is_pure() {
        let record = ReportRecord {
            row_number: 2,
            imo_no: "9123456".to_string(),
            report_type: ReportType::AtSea,
            start_date: date(2025, 9, 13),
            start_time: time(12, 0),
            end_date: date(2025, 9, 14),
            end_time: time(12, 0),
            time_shift_hours: 0.0,
            average_load_kw: 7000.0,
            average_load_pct: 70.0,
            me_rhrs: 24.0,
            avg_speed: 13.5,
            exhaust_temps: vec![],
            aux_engine_rhrs: vec![24.0, 12.0, 0.0, 0.0, 0.0, 0.0],
            me_fuel_mt: vec![30.0, 3.6, 0.0],
            sub_consumption_mt: vec![0.0, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        };
        let snapshot = record.clone();

        let service = MetricDerivationService;
        let first = service.derive(&record);
        let second = service.derive(&record);

        assert_eq!(first, second);
        assert_eq!(record, snapshot);
        assert_eq!(first.report_hours, 24.0);
        assert_eq!(first.total_ae_rhrs, 36.0);
        assert_eq!(first.total_sub_consumption, 1.5);
        assert!((first.sfoc - 200.0).abs() < 1e-9);
    }
}
