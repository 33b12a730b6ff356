// ==========================================
// 船舶性能报告校验系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值、日期、时间的 parse_or_default
// 红线: 单元格级错误一律降级为 Cell::Defaulted，不中断批次
// ==========================================

use crate::domain::types::Cell;
use crate::importer::report_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// 表格导出中常见的空值占位符（小写比较）
const NULL_PLACEHOLDERS: &[&str] = &["nan", "none", "null", "nat", "n/a", "na", "-", "--"];

/// 文本日期格式（按顺序尝试；斜杠/短横线格式按日在前解析）
/// 两位年份格式须排在四位年份之前，否则 "25" 会被 %Y 读成公元 25 年
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%d-%b-%y", "%d-%b-%Y",
    "%d %b %Y",
];

/// 日期时间格式（日期列取日期部分，时间列取时间部分）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// 文本时间格式
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%H:%M:%S%.f", "%I:%M %p", "%I:%M:%S %p"];

/// Excel 1900 日期系统的零点（序列日 1 = 1900-01-01，含闰年 bug 修正）
fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Excel 序列日的合法上限（9999-12-31）
const EXCEL_SERIAL_MAX: f64 = 2_958_466.0;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: Option<&str>) -> String {
        self.normalize_null(value).unwrap_or_default()
    }

    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() || NULL_PLACEHOLDERS.contains(&trimmed.to_lowercase().as_str()) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_number_or_default(&self, value: Option<&str>) -> Cell<f64> {
        let text = match self.normalize_null(value) {
            Some(t) => t,
            None => return Cell::Defaulted,
        };

        // 去千分位与内部空白（"1,234.5" → 1234.5）
        let cleaned: String = text
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Parsed(v),
            _ => Cell::Defaulted,
        }
    }

    fn parse_date_or_default(&self, value: Option<&str>) -> Cell<NaiveDate> {
        let text = match self.normalize_null(value) {
            Some(t) => t,
            None => return Cell::Defaulted,
        };

        // 纯数字: 8 位按 YYYYMMDD，其余按 Excel 序列日
        if let Ok(number) = text.parse::<f64>() {
            if text.len() == 8 && text.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y%m%d") {
                    return Cell::Parsed(date);
                }
            }
            return match excel_serial_to_date(number) {
                Some(date) => Cell::Parsed(date),
                None => Cell::Defaulted,
            };
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&text, fmt) {
                return Cell::Parsed(date);
            }
        }

        match parse_datetime_text(&text) {
            Some(dt) => Cell::Parsed(dt.date()),
            None => Cell::Defaulted,
        }
    }

    fn parse_time_or_default(&self, value: Option<&str>) -> Cell<NaiveTime> {
        let text = match self.normalize_null(value) {
            Some(t) => t,
            None => return Cell::Defaulted,
        };

        // 3-4 位整数按 HHMM（航海日志常见写法 "1200"）
        if (3..=4).contains(&text.len()) && text.chars().all(|c| c.is_ascii_digit()) {
            return match NaiveTime::parse_from_str(&format!("{:0>4}", text), "%H%M") {
                Ok(time) => Cell::Parsed(time),
                Err(_) => Cell::Defaulted,
            };
        }

        // 其余纯数字: 仅小于 1 或带小数部分的值按 Excel 小数日解析；
        // "12" 这类无法判定含义的整数降级为 Defaulted
        if let Ok(number) = text.parse::<f64>() {
            if number >= 1.0 && number.fract() == 0.0 {
                return Cell::Defaulted;
            }
            return match excel_fraction_to_time(number) {
                Some(time) => Cell::Parsed(time),
                None => Cell::Defaulted,
            };
        }

        for fmt in TIME_FORMATS {
            if let Ok(time) = NaiveTime::parse_from_str(&text, fmt) {
                return Cell::Parsed(time);
            }
        }

        match parse_datetime_text(&text) {
            Some(dt) => Cell::Parsed(dt.time()),
            None => Cell::Defaulted,
        }
    }
}

impl DataCleaner {
    /// 数值取值（Defaulted → 0）
    pub fn number(&self, value: Option<&str>) -> f64 {
        self.parse_number_or_default(value).value_or_default()
    }
}

fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Excel 序列日 → 日期（忽略小数部分）
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial >= EXCEL_SERIAL_MAX {
        return None;
    }
    excel_epoch()?.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Excel 小数日 → 时间（0.5 = 12:00）
fn excel_fraction_to_time(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let seconds = (serial.fract() * 86_400.0).round() as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)
}
