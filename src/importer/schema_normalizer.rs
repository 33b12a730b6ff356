// ==========================================
// 船舶性能报告校验系统 - 表结构标准化
// ==========================================
// 职责: 必需列检查 → 剔除派生/结果列 → 缺失列补齐 → 映射为 ReportRecord
// 红线: 本步骤之后规则层不再按列名查找
// ==========================================

use crate::domain::columns;
use crate::domain::report::{ExhaustReading, RawTable, ReportRecord};
use crate::domain::types::ReportType;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::report_importer_trait::DataCleaner as DataCleanerTrait;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// 文本类期望列（缺失时以空串补齐，其余期望列以 "0" 补齐）
const TEXT_COLUMNS: &[&str] = &[
    columns::IMO_NO,
    columns::VESSEL_NAME,
    columns::REPORT_TYPE,
    columns::START_DATE,
    columns::START_TIME,
    columns::END_DATE,
    columns::END_TIME,
    columns::VOYAGE_NUMBER,
    columns::TIME_ZONE,
];

// ==========================================
// NormalizedRow / NormalizedTable
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub raw: HashMap<String, String>, // 原始单元格（已补齐缺失期望列）
    pub record: ReportRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    /// 上传文件中的列（已剔除派生/结果列），保持原始顺序
    pub headers: Vec<String>,
    /// 上传文件中存在的排温缸号
    pub present_exhaust_units: Vec<u8>,
    /// 被补齐的期望列
    pub zero_filled_columns: Vec<String>,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// SchemaNormalizer
// ==========================================
pub struct SchemaNormalizer {
    required_columns: Vec<String>,
    cleaner: DataCleaner,
}

impl SchemaNormalizer {
    pub fn new(required_columns: Vec<String>) -> Self {
        Self {
            required_columns,
            cleaner: DataCleaner,
        }
    }

    /// 标准化原始表
    ///
    /// # 返回
    /// - Ok(NormalizedTable): 每行都已映射为 ReportRecord
    /// - Err(MissingColumn): 必需列缺失（上传格式错误，不做补齐）
    #[instrument(skip_all, fields(rows = table.len(), columns = table.headers.len()))]
    pub fn normalize(&self, table: RawTable) -> ImportResult<NormalizedTable> {
        // === 步骤 1: 必需列检查 ===
        let missing_required: Vec<&str> = self
            .required_columns
            .iter()
            .filter(|c| !table.has_column(c))
            .map(String::as_str)
            .collect();
        if !missing_required.is_empty() {
            warn!(missing = ?missing_required, "必需列缺失");
            return Err(ImportError::MissingColumn(missing_required.join(", ")));
        }

        // === 步骤 2: 剔除派生/结果列（重复校验时重新计算）===
        let headers: Vec<String> = table
            .headers
            .into_iter()
            .filter(|h| !columns::is_output_only(h))
            .collect();

        // === 步骤 3: 缺失期望列补齐 ===
        let zero_filled_columns: Vec<String> = columns::expected_input_columns()
            .into_iter()
            .filter(|c| !headers.contains(c))
            .collect();
        if !zero_filled_columns.is_empty() {
            warn!(
                count = zero_filled_columns.len(),
                columns = ?zero_filled_columns,
                "期望列缺失，按默认值补齐"
            );
        }

        let present_exhaust_units: Vec<u8> = (1..=columns::EXHAUST_UNIT_COUNT)
            .filter(|unit| headers.contains(&columns::exhaust_temp(*unit)))
            .collect();
        debug!(units = ?present_exhaust_units, "排温列识别完成");

        // === 步骤 4: 行映射 ===
        let rows: Vec<NormalizedRow> = table
            .records
            .into_iter()
            .enumerate()
            .map(|(idx, mut raw)| {
                raw.retain(|k, _| !columns::is_output_only(k));
                for column in &zero_filled_columns {
                    let filler = if TEXT_COLUMNS.contains(&column.as_str()) {
                        String::new()
                    } else {
                        "0".to_string()
                    };
                    raw.entry(column.clone()).or_insert(filler);
                }
                // 表头占第 1 行
                let record = self.map_record(&raw, idx + 2, &present_exhaust_units);
                NormalizedRow { raw, record }
            })
            .collect();

        info!(
            rows = rows.len(),
            zero_filled = zero_filled_columns.len(),
            exhaust_units = present_exhaust_units.len(),
            "表结构标准化完成"
        );

        Ok(NormalizedTable {
            headers,
            present_exhaust_units,
            zero_filled_columns,
            rows,
        })
    }

    /// 将一行原始单元格映射为 ReportRecord（单元格错误降级为默认值）
    fn map_record(
        &self,
        raw: &HashMap<String, String>,
        row_number: usize,
        exhaust_units: &[u8],
    ) -> ReportRecord {
        let get = |column: &str| raw.get(column).map(String::as_str);
        let number = |column: &str| self.cleaner.number(get(column));

        ReportRecord {
            row_number,

            // 身份
            imo_no: self.cleaner.clean_text(get(columns::IMO_NO)),
            report_type: ReportType::from_cell(&self.cleaner.clean_text(get(columns::REPORT_TYPE))),

            // 时间窗口
            start_date: self.cleaner.parse_date_or_default(get(columns::START_DATE)),
            start_time: self.cleaner.parse_time_or_default(get(columns::START_TIME)),
            end_date: self.cleaner.parse_date_or_default(get(columns::END_DATE)),
            end_time: self.cleaner.parse_time_or_default(get(columns::END_TIME)),
            time_shift_hours: number(columns::TIME_SHIFT),

            // 主机工况
            average_load_kw: number(columns::AVERAGE_LOAD_KW),
            average_load_pct: number(columns::AVERAGE_LOAD_PCT),
            me_rhrs: number(columns::ME_RHRS),
            avg_speed: number(columns::AVG_SPEED),

            // 分项读数
            exhaust_temps: exhaust_units
                .iter()
                .map(|unit| ExhaustReading {
                    unit: *unit,
                    celsius: number(columns::exhaust_temp(*unit).as_str()),
                })
                .collect(),
            aux_engine_rhrs: (1..=columns::AUX_ENGINE_UNIT_COUNT)
                .map(|unit| number(columns::aux_engine_rhrs(unit).as_str()))
                .collect(),
            me_fuel_mt: columns::ME_FUEL_COLUMNS.iter().map(|c| number(*c)).collect(),
            sub_consumption_mt: columns::SUB_CONSUMPTION_COLUMNS
                .iter()
                .map(|c| number(*c))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Cell;

    fn raw_table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            records: rows
                .iter()
                .map(|values| {
                    headers
                        .iter()
                        .zip(values.iter())
                        .map(|(h, v)| (h.to_string(), v.to_string()))
                        .collect()
                })
                .collect(),
        }
    }

    #[test]
    fn test_missing_required_column() {
        let normalizer = SchemaNormalizer::new(vec!["Report Type".to_string()]);
        let table = raw_table(&["IMO_No"], &[&["9123456"]]);

        let result = normalizer.normalize(table);

        assert!(matches!(result, Err(ImportError::MissingColumn(c)) if c == "Report Type"));
    }

    #[test]
    fn test_missing_expected_columns_zero_filled() {
        let normalizer = SchemaNormalizer::new(vec!["Report Type".to_string()]);
        let table = raw_table(&["IMO_No", "Report Type"], &[&["9123456", "At Sea"]]);

        let normalized = normalizer.normalize(table).unwrap();
        let row = &normalized.rows[0];

        assert_eq!(row.raw.get(columns::ME_RHRS), Some(&"0".to_string()));
        assert_eq!(row.raw.get(columns::START_DATE), Some(&String::new()));
        assert_eq!(row.record.me_rhrs, 0.0);
        assert_eq!(row.record.start_date, Cell::Defaulted);
        assert!(normalized
            .zero_filled_columns
            .contains(&columns::ME_RHRS.to_string()));
        // 原始表头不包含补齐列
        assert_eq!(normalized.headers, vec!["IMO_No", "Report Type"]);
    }

    #[test]
    fn test_only_present_exhaust_units_mapped() {
        let normalizer = SchemaNormalizer::new(vec![]);
        let unit1 = columns::exhaust_temp(1);
        let unit3 = columns::exhaust_temp(3);
        let table = raw_table(
            &["Report Type", unit1.as_str(), unit3.as_str()],
            &[&["At Sea", "350", ""]],
        );

        let normalized = normalizer.normalize(table).unwrap();
        let record = &normalized.rows[0].record;

        assert_eq!(normalized.present_exhaust_units, vec![1, 3]);
        assert_eq!(record.exhaust_temps.len(), 2);
        assert_eq!(record.exhaust_temps[0].unit, 1);
        assert_eq!(record.exhaust_temps[0].celsius, 350.0);
        assert_eq!(record.exhaust_temps[1].unit, 3);
        assert_eq!(record.exhaust_temps[1].celsius, 0.0);
    }

    #[test]
    fn test_output_only_columns_dropped() {
        let normalizer = SchemaNormalizer::new(vec![]);
        let table = raw_table(
            &["Report Type", "SFOC", "Reason"],
            &[&["At Sea", "999", "stale reason"]],
        );

        let normalized = normalizer.normalize(table).unwrap();

        assert_eq!(normalized.headers, vec!["Report Type"]);
        assert!(!normalized.rows[0].raw.contains_key("Reason"));
        assert!(!normalized.rows[0].raw.contains_key("SFOC"));
    }

    #[test]
    fn test_row_numbers_and_thousands_separator() {
        let normalizer = SchemaNormalizer::new(vec![]);
        let table = raw_table(
            &["Report Type", "Average Load [kW]"],
            &[&["At Sea", "8,500"], &["At Port", "nan"]],
        );

        let normalized = normalizer.normalize(table).unwrap();

        assert_eq!(normalized.rows[0].record.row_number, 2);
        assert_eq!(normalized.rows[1].record.row_number, 3);
        assert_eq!(normalized.rows[0].record.average_load_kw, 8500.0);
        assert_eq!(normalized.rows[1].record.average_load_kw, 0.0);
    }
}
