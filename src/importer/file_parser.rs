// ==========================================
// 船舶性能报告校验系统 - 文件解析器实现
// ==========================================
// 职责: 文件读取与解析（阶段 0）
// 支持: Excel (.xlsx/.xls，按工作表名) / CSV (.csv)
// ==========================================

use crate::domain::report::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::report_importer_trait::FileParser;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};

/// 规范化表头（去空白与 UTF-8 BOM）
fn clean_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// Excel 单元格 → 文本
///
/// # 规则
/// - 日期/时间格式的单元格输出 ISO 文本，而不是原始序列值
///   - 纯时间（序列值 < 1）: HH:MM:SS
///   - 整日: YYYY-MM-DD
///   - 其余: YYYY-MM-DD HH:MM:SS
/// - 时长格式与其他类型沿用 calamine 的 Display
fn excel_cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(value) => format_excel_datetime(dt.as_f64(), value),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}

fn format_excel_datetime(serial: f64, value: NaiveDateTime) -> String {
    if serial < 1.0 {
        value.format("%H:%M:%S").to_string()
    } else if serial.fract() == 0.0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// 按表头组装一行；完全空白的行返回 None
fn build_row<I>(headers: &[String], values: I) -> Option<HashMap<String, String>>
where
    I: Iterator<Item = String>,
{
    let mut row_map = HashMap::new();
    for (col_idx, value) in values.enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if header.is_empty() {
                continue;
            }
            row_map.insert(header.clone(), value.trim().to_string());
        }
    }

    // 补齐短行，保证每行包含全部表头
    for header in headers.iter().filter(|h| !h.is_empty()) {
        row_map.entry(header.clone()).or_default();
    }

    if row_map.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row_map)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    fn parse_reader<R: Read>(&self, source: R) -> ImportResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(source);

        // 读取表头
        let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyWorksheet("csv".to_string()));
        }

        // 读取所有行
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            if let Some(row_map) = build_row(&headers, record.iter().map(|v| v.to_string())) {
                records.push(row_map);
            }
        }

        debug!(rows = records.len(), columns = headers.len(), "CSV 解析完成");
        Ok(RawTable {
            headers: headers.into_iter().filter(|h| !h.is_empty()).collect(),
            records,
        })
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        self.parse_reader(file)
    }

    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        self.parse_reader(bytes)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    sheet_name: String,
}

impl ExcelParser {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    /// 读取指定工作表；工作表缺失属于上传格式错误
    fn read_sheet<RS: Read + Seek>(&self, workbook: &mut Sheets<RS>) -> ImportResult<RawTable> {
        let sheet_names = workbook.sheet_names();
        if !sheet_names.iter().any(|s| s == &self.sheet_name) {
            warn!(sheet = %self.sheet_name, available = ?sheet_names, "未找到工作表");
            return Err(ImportError::SheetNotFound {
                sheet: self.sheet_name.clone(),
                available: sheet_names.join(", "),
            });
        }

        let range = workbook
            .worksheet_range(&self.sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        self.range_to_raw_table(&range)
    }

    fn range_to_raw_table(&self, range: &Range<Data>) -> ImportResult<RawTable> {
        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::EmptyWorksheet(self.sheet_name.clone()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| clean_header(&excel_cell_text(cell)))
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyWorksheet(self.sheet_name.clone()));
        }

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            if let Some(row_map) = build_row(&headers, data_row.iter().map(excel_cell_text)) {
                records.push(row_map);
            }
        }

        debug!(
            sheet = %self.sheet_name,
            rows = records.len(),
            columns = headers.len(),
            "Excel 解析完成"
        );
        Ok(RawTable {
            headers: headers.into_iter().filter(|h| !h.is_empty()).collect(),
            records,
        })
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;
        self.read_sheet(&mut workbook)
    }

    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        self.read_sheet(&mut workbook)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    sheet_name: String,
}

impl UniversalFileParser {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    /// 按扩展名选择解析器
    fn parser_for(&self, ext: &str) -> ImportResult<Box<dyn FileParser>> {
        match ext {
            "csv" => Ok(Box::new(CsvParser)),
            "xlsx" | "xls" => Ok(Box::new(ExcelParser::new(self.sheet_name.clone()))),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        self.parser_for(&extension_of(path))?.parse_to_raw_table(path)
    }

    /// 解析上传缓冲区（file_name 仅用于判断格式）
    pub fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> ImportResult<RawTable> {
        self.parser_for(&extension_of(Path::new(file_name)))?
            .parse_bytes(bytes)
    }
}

/// 小写扩展名（无扩展名返回空串）
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}
