// ==========================================
// 船舶性能报告校验系统 - 导入管道 Trait
// ==========================================
// 职责: 定义文件解析与单元格清洗接口（不包含实现）
// ==========================================

use crate::domain::report::RawTable;
use crate::domain::types::Cell;
use crate::importer::error::ImportResult;
use chrono::{NaiveDate, NaiveTime};
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表（表头 + 行记录）
    ///
    /// # 返回
    /// - Ok(RawTable): 表头保持原始顺序，完全空白的行被跳过
    /// - Err: 文件不存在、格式不支持、工作表缺失
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;

    /// 解析内存中的文件内容（上传缓冲区）
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗与 parse_or_default 组合子
// 实现者: DataCleaner
//
// 所有 parse_* 方法都不返回错误：
// 缺失 / 占位符 / 无法解析 → Cell::Defaulted
pub trait DataCleaner: Send + Sync {
    /// 清洗文本（TRIM；占位符 nan/None 等 → 空串）
    fn clean_text(&self, value: Option<&str>) -> String;

    /// 标准化 NULL 值（空白/占位符 → None）
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 解析数值（去千分位；非有限值视为 Defaulted）
    fn parse_number_or_default(&self, value: Option<&str>) -> Cell<f64>;

    /// 解析日期（多种文本格式 + Excel 序列日）
    fn parse_date_or_default(&self, value: Option<&str>) -> Cell<NaiveDate>;

    /// 解析时间（HH:MM[:SS] / 日期时间 / Excel 小数日）
    fn parse_time_or_default(&self, value: Option<&str>) -> Cell<NaiveTime>;
}
