// ==========================================
// 船舶性能报告校验系统 - 报告写出
// ==========================================
// 职责: OutputTable → CSV / XLSX 文件 / 内存字节（邮件附件）
// 输出: annotated_reports.{csv,xlsx}（全量标注）, failed_validation.{csv,xlsx}（失败子表）
// ==========================================

use crate::config::OutputFormat;
use crate::domain::report::OutputTable;
use crate::engine::ValidationRun;
use crate::export::error::{ExportError, ExportResult};
use csv::WriterBuilder;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const ANNOTATED_FILE_STEM: &str = "annotated_reports";
pub const FAILED_FILE_STEM: &str = "failed_validation";

/// 失败子表的工作表名（XLSX 输出与附件）
pub const FAILED_SHEET_NAME: &str = "Failed_Validation";

/// 写出结果（两个文件的路径）
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenReports {
    pub annotated_path: PathBuf,
    pub failed_path: PathBuf,
    pub annotated_rows: usize,
    pub failed_rows: usize,
}

/// 将表格写入任意 Writer
pub fn write_table<W: Write>(table: &OutputTable, sink: W) -> ExportResult<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .map_err(|e| ExportError::CsvError(e.to_string()))?;
    Ok(())
}

/// 表格 → CSV 字节（附件用）
pub fn to_csv_bytes(table: &OutputTable) -> ExportResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_table(table, &mut buffer)?;
    Ok(buffer)
}

/// 表格 → XLSX 字节（单工作表，首行为加粗表头）
///
/// # 规则
/// - 可解析为有限数值的单元格写为数值，其余写为文本
/// - 带前导零的整数文本（如 "0800"）保持文本，避免丢失前导零
/// - 空单元格不写入
pub fn to_xlsx_bytes(table: &OutputTable, sheet_name: &str) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as ColNum, header, &header_format)?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        let xlsx_row = (row_idx + 1) as RowNum;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match numeric_cell(value) {
                Some(number) => worksheet.write_number(xlsx_row, col as ColNum, number)?,
                None => worksheet.write_string(xlsx_row, col as ColNum, value)?,
            };
        }
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

fn numeric_cell(value: &str) -> Option<f64> {
    let digits = value.trim_start_matches('-');
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return None;
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// 按输出格式编码表格
///
/// # 参数
/// - sheet_name: 仅 XLSX 使用
pub fn encode_table(
    table: &OutputTable,
    format: OutputFormat,
    sheet_name: &str,
) -> ExportResult<Vec<u8>> {
    match format {
        OutputFormat::Csv => to_csv_bytes(table),
        OutputFormat::Xlsx => to_xlsx_bytes(table, sheet_name),
    }
}

/// 表格 → 文件
pub fn write_table_file(
    table: &OutputTable,
    format: OutputFormat,
    sheet_name: &str,
    path: &Path,
) -> ExportResult<()> {
    let bytes = encode_table(table, format, sheet_name)?;
    fs::write(path, bytes).map_err(|e| ExportError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// 将一次校验结果写入输出目录
///
/// # 参数
/// - format: 输出格式
/// - annotated_sheet: 标注表的工作表名（与上传工作表同名，标注结果可直接再次校验）
///
/// # 返回
/// - WrittenReports: 失败子表即使为空也会写出（仅含表头）
#[instrument(skip(run), fields(run_id = %run.run_id))]
pub fn write_run(
    run: &ValidationRun,
    out_dir: &Path,
    format: OutputFormat,
    annotated_sheet: &str,
) -> ExportResult<WrittenReports> {
    fs::create_dir_all(out_dir).map_err(|e| ExportError::DirectoryError {
        path: out_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let annotated = run.annotated_table();
    let failed = run.failed_table();

    let annotated_path = out_dir.join(format!("{}.{}", ANNOTATED_FILE_STEM, format.extension()));
    let failed_path = out_dir.join(format!("{}.{}", FAILED_FILE_STEM, format.extension()));
    write_table_file(&annotated, format, annotated_sheet, &annotated_path)?;
    write_table_file(&failed, format, FAILED_SHEET_NAME, &failed_path)?;

    info!(
        annotated = %annotated_path.display(),
        failed = %failed_path.display(),
        failed_rows = failed.rows.len(),
        "校验结果已写出"
    );

    Ok(WrittenReports {
        annotated_path,
        failed_path,
        annotated_rows: annotated.rows.len(),
        failed_rows: failed.rows.len(),
    })
}
