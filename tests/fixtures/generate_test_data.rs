// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成 Excel 报告测试工作簿
// 输出: tests/fixtures/vessel_reports.xlsx
//   - "Read Me": 说明页（校验时应被跳过）
//   - "All Reports": 2 行海上报告，日期/时间为 Excel 日期格式单元格
// ==========================================

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::error::Error;

const OUTPUT_PATH: &str = "tests/fixtures/vessel_reports.xlsx";

// 工作表表头
const HEADER: &[&str] = &[
    "IMO_No",
    "Vessel Name",
    "Report Type",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "Time Shift",
    "Average Load [kW]",
    "Average Load [%]",
    "ME Rhrs (From Last Report)",
    "Avg. Speed",
    "Exh. Temp [°C] (Main Engine Unit 1)",
    "Exh. Temp [°C] (Main Engine Unit 2)",
    "Exh. Temp [°C] (Main Engine Unit 3)",
    "Exh. Temp [°C] (Main Engine Unit 4)",
    "AE Rhrs (Aux Engine Unit 1)",
    "AE Rhrs (Aux Engine Unit 2)",
    "ME HFO Cons. [MT]",
    "Boiler Cons. [MT]",
];

// Excel 内置数字格式: 14 = 短日期, 20 = h:mm
const DATE_FORMAT_INDEX: u8 = 14;
const TIME_FORMAT_INDEX: u8 = 20;

// 2025-09-13 / 2025-09-14 的 Excel 序列日
const START_SERIAL: f64 = 45913.0;
const END_SERIAL: f64 = 45914.0;

/// 一行 24h 海上报告；hfo 决定 SFOC（32 → 190.48 通过，36 → 214.29 失败）
struct SeaReport {
    imo: &'static str,
    vessel: &'static str,
    hfo: f64,
}

fn write_report(
    worksheet: &mut Worksheet,
    row: u32,
    report: &SeaReport,
    date_format: &Format,
    time_format: &Format,
) -> Result<(), XlsxError> {
    worksheet.write_string(row, 0, report.imo)?;
    worksheet.write_string(row, 1, report.vessel)?;
    worksheet.write_string(row, 2, "At Sea")?;
    worksheet.write_number_with_format(row, 3, START_SERIAL, date_format)?;
    worksheet.write_number_with_format(row, 4, 0.5, time_format)?;
    worksheet.write_number_with_format(row, 5, END_SERIAL, date_format)?;
    worksheet.write_number_with_format(row, 6, 0.5, time_format)?;

    let numbers = [
        0.0, 7000.0, 70.0, 24.0, 13.5, // 时差 / 负荷 / 主机小时 / 航速
        350.0, 355.0, 360.0, 345.0, // 排温
        12.0, 12.0, // 辅机小时
        report.hfo, 0.5, // 燃油 / 锅炉
    ];
    for (offset, value) in numbers.iter().enumerate() {
        worksheet.write_number(row, 7 + offset as u16, *value)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据...");

    let mut workbook = Workbook::new();

    let readme = workbook.add_worksheet();
    readme.set_name("Read Me")?;
    readme.write_string(0, 0, "Fleet engine performance export")?;
    readme.write_string(1, 0, "Report data is on sheet All Reports")?;

    let date_format = Format::new().set_num_format_index(DATE_FORMAT_INDEX);
    let time_format = Format::new().set_num_format_index(TIME_FORMAT_INDEX);

    let reports = workbook.add_worksheet();
    reports.set_name("All Reports")?;
    for (col, header) in HEADER.iter().enumerate() {
        reports.write_string(0, col as u16, *header)?;
    }

    let rows = [
        SeaReport {
            imo: "9123456",
            vessel: "MV ALPHA",
            hfo: 32.0,
        },
        SeaReport {
            imo: "9876543",
            vessel: "MV BRAVO",
            hfo: 36.0,
        },
    ];
    for (idx, report) in rows.iter().enumerate() {
        write_report(reports, idx as u32 + 1, report, &date_format, &time_format)?;
    }

    workbook.save(OUTPUT_PATH)?;
    println!("✓ 生成 {} ({}条)", OUTPUT_PATH, rows.len());
    Ok(())
}
