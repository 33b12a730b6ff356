// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 生成报告 CSV 测试数据（临时文件 / 内存字节）
// ==========================================

#![allow(dead_code)]

use csv::WriterBuilder;
use std::io::Write;
use tempfile::NamedTempFile;

/// 测试用表头（覆盖规则涉及的全部列类型 + 一个非标准列）
pub const HEADERS: &[&str] = &[
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
    "Remarks",
];

/// 一行报告（字段均为单元格文本）
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub imo: String,
    pub vessel: String,
    pub report_type: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub time_shift: String,
    pub load_kw: String,
    pub load_pct: String,
    pub me_rhrs: String,
    pub speed: String,
    pub exhaust: [String; 4],
    pub ae_rhrs: [String; 2],
    pub hfo: String,
    pub boiler: String,
    pub remarks: String,
}

impl ReportRow {
    /// 正常的 24h 海上报告（全部规则通过）
    ///
    /// - 报告时长 24h，主机运行 24h
    /// - SFOC = 32e6 / (7000 × 24) ≈ 190.48
    /// - 辅机 24h / 24h = 1.0，锅炉消耗 0.5
    pub fn at_sea(imo: &str) -> Self {
        Self {
            imo: imo.to_string(),
            vessel: format!("MV TEST {}", imo),
            report_type: "At Sea".to_string(),
            start_date: "2025-09-13".to_string(),
            start_time: "12:00".to_string(),
            end_date: "2025-09-14".to_string(),
            end_time: "12:00".to_string(),
            time_shift: "0".to_string(),
            load_kw: "7000".to_string(),
            load_pct: "70".to_string(),
            me_rhrs: "24".to_string(),
            speed: "13.5".to_string(),
            exhaust: [
                "350".to_string(),
                "355".to_string(),
                "360".to_string(),
                "345".to_string(),
            ],
            ae_rhrs: ["12".to_string(), "12".to_string()],
            hfo: "32".to_string(),
            boiler: "0.5".to_string(),
            remarks: String::new(),
        }
    }

    /// 港内报告（主机停机）
    pub fn at_port(imo: &str) -> Self {
        Self {
            report_type: "At Port".to_string(),
            start_date: "2025-09-14".to_string(),
            start_time: "08:00".to_string(),
            end_date: "2025-09-14".to_string(),
            end_time: "18:00".to_string(),
            load_kw: "0".to_string(),
            load_pct: "0".to_string(),
            me_rhrs: "0".to_string(),
            speed: "0".to_string(),
            exhaust: [
                "0".to_string(),
                "0".to_string(),
                "0".to_string(),
                "0".to_string(),
            ],
            ae_rhrs: ["10".to_string(), "0".to_string()],
            hfo: "0".to_string(),
            ..Self::at_sea(imo)
        }
    }

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.imo.clone(),
            self.vessel.clone(),
            self.report_type.clone(),
            self.start_date.clone(),
            self.start_time.clone(),
            self.end_date.clone(),
            self.end_time.clone(),
            self.time_shift.clone(),
            self.load_kw.clone(),
            self.load_pct.clone(),
            self.me_rhrs.clone(),
            self.speed.clone(),
        ];
        cells.extend(self.exhaust.iter().cloned());
        cells.extend(self.ae_rhrs.iter().cloned());
        cells.push(self.hfo.clone());
        cells.push(self.boiler.clone());
        cells.push(self.remarks.clone());
        cells
    }
}

/// 生成 CSV 字节（转义交给 csv::Writer）
pub fn csv_bytes(headers: &[&str], rows: &[Vec<String>]) -> Vec<u8> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(headers).unwrap();
    for row in rows {
        wtr.write_record(row).unwrap();
    }
    wtr.into_inner().unwrap()
}

/// 标准表头的报告 CSV 字节
pub fn report_csv_bytes(rows: &[ReportRow]) -> Vec<u8> {
    let cells: Vec<Vec<String>> = rows.iter().map(ReportRow::cells).collect();
    csv_bytes(HEADERS, &cells)
}

/// 写入临时 CSV 文件（需要保持 NamedTempFile 存活）
pub fn write_temp_csv(bytes: &[u8]) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    temp_file.write_all(bytes).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// 标准表头的报告 CSV 临时文件
pub fn report_csv_file(rows: &[ReportRow]) -> NamedTempFile {
    write_temp_csv(&report_csv_bytes(rows))
}
