// ==========================================
// 船舶性能报告校验系统 - 列名定义
// ==========================================
// 职责: 固定的输入/输出列名集合（与报表导出模板一致）
// 红线: 不做列名推断，未知列只透传不参与规则
// ==========================================

// ===== 身份与类型 =====
pub const IMO_NO: &str = "IMO_No";
pub const VESSEL_NAME: &str = "Vessel Name";
pub const REPORT_TYPE: &str = "Report Type";

// ===== 时间窗口 =====
pub const START_DATE: &str = "Start Date";
pub const START_TIME: &str = "Start Time";
pub const END_DATE: &str = "End Date";
pub const END_TIME: &str = "End Time";
pub const TIME_SHIFT: &str = "Time Shift";
pub const TIME_ZONE: &str = "Time Zone";
pub const VOYAGE_NUMBER: &str = "Voyage Number";

// ===== 航程 =====
pub const DISTANCE_GROUND: &str = "Distance - Ground [NM]";
pub const DISTANCE_SEA: &str = "Distance - Sea [NM]";

// ===== 主机工况 =====
pub const AVERAGE_LOAD_KW: &str = "Average Load [kW]";
pub const AVERAGE_LOAD_PCT: &str = "Average Load [%]";
pub const AVERAGE_RPM: &str = "Average RPM";
pub const ME_RHRS: &str = "ME Rhrs (From Last Report)";
pub const AVG_SPEED: &str = "Avg. Speed";

// ===== 主机燃油消耗（3 项分量，单位 MT）=====
pub const ME_FUEL_COLUMNS: [&str; 3] = ["ME HFO Cons. [MT]", "ME LFO Cons. [MT]", "ME MGO Cons. [MT]"];

// ===== 辅助消耗（10 项分量，单位 MT）=====
pub const SUB_CONSUMPTION_COLUMNS: [&str; 10] = [
    "Tank Cleaning Cons. [MT]",
    "Cargo Transfer Cons. [MT]",
    "Ballast Transfer Cons. [MT]",
    "Cargo Heating Cons. [MT]",
    "Inert Gas Cons. [MT]",
    "Cargo Cooling Cons. [MT]",
    "Reefer Cons. [MT]",
    "Fresh Water Gen. Cons. [MT]",
    "Boiler Cons. [MT]",
    "Other Sub-Cons. [MT]",
];

// ===== 分缸排温 / 辅机运行小时 =====
pub const EXHAUST_UNIT_COUNT: u8 = 16;
pub const AUX_ENGINE_UNIT_COUNT: u8 = 6;

// ===== 派生列（只输出，不读入）=====
pub const REPORT_HOURS: &str = "Report Hours";
pub const SFOC: &str = "SFOC";
pub const TOTAL_AE_RHRS: &str = "Total AE Rhrs";
pub const TOTAL_SUB_CONSUMPTION: &str = "Total Sub-Consumption";

// ===== 校验结果列 =====
pub const REASON: &str = "Reason";
pub const AE_ANOMALY: &str = "AE Anomaly";

/// 派生列 + 结果列（固定顺序，追加在输出表末尾）
pub const OUTPUT_ONLY_COLUMNS: [&str; 6] = [
    REPORT_HOURS,
    SFOC,
    TOTAL_AE_RHRS,
    TOTAL_SUB_CONSUMPTION,
    REASON,
    AE_ANOMALY,
];

/// 失败子表的上下文列（按此顺序；排温列插在其后）
pub const CONTEXT_COLUMNS: [&str; 17] = [
    IMO_NO,
    VESSEL_NAME,
    REPORT_TYPE,
    START_DATE,
    START_TIME,
    END_DATE,
    END_TIME,
    VOYAGE_NUMBER,
    TIME_ZONE,
    TIME_SHIFT,
    DISTANCE_GROUND,
    DISTANCE_SEA,
    AVERAGE_LOAD_KW,
    AVERAGE_RPM,
    AVERAGE_LOAD_PCT,
    ME_RHRS,
    AVG_SPEED,
];

/// 第 n 缸排温列名（n 从 1 开始）
pub fn exhaust_temp(unit: u8) -> String {
    format!("Exh. Temp [°C] (Main Engine Unit {})", unit)
}

/// 第 n 台辅机运行小时列名（n 从 1 开始）
pub fn aux_engine_rhrs(unit: u8) -> String {
    format!("AE Rhrs (Aux Engine Unit {})", unit)
}

/// 全部期望输入列（缺失时由 SchemaNormalizer 以 0 补齐）
pub fn expected_input_columns() -> Vec<String> {
    let mut columns: Vec<String> = CONTEXT_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend((1..=EXHAUST_UNIT_COUNT).map(exhaust_temp));
    columns.extend((1..=AUX_ENGINE_UNIT_COUNT).map(aux_engine_rhrs));
    columns.extend(ME_FUEL_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(SUB_CONSUMPTION_COLUMNS.iter().map(|c| c.to_string()));
    columns
}

/// 是否为派生/结果列（重复校验时输入中的同名列被忽略）
pub fn is_output_only(column: &str) -> bool {
    OUTPUT_ONLY_COLUMNS.contains(&column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhaust_and_aux_column_names() {
        assert_eq!(exhaust_temp(1), "Exh. Temp [°C] (Main Engine Unit 1)");
        assert_eq!(exhaust_temp(16), "Exh. Temp [°C] (Main Engine Unit 16)");
        assert_eq!(aux_engine_rhrs(6), "AE Rhrs (Aux Engine Unit 6)");
    }

    #[test]
    fn test_expected_input_columns_complete() {
        let columns = expected_input_columns();
        assert_eq!(columns.len(), 17 + 16 + 6 + 3 + 10);
        assert!(columns.iter().any(|c| c == ME_RHRS));
        // 派生列不属于输入
        assert!(!columns.iter().any(|c| is_output_only(c)));
    }
}
