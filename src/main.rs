// ==========================================
// 船舶性能报告校验系统 - 命令行入口
// ==========================================
// 命令: validate（校验 + 写出 + 告警）, summary（仅输出汇总）
// ==========================================

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vessel_report_validator::api::ValidationApi;
use vessel_report_validator::config::{ConfigLoader, OutputFormat, ValidationConfig};
use vessel_report_validator::export::{AlertDispatcher, LogDispatcher, OutboxDispatcher};
use vessel_report_validator::logging;

#[derive(Parser)]
#[command(name = "vessel-report-validator")]
#[command(about = "Validate vessel engine-performance reports against plausibility rules")]
#[command(version)]
struct Cli {
    /// JSON 格式日志
    #[arg(long, global = true, default_value_t = false)]
    json_log: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a report file and write annotated / failed outputs
    Validate {
        input: PathBuf,
        #[arg(long)]
        sheet: Option<String>,
        #[arg(long, default_value = "validation_output")]
        out_dir: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format for reports and alert attachments (csv or xlsx)
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Write alert e-mails into this directory instead of only logging them
        #[arg(long)]
        outbox: Option<PathBuf>,
    },
    /// Print the validation summary without writing any files
    Summary {
        input: PathBuf,
        #[arg(long)]
        sheet: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!(
        version = vessel_report_validator::VERSION,
        "{} 启动",
        vessel_report_validator::APP_NAME
    );

    match cli.command {
        Commands::Validate {
            input,
            sheet,
            out_dir,
            config,
            format,
            outbox,
        } => run_validate(&input, sheet, format, &out_dir, config.as_deref(), outbox),
        Commands::Summary {
            input,
            sheet,
            config,
            json,
        } => run_summary(&input, sheet, config.as_deref(), json),
    }
}

/// 加载配置，并用命令行的工作表名覆盖
fn load_config(path: Option<&Path>, sheet: Option<String>) -> Result<ValidationConfig> {
    let mut config = ConfigLoader::load(path).context("加载配置失败")?;
    if let Some(sheet) = sheet {
        config.sheet_name = sheet;
        config.validate().context("配置校验失败")?;
    }
    Ok(config)
}

fn run_validate(
    input: &Path,
    sheet: Option<String>,
    format: Option<OutputFormat>,
    out_dir: &Path,
    config_path: Option<&Path>,
    outbox: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path, sheet)?;
    if let Some(format) = format {
        config.output_format = format;
    }
    let mut api = ValidationApi::new(config);

    let run = api
        .validate_file(input)
        .with_context(|| format!("校验失败: {}", input.display()))?;
    let written = api.export(&run, out_dir)?;

    let dispatcher: Box<dyn AlertDispatcher> = match outbox {
        Some(dir) => Box::new(OutboxDispatcher::new(dir)),
        None => Box::new(LogDispatcher),
    };
    let alerts = api.send_alerts(&run, dispatcher.as_ref())?;

    print!("{}", run.summary.render_text());
    println!("Annotated report: {}", written.annotated_path.display());
    println!(
        "Failed rows ({}): {}",
        written.failed_rows,
        written.failed_path.display()
    );
    println!("Alerts sent: {}", alerts.sent.len());
    for (imo, reason) in &alerts.failed {
        println!("Alert failed for IMO {}: {}", imo, reason);
    }
    Ok(())
}

fn run_summary(
    input: &Path,
    sheet: Option<String>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, sheet)?;
    let mut api = ValidationApi::new(config);

    let run = api
        .validate_file(input)
        .with_context(|| format!("校验失败: {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&run.summary)?);
    } else {
        print!("{}", run.summary.render_text());
    }
    Ok(())
}
