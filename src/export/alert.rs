// ==========================================
// 船舶性能报告校验系统 - 告警组装与发送
// ==========================================
// 职责: 按船（IMO）组装告警邮件（HTML 正文 + 失败子表附件，CSV 或 XLSX），交给发送器
// 红线: 只为有失败行且配置了收件人的船生成告警
// ==========================================

use crate::config::ValidationConfig;
use crate::domain::report::{AnnotatedRow, OutputTable};
use crate::engine::summary::reason_frequencies;
use crate::engine::ValidationRun;
use crate::export::error::{ExportError, ExportResult};
use crate::export::report_writer::{encode_table, FAILED_FILE_STEM, FAILED_SHEET_NAME};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

// ==========================================
// AlertMessage - 单船告警
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AlertAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub imo_no: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<AlertAttachment>,
}

// ==========================================
// AlertComposer - 告警组装
// ==========================================
pub struct AlertComposer<'a> {
    config: &'a ValidationConfig,
}

impl<'a> AlertComposer<'a> {
    pub fn new(config: &'a ValidationConfig) -> Self {
        Self { config }
    }

    /// 为每艘有失败行的船组装一封告警
    ///
    /// # 规则
    /// - 无失败行的船不生成告警
    /// - IMO 为空或未配置收件人的船跳过（记录 warn）
    /// - 顺序按失败行首次出现顺序
    #[instrument(skip_all, fields(run_id = %run.run_id))]
    pub fn compose(&self, run: &ValidationRun) -> ExportResult<Vec<AlertMessage>> {
        let mut alerts = Vec::new();

        for imo_no in run.failed_imos() {
            if imo_no.is_empty() {
                warn!("失败行缺少 IMO 号，无法确定收件人，跳过告警");
                continue;
            }

            let recipients = self.config.recipients_for(&imo_no);
            if recipients.is_empty() {
                warn!(imo = %imo_no, "未配置告警收件人，跳过");
                continue;
            }

            let ship_rows: Vec<&AnnotatedRow> = run
                .failed_rows()
                .filter(|r| r.record.imo_no == imo_no)
                .collect();
            let table = run.failed_table_for(&imo_no);
            let format = self.config.output_format;
            let bytes = encode_table(&table, format, FAILED_SHEET_NAME)?;

            alerts.push(AlertMessage {
                subject: format!(
                    "Report validation: {} flagged row(s) for IMO {}",
                    table.rows.len(),
                    imo_no
                ),
                html_body: render_html_body(&imo_no, &ship_rows, &table),
                attachment: Some(AlertAttachment {
                    file_name: format!("{}_{}.{}", FAILED_FILE_STEM, imo_no, format.extension()),
                    bytes,
                }),
                recipients,
                imo_no,
            });
        }

        info!(count = alerts.len(), "告警组装完成");
        Ok(alerts)
    }
}

/// HTML 正文: 原因频次 + 失败行表格
fn render_html_body(imo_no: &str, rows: &[&AnnotatedRow], table: &OutputTable) -> String {
    let frequencies = reason_frequencies(rows.iter().copied());

    let mut html = String::new();
    html.push_str("<html><body>\n");
    html.push_str(&format!(
        "<h2>Engine performance report validation: IMO {}</h2>\n",
        escape_html(imo_no)
    ));
    html.push_str(&format!(
        "<p>{} report row(s) failed validation. Please review the entries below.</p>\n",
        table.rows.len()
    ));

    html.push_str("<h3>Reasons</h3>\n<ul>\n");
    for entry in &frequencies {
        html.push_str(&format!(
            "<li>{} &times; {}</li>\n",
            entry.count,
            escape_html(&entry.message)
        ));
    }
    html.push_str("</ul>\n");

    html.push_str("<table border=\"1\" cellspacing=\"0\" cellpadding=\"4\">\n<tr>");
    for header in &table.headers {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr>\n");
    for row in &table.rows {
        html.push_str("<tr>");
        for value in row {
            html.push_str(&format!("<td>{}</td>", escape_html(value)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n</body></html>\n");
    html
}

/// HTML 转义
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ==========================================
// AlertDispatcher Trait
// ==========================================
// 用途: 告警发送接口（SMTP 等真实通道在此接口之外实现）
// 实现者: LogDispatcher, OutboxDispatcher
pub trait AlertDispatcher {
    fn dispatch(&self, alert: &AlertMessage) -> ExportResult<()>;
}

/// 仅记录日志
pub struct LogDispatcher;

impl AlertDispatcher for LogDispatcher {
    fn dispatch(&self, alert: &AlertMessage) -> ExportResult<()> {
        info!(
            imo = %alert.imo_no,
            recipients = ?alert.recipients,
            subject = %alert.subject,
            attachment = alert.attachment.as_ref().map(|a| a.file_name.as_str()),
            "告警（仅日志）"
        );
        Ok(())
    }
}

/// 写入发件箱目录: {imo}.html + 附件
pub struct OutboxDispatcher {
    dir: PathBuf,
}

impl OutboxDispatcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, alert: &AlertMessage, path: &Path, bytes: &[u8]) -> ExportResult<()> {
        fs::write(path, bytes).map_err(|e| ExportError::DispatchError {
            imo: alert.imo_no.clone(),
            message: format!("{}: {}", path.display(), e),
        })
    }
}

impl AlertDispatcher for OutboxDispatcher {
    fn dispatch(&self, alert: &AlertMessage) -> ExportResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| ExportError::DirectoryError {
            path: self.dir.display().to_string(),
            message: e.to_string(),
        })?;

        let body_path = self.dir.join(format!("{}.html", alert.imo_no));
        let body = format!(
            "<!-- To: {} -->\n<!-- Subject: {} -->\n{}",
            escape_html(&alert.recipients.join(", ")),
            escape_html(&alert.subject),
            alert.html_body
        );
        self.write(alert, &body_path, body.as_bytes())?;

        if let Some(attachment) = &alert.attachment {
            let attachment_path = self.dir.join(&attachment.file_name);
            self.write(alert, &attachment_path, &attachment.bytes)?;
        }

        info!(imo = %alert.imo_no, path = %body_path.display(), "告警已写入发件箱");
        Ok(())
    }
}
