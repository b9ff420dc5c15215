//! 结果格式化模块
//!
//! 负责单文件报告（文本表格 / JSON）和批量汇总表格的生成。

use super::batch_state::BatchStatsSnapshot;
use super::cli::AppConfig;
use super::constants::output::VALUE_PRECISION;
use super::processor::{BatchEntry, FileOutcome, MeasurementReport};
use super::utils;
use crate::core::{Metric, MetricCategory, RequestedMetrics, Statistic};
use crate::error::MeasureResult;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------\n";

/// 格式化单个数值
#[inline]
pub fn format_value(value: f64) -> String {
    format!("{value:.prec$}", prec = VALUE_PRECISION)
}

/// 某类别某统计量对应的测量项
fn metric_for(category: MetricCategory, statistic: Statistic) -> Option<Metric> {
    Metric::ALL
        .into_iter()
        .find(|m| m.category() == category && m.statistic() == statistic)
}

/// 创建报告头部信息
pub fn create_report_header(report: &MeasurementReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Digital Pulse Meter v{VERSION}\n"));
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    output.push_str(&format!("log date: {now}\n\n"));

    output.push_str(SEPARATOR);
    output.push_str(&format!("Statistics for: {}\n", report.file));
    output.push_str(&format!("Channel: {}\n", report.channel));
    if let Some([start, end]) = report.range {
        output.push_str(&format!("Range: {start} .. {end}\n"));
    }
    output.push_str(&format!("Capture rows: {}\n", report.rows));
    output.push_str(&format!("Transitions: {}\n", report.transitions));
    output.push_str(SEPARATOR);
    output.push('\n');

    output
}

/// 生成测量结果表格
///
/// 行为被请求的类别，列为 Mean / Min / Max；未请求的单元格显示 "-"。
pub fn create_metrics_table(report: &MeasurementReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Measurement", "Mean", "Min", "Max"]);

    for category in MetricCategory::ALL {
        let present: Vec<Option<f64>> = [Statistic::Mean, Statistic::Min, Statistic::Max]
            .into_iter()
            .map(|s| metric_for(category, s).and_then(|m| report.metrics.get(m)))
            .collect();
        if present.iter().all(Option::is_none) {
            continue;
        }

        let mut row = vec![Cell::new(category.display_name())];
        row.extend(present.into_iter().map(|value| {
            let text = value.map(format_value).unwrap_or_else(|| "-".to_string());
            Cell::new(text).set_alignment(CellAlignment::Right)
        }));
        table.add_row(row);
    }

    table
}

/// 格式化单文件文本报告
pub fn format_text_report(report: &MeasurementReport) -> String {
    let mut output = create_report_header(report);

    if report.metrics.is_empty() {
        output.push_str("No supported measurements requested.\n");
    } else {
        output.push_str(&format!("{}\n", create_metrics_table(report)));
    }

    output.push('\n');
    output.push_str(SEPARATOR);
    output
}

/// 格式化单文件JSON报告
pub fn format_json_report(report: &MeasurementReport) -> MeasureResult<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// 批量处理中失败的文件（JSON输出）
#[derive(Debug, Serialize)]
struct FailedFile<'a> {
    file: String,
    category: &'static str,
    error: &'a str,
}

/// 批量JSON汇总
#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    tool_version: &'static str,
    generated_at: String,
    processed: usize,
    failed: usize,
    transitions: usize,
    reports: Vec<&'a MeasurementReport>,
    failures: Vec<FailedFile<'a>>,
}

/// 生成批量文本汇总（表头、结果表格、统计尾部）
pub fn format_batch_text(
    config: &AppConfig,
    entries: &[BatchEntry],
    snapshot: &BatchStatsSnapshot,
) -> String {
    let requested: RequestedMetrics = config.requested_metrics();
    let mut output = String::new();

    output.push_str("=====================================\n");
    output.push_str("   Digital Pulse Meter Batch Report\n");
    output.push_str("=====================================\n\n");
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    output.push_str(&format!("log date: {now}\n"));
    output.push_str(&format!("Directory: {}\n", config.input_path.display()));
    output.push_str(&format!("Channel: {}\n", config.channel));
    if let Some(range) = config.range {
        output.push_str(&format!("Range: {} .. {}\n", range.start, range.end));
    }
    output.push_str(&format!("Files: {}\n\n", entries.len()));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    // 汇总写入文件，不按终端宽度折行
    table.set_content_arrangement(ContentArrangement::Disabled);
    let mut header = vec!["File".to_string()];
    header.extend(requested.iter().map(|m| m.name().to_string()));
    table.set_header(header);

    for entry in entries {
        let mut row = vec![Cell::new(utils::extract_filename_lossy(&entry.path))];
        match &entry.outcome {
            FileOutcome::Measured(report) => {
                row.extend(requested.iter().map(|metric| {
                    let text = report
                        .metrics
                        .get(metric)
                        .map(format_value)
                        .unwrap_or_else(|| "-".to_string());
                    Cell::new(text).set_alignment(CellAlignment::Right)
                }));
            }
            FileOutcome::Failed { category, .. } => {
                row.extend(
                    requested
                        .iter()
                        .map(|_| Cell::new(format!("[{}]", category.display_name()))),
                );
            }
        }
        table.add_row(row);
    }
    output.push_str(&format!("{table}\n"));

    output.push_str(&create_batch_footer(entries.len(), snapshot));
    output
}

/// 生成批量JSON汇总
pub fn format_batch_json(
    entries: &[BatchEntry],
    snapshot: &BatchStatsSnapshot,
) -> MeasureResult<String> {
    let failures = entries
        .iter()
        .filter_map(|entry| match &entry.outcome {
            FileOutcome::Failed { category, message } => Some(FailedFile {
                file: utils::extract_filename_lossy(&entry.path),
                category: category.display_name(),
                error: message,
            }),
            FileOutcome::Measured(_) => None,
        })
        .collect();

    let batch = BatchReport {
        tool_version: VERSION,
        generated_at: chrono::Local::now().to_rfc3339(),
        processed: snapshot.processed,
        failed: snapshot.failed,
        transitions: snapshot.transitions,
        reports: entries.iter().filter_map(BatchEntry::report).collect(),
        failures,
    };

    let mut json = serde_json::to_string_pretty(&batch)?;
    json.push('\n');
    Ok(json)
}

/// 生成批量统计尾部
pub fn create_batch_footer(total: usize, snapshot: &BatchStatsSnapshot) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("=====================================\n");
    output.push_str("批量处理统计 / Batch statistics:\n");
    output.push_str(&format!("   总文件数 / Total: {total}\n"));
    output.push_str(&format!("   成功处理 / Processed: {}\n", snapshot.processed));
    output.push_str(&format!("   处理失败 / Failed: {}\n", snapshot.failed));
    output.push_str(&format!(
        "   跳变总数 / Transitions: {}\n",
        snapshot.transitions
    ));
    if total > 0 {
        output.push_str(&format!(
            "   处理成功率 / Success rate: {:.1}%\n",
            snapshot.processed as f64 / total as f64 * 100.0
        ));
    }

    for (category, files) in snapshot.sorted_errors() {
        output.push_str(&format!(
            "   [{}] {} 个文件: {}\n",
            category.display_name(),
            files.len(),
            files.join(", ")
        ));
    }

    output.push('\n');
    output.push_str(&format!("生成工具: Digital Pulse Meter v{VERSION}\n"));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MeasurementResults, RawMeasurements, StatsAggregator};

    fn sample_report(requested: &[&str]) -> MeasurementReport {
        let raw = RawMeasurements {
            positive_widths: &[5.0, 5.0],
            negative_widths: &[15.0],
            cycle_periods: &[20.0],
        };
        let metrics: MeasurementResults =
            StatsAggregator::new(raw).summarize(&RequestedMetrics::from_names(requested));
        MeasurementReport {
            file: "clk.csv".to_string(),
            channel: "CLK".to_string(),
            range: None,
            rows: 5,
            transitions: 5,
            metrics,
        }
    }

    #[test]
    fn test_format_value_precision() {
        assert_eq!(format_value(0.25), "0.250000000");
    }

    #[test]
    fn test_text_report_lists_requested_categories_only() {
        let report = sample_report(&["dutyMean", "dutyMax"]);
        let text = format_text_report(&report);
        assert!(text.contains("Statistics for: clk.csv"));
        assert!(text.contains("Duty cycle"));
        assert!(text.contains("0.250000000"));
        assert!(!text.contains("Frequency"));
        assert!(!text.contains("Positive pulse width"));
    }

    #[test]
    fn test_text_report_without_metrics() {
        let report = sample_report(&["bogus"]);
        assert!(format_text_report(&report).contains("No supported measurements requested."));
    }

    #[test]
    fn test_json_report_uses_protocol_names() {
        let report = sample_report(&["posPulseWidthMean", "freqMin"]);
        let json = format_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metrics"]["posPulseWidthMean"], 5.0);
        assert_eq!(value["metrics"]["freqMin"], 0.05);
        assert!(value["metrics"].get("dutyMean").is_none());
        assert_eq!(value["channel"], "CLK");
    }
}
