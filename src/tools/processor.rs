//! 测量处理模块
//!
//! 负责单个采集文件的加载与测量、结果输出，以及串行批量处理。

use super::batch_state::SerialBatchStats;
use super::cli::AppConfig;
use super::formatter;
use super::utils;
use crate::capture::Capture;
use crate::core::MeasurementResults;
use crate::error::{ErrorCategory, MeasureError, MeasureResult};
use crate::measurer::{DigitalMeasurer, PulseMeasurer};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 单个采集文件的测量报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementReport {
    /// 采集名称（文件名）
    pub file: String,

    /// 实际分析的通道名称
    pub channel: String,

    /// 测量区间（未指定时为None）
    pub range: Option<[f64; 2]>,

    /// 采集文件总行数
    pub rows: usize,

    /// 送入测量器的跳变条数（含初始状态）
    pub transitions: usize,

    /// 测量结果
    pub metrics: MeasurementResults,
}

/// 批量处理中单个文件的结果
#[derive(Debug)]
pub enum FileOutcome {
    Measured(MeasurementReport),
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

/// 批量条目（保持输入顺序）
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl BatchEntry {
    pub fn from_result(path: &Path, result: MeasureResult<MeasurementReport>) -> Self {
        let outcome = match result {
            Ok(report) => FileOutcome::Measured(report),
            Err(e) => FileOutcome::Failed {
                category: ErrorCategory::from_error(&e),
                message: e.to_string(),
            },
        };
        Self {
            path: path.to_path_buf(),
            outcome,
        }
    }

    pub fn report(&self) -> Option<&MeasurementReport> {
        match &self.outcome {
            FileOutcome::Measured(report) => Some(report),
            FileOutcome::Failed { .. } => None,
        }
    }
}

/// 对已加载的采集数据执行一次测量
///
/// 每次调用创建独立的测量器实例，不共享任何状态。
pub fn measure_capture(capture: &Capture, config: &AppConfig) -> MeasureResult<MeasurementReport> {
    let channel = capture.channel_index(&config.channel)?;
    let transitions = capture.transitions(channel, config.range)?;

    let mut measurer = PulseMeasurer::with_requested(config.requested_metrics());
    measurer.process_data(transitions.iter().copied());

    Ok(MeasurementReport {
        file: capture.name().to_string(),
        channel: capture.channel_names()[channel].clone(),
        range: config.range.map(|r| [r.start, r.end]),
        rows: capture.row_count(),
        transitions: transitions.len(),
        metrics: measurer.measure(),
    })
}

/// 加载并测量单个采集文件
pub fn process_capture_file(path: &Path, config: &AppConfig) -> MeasureResult<MeasurementReport> {
    if !path.is_file() {
        return Err(MeasureError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("文件不存在: {}", path.display()),
        )));
    }

    let capture = Capture::from_path(path)?;
    if config.verbose {
        eprintln!(
            "[INFO] 已加载 / Loaded: {} ({} 行 / rows, 通道 / channels: {})",
            capture.name(),
            capture.row_count(),
            capture.channel_names().join(", ")
        );
    }

    measure_capture(&capture, config)
}

/// 按配置格式渲染单文件报告
pub fn render_report(report: &MeasurementReport, config: &AppConfig) -> MeasureResult<String> {
    match config.output_format {
        super::cli::OutputFormat::Text => Ok(formatter::format_text_report(report)),
        super::cli::OutputFormat::Json => formatter::format_json_report(report),
    }
}

/// 输出单文件结果（控制台 + 可选文件）
pub fn output_report(report: &MeasurementReport, config: &AppConfig) -> MeasureResult<()> {
    write_report(&mut std::io::stdout().lock(), report, config)
}

/// 将报告写入给定输出，并按配置另存文件
///
/// `out` 只接收报告本身，状态提示走stderr，JSON模式下输出可直接解析。
pub fn write_report<W: Write>(
    out: &mut W,
    report: &MeasurementReport,
    config: &AppConfig,
) -> MeasureResult<()> {
    let rendered = render_report(report, config)?;
    out.write_all(rendered.as_bytes())?;
    out.flush()?;

    if let Some(output_path) = &config.output_path {
        std::fs::write(output_path, &rendered)?;
        eprintln!(
            "[OK] 结果已保存 / Results saved: {}",
            output_path.display()
        );
    }

    Ok(())
}

/// 串行批量处理
///
/// 逐个文件测量，单个文件失败不会中断批处理。返回按输入顺序排列的条目。
pub fn process_batch_serial(
    capture_files: &[PathBuf],
    config: &AppConfig,
    stats: &mut SerialBatchStats,
) -> Vec<BatchEntry> {
    let mut entries = Vec::with_capacity(capture_files.len());

    for (index, path) in capture_files.iter().enumerate() {
        let filename = utils::extract_filename_lossy(path);
        if config.verbose {
            println!(
                "[PROCESSING] [{}/{}] 处理 / Processing: {filename}",
                index + 1,
                capture_files.len()
            );
        }

        let entry = BatchEntry::from_result(path, process_capture_file(path, config));
        stats.record(&entry);
        if let FileOutcome::Failed { category, message } = &entry.outcome {
            println!(
                "[FAIL] [{}/{}] {filename} - [{}] {message} / 处理失败",
                index + 1,
                capture_files.len(),
                category.display_name()
            );
        }

        entries.push(entry);
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Metric;

    const SQUARE: &str = "Time [s],CLK\n0,1\n5,0\n10,1\n15,0\n20,1\n25,0\n";

    #[test]
    fn test_measure_capture_square_wave() {
        let capture = Capture::parse_str("square.csv", SQUARE).unwrap();
        let config = AppConfig::new("square.csv");
        let report = measure_capture(&capture, &config).unwrap();

        assert_eq!(report.channel, "CLK");
        assert_eq!(report.transitions, 6);
        assert_eq!(report.metrics.get(Metric::PosPulseWidthMean), Some(5.0));
        assert_eq!(report.metrics.get(Metric::NegPulseWidthMean), Some(5.0));
        assert_eq!(report.metrics.get(Metric::DutyMean), Some(0.5));
        assert_eq!(report.metrics.get(Metric::FreqMean), Some(0.1));
    }

    #[test]
    fn test_measure_capture_unknown_channel() {
        let capture = Capture::parse_str("square.csv", SQUARE).unwrap();
        let config = AppConfig {
            channel: "MOSI".to_string(),
            ..AppConfig::new("square.csv")
        };
        let err = measure_capture(&capture, &config).unwrap_err();
        assert_eq!(ErrorCategory::from_error(&err), ErrorCategory::Input);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let config = AppConfig::new("missing.csv");
        let err = process_capture_file(Path::new("definitely/missing.csv"), &config).unwrap_err();
        assert!(matches!(err, MeasureError::IoError(_)));
    }
}
