//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use super::constants::{defaults, parallel_limits};
use crate::capture::MeasurementRange;
use crate::core::{Metric, RequestedMetrics};
use crate::error::{MeasureError, MeasureResult, invalid_input};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 结果输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 人类可读的表格报告
    #[default]
    Text,
    /// JSON对象（便于宿主程序解析）
    Json,
}

impl OutputFormat {
    fn from_arg(value: &str) -> MeasureResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(MeasureError::InvalidInput(format!(
                "未知输出格式 '{other}'（可选: text, json）"
            ))),
        }
    }

    /// 输出文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 输入采集文件路径（单文件模式）或扫描目录（批量模式）
    pub input_path: PathBuf,

    /// 分析通道（表头名称或零起始索引）
    pub channel: String,

    /// 请求的测量项名称（原样保留，不受支持的名称由测量器忽略）
    pub metric_names: Vec<String>,

    /// 测量区间（可选）
    pub range: Option<MeasurementRange>,

    /// 输出格式
    pub output_format: OutputFormat,

    /// 输出文件路径（可选，批量模式时自动生成）
    pub output_path: Option<PathBuf>,

    /// 批量模式是否递归扫描子目录
    pub recursive: bool,

    /// 多文件并行度：None = 串行，Some(n) = n个文件并发
    pub parallel_files: Option<usize>,

    /// 是否显示详细信息
    pub verbose: bool,
}

impl AppConfig {
    /// 以默认设置创建配置（请求全部测量项）
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            channel: defaults::CHANNEL.to_string(),
            metric_names: Metric::ALL.iter().map(|m| m.name().to_string()).collect(),
            range: None,
            output_format: OutputFormat::Text,
            output_path: None,
            recursive: false,
            parallel_files: Some(defaults::PARALLEL_FILES_DEGREE),
            verbose: false,
        }
    }

    /// 智能判断是否为批量模式（基于路径类型）
    #[inline]
    pub fn is_batch_mode(&self) -> bool {
        self.input_path.is_dir()
    }

    /// 构造测量器使用的请求集合
    pub fn requested_metrics(&self) -> RequestedMetrics {
        RequestedMetrics::from_names(&self.metric_names)
    }
}

/// 构建命令行定义
fn build_command() -> Command {
    Command::new("pulse-meter")
        .version(VERSION)
        .about(DESCRIPTION)
        .arg(
            Arg::new("INPUT")
                .help("采集CSV文件或目录路径 / Capture CSV file or directory")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("channel")
                .long("channel")
                .short('c')
                .help("分析通道：表头名称或零起始索引 / Channel name or zero-based index")
                .value_name("CHANNEL")
                .default_value(defaults::CHANNEL),
        )
        .arg(
            Arg::new("metrics")
                .long("metrics")
                .short('m')
                .help("逗号分隔的测量项名称，默认全部 / Comma-separated measurement names")
                .value_name("NAMES")
                .value_delimiter(','),
        )
        .arg(
            Arg::new("range")
                .long("range")
                .help("测量区间起止时间 / Measurement range START END")
                .value_names(["START", "END"])
                .num_args(2)
                .value_parser(clap::value_parser!(f64))
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("输出格式: text 或 json / Output format")
                .value_name("FORMAT")
                .default_value("text"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("输出结果到文件 / Write results to file")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("recursive")
                .long("recursive")
                .short('r')
                .help("批量模式递归扫描子目录 / Scan subdirectories in batch mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("parallel-files")
                .long("parallel-files")
                .help("多文件并发度 / Number of files processed in parallel")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .conflicts_with("serial"),
        )
        .arg(
            Arg::new("serial")
                .long("serial")
                .help("禁用多文件并行 / Disable parallel file processing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息 / Verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// 解析进程命令行参数并创建配置
///
/// `--help`/`--version` 与参数语法错误由clap直接处理并退出。
pub fn parse_args() -> MeasureResult<AppConfig> {
    config_from_matches(&build_command().get_matches())
}

/// 从给定参数列表解析配置（第一个元素为程序名）
pub fn parse_args_from<I, T>(args: I) -> MeasureResult<AppConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command()
        .try_get_matches_from(args)
        .map_err(|e| invalid_input("命令行参数解析失败", e))?;
    config_from_matches(&matches)
}

fn config_from_matches(matches: &ArgMatches) -> MeasureResult<AppConfig> {
    let input_path = matches
        .get_one::<String>("INPUT")
        .map(PathBuf::from)
        .ok_or_else(|| MeasureError::InvalidInput("缺少输入路径".to_string()))?;

    let mut config = AppConfig::new(input_path);

    if let Some(channel) = matches.get_one::<String>("channel") {
        config.channel = channel.clone();
    }

    if let Some(names) = matches.get_many::<String>("metrics") {
        config.metric_names = names
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(values) = matches.get_many::<f64>("range") {
        let bounds: Vec<f64> = values.copied().collect();
        if let [start, end] = bounds[..] {
            config.range = Some(MeasurementRange::new(start, end)?);
        }
    }

    if let Some(format) = matches.get_one::<String>("format") {
        config.output_format = OutputFormat::from_arg(format)?;
    }

    config.output_path = matches.get_one::<String>("output").map(PathBuf::from);
    config.recursive = matches.get_flag("recursive");
    config.verbose = matches.get_flag("verbose");

    config.parallel_files = if matches.get_flag("serial") {
        None
    } else {
        let degree = matches
            .get_one::<usize>("parallel-files")
            .copied()
            .unwrap_or(defaults::PARALLEL_FILES_DEGREE);
        Some(degree.clamp(
            parallel_limits::MIN_PARALLEL_DEGREE,
            parallel_limits::MAX_PARALLEL_DEGREE,
        ))
    };

    Ok(config)
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("Digital Pulse Meter v{VERSION}");
    println!("{DESCRIPTION}");
    if config.verbose {
        println!(
            "[INFO] 通道 / Channel: {}，测量项 / Metrics: {}",
            config.channel,
            config.metric_names.join(", ")
        );
        if let Some(range) = config.range {
            println!(
                "[INFO] 测量区间 / Range: [{}, {}]",
                range.start, range.end
            );
        }
        let requested = config.requested_metrics();
        if !requested.ignored().is_empty() {
            println!(
                "[WARNING] 忽略不受支持的测量项 / Ignoring unsupported metrics: {}",
                requested.ignored().join(", ")
            );
        }
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose {
        eprintln!("[OK] 所有任务处理完成 / All tasks completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse_args_from(["pulse-meter", "capture.csv"]).unwrap();
        assert_eq!(config.channel, "0");
        assert_eq!(config.metric_names.len(), 12);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert_eq!(config.parallel_files, Some(defaults::PARALLEL_FILES_DEGREE));
        assert!(config.range.is_none());
    }

    #[test]
    fn test_metric_list_and_range() {
        let config = parse_args_from([
            "pulse-meter",
            "capture.csv",
            "--metrics",
            "dutyMean,freqMax",
            "--range",
            "0.5",
            "2.5",
        ])
        .unwrap();
        assert_eq!(config.metric_names, vec!["dutyMean", "freqMax"]);
        assert_eq!(config.range, Some(MeasurementRange::new(0.5, 2.5).unwrap()));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let result = parse_args_from(["pulse-meter", "x.csv", "--range", "3", "1"]);
        assert!(matches!(result, Err(MeasureError::InvalidInput(_))));
    }

    #[test]
    fn test_serial_and_parallel_degree() {
        let serial = parse_args_from(["pulse-meter", "dir", "--serial"]).unwrap();
        assert_eq!(serial.parallel_files, None);

        let clamped = parse_args_from(["pulse-meter", "dir", "--parallel-files", "64"]).unwrap();
        assert_eq!(
            clamped.parallel_files,
            Some(parallel_limits::MAX_PARALLEL_DEGREE)
        );
    }

    #[test]
    fn test_unknown_format() {
        let result = parse_args_from(["pulse-meter", "x.csv", "--format", "xml"]);
        assert!(result.is_err());
    }
}
