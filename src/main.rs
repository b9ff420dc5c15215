//! Digital Pulse Meter - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成采集文件的脉冲测量。

use digital_pulse_meter::{
    error::{ErrorCategory, MeasureError},
    tools::{self, AppConfig, OutputFormat, ParallelBatchStats, SerialBatchStats},
};
use std::path::PathBuf;
use std::process;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 参数/输入错误
    pub const INPUT_ERROR: i32 = 2;
    /// 采集文件格式错误
    pub const FORMAT_ERROR: i32 = 3;
    /// 资源错误
    pub const RESOURCE_ERROR: i32 = 5;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &MeasureError) -> &'static str {
    match error {
        MeasureError::ResourceError(_) => {
            "资源不可用，请降低并发度或使用 --serial / Resource unavailable, reduce parallelism or use --serial"
        }
        _ => match ErrorCategory::from_error(error) {
            ErrorCategory::Io => {
                "检查文件路径是否正确，文件是否存在且可读 / Check if file path is correct, file exists and is readable"
            }
            ErrorCategory::Format => {
                "确保输入为逻辑分析仪导出的数字通道CSV / Ensure input is a digital-channel CSV export"
            }
            ErrorCategory::Input => {
                "检查命令行参数是否正确，使用 --help 查看完整用法 / Check command-line arguments, use --help"
            }
            ErrorCategory::Other => "请检查输入文件和参数设置 / Please check input file and parameters",
        },
    }
}

/// 错误处理和建议
fn handle_error(error: MeasureError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(&error));

    let exit_code = match &error {
        MeasureError::ResourceError(_) => exit_codes::RESOURCE_ERROR,
        _ => match ErrorCategory::from_error(&error) {
            ErrorCategory::Input => exit_codes::INPUT_ERROR,
            ErrorCategory::Format => exit_codes::FORMAT_ERROR,
            ErrorCategory::Io | ErrorCategory::Other => exit_codes::GENERAL_ERROR,
        },
    };

    process::exit(exit_code);
}

/// 批量处理采集文件
fn process_batch_mode(config: &AppConfig) -> Result<(), MeasureError> {
    let capture_files = tools::scan_capture_files(&config.input_path, config.recursive)?;
    tools::show_scan_results(config, &capture_files);

    if capture_files.is_empty() {
        return Ok(());
    }

    let degree = config
        .parallel_files
        .map(|d| tools::utils::effective_parallel_degree(d, Some(capture_files.len())))
        .unwrap_or(1);

    if degree > 1 {
        let stats = ParallelBatchStats::new();
        match tools::process_batch_parallel(&capture_files, config, degree, &stats) {
            Ok(entries) => {
                tools::finalize_and_write_batch_output(config, &entries, &stats.snapshot())?;
                return Ok(());
            }
            Err(e) => {
                eprintln!(
                    "[WARNING] 并行处理失败 / Parallel processing failed: {e}，回退到串行模式 / fallback to serial"
                );
            }
        }
    } else if config.verbose {
        println!("[INFO] 使用串行模式 / Using serial mode");
    }

    process_batch_serial(config, &capture_files)
}

/// 串行批量处理
fn process_batch_serial(config: &AppConfig, capture_files: &[PathBuf]) -> Result<(), MeasureError> {
    let mut stats = SerialBatchStats::new();
    let entries = tools::process_batch_serial(capture_files, config, &mut stats);
    tools::finalize_and_write_batch_output(config, &entries, &stats.snapshot())?;
    Ok(())
}

/// 单文件处理模式
fn process_single_mode(config: &AppConfig) -> Result<(), MeasureError> {
    let report = tools::process_capture_file(&config.input_path, config)?;
    tools::output_report(&report, config)
}

/// 应用程序主逻辑
fn run() -> Result<(), MeasureError> {
    let config = tools::parse_args()?;
    tools::init_logging(config.verbose);

    // JSON输出保持stdout纯净
    if config.output_format == OutputFormat::Text {
        tools::show_startup_info(&config);
    }

    if config.is_batch_mode() {
        process_batch_mode(&config)?;
    } else {
        process_single_mode(&config)?;
    }

    tools::show_completion_info(&config);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
