//! 工具模块集合
//!
//! 参考宿主程序：CLI、文件扫描、测量处理、格式化输出，支持main.rs的流程控制。

pub mod batch_state;
pub mod cli;
pub mod constants;
pub mod formatter;
pub mod logging;
pub mod parallel_processor;
pub mod processor;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use batch_state::{BatchStatsSnapshot, ParallelBatchStats, SerialBatchStats};
pub use cli::{AppConfig, OutputFormat, parse_args, show_completion_info, show_startup_info};
pub use formatter::{format_batch_json, format_batch_text, format_json_report, format_text_report};
pub use logging::init_logging;
pub use parallel_processor::process_batch_parallel;
pub use processor::{
    BatchEntry, FileOutcome, MeasurementReport, measure_capture, output_report,
    process_batch_serial, process_capture_file, render_report, write_report,
};
pub use scanner::{
    finalize_and_write_batch_output, generate_batch_output_path, scan_capture_files,
    show_scan_results,
};
