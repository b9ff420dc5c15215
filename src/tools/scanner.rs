//! 文件扫描模块
//!
//! 负责扫描目录中的采集文件、生成批量输出路径以及批量结果落盘。

use super::batch_state::BatchStatsSnapshot;
use super::cli::{AppConfig, OutputFormat};
use super::constants::{capture::SUPPORTED_EXTENSIONS, output::BATCH_FILE_SUFFIX};
use super::formatter;
use super::processor::BatchEntry;
use super::utils;
use crate::error::{MeasureError, MeasureResult};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// 判断文件扩展名是否受支持
fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 之前批量运行生成的汇总文件（同样是 .txt，需跳过）
fn is_batch_summary(path: &Path) -> bool {
    utils::extract_filename_lossy(path).contains(BATCH_FILE_SUFFIX)
}

/// 扫描目录中的采集文件
///
/// 默认只扫描当前目录，`recursive` 为真时递归子目录。结果按路径排序。
pub fn scan_capture_files(dir_path: &Path, recursive: bool) -> MeasureResult<Vec<PathBuf>> {
    if !dir_path.exists() {
        return Err(MeasureError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("目录不存在: {}", dir_path.display()),
        )));
    }

    if !dir_path.is_dir() {
        return Err(MeasureError::InvalidInput(format!(
            "路径不是目录: {}",
            dir_path.display()
        )));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut capture_files = Vec::new();

    for entry in WalkDir::new(dir_path).min_depth(1).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_file() && has_supported_extension(path) && !is_batch_summary(path)
        {
            capture_files.push(path.to_path_buf());
        }
    }

    capture_files.sort();
    Ok(capture_files)
}

/// 显示文件扫描结果
pub fn show_scan_results(config: &AppConfig, capture_files: &[PathBuf]) {
    if capture_files.is_empty() {
        println!(
            "[WARNING] 在目录 {} 中没有找到采集文件 / No capture files found",
            config.input_path.display()
        );
        println!(
            "   支持的扩展名 / Supported extensions: {}",
            SUPPORTED_EXTENSIONS.join(", ")
        );
        return;
    }

    println!("[INFO] 扫描目录 / Scanning: {}", config.input_path.display());
    println!(
        "[INFO] 找到 {} 个采集文件 / Found {} capture files",
        capture_files.len(),
        capture_files.len()
    );

    if config.verbose {
        for (i, file) in capture_files.iter().enumerate() {
            println!("   {}. {}", i + 1, utils::extract_filename_lossy(file));
        }
    }
    println!();
}

/// 生成批量输出文件路径
pub fn generate_batch_output_path(config: &AppConfig) -> PathBuf {
    config.output_path.clone().unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let base_name = utils::extract_file_stem_string(&config.input_path);
        config.input_path.join(format!(
            "{base_name}_{BATCH_FILE_SUFFIX}_{timestamp}.{}",
            config.output_format.extension()
        ))
    })
}

/// 生成批量汇总并写入文件，返回写入路径
pub fn finalize_and_write_batch_output(
    config: &AppConfig,
    entries: &[BatchEntry],
    snapshot: &BatchStatsSnapshot,
) -> MeasureResult<PathBuf> {
    let rendered = match config.output_format {
        OutputFormat::Text => formatter::format_batch_text(config, entries, snapshot),
        OutputFormat::Json => formatter::format_batch_json(entries, snapshot)?,
    };

    let output_path = generate_batch_output_path(config);
    std::fs::write(&output_path, &rendered)?;

    show_batch_completion_info(&output_path, snapshot, entries.len(), config);
    Ok(output_path)
}

/// 显示批量处理完成信息
pub fn show_batch_completion_info(
    output_path: &Path,
    snapshot: &BatchStatsSnapshot,
    total_count: usize,
    config: &AppConfig,
) {
    println!();
    println!("[OK] 批量处理完成 / Batch processing completed");
    println!(
        "   成功处理 / Processed: {} / {total_count}",
        snapshot.processed
    );
    if snapshot.failed > 0 {
        println!("   失败文件 / Failed: {}", snapshot.failed);
        if config.verbose {
            for (category, files) in snapshot.sorted_errors() {
                println!("      [{}] {}", category.display_name(), files.join(", "));
            }
        }
    }
    println!("   批量汇总 / Summary: {}", output_path.display());
}
