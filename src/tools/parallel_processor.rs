//! 多文件并行处理模块
//!
//! 使用rayon实现文件级并行处理，保证输出顺序一致性。
//! 单个文件内部的测量仍是串行单遍扫描，每个文件独占一个测量器实例。

use super::batch_state::ParallelBatchStats;
use super::cli::AppConfig;
use super::processor::{BatchEntry, FileOutcome, process_capture_file};
use super::utils;
use crate::error::{MeasureError, MeasureResult};
use rayon::prelude::*;
use std::path::PathBuf;

/// 多文件并行处理
///
/// - 使用rayon线程池精确控制并发度
/// - 线程安全的统计信息收集
/// - 索引排序保证输出顺序与输入一致
pub fn process_batch_parallel(
    capture_files: &[PathBuf],
    config: &AppConfig,
    parallel_degree: usize,
    stats: &ParallelBatchStats,
) -> MeasureResult<Vec<BatchEntry>> {
    println!("[INFO] 启用多文件并行处理 / Parallel files: {parallel_degree}");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_degree)
        .thread_name(|i| format!("pulse-worker-{i}"))
        .build()
        .map_err(|e| MeasureError::ResourceError(format!("线程池创建失败: {e}")))?;

    // 静默处理单个文件（避免输出交错）
    let silent_config = AppConfig {
        verbose: false,
        ..config.clone()
    };

    let mut indexed: Vec<(usize, BatchEntry)> = pool.install(|| {
        capture_files
            .par_iter()
            .enumerate()
            .map(|(index, path)| {
                let entry = BatchEntry::from_result(path, process_capture_file(path, &silent_config));
                let count = stats.record(&entry);

                if config.verbose {
                    let filename = utils::extract_filename_lossy(path);
                    match &entry.outcome {
                        FileOutcome::Measured(_) => {
                            println!("[OK] [{count}/{}] {filename}", capture_files.len());
                        }
                        FileOutcome::Failed { category, message } => {
                            println!("[FAIL] {filename} - [{}] {message}", category.display_name());
                        }
                    }
                }

                (index, entry)
            })
            .collect()
    });

    // 按原始顺序排序结果
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, entry)| entry).collect())
}
