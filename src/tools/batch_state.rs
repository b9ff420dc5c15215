//! 批处理统计
//!
//! 按文件记录批量测量结果：成功文件数、送入测量器的跳变总数，
//! 以及按错误类别归档的失败文件。串行和并行各有一个记录器。

use super::processor::{BatchEntry, FileOutcome};
use super::utils;
use crate::error::ErrorCategory;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 批处理统计快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStatsSnapshot {
    /// 成功测量的文件数
    pub processed: usize,
    /// 失败的文件数
    pub failed: usize,
    /// 成功文件累计的跳变条数
    pub transitions: usize,
    /// 错误类别 -> 失败文件名（类别有序）
    pub error_stats: BTreeMap<ErrorCategory, Vec<String>>,
}

impl BatchStatsSnapshot {
    /// 已记录的文件总数
    #[inline]
    pub fn recorded(&self) -> usize {
        self.processed + self.failed
    }

    /// 按类别遍历失败文件
    pub fn sorted_errors(&self) -> impl Iterator<Item = (ErrorCategory, &[String])> + '_ {
        self.error_stats
            .iter()
            .map(|(category, files)| (*category, files.as_slice()))
    }

    fn apply(&mut self, entry: &BatchEntry) {
        match &entry.outcome {
            FileOutcome::Measured(report) => {
                self.processed += 1;
                self.transitions += report.transitions;
            }
            FileOutcome::Failed { category, .. } => {
                self.failed += 1;
                self.error_stats
                    .entry(*category)
                    .or_default()
                    .push(utils::extract_filename_lossy(&entry.path));
            }
        }
    }
}

/// 串行批处理统计
#[derive(Debug, Default)]
pub struct SerialBatchStats {
    state: BatchStatsSnapshot,
}

impl SerialBatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个文件的结果，返回已记录的文件数
    pub fn record(&mut self, entry: &BatchEntry) -> usize {
        self.state.apply(entry);
        self.state.recorded()
    }

    pub fn snapshot(&self) -> BatchStatsSnapshot {
        self.state.clone()
    }
}

/// 并行批处理统计（rayon工作线程共享）
///
/// 计数走原子变量，失败文件归档需要加锁。
#[derive(Debug, Clone, Default)]
pub struct ParallelBatchStats {
    processed: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    transitions: Arc<AtomicUsize>,
    error_stats: Arc<Mutex<BTreeMap<ErrorCategory, Vec<String>>>>,
}

impl ParallelBatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个文件的结果（线程安全），返回已记录的文件数
    pub fn record(&self, entry: &BatchEntry) -> usize {
        match &entry.outcome {
            FileOutcome::Measured(report) => {
                self.transitions
                    .fetch_add(report.transitions, Ordering::Relaxed);
                self.processed.fetch_add(1, Ordering::Relaxed);
            }
            FileOutcome::Failed { category, .. } => {
                if let Ok(mut stats) = self.error_stats.lock() {
                    stats
                        .entry(*category)
                        .or_default()
                        .push(utils::extract_filename_lossy(&entry.path));
                }
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.processed.load(Ordering::Relaxed) + self.failed.load(Ordering::Relaxed)
    }

    /// 获取统计快照
    ///
    /// 并行完成顺序不确定，快照中的文件名按字典序排列。
    pub fn snapshot(&self) -> BatchStatsSnapshot {
        let mut error_stats = self
            .error_stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default();
        error_stats.values_mut().for_each(|files| files.sort());

        BatchStatsSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            transitions: self.transitions.load(Ordering::Relaxed),
            error_stats,
        }
    }
}
