//! 工具函数模块
//!
//! 提供文件路径处理、并发度计算等通用工具函数。

use super::constants::parallel_limits;

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 安全提取文件stem（返回String）
    #[inline]
    pub fn extract_file_stem_string(path: &Path) -> String {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("capture")
            .to_string()
    }
}

/// 计算实际并发度
///
/// 限制在 [MIN, MAX] 区间内，并且不超过任务数（任务数为0时按1计）。
pub fn effective_parallel_degree(requested: usize, task_count: Option<usize>) -> usize {
    let degree = requested.clamp(
        parallel_limits::MIN_PARALLEL_DEGREE,
        parallel_limits::MAX_PARALLEL_DEGREE,
    );
    match task_count {
        Some(tasks) => degree.min(tasks.max(1)),
        None => degree,
    }
}

// 重新导出为平级函数
pub use path::{extract_file_stem_string, extract_filename_lossy};
