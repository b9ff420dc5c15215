//! 统一错误处理框架
//!
//! 核心测量引擎没有失败路径；这里的错误只来自宿主层：
//! 参数校验、文件读取、采集文件解析和结果输出。

use std::fmt;
use std::io;

/// 宿主层统一错误类型
#[derive(Debug)]
pub enum MeasureError {
    /// 输入验证错误（参数、通道、测量区间）
    InvalidInput(String),

    /// 文件I/O错误
    IoError(io::Error),

    /// 采集文件格式错误
    FormatError(String),

    /// 结果序列化错误
    SerializationError(String),

    /// 资源访问错误（线程池等）
    ResourceError(String),
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureError::InvalidInput(msg) => write!(f, "输入验证失败: {msg}"),
            MeasureError::IoError(err) => write!(f, "文件I/O错误: {err}"),
            MeasureError::FormatError(msg) => write!(f, "采集文件格式错误: {msg}"),
            MeasureError::SerializationError(msg) => write!(f, "结果序列化失败: {msg}"),
            MeasureError::ResourceError(msg) => write!(f, "资源访问错误: {msg}"),
        }
    }
}

impl std::error::Error for MeasureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeasureError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MeasureError {
    fn from(err: io::Error) -> Self {
        MeasureError::IoError(err)
    }
}

impl From<serde_json::Error> for MeasureError {
    fn from(err: serde_json::Error) -> Self {
        MeasureError::SerializationError(format!("JSON输出错误: {err}"))
    }
}

/// 宿主层操作的标准Result类型
pub type MeasureResult<T> = Result<T, MeasureError>;

// ==================== 错误转换Helper函数 ====================

/// 创建格式错误（附带行号）
#[inline]
pub fn format_error<E: fmt::Display>(line: usize, err: E) -> MeasureError {
    MeasureError::FormatError(format!("第{line}行: {err}"))
}

/// 创建输入验证错误
#[inline]
pub fn invalid_input<E: fmt::Display>(context: &str, err: E) -> MeasureError {
    MeasureError::InvalidInput(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================
// 用于批量处理中的错误统计和退出码映射

/// 错误类别枚举
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// 采集文件格式错误
    Format,
    /// I/O相关错误（文件不存在、权限不足等）
    Io,
    /// 参数与输入错误
    Input,
    /// 其他未分类错误
    Other,
}

impl ErrorCategory {
    /// 从MeasureError提取错误类别
    pub fn from_error(e: &MeasureError) -> Self {
        match e {
            MeasureError::FormatError(_) => Self::Format,
            MeasureError::IoError(_) => Self::Io,
            MeasureError::InvalidInput(_) => Self::Input,
            MeasureError::SerializationError(_) | MeasureError::ResourceError(_) => Self::Other,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Format => "格式错误",
            Self::Io => "I/O错误",
            Self::Input => "输入错误",
            Self::Other => "其他错误",
        }
    }
}
