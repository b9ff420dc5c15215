//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// 默认配置值
pub mod defaults {
    /// 默认分析通道（零起始索引，也可使用表头名称）
    pub const CHANNEL: &str = "0";

    /// 默认多文件并行并发度
    ///
    /// 单个采集文件的测量是纯串行单遍扫描，
    /// 并行只发生在文件级别，4并发度足以覆盖常见批量规模
    pub const PARALLEL_FILES_DEGREE: usize = 4;
}

/// 并发度限制常量
pub mod parallel_limits {
    /// 最小并发度
    pub const MIN_PARALLEL_DEGREE: usize = 1;

    /// 最大并发度
    ///
    /// 限制最大并发度为16，避免过度并发导致的上下文切换开销
    pub const MAX_PARALLEL_DEGREE: usize = 16;
}

/// 采集文件相关常量
pub mod capture {
    /// 批量模式扫描的文件扩展名（小写）
    pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "txt"];
}

/// 输出格式常量
pub mod output {
    /// 数值输出的有效小数位
    pub const VALUE_PRECISION: usize = 9;

    /// 批量汇总文件名后缀
    pub const BATCH_FILE_SUFFIX: &str = "PulseMeter_Results";
}
