//! 核心算法模块
//!
//! 边沿跟踪状态机与配对周期统计，是整个测量引擎唯一的非平凡部分。

pub mod edge_tracker;
pub mod metric;
pub mod series_stats;
pub mod stats_aggregator;
pub mod transition;

// 重新导出公共接口
pub use edge_tracker::{EdgeTracker, RawMeasurements};
pub use metric::{Metric, MetricCategory, RequestedMetrics, Statistic, UnknownMetric};
pub use series_stats::SeriesStats;
pub use stats_aggregator::{CycleSamples, MeasurementResults, StatsAggregator};
pub use transition::{EdgeKind, Transition};
