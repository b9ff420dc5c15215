//! Digital Pulse Meter
//!
//! 二值数字信号的单遍流式测量引擎：从按时间排序的电平跳变流中统计
//! 正/负脉宽、占空比和频率的最小值、最大值与平均值。
//!
//! ## 核心特性
//! - 边沿跟踪状态机：单遍扫描，O(N) 时间，每条序列一个连续缓冲
//! - 周期与正脉宽按位置配对派生占空比/频率（单脉冲周期波形下精确）
//! - 空类别与零周期统一回退为 0.0，下游总能得到数值结果
//! - 宿主协议：构造时给定测量项名称，批量写入跳变，一次性取结果
//!
//! ## 示例
//!
//! ```rust
//! use digital_pulse_meter::{DigitalMeasurer, PulseMeasurer};
//!
//! let mut measurer = PulseMeasurer::new(PulseMeasurer::supported_measurements());
//! measurer.process_data([(0.0, true), (5.0, false), (10.0, true), (15.0, false), (20.0, true)]);
//!
//! let results = measurer.measure();
//! assert_eq!(results.get_by_name("posPulseWidthMean"), Some(5.0));
//! assert_eq!(results.get_by_name("dutyMean"), Some(0.5));
//! assert_eq!(results.get_by_name("freqMean"), Some(0.1));
//! ```

pub mod capture;
pub mod core;
pub mod error;
pub mod measurer;
pub mod tools;

// 重新导出核心类型
pub use capture::{Capture, MeasurementRange};
pub use core::{
    EdgeKind, EdgeTracker, MeasurementResults, Metric, MetricCategory, RequestedMetrics,
    StatsAggregator, Transition,
};
pub use error::{ErrorCategory, MeasureError, MeasureResult};
pub use measurer::{DigitalMeasurer, PulseMeasurer};
