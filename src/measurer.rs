//! 宿主测量接口
//!
//! 宿主应用按"批量写入跳变 → 一次性取结果"的两步协议驱动测量器。
//! 请求的测量项在构造时给定，之后不可变；每次测量使用独立的实例。

use crate::core::{
    EdgeTracker, Metric, MeasurementResults, RequestedMetrics, StatsAggregator, Transition,
};

/// 数字信号测量器协议
pub trait DigitalMeasurer {
    /// 按顺序写入跳变流；第一条为观测窗口起点的初始状态
    fn process_data<I>(&mut self, data: I)
    where
        I: IntoIterator,
        I::Item: Into<Transition>;

    /// 所有数据写入完毕后计算结果
    fn measure(&self) -> MeasurementResults;
}

/// 脉宽 / 占空比 / 频率测量器
///
/// # 示例
///
/// ```rust
/// use digital_pulse_meter::{DigitalMeasurer, PulseMeasurer};
///
/// let mut measurer = PulseMeasurer::new(["dutyMean", "freqMean"]);
/// measurer.process_data([(0.0, false), (10.0, true), (15.0, false), (30.0, true), (35.0, false)]);
///
/// let results = measurer.measure();
/// assert_eq!(results.get_by_name("dutyMean"), Some(0.25));
/// assert_eq!(results.get_by_name("freqMean"), Some(0.05));
/// ```
#[derive(Debug, Clone)]
pub struct PulseMeasurer {
    requested: RequestedMetrics,
    tracker: EdgeTracker,
}

impl PulseMeasurer {
    /// 以请求的测量项名称构造；不受支持的名称被忽略
    pub fn new<I, S>(requested_measurements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_requested(RequestedMetrics::from_names(requested_measurements))
    }

    pub fn with_requested(requested: RequestedMetrics) -> Self {
        Self {
            requested,
            tracker: EdgeTracker::new(),
        }
    }

    /// 本测量器可返回的全部测量项名称
    pub fn supported_measurements() -> [&'static str; 12] {
        Metric::ALL.map(|m| m.name())
    }

    pub fn requested(&self) -> &RequestedMetrics {
        &self.requested
    }
}

impl DigitalMeasurer for PulseMeasurer {
    fn process_data<I>(&mut self, data: I)
    where
        I: IntoIterator,
        I::Item: Into<Transition>,
    {
        self.tracker.consume_all(data);
    }

    fn measure(&self) -> MeasurementResults {
        StatsAggregator::new(self.tracker.raw()).summarize(&self.requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_measurements_list() {
        let names = PulseMeasurer::supported_measurements();
        assert_eq!(names.len(), 12);
        assert_eq!(names[0], "posPulseWidthMean");
        assert_eq!(names[11], "freqMax");
    }

    #[test]
    fn test_measure_without_data() {
        let measurer = PulseMeasurer::new(["negPulseWidthMin", "dutyMax"]);
        let results = measurer.measure();
        assert_eq!(results.get_by_name("negPulseWidthMin"), Some(0.0));
        assert_eq!(results.get_by_name("dutyMax"), Some(0.0));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_process_data_can_be_split() {
        // 分多次写入与一次写入结果一致（状态在调用之间保留）
        let mut split = PulseMeasurer::new(PulseMeasurer::supported_measurements());
        split.process_data([(0.0, false), (1.0, true)]);
        split.process_data([(3.0, false), (5.0, true), (6.0, false)]);

        let mut whole = PulseMeasurer::new(PulseMeasurer::supported_measurements());
        whole.process_data([
            (0.0, false),
            (1.0, true),
            (3.0, false),
            (5.0, true),
            (6.0, false),
        ]);

        assert_eq!(split.measure(), whole.measure());
    }
}
