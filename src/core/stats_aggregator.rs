//! 统计聚合器
//!
//! 跳变流消费完毕后，对原始序列做纯归约：
//! 1. 将周期序列与正脉宽序列按位置配对，派生占空比与频率序列
//! 2. 对每个被请求的类别计算 min / max / mean
//! 3. 只输出被请求且受支持的测量项
//!
//! ## 按位置配对（已知近似）
//!
//! 第 i 个周期与第 i 个正脉宽配对，而不是按时间重叠匹配。
//! 单脉冲周期的简单波形下结果正确；一个周期内有多个脉冲时结果不可靠。

use super::edge_tracker::RawMeasurements;
use super::metric::{Metric, MetricCategory, RequestedMetrics};
use super::series_stats::SeriesStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// 配对派生的占空比与频率序列（同一索引顺序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSamples {
    pub duty: Vec<f64>,
    pub frequency: Vec<f64>,
}

impl CycleSamples {
    /// 配对样本数
    #[inline]
    pub fn len(&self) -> usize {
        self.duty.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.duty.is_empty()
    }
}

/// 测量结果：测量项名称 → 数值
///
/// 按规范顺序存储，序列化为以名称为键的对象。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MeasurementResults {
    values: BTreeMap<Metric, f64>,
}

impl MeasurementResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric, value);
    }

    #[inline]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    /// 按宿主协议名称查询
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        Metric::from_name(name).and_then(|m| self.get(m))
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.values.contains_key(&metric)
    }

    /// 按规范顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.values.iter().map(|(&m, &v)| (m, v))
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 转换为名称键控的映射（宿主接口形式）
    pub fn to_name_map(&self) -> BTreeMap<&'static str, f64> {
        self.iter().map(|(m, v)| (m.name(), v)).collect()
    }
}

/// 统计聚合器（只读借用原始序列）
#[derive(Debug, Clone, Copy)]
pub struct StatsAggregator<'a> {
    raw: RawMeasurements<'a>,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(raw: RawMeasurements<'a>) -> Self {
        Self { raw }
    }

    /// 按位置配对派生占空比与频率
    ///
    /// 配对数 = min(周期数, 正脉宽数)；周期不大于 0 时两者都记为 0。
    ///
    /// # 示例
    ///
    /// ```rust
    /// use digital_pulse_meter::core::{RawMeasurements, StatsAggregator};
    ///
    /// let raw = RawMeasurements {
    ///     positive_widths: &[5.0, 5.0],
    ///     negative_widths: &[15.0],
    ///     cycle_periods: &[20.0],
    /// };
    /// let samples = StatsAggregator::new(raw).derive_cycle_samples();
    /// assert_eq!(samples.duty, vec![0.25]);
    /// assert_eq!(samples.frequency, vec![0.05]);
    /// ```
    pub fn derive_cycle_samples(&self) -> CycleSamples {
        let pairs = self
            .raw
            .cycle_periods
            .len()
            .min(self.raw.positive_widths.len());

        let mut samples = CycleSamples {
            duty: Vec::with_capacity(pairs),
            frequency: Vec::with_capacity(pairs),
        };

        for (&period, &high) in self
            .raw
            .cycle_periods
            .iter()
            .zip(self.raw.positive_widths)
            .take(pairs)
        {
            let (duty, frequency) = if period > 0.0 {
                (high / period, 1.0 / period)
            } else {
                (0.0, 0.0)
            };
            samples.duty.push(duty);
            samples.frequency.push(frequency);
        }

        samples
    }

    /// 计算单个类别的完整统计
    pub fn series_stats(&self, category: MetricCategory) -> SeriesStats {
        match category {
            MetricCategory::PositiveWidth => SeriesStats::from_values(self.raw.positive_widths),
            MetricCategory::NegativeWidth => SeriesStats::from_values(self.raw.negative_widths),
            MetricCategory::Duty => SeriesStats::from_values(&self.derive_cycle_samples().duty),
            MetricCategory::Frequency => {
                SeriesStats::from_values(&self.derive_cycle_samples().frequency)
            }
        }
    }

    /// 计算被请求的测量项
    ///
    /// 只有至少请求了一项的类别才会被计算；配对序列最多派生一次。
    pub fn summarize(&self, requested: &RequestedMetrics) -> MeasurementResults {
        let mut results = MeasurementResults::new();

        let wants_paired = MetricCategory::ALL
            .into_iter()
            .any(|c| c.is_paired() && requested.wants_category(c));
        let cycle_samples = wants_paired.then(|| self.derive_cycle_samples());

        for category in MetricCategory::ALL {
            if !requested.wants_category(category) {
                continue;
            }

            let stats = match (category, &cycle_samples) {
                (MetricCategory::Duty, Some(samples)) => SeriesStats::from_values(&samples.duty),
                (MetricCategory::Frequency, Some(samples)) => {
                    SeriesStats::from_values(&samples.frequency)
                }
                _ => self.series_stats(category),
            };

            for metric in requested.iter().filter(|m| m.category() == category) {
                results.insert(metric, stats.get(metric.statistic()));
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: &[f64] = &[];

    fn raw<'a>(pos: &'a [f64], neg: &'a [f64], periods: &'a [f64]) -> RawMeasurements<'a> {
        RawMeasurements {
            positive_widths: pos,
            negative_widths: neg,
            cycle_periods: periods,
        }
    }

    #[test]
    fn test_pairing_uses_shorter_sequence() {
        let aggregator = StatsAggregator::new(raw(&[1.0, 2.0, 3.0], EMPTY, &[4.0, 8.0]));
        let samples = aggregator.derive_cycle_samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.duty, vec![0.25, 0.25]);
        assert_eq!(samples.frequency, vec![0.25, 0.125]);
    }

    #[test]
    fn test_zero_period_maps_to_zero() {
        let aggregator = StatsAggregator::new(raw(&[1.0, 1.0], EMPTY, &[0.0, 2.0]));
        let samples = aggregator.derive_cycle_samples();
        assert_eq!(samples.duty, vec![0.0, 0.5]);
        assert_eq!(samples.frequency, vec![0.0, 0.5]);
    }

    #[test]
    fn test_empty_categories_yield_zero() {
        let aggregator = StatsAggregator::new(raw(EMPTY, EMPTY, EMPTY));
        let results = aggregator.summarize(&RequestedMetrics::all());
        assert_eq!(results.len(), 12);
        assert!(results.iter().all(|(_, v)| v == 0.0));
    }

    #[test]
    fn test_only_requested_metrics_are_present() {
        let aggregator = StatsAggregator::new(raw(&[2.0, 4.0], &[1.0], &[6.0]));
        let requested = RequestedMetrics::from_names(["posPulseWidthMax", "freqMin", "rms"]);
        let results = aggregator.summarize(&requested);

        assert_eq!(results.len(), 2);
        assert_eq!(results.get(Metric::PosPulseWidthMax), Some(4.0));
        assert_eq!(results.get_by_name("freqMin"), Some(1.0 / 6.0));
        assert_eq!(results.get_by_name("rms"), None);
        assert!(!results.contains(Metric::NegPulseWidthMean));
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let aggregator = StatsAggregator::new(raw(&[1.0, 3.0], &[2.0], &[4.0]));
        let requested = RequestedMetrics::all();
        assert_eq!(aggregator.summarize(&requested), aggregator.summarize(&requested));
    }

    #[test]
    fn test_name_map_uses_protocol_names() {
        let aggregator = StatsAggregator::new(raw(&[1.0], EMPTY, EMPTY));
        let requested = RequestedMetrics::from_names(["posPulseWidthMean"]);
        let map = aggregator.summarize(&requested).to_name_map();
        assert_eq!(map.get("posPulseWidthMean"), Some(&1.0));
    }
}
