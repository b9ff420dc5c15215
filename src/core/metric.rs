//! 测量项定义
//!
//! 十二个受支持的测量项名称（区分大小写），以及它们所属的统计类别。
//! 宿主请求的名称集合在构造时确定，之后不可变。

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// 统计量类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Statistic {
    Mean,
    Min,
    Max,
}

/// 统计类别
///
/// 每个类别对应一条原始或派生序列，按需计算。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricCategory {
    /// 正脉宽（上升沿 → 下降沿）
    PositiveWidth,
    /// 负脉宽（下降沿 → 上升沿）
    NegativeWidth,
    /// 占空比（按位置配对派生）
    Duty,
    /// 频率（按位置配对派生）
    Frequency,
}

impl MetricCategory {
    /// 全部类别
    pub const ALL: [MetricCategory; 4] = [
        Self::PositiveWidth,
        Self::NegativeWidth,
        Self::Duty,
        Self::Frequency,
    ];

    /// 类别显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PositiveWidth => "Positive pulse width",
            Self::NegativeWidth => "Negative pulse width",
            Self::Duty => "Duty cycle",
            Self::Frequency => "Frequency",
        }
    }

    /// 占空比和频率都来自周期与正脉宽的配对
    #[inline]
    pub fn is_paired(&self) -> bool {
        matches!(self, Self::Duty | Self::Frequency)
    }
}

/// 受支持的测量项
///
/// 声明顺序即输出时的规范顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    PosPulseWidthMean,
    PosPulseWidthMin,
    PosPulseWidthMax,
    NegPulseWidthMean,
    NegPulseWidthMin,
    NegPulseWidthMax,
    DutyMean,
    DutyMin,
    DutyMax,
    FreqMean,
    FreqMin,
    FreqMax,
}

impl Metric {
    /// 全部十二个测量项（规范顺序）
    pub const ALL: [Metric; 12] = [
        Self::PosPulseWidthMean,
        Self::PosPulseWidthMin,
        Self::PosPulseWidthMax,
        Self::NegPulseWidthMean,
        Self::NegPulseWidthMin,
        Self::NegPulseWidthMax,
        Self::DutyMean,
        Self::DutyMin,
        Self::DutyMax,
        Self::FreqMean,
        Self::FreqMin,
        Self::FreqMax,
    ];

    /// 宿主协议中使用的名称（区分大小写）
    pub fn name(&self) -> &'static str {
        match self {
            Self::PosPulseWidthMean => "posPulseWidthMean",
            Self::PosPulseWidthMin => "posPulseWidthMin",
            Self::PosPulseWidthMax => "posPulseWidthMax",
            Self::NegPulseWidthMean => "negPulseWidthMean",
            Self::NegPulseWidthMin => "negPulseWidthMin",
            Self::NegPulseWidthMax => "negPulseWidthMax",
            Self::DutyMean => "dutyMean",
            Self::DutyMin => "dutyMin",
            Self::DutyMax => "dutyMax",
            Self::FreqMean => "freqMean",
            Self::FreqMin => "freqMin",
            Self::FreqMax => "freqMax",
        }
    }

    /// 按名称查找，不受支持的名称返回 `None`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    pub fn category(&self) -> MetricCategory {
        match self {
            Self::PosPulseWidthMean | Self::PosPulseWidthMin | Self::PosPulseWidthMax => {
                MetricCategory::PositiveWidth
            }
            Self::NegPulseWidthMean | Self::NegPulseWidthMin | Self::NegPulseWidthMax => {
                MetricCategory::NegativeWidth
            }
            Self::DutyMean | Self::DutyMin | Self::DutyMax => MetricCategory::Duty,
            Self::FreqMean | Self::FreqMin | Self::FreqMax => MetricCategory::Frequency,
        }
    }

    pub fn statistic(&self) -> Statistic {
        match self {
            Self::PosPulseWidthMean
            | Self::NegPulseWidthMean
            | Self::DutyMean
            | Self::FreqMean => Statistic::Mean,
            Self::PosPulseWidthMin | Self::NegPulseWidthMin | Self::DutyMin | Self::FreqMin => {
                Statistic::Min
            }
            Self::PosPulseWidthMax | Self::NegPulseWidthMax | Self::DutyMax | Self::FreqMax => {
                Statistic::Max
            }
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 不受支持的测量项名称
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMetric(pub String);

impl fmt::Display for UnknownMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported measurement: {}", self.0)
    }
}

impl std::error::Error for UnknownMetric {}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// 宿主请求的测量项集合（构造后不可变）
///
/// 不受支持的名称在构造时被静默忽略，但会保留计数以便宿主诊断。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedMetrics {
    metrics: BTreeSet<Metric>,
    ignored: Vec<String>,
}

impl RequestedMetrics {
    /// 从名称列表构造
    ///
    /// # 示例
    ///
    /// ```rust
    /// use digital_pulse_meter::core::{Metric, RequestedMetrics};
    ///
    /// let requested = RequestedMetrics::from_names(["dutyMean", "bogus"]);
    /// assert!(requested.contains(Metric::DutyMean));
    /// assert_eq!(requested.len(), 1);
    /// assert_eq!(requested.ignored(), ["bogus"]);
    /// ```
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut metrics = BTreeSet::new();
        let mut ignored = Vec::new();
        for name in names {
            let name = name.as_ref();
            match Metric::from_name(name) {
                Some(metric) => {
                    metrics.insert(metric);
                }
                None => ignored.push(name.to_string()),
            }
        }
        Self { metrics, ignored }
    }

    /// 请求全部十二个测量项
    pub fn all() -> Self {
        Self::from_metrics(Metric::ALL)
    }

    pub fn from_metrics<I: IntoIterator<Item = Metric>>(metrics: I) -> Self {
        Self {
            metrics: metrics.into_iter().collect(),
            ignored: Vec::new(),
        }
    }

    #[inline]
    pub fn contains(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }

    /// 该类别是否至少请求了一项
    pub fn wants_category(&self, category: MetricCategory) -> bool {
        self.metrics.iter().any(|m| m.category() == category)
    }

    /// 按规范顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        self.metrics.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// 构造时被忽略的名称（按出现顺序）
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }
}

impl FromIterator<Metric> for RequestedMetrics {
    fn from_iter<T: IntoIterator<Item = Metric>>(iter: T) -> Self {
        Self::from_metrics(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_lookup() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_name(metric.name()), Some(metric));
        }
    }

    #[test]
    fn test_serialized_names_match_protocol_names() {
        for metric in Metric::ALL {
            assert_eq!(
                serde_json::to_value(metric).unwrap(),
                serde_json::Value::from(metric.name())
            );
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(Metric::from_name("DutyMean"), None);
        assert_eq!(Metric::from_name("dutymean"), None);
        assert!("freqmax".parse::<Metric>().is_err());
    }

    #[test]
    fn test_each_category_has_three_statistics() {
        for category in MetricCategory::ALL {
            let stats: Vec<Statistic> = Metric::ALL
                .iter()
                .filter(|m| m.category() == category)
                .map(|m| m.statistic())
                .collect();
            assert_eq!(stats, vec![Statistic::Mean, Statistic::Min, Statistic::Max]);
        }
    }

    #[test]
    fn test_requested_ignores_unknown_names() {
        let requested = RequestedMetrics::from_names(["posPulseWidthMin", "voltage", "freqMax"]);
        assert_eq!(requested.len(), 2);
        assert!(requested.wants_category(MetricCategory::PositiveWidth));
        assert!(requested.wants_category(MetricCategory::Frequency));
        assert!(!requested.wants_category(MetricCategory::Duty));
        assert_eq!(requested.ignored(), ["voltage"]);
    }

    #[test]
    fn test_requested_iterates_in_canonical_order() {
        let requested = RequestedMetrics::from_names(["freqMax", "dutyMin", "posPulseWidthMean"]);
        let order: Vec<Metric> = requested.iter().collect();
        assert_eq!(
            order,
            vec![Metric::PosPulseWidthMean, Metric::DutyMin, Metric::FreqMax]
        );
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let requested = RequestedMetrics::from_names(["dutyMean", "dutyMean"]);
        assert_eq!(requested.len(), 1);
    }
}
