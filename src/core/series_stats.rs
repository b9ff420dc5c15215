//! 序列统计模块
//!
//! 将一条测量序列归约为 (count, min, max, mean)。
//! 空序列统一回退为全零，下游消费者总是期望得到数值结果。

use super::metric::Statistic;

/// 单条序列的统计结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Default for SeriesStats {
    fn default() -> Self {
        Self::empty()
    }
}

impl SeriesStats {
    /// 空序列的统计结果（全零回退）
    pub const fn empty() -> Self {
        Self {
            count: 0,
            min: 0.0,
            max: 0.0,
            mean: 0.0,
        }
    }

    /// 从序列计算统计结果
    ///
    /// # 示例
    ///
    /// ```rust
    /// use digital_pulse_meter::core::SeriesStats;
    ///
    /// let stats = SeriesStats::from_values(&[2.0, 4.0, 9.0]);
    /// assert_eq!(stats.count, 3);
    /// assert_eq!(stats.min, 2.0);
    /// assert_eq!(stats.max, 9.0);
    /// assert_eq!(stats.mean, 5.0);
    ///
    /// assert_eq!(SeriesStats::from_values(&[]), SeriesStats::empty());
    /// ```
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &value in values {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }

        Self {
            count: values.len(),
            min,
            max,
            mean: sum / values.len() as f64,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 取出指定统计量
    #[inline]
    pub fn get(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Mean => self.mean,
            Statistic::Min => self.min,
            Statistic::Max => self.max,
        }
    }
}
