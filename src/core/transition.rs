//! 电平跳变数据结构
//!
//! 描述二值信号的一次电平变化（或观测窗口起点的初始状态），
//! 以及相邻两次跳变之间的边沿分类。

use std::fmt;

/// 二值信号的一次跳变记录
///
/// 跳变序列按时间戳严格递增排列，由宿主负责保证。
/// 序列中的第一个元素表示观测窗口起点处的初始电平，而不是一个真实边沿。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// 跳变时间戳（单位由宿主决定，通常为秒）
    pub timestamp: f64,

    /// 跳变后的电平：`true` 为高，`false` 为低
    pub level: bool,
}

impl Transition {
    /// 创建新的跳变记录
    ///
    /// # 示例
    ///
    /// ```rust
    /// use digital_pulse_meter::core::Transition;
    ///
    /// let t = Transition::new(1.5, true);
    /// assert_eq!(t.timestamp, 1.5);
    /// assert!(t.level);
    /// ```
    #[inline]
    pub fn new(timestamp: f64, level: bool) -> Self {
        Self { timestamp, level }
    }

    /// 高电平跳变
    #[inline]
    pub fn high(timestamp: f64) -> Self {
        Self::new(timestamp, true)
    }

    /// 低电平跳变
    #[inline]
    pub fn low(timestamp: f64) -> Self {
        Self::new(timestamp, false)
    }
}

impl From<(f64, bool)> for Transition {
    fn from((timestamp, level): (f64, bool)) -> Self {
        Self::new(timestamp, level)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = if self.level { 1 } else { 0 };
        write!(f, "({:.9}, {level})", self.timestamp)
    }
}

/// 边沿类型（由前后两次电平推导，不单独存储）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// 上升沿：低 → 高
    Rising,
    /// 下降沿：高 → 低
    Falling,
    /// 电平未变化（输入不合规时出现，按空操作处理）
    Unchanged,
}

impl EdgeKind {
    /// 根据前一电平与当前电平判定边沿类型
    ///
    /// # 示例
    ///
    /// ```rust
    /// use digital_pulse_meter::core::EdgeKind;
    ///
    /// assert_eq!(EdgeKind::classify(false, true), EdgeKind::Rising);
    /// assert_eq!(EdgeKind::classify(true, false), EdgeKind::Falling);
    /// assert_eq!(EdgeKind::classify(true, true), EdgeKind::Unchanged);
    /// ```
    #[inline]
    pub fn classify(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => Self::Rising,
            (true, false) => Self::Falling,
            _ => Self::Unchanged,
        }
    }

    /// 是否为真实边沿
    #[inline]
    pub fn is_edge(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_all_combinations() {
        assert_eq!(EdgeKind::classify(false, true), EdgeKind::Rising);
        assert_eq!(EdgeKind::classify(true, false), EdgeKind::Falling);
        assert_eq!(EdgeKind::classify(false, false), EdgeKind::Unchanged);
        assert_eq!(EdgeKind::classify(true, true), EdgeKind::Unchanged);
    }

    #[test]
    fn test_is_edge() {
        assert!(EdgeKind::Rising.is_edge());
        assert!(EdgeKind::Falling.is_edge());
        assert!(!EdgeKind::Unchanged.is_edge());
    }

    #[test]
    fn test_from_tuple() {
        let t: Transition = (2.0, false).into();
        assert_eq!(t, Transition::low(2.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Transition::high(0.5).to_string(), "(0.500000000, 1)");
    }
}
