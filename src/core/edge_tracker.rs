//! 边沿跟踪状态机
//!
//! 单遍消费跳变流，逐个判定上升/下降沿，累积三条原始测量序列：
//! - 正脉宽：上升沿 → 下降沿
//! - 负脉宽：下降沿 → 上升沿
//! - 周期：上升沿 → 下一个上升沿
//!
//! ## 状态机语义
//!
//! - 第一条跳变只是观测窗口起点的初始电平，不产生任何样本。
//!   若初始电平为高，则视该时刻同时为一个正脉冲和第一个周期的起点。
//! - 电平未变化的跳变（输入不合规）被静默吸收，只更新"上一次"记录。
//! - 时间戳非递增属于调用方违约，不做校验。
//!
//! ## 性能特性
//! - 时间复杂度: O(N) 单遍扫描
//! - 空间复杂度: O(N) 连续缓冲（每条序列一个 `Vec<f64>`）

use super::transition::{EdgeKind, Transition};
use tracing::{debug, trace};

/// 上一次观测到的电平与时间
#[derive(Debug, Clone, Copy, PartialEq)]
struct LastSample {
    level: bool,
    timestamp: f64,
}

/// 原始测量序列的只读视图
///
/// 聚合阶段只读访问这些序列，不做任何修改。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMeasurements<'a> {
    pub positive_widths: &'a [f64],
    pub negative_widths: &'a [f64],
    pub cycle_periods: &'a [f64],
}

/// 边沿跟踪器
///
/// 每次测量创建一个实例，按顺序完整消费一次跳变流后查询结果，然后丢弃。
#[derive(Debug, Clone, Default)]
pub struct EdgeTracker {
    /// 上一次的电平和时间戳（首条跳变前为空）
    last: Option<LastSample>,

    /// 未闭合正脉冲的起点
    positive_start: Option<f64>,

    /// 未闭合负脉冲的起点
    negative_start: Option<f64>,

    /// 当前周期起点（上一个上升沿，或高电平初始时刻）
    cycle_start: Option<f64>,

    positive_widths: Vec<f64>,
    negative_widths: Vec<f64>,
    cycle_periods: Vec<f64>,

    /// 已消费的跳变条数（含初始状态）
    transitions_seen: usize,

    /// 被吸收的重复电平条数
    repeated_levels: usize,
}

impl EdgeTracker {
    /// 创建空的跟踪器
    pub fn new() -> Self {
        Self::default()
    }

    /// 消费一条跳变
    ///
    /// 返回本条跳变的边沿类型；首条跳变（初始状态）返回 `None`。
    ///
    /// # 示例
    ///
    /// ```rust
    /// use digital_pulse_meter::core::{EdgeKind, EdgeTracker, Transition};
    ///
    /// let mut tracker = EdgeTracker::new();
    /// assert_eq!(tracker.consume(Transition::low(0.0)), None);
    /// assert_eq!(tracker.consume(Transition::high(10.0)), Some(EdgeKind::Rising));
    /// assert_eq!(tracker.consume(Transition::low(15.0)), Some(EdgeKind::Falling));
    ///
    /// assert_eq!(tracker.positive_widths(), &[5.0]);
    /// assert_eq!(tracker.negative_widths(), &[] as &[f64]);
    /// ```
    pub fn consume(&mut self, transition: Transition) -> Option<EdgeKind> {
        let Transition { timestamp, level } = transition;
        self.transitions_seen += 1;

        let Some(last) = self.last else {
            // 初始状态：高电平起步时视为正脉冲与首个周期的起点
            self.last = Some(LastSample { level, timestamp });
            if level {
                self.positive_start = Some(timestamp);
                self.cycle_start = Some(timestamp);
            }
            return None;
        };

        let edge = EdgeKind::classify(last.level, level);
        match edge {
            EdgeKind::Rising => self.on_rising(timestamp),
            EdgeKind::Falling => self.on_falling(timestamp),
            EdgeKind::Unchanged => {
                self.repeated_levels += 1;
                trace!(timestamp, level, "repeated level ignored");
            }
        }

        self.last = Some(LastSample { level, timestamp });
        Some(edge)
    }

    /// 按顺序消费整条跳变流
    pub fn consume_all<I>(&mut self, transitions: I)
    where
        I: IntoIterator,
        I::Item: Into<Transition>,
    {
        for transition in transitions {
            self.consume(transition.into());
        }

        debug!(
            transitions = self.transitions_seen,
            positive = self.positive_widths.len(),
            negative = self.negative_widths.len(),
            cycles = self.cycle_periods.len(),
            repeated = self.repeated_levels,
            "edge stream consumed"
        );
    }

    fn on_rising(&mut self, timestamp: f64) {
        // 闭合进行中的负脉冲
        if let Some(start) = self.negative_start.take() {
            self.negative_widths.push(timestamp - start);
        }

        self.positive_start = Some(timestamp);

        // 上一个周期起点 → 本上升沿构成一个完整周期
        if let Some(start) = self.cycle_start {
            self.cycle_periods.push(timestamp - start);
        }
        self.cycle_start = Some(timestamp);
    }

    fn on_falling(&mut self, timestamp: f64) {
        // 闭合进行中的正脉冲
        if let Some(start) = self.positive_start.take() {
            self.positive_widths.push(timestamp - start);
        }

        self.negative_start = Some(timestamp);
    }

    /// 正脉宽序列（检测顺序）
    #[inline]
    pub fn positive_widths(&self) -> &[f64] {
        &self.positive_widths
    }

    /// 负脉宽序列（检测顺序）
    #[inline]
    pub fn negative_widths(&self) -> &[f64] {
        &self.negative_widths
    }

    /// 周期序列（检测顺序）
    #[inline]
    pub fn cycle_periods(&self) -> &[f64] {
        &self.cycle_periods
    }

    /// 三条原始序列的只读视图
    pub fn raw(&self) -> RawMeasurements<'_> {
        RawMeasurements {
            positive_widths: &self.positive_widths,
            negative_widths: &self.negative_widths,
            cycle_periods: &self.cycle_periods,
        }
    }

    /// 已消费的跳变条数（含初始状态）
    #[inline]
    pub fn transitions_seen(&self) -> usize {
        self.transitions_seen
    }

    /// 被吸收的重复电平条数
    #[inline]
    pub fn repeated_levels(&self) -> usize {
        self.repeated_levels
    }

    /// 最后一次观测到的电平
    #[inline]
    pub fn last_level(&self) -> Option<bool> {
        self.last.map(|s| s.level)
    }
}
