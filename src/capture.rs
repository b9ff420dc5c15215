//! 逻辑分析仪采集文件加载
//!
//! 读取常见逻辑分析仪导出的数字通道CSV，并为指定通道生成合规的跳变流。
//!
//! ## 文件格式
//!
//! ```text
//! Time [s],Channel 0,Channel 1
//! 0.000000000,0,1
//! 0.000010000,1,1
//! 0.000015000,1,0
//! ```
//!
//! - 第一行为表头：第一列是时间，其余每列一个通道
//! - 任一通道变化时记录一行，时间严格递增
//! - 电平取值 `0/1`（同时接受 `true/false`、`high/low`，不区分大小写）

use crate::core::Transition;
use crate::error::{MeasureError, MeasureResult, format_error};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// 测量区间（闭区间，start < end）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRange {
    pub start: f64,
    pub end: f64,
}

impl MeasurementRange {
    /// 创建并校验测量区间
    pub fn new(start: f64, end: f64) -> MeasureResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(MeasureError::InvalidInput(format!(
                "测量区间必须为有限值: [{start}, {end}]"
            )));
        }
        if start >= end {
            return Err(MeasureError::InvalidInput(format!(
                "测量区间起点必须小于终点: [{start}, {end}]"
            )));
        }
        Ok(Self { start, end })
    }
}

/// 已加载的数字采集数据
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    /// 采集名称（通常为文件名）
    name: String,

    /// 通道名称（表头第2列起）
    channels: Vec<String>,

    /// 每行时间戳
    times: Vec<f64>,

    /// 每通道电平列（与times等长）
    levels: Vec<Vec<bool>>,
}

impl Capture {
    /// 从文件加载
    pub fn from_path(path: &Path) -> MeasureResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::parse_bytes(&name, bytes)
    }

    /// 从任意Reader加载
    pub fn from_reader<R: Read>(name: &str, mut reader: R) -> MeasureResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse_bytes(name, bytes)
    }

    /// 非UTF-8内容属于文件格式问题，而不是I/O问题
    fn parse_bytes(name: &str, bytes: Vec<u8>) -> MeasureResult<Self> {
        let text = String::from_utf8(bytes).map_err(|e| {
            MeasureError::FormatError(format!(
                "采集文件不是有效的UTF-8文本 (字节偏移 {}): {name}",
                e.utf8_error().valid_up_to()
            ))
        })?;
        Self::parse_str(name, &text)
    }

    /// 解析CSV文本
    ///
    /// # 示例
    ///
    /// ```rust
    /// use digital_pulse_meter::capture::Capture;
    ///
    /// let capture = Capture::parse_str("demo", "Time [s],CLK\n0,0\n1,1\n2,0\n").unwrap();
    /// assert_eq!(capture.channel_names(), ["CLK"]);
    /// assert_eq!(capture.row_count(), 3);
    /// ```
    pub fn parse_str(name: &str, text: &str) -> MeasureResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let Some((header_line, header)) = lines.next() else {
            return Err(MeasureError::FormatError("采集文件为空".to_string()));
        };

        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        if columns.len() < 2 {
            return Err(format_error(header_line, "表头至少需要时间列和一个通道列"));
        }
        let channels: Vec<String> = columns[1..].iter().map(|s| s.to_string()).collect();

        let mut times: Vec<f64> = Vec::new();
        let mut levels: Vec<Vec<bool>> = vec![Vec::new(); channels.len()];

        for (line_no, line) in lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(format_error(
                    line_no,
                    format!("列数为{}，表头为{}", fields.len(), columns.len()),
                ));
            }

            let time: f64 = fields[0]
                .parse()
                .map_err(|e| format_error(line_no, format!("无效时间 '{}': {e}", fields[0])))?;
            if !time.is_finite() {
                return Err(format_error(line_no, format!("无效时间 '{}'", fields[0])));
            }
            if let Some(&previous) = times.last()
                && time <= previous
            {
                return Err(format_error(
                    line_no,
                    format!("时间戳必须严格递增: {time} <= {previous}"),
                ));
            }
            times.push(time);

            for (column, field) in levels.iter_mut().zip(&fields[1..]) {
                let level = parse_level(field)
                    .ok_or_else(|| format_error(line_no, format!("无效电平 '{field}'")))?;
                column.push(level);
            }
        }

        debug!(
            capture = name,
            channels = channels.len(),
            rows = times.len(),
            "capture loaded"
        );

        Ok(Self {
            name: name.to_string(),
            channels,
            times,
            levels,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel_names(&self) -> &[String] {
        &self.channels
    }

    pub fn row_count(&self) -> usize {
        self.times.len()
    }

    /// 首行到末行的时间跨度
    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// 按名称或零起始索引解析通道
    pub fn channel_index(&self, channel: &str) -> MeasureResult<usize> {
        let channel = channel.trim();
        if let Some(index) = self.channels.iter().position(|c| c == channel) {
            return Ok(index);
        }
        if let Some(index) = self
            .channels
            .iter()
            .position(|c| c.eq_ignore_ascii_case(channel))
        {
            return Ok(index);
        }
        match channel.parse::<usize>() {
            Ok(index) if index < self.channels.len() => Ok(index),
            _ => Err(MeasureError::InvalidInput(format!(
                "找不到通道 '{channel}'，可用通道: {}",
                self.channels.join(", ")
            ))),
        }
    }

    /// 生成指定通道的跳变流
    ///
    /// 第一条为初始状态（无区间时为首行，有区间时为区间起点处的电平），
    /// 其后只保留该通道真正发生变化的行。
    pub fn transitions(
        &self,
        channel: usize,
        range: Option<MeasurementRange>,
    ) -> MeasureResult<Vec<Transition>> {
        let Some(column) = self.levels.get(channel) else {
            return Err(MeasureError::InvalidInput(format!(
                "通道索引越界: {channel} (共{}个通道)",
                self.channels.len()
            )));
        };

        if self.times.is_empty() {
            return Ok(Vec::new());
        }

        let (initial, first_row, last_row) = match range {
            None => (Transition::new(self.times[0], column[0]), 1, self.times.len()),
            Some(range) => {
                // 区间起点（含）之前的最后一行决定初始电平
                let at_or_before = self.times.partition_point(|&t| t <= range.start);
                let initial_level = if at_or_before == 0 {
                    warn!(
                        capture = %self.name,
                        start = range.start,
                        first = self.times[0],
                        "measurement range starts before capture, using first row level"
                    );
                    column[0]
                } else {
                    column[at_or_before - 1]
                };
                let end_row = self.times.partition_point(|&t| t <= range.end);
                (
                    Transition::new(range.start, initial_level),
                    at_or_before,
                    end_row.max(at_or_before),
                )
            }
        };

        let mut transitions = vec![initial];
        let mut current = initial.level;
        for row in first_row..last_row {
            let level = column[row];
            if level != current {
                transitions.push(Transition::new(self.times[row], level));
                current = level;
            }
        }

        Ok(transitions)
    }
}

fn parse_level(field: &str) -> Option<bool> {
    match field.to_ascii_lowercase().as_str() {
        "1" | "true" | "high" | "h" => Some(true),
        "0" | "false" | "low" | "l" => Some(false),
        _ => None,
    }
}
