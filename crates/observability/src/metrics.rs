//! Follower 指标收集模块
//!
//! 基于 CaptureReport 收集和统计跟随策略的运行指标。

use std::collections::HashMap;

use contracts::CaptureReport;
use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};

/// 注册 follower 指标说明
///
/// 安装 recorder 之后调用一次；导出端据此生成 HELP 文本。
pub fn describe_metrics() {
    describe_counter!(
        "follower_captures_total",
        Unit::Count,
        "Capture calls per follower"
    );
    describe_counter!(
        "follower_elements_emitted_total",
        Unit::Count,
        "Elements moved into capture output"
    );
    describe_counter!(
        "follower_empty_captures_total",
        Unit::Count,
        "Captures that emitted nothing"
    );
    describe_histogram!(
        "follower_capture_size",
        Unit::Count,
        "Elements emitted per capture"
    );
    describe_counter!(
        "follower_out_of_order_removed_total",
        Unit::Count,
        "Elements dropped by the post-capture consistency pass"
    );
    describe_counter!("follower_aborts_total", Unit::Count, "Abort calls");
    describe_counter!(
        "follower_elements_aborted_total",
        Unit::Count,
        "Elements purged by abort"
    );
    describe_gauge!(
        "follower_queue_depth",
        Unit::Count,
        "Buffered elements after the last inject or capture"
    );
    describe_counter!(
        "follower_high_watermark_crossed_total",
        Unit::Count,
        "Times the queue reached its high-water mark"
    );
    describe_gauge!(
        "follower_queue_high_watermark",
        Unit::Count,
        "Queue depth at the last high-water crossing"
    );
}

/// 从 CaptureReport 记录指标
///
/// 每次 capture 完成时调用此函数来记录指标。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_capture;
///
/// follower.capture(&mut out, range);
/// record_capture("imu", follower.last_report());
/// ```
pub fn record_capture(follower_id: &str, report: &CaptureReport) {
    // 捕获次数
    counter!(
        "follower_captures_total",
        "follower" => follower_id.to_string()
    )
    .increment(1);

    // 输出元素数
    if report.emitted > 0 {
        counter!(
            "follower_elements_emitted_total",
            "follower" => follower_id.to_string()
        )
        .increment(report.emitted as u64);
    } else {
        counter!(
            "follower_empty_captures_total",
            "follower" => follower_id.to_string()
        )
        .increment(1);
    }
    histogram!(
        "follower_capture_size",
        "follower" => follower_id.to_string()
    )
    .record(report.emitted as f64);

    // 一致性清理 (队列顺序被破坏时才会非零)
    if report.stale_removed > 0 {
        record_defensive_removal(follower_id, report.stale_removed);
    }

    record_queue_depth(follower_id, report.remaining);
}

/// 记录 abort 清理的过期元素
pub fn record_abort(follower_id: &str, removed: usize) {
    counter!(
        "follower_aborts_total",
        "follower" => follower_id.to_string()
    )
    .increment(1);
    if removed > 0 {
        counter!(
            "follower_elements_aborted_total",
            "follower" => follower_id.to_string()
        )
        .increment(removed as u64);
    }
}

/// 记录一致性清理移除的元素
pub fn record_defensive_removal(follower_id: &str, removed: usize) {
    counter!(
        "follower_out_of_order_removed_total",
        "follower" => follower_id.to_string()
    )
    .increment(removed as u64);
}

/// 记录队列深度
pub fn record_queue_depth(follower_id: &str, depth: usize) {
    gauge!(
        "follower_queue_depth",
        "follower" => follower_id.to_string()
    )
    .set(depth as f64);
}

/// 记录队列高水位告警
pub fn record_high_watermark(follower_id: &str, depth: usize) {
    counter!(
        "follower_high_watermark_crossed_total",
        "follower" => follower_id.to_string()
    )
    .increment(1);
    gauge!(
        "follower_queue_high_watermark",
        "follower" => follower_id.to_string()
    )
    .set(depth as f64);
}

/// 捕获指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct CaptureStatsAggregator {
    /// 总捕获次数
    pub total_captures: u64,

    /// 输出元素总数
    pub total_emitted: u64,

    /// 一致性清理移除总数
    pub total_stale_removed: u64,

    /// 空捕获次数
    pub empty_captures: u64,

    /// abort 次数
    pub total_aborts: u64,

    /// abort 移除元素总数
    pub total_aborted: u64,

    /// 每次捕获的元素数统计
    pub capture_size_stats: RunningStats,

    /// 捕获后队列深度统计
    pub depth_stats: RunningStats,

    /// 各跟随流输出元素数
    pub emitted_per_follower: HashMap<String, u64>,
}

impl CaptureStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, follower_id: &str, report: &CaptureReport) {
        self.total_captures += 1;
        self.total_emitted += report.emitted as u64;
        self.total_stale_removed += report.stale_removed as u64;

        if report.emitted == 0 {
            self.empty_captures += 1;
        }

        *self
            .emitted_per_follower
            .entry(follower_id.to_string())
            .or_insert(0) += report.emitted as u64;

        self.capture_size_stats.push(report.emitted as f64);
        self.depth_stats.push(report.remaining as f64);
    }

    /// 记录一次 abort
    pub fn update_abort(&mut self, removed: usize) {
        self.total_aborts += 1;
        self.total_aborted += removed as u64;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_captures: self.total_captures,
            total_emitted: self.total_emitted,
            total_stale_removed: self.total_stale_removed,
            total_aborts: self.total_aborts,
            total_aborted: self.total_aborted,
            empty_rate: if self.total_captures > 0 {
                self.empty_captures as f64 / self.total_captures as f64 * 100.0
            } else {
                0.0
            },
            capture_size: StatsSummary::from(&self.capture_size_stats),
            queue_depth: StatsSummary::from(&self.depth_stats),
            emitted_per_follower: self.emitted_per_follower.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_captures: u64,
    pub total_emitted: u64,
    pub total_stale_removed: u64,
    pub total_aborts: u64,
    pub total_aborted: u64,
    pub empty_rate: f64,
    pub capture_size: StatsSummary,
    pub queue_depth: StatsSummary,
    pub emitted_per_follower: HashMap<String, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Follower Metrics Summary ===")?;
        writeln!(f, "Total captures: {}", self.total_captures)?;
        writeln!(f, "Emitted elements: {}", self.total_emitted)?;
        writeln!(f, "Empty captures: {:.2}%", self.empty_rate)?;
        writeln!(f, "Out-of-order removed: {}", self.total_stale_removed)?;
        writeln!(
            f,
            "Aborts: {} ({} elements purged)",
            self.total_aborts, self.total_aborted
        )?;
        writeln!(f, "Capture size: {}", self.capture_size)?;
        writeln!(f, "Queue depth: {}", self.queue_depth)?;

        if !self.emitted_per_follower.is_empty() {
            writeln!(f, "Emitted per follower:")?;
            for (follower, count) in &self.emitted_per_follower {
                writeln!(f, "  {}: {}", follower, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
