//! # Follower
//!
//! 跟随流捕获策略（AnyBefore）。
//!
//! 负责：
//! - 按驱动流捕获范围 (upper_stamp - delay) 选取缓存数据
//! - 清理永远不会再匹配的过期数据
//! - 有序缓存队列、占用监控与加锁策略
//!
//! ## 使用示例
//!
//! ```
//! use contracts::{CaptureRange, Dispatch, State};
//! use follower::{AnyBefore, Follower, NoopMonitor, StampQueue};
//!
//! let queue = StampQueue::<Dispatch<u64, ()>>::with_capacity(128);
//! let mut imu = AnyBefore::new(5, queue, NoopMonitor).named("imu");
//! for stamp in [1u64, 4, 6, 9] {
//!     imu.inject(Dispatch::new(stamp, ()));
//! }
//!
//! let mut group: Vec<Dispatch<u64, ()>> = Vec::new();
//! let state = imu.capture(&mut group, &CaptureRange::new(8, 10));
//!
//! assert_eq!(state, State::Primed);
//! assert_eq!(group.iter().map(|d| d.stamp).collect::<Vec<_>>(), vec![1, 4]);
//! assert_eq!(imu.len(), 2);
//! ```

mod any_before;
pub mod lock;
mod monitor;
mod policy;
mod queue;
mod synchronized;

pub use any_before::AnyBefore;
pub use lock::{LockPolicy, MutexLock, NoLock};
pub use monitor::{NoopMonitor, OccupancyMonitor};
pub use policy::{Follower, FollowerBase};
pub use queue::StampQueue;
pub use synchronized::Synchronized;

// Re-export contracts types
pub use contracts::{
    CaptureRange, CaptureReport, DispatchQueue, DispatchSink, FollowerConfig, QueueMonitor,
    State,
};

/// AnyBefore follower over simulation-time sensor packets, shared across tasks
pub type SharedSensorFollower =
    Synchronized<AnyBefore<StampQueue<contracts::SensorPacket>, OccupancyMonitor>>;
