//! SensorPacket - 跟随流中缓存的传感器数据包
//!
//! 原始传感器数据包结构。

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{SimTime, Stamped};

/// 传感器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    Camera,
    Lidar,
    Imu,
    Gnss,
    Radar,
}

/// 传感器数据包
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorPacket {
    /// 传感器 ID
    pub sensor_id: String,

    /// 传感器类型
    pub sensor_type: SensorType,

    /// 仿真时间戳 (seconds) - 主时钟
    pub timestamp: SimTime,

    /// 可选的帧序号 (用于排序/诊断)
    pub frame_id: Option<u64>,

    /// 数据载荷 (零拷贝)
    pub payload: Bytes,
}

impl Stamped for SensorPacket {
    type Stamp = SimTime;

    #[inline]
    fn stamp(&self) -> SimTime {
        self.timestamp
    }
}
