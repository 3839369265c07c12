//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 多速率传感器流上的跟随捕获
//! - 跨任务共享跟随流（无需真实传感器）

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
        assert!(contracts::State::Primed.is_primed());
    }
}

#[cfg(test)]
mod fixtures {
    use bytes::Bytes;
    use contracts::{SensorPacket, SensorType, SimTime};

    pub const IMU_PERIOD_S: f64 = 0.01;

    pub fn imu_packet(frame: u64) -> SensorPacket {
        SensorPacket {
            sensor_id: "imu".to_string(),
            sensor_type: SensorType::Imu,
            timestamp: SimTime::from_secs(frame as f64 * IMU_PERIOD_S),
            frame_id: Some(frame),
            payload: Bytes::from_static(&[0u8; 24]),
        }
    }

    /// Camera frame stamps sit between IMU ticks: 0.005 + k * 0.05
    pub fn camera_stamp(frame: u64) -> SimTime {
        SimTime::from_secs(0.005 + frame as f64 * 0.05)
    }

    pub fn frames_of(packets: &[SensorPacket]) -> Vec<u64> {
        packets.iter().filter_map(|p| p.frame_id).collect()
    }
}

#[cfg(test)]
mod capture_tests {
    use contracts::{
        CaptureRange, FollowerConfig, MonitorConfig, QueueConfig, SensorPacket, State,
    };
    use follower::{AnyBefore, Follower, OccupancyMonitor, StampQueue};
    use observability::CaptureStatsAggregator;

    use crate::fixtures::{camera_stamp, frames_of, imu_packet};

    type ImuFollower = AnyBefore<StampQueue<SensorPacket>, OccupancyMonitor>;

    fn imu_config(delay_s: f64) -> FollowerConfig {
        FollowerConfig {
            id: "imu".to_string(),
            delay_s,
            queue: QueueConfig { capacity: 256 },
            monitor: MonitorConfig {
                high_watermark: Some(200),
            },
        }
    }

    /// IMU @100Hz following a camera @20Hz
    #[test]
    fn test_multi_rate_stream_without_delay() {
        let mut imu: ImuFollower = AnyBefore::from_config(&imu_config(0.0));
        for frame in 0..=20 {
            imu.inject(imu_packet(frame));
        }

        let mut first: Vec<SensorPacket> = Vec::new();
        let state = imu.capture(&mut first, &CaptureRange::point(camera_stamp(1)));
        assert_eq!(state, State::Primed);
        assert_eq!(frames_of(&first), vec![0, 1, 2, 3, 4, 5]);

        let mut second: Vec<SensorPacket> = Vec::new();
        imu.capture(&mut second, &CaptureRange::point(camera_stamp(2)));
        assert_eq!(frames_of(&second), vec![6, 7, 8, 9, 10]);

        assert_eq!(imu.len(), 10);
        assert_eq!(imu.last_report().emitted, 5);
        assert_eq!(imu.last_report().remaining, 10);
    }

    #[test]
    fn test_multi_rate_stream_with_delay() {
        let mut imu: ImuFollower = AnyBefore::from_config(&imu_config(0.02));
        for frame in 0..=20 {
            imu.inject(imu_packet(frame));
        }

        // boundary = 0.055 - 0.02 = 0.035
        let mut group: Vec<SensorPacket> = Vec::new();
        imu.capture(&mut group, &CaptureRange::point(camera_stamp(1)));
        assert_eq!(frames_of(&group), vec![0, 1, 2, 3]);

        for packet in &group {
            assert!(packet.timestamp < camera_stamp(1));
        }
        assert_eq!(
            imu.available_range().map(|r| r.lower_stamp),
            Some(imu_packet(4).timestamp)
        );
    }

    #[test]
    fn test_abort_purges_stale_imu() {
        let mut imu: ImuFollower = AnyBefore::from_config(&imu_config(0.02));
        for frame in 0..10 {
            imu.inject(imu_packet(frame));
        }

        // Driving capture at 0.105 aborted: everything before 0.085 is stale
        imu.abort(camera_stamp(2));
        assert_eq!(imu.len(), 1);
        assert_eq!(
            imu.available_range().map(|r| r.lower_stamp),
            Some(imu_packet(9).timestamp)
        );

        imu.abort(camera_stamp(2));
        assert_eq!(imu.len(), 1);
    }

    #[test]
    fn test_out_of_order_arrivals_are_emitted_sorted() {
        let mut imu: ImuFollower = AnyBefore::from_config(&imu_config(0.0));
        for frame in [3, 0, 4, 1, 2] {
            imu.inject(imu_packet(frame));
        }
        assert_eq!(imu.queue().out_of_order_count(), 3);

        let mut group: Vec<SensorPacket> = Vec::new();
        imu.capture(&mut group, &CaptureRange::point(camera_stamp(0)));
        assert_eq!(frames_of(&group), vec![0]);

        group.clear();
        imu.capture(&mut group, &CaptureRange::point(camera_stamp(1)));
        assert_eq!(frames_of(&group), vec![1, 2, 3, 4]);
        assert!(imu.is_empty());
    }

    #[test]
    fn test_capacity_from_config_drops_oldest() {
        let mut config = imu_config(0.0);
        config.queue.capacity = 4;
        config.monitor.high_watermark = Some(3);
        let mut imu: ImuFollower = AnyBefore::from_config(&config);

        for frame in 0..6 {
            imu.inject(imu_packet(frame));
        }

        assert_eq!(imu.len(), 4);
        assert_eq!(imu.queue().dropped_count(), 2);
        assert_eq!(imu.monitor().peak_len(), 4);
        assert_eq!(imu.monitor().crossings(), 1);
        assert!(imu.monitor().is_above_watermark());
    }

    #[test]
    fn test_aggregator_tracks_capture_reports() {
        let mut imu: ImuFollower = AnyBefore::from_config(&imu_config(0.0));
        let mut stats = CaptureStatsAggregator::new();

        for frame in 0..=20 {
            imu.inject(imu_packet(frame));
        }

        for k in 0..4 {
            let mut group: Vec<SensorPacket> = Vec::new();
            imu.capture(&mut group, &CaptureRange::point(camera_stamp(k)));
            stats.update(imu.id(), imu.last_report());
        }

        // Nothing left below the previous boundary
        let mut group: Vec<SensorPacket> = Vec::new();
        imu.capture(&mut group, &CaptureRange::point(camera_stamp(3)));
        stats.update(imu.id(), imu.last_report());

        let summary = stats.summary();
        assert_eq!(summary.total_captures, 5);
        assert_eq!(summary.total_emitted, 16);
        assert_eq!(summary.emitted_per_follower.get("imu"), Some(&16));
        assert!((summary.empty_rate - 20.0).abs() < 1e-9);
        assert!(summary.to_string().contains("Total captures: 5"));
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{CaptureRange, SensorPacket};
    use follower::{AnyBefore, Follower, OccupancyMonitor, StampQueue};

    use crate::fixtures::{camera_stamp, frames_of, imu_packet};

    const FOLLOWERS_TOML: &str = r#"
[[followers]]
id = "imu"
delay_s = 0.02

[followers.queue]
capacity = 64

[followers.monitor]
high_watermark = 48

[[followers]]
id = "gnss"
delay_s = 0.1
"#;

    #[test]
    fn test_blueprint_to_follower() {
        let blueprint = ConfigLoader::load_from_str(FOLLOWERS_TOML, ConfigFormat::Toml).unwrap();
        let config = blueprint.follower("imu").unwrap();

        let mut imu: AnyBefore<StampQueue<SensorPacket>, OccupancyMonitor> =
            AnyBefore::from_config(config);
        assert_eq!(imu.id(), "imu");
        assert_eq!(imu.queue().capacity(), 64);

        for frame in 0..10 {
            imu.inject(imu_packet(frame));
        }

        let mut group: Vec<SensorPacket> = Vec::new();
        imu.capture(&mut group, &CaptureRange::point(camera_stamp(1)));
        assert_eq!(frames_of(&group), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_invalid_blueprint_is_rejected() {
        let content = r#"
[[followers]]
id = "imu"
delay_s = 0.02

[followers.queue]
capacity = 8

[followers.monitor]
high_watermark = 9
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(matches!(
            result,
            Err(contracts::ContractError::ConfigValidation { .. })
        ));
    }
}

#[cfg(test)]
mod shared_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{CaptureRange, SensorPacket, SimTime};
    use follower::{AnyBefore, SharedSensorFollower, Synchronized};
    use tokio::sync::mpsc;

    use crate::fixtures::{frames_of, imu_packet, IMU_PERIOD_S};

    fn shared_imu(delay_s: f64) -> Arc<SharedSensorFollower> {
        let config = contracts::FollowerConfig {
            id: "imu".to_string(),
            delay_s,
            queue: contracts::QueueConfig { capacity: 1024 },
            monitor: Default::default(),
        };
        Arc::new(Synchronized::new(AnyBefore::from_config(&config)))
    }

    /// Feed task injects while the captor task captures
    #[tokio::test]
    async fn test_concurrent_inject_and_capture() {
        const PACKETS: u64 = 200;

        let imu = shared_imu(0.0);
        let (tx, mut rx) = mpsc::channel::<SensorPacket>(32);

        let producer = tokio::spawn(async move {
            for frame in 0..PACKETS {
                if tx.send(imu_packet(frame)).await.is_err() {
                    break;
                }
            }
        });

        let feed_imu = imu.clone();
        let feed = tokio::spawn(async move {
            while let Some(packet) = rx.recv().await {
                feed_imu.inject(packet).unwrap();
            }
        });

        let captor_imu = imu.clone();
        let captor = tokio::spawn(async move {
            let mut batches: Vec<Vec<SensorPacket>> = Vec::new();
            for k in 1..=20u64 {
                let upper = SimTime::from_secs(k as f64 * 0.1 + 0.005);
                let mut group: Vec<SensorPacket> = Vec::new();
                captor_imu
                    .capture(&mut group, &CaptureRange::point(upper))
                    .unwrap();
                for packet in &group {
                    assert!(packet.timestamp < upper);
                }
                batches.push(group);
                tokio::task::yield_now().await;
            }
            batches
        });

        let result = tokio::time::timeout(Duration::from_secs(5), async {
            producer.await.unwrap();
            feed.await.unwrap();
            captor.await.unwrap()
        })
        .await;
        assert!(result.is_ok(), "pipeline timed out");
        let batches = result.unwrap();

        // Drain whatever arrived after the captor's last boundary
        let mut rest: Vec<SensorPacket> = Vec::new();
        let horizon = SimTime::from_secs(PACKETS as f64 * IMU_PERIOD_S + 1.0);
        imu.capture(&mut rest, &CaptureRange::point(horizon)).unwrap();

        let mut emitted: Vec<u64> = batches.iter().flat_map(|b| frames_of(b)).collect();
        for batch in &batches {
            let frames = frames_of(batch);
            assert!(frames.windows(2).all(|w| w[0] < w[1]));
        }
        emitted.extend(frames_of(&rest));
        emitted.sort_unstable();

        assert_eq!(emitted, (0..PACKETS).collect::<Vec<_>>());
        assert!(imu.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_abort_from_another_task() {
        let imu = shared_imu(0.05);
        for frame in 0..30 {
            imu.inject(imu_packet(frame)).unwrap();
        }

        let aborter = imu.clone();
        tokio::spawn(async move {
            // purges everything before 0.25 - 0.05
            aborter.abort(SimTime::from_secs(0.255)).unwrap();
        })
        .await
        .unwrap();

        let range = imu.available_range().unwrap().unwrap();
        assert_eq!(range.lower_stamp, imu_packet(21).timestamp);
        assert_eq!(imu.len().unwrap(), 9);
    }
}
