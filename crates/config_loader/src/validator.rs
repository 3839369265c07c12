//! 配置校验模块
//!
//! 校验规则：
//! - follower id 非空且唯一
//! - delay_s 为有限值且 >= 0
//! - queue.capacity > 0
//! - monitor.high_watermark 在 1..=capacity 范围内

use std::collections::HashSet;

use contracts::{ContractError, FollowerBlueprint, FollowerConfig};

/// 校验 FollowerBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &FollowerBlueprint) -> Result<(), ContractError> {
    validate_follower_ids(blueprint)?;
    for follower in &blueprint.followers {
        validate_delay(follower)?;
        validate_queue(follower)?;
        validate_monitor(follower)?;
    }
    Ok(())
}

/// 校验 follower id 非空且唯一
fn validate_follower_ids(blueprint: &FollowerBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, follower) in blueprint.followers.iter().enumerate() {
        if follower.id.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("followers[{idx}].id"),
                "follower id cannot be empty",
            ));
        }
        if !seen.insert(follower.id.as_str()) {
            return Err(ContractError::config_validation(
                format!("followers[id={}]", follower.id),
                "duplicate follower id",
            ));
        }
    }
    Ok(())
}

/// 校验延迟
fn validate_delay(follower: &FollowerConfig) -> Result<(), ContractError> {
    if !follower.delay_s.is_finite() || follower.delay_s < 0.0 {
        return Err(ContractError::config_validation(
            format!("followers[{}].delay_s", follower.id),
            format!(
                "delay_s must be finite and >= 0, got {}",
                follower.delay_s
            ),
        ));
    }
    Ok(())
}

/// 校验队列容量
fn validate_queue(follower: &FollowerConfig) -> Result<(), ContractError> {
    if follower.queue.capacity == 0 {
        return Err(ContractError::config_validation(
            format!("followers[{}].queue.capacity", follower.id),
            "capacity must be > 0",
        ));
    }
    Ok(())
}

/// 校验占用监控阈值
fn validate_monitor(follower: &FollowerConfig) -> Result<(), ContractError> {
    let Some(high_watermark) = follower.monitor.high_watermark else {
        return Ok(());
    };

    if high_watermark == 0 || high_watermark > follower.queue.capacity {
        return Err(ContractError::config_validation(
            format!("followers[{}].monitor.high_watermark", follower.id),
            format!(
                "high_watermark ({}) must be within 1..={} (queue capacity)",
                high_watermark, follower.queue.capacity
            ),
        ));
    }
    Ok(())
}
