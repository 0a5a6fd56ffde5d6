//! 重试策略模块
//!
//! 生产者本身从不重试，策略随配置交给内部发送器执行。

pub mod exponential;
pub mod fixed;

pub use exponential::ExponentialBackoffPolicy;
pub use fixed::FixedRetryPolicy;

use crate::error::ProducerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 重试策略 trait
pub trait RetryStrategy {
    fn should_retry(&self, attempt: usize, error: &ProducerError) -> bool;
    fn backoff_duration(&self, attempt: usize) -> Duration;
    fn max_attempts(&self) -> usize;
}

/// 生产者配置中携带的重试策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RetryPolicy {
    Fixed(FixedRetryPolicy),
    Exponential(ExponentialBackoffPolicy),
}

impl RetryPolicy {
    /// 固定延迟
    pub fn fixed(max_attempts: usize, delay: Duration) -> Self {
        RetryPolicy::Fixed(FixedRetryPolicy::new(max_attempts, delay))
    }

    /// 指数退避
    pub fn exponential(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        RetryPolicy::Exponential(ExponentialBackoffPolicy::new(
            max_attempts,
            base_delay,
            max_delay,
        ))
    }

    fn strategy(&self) -> &dyn RetryStrategy {
        match self {
            RetryPolicy::Fixed(policy) => policy,
            RetryPolicy::Exponential(policy) => policy,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(2, Duration::from_millis(100), Duration::from_millis(1000))
    }
}

impl RetryStrategy for RetryPolicy {
    fn should_retry(&self, attempt: usize, error: &ProducerError) -> bool {
        self.strategy().should_retry(attempt, error)
    }

    fn backoff_duration(&self, attempt: usize) -> Duration {
        self.strategy().backoff_duration(attempt)
    }

    fn max_attempts(&self) -> usize {
        self.strategy().max_attempts()
    }
}
