use super::RetryStrategy;
use crate::config::saturating_millis;
use crate::error::ProducerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 固定延迟重试策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRetryPolicy {
    max_attempts: usize,
    delay_ms: u64,
}

impl FixedRetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay_ms: saturating_millis(delay),
        }
    }
}

impl RetryStrategy for FixedRetryPolicy {
    fn should_retry(&self, attempt: usize, error: &ProducerError) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }

        // 只对可重试的错误进行重试
        error.is_retryable()
    }

    fn backoff_duration(&self, _attempt: usize) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}
