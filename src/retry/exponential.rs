use super::RetryStrategy;
use crate::config::saturating_millis;
use crate::error::ProducerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 指数退避重试策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExponentialBackoffPolicy {
    max_attempts: usize,
    base_delay_ms: u64,
    max_delay_ms: u64,
}

impl ExponentialBackoffPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay_ms: saturating_millis(base_delay),
            max_delay_ms: saturating_millis(max_delay),
        }
    }
}

impl RetryStrategy for ExponentialBackoffPolicy {
    fn should_retry(&self, attempt: usize, error: &ProducerError) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }

        error.is_retryable()
    }

    fn backoff_duration(&self, attempt: usize) -> Duration {
        let delay_ms = self.base_delay_ms.saturating_mul(1 << attempt.min(10));
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }

    fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}
