use super::{ProduceContext, ProducerInterceptor};
use crate::types::SendResult;
use tracing::{debug, info};

/// 日志拦截器
pub struct LoggingInterceptor;

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProducerInterceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        "logging"
    }

    fn pre_send(&self, context: &ProduceContext) -> bool {
        debug!(
            app = %context.app,
            topic = %context.topic,
            messages = context.messages.len(),
            "Producing messages"
        );
        true
    }

    fn post_send(&self, context: &ProduceContext, results: &[SendResult]) {
        info!(
            app = %context.app,
            topic = %context.topic,
            results = results.len(),
            "Messages produced"
        );
    }
}
