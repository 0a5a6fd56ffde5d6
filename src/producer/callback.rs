//! 异步发送回调
//!
//! 回调在内部发送器选择的线程上执行，不一定是调用方所在的线程。

use crate::error::ProducerError;
use crate::types::{ProduceMessage, SendResult};

/// 单条消息发送回调
pub trait AsyncProduceCallback: Send + Sync {
    fn on_success(&self, message: &ProduceMessage, result: &SendResult);

    fn on_exception(&self, message: &ProduceMessage, cause: &ProducerError);
}

/// 批量发送回调
pub trait AsyncBatchProduceCallback: Send + Sync {
    /// `results` 与 `messages` 长度相同、顺序一致
    fn on_success(&self, messages: &[ProduceMessage], results: &[SendResult]);

    fn on_exception(&self, messages: &[ProduceMessage], cause: &ProducerError);
}
