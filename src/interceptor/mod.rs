//! 生产者拦截器模块
//!
//! 生产者只负责拦截器的注册与注销，拦截器的执行由内部发送器负责。

pub mod logging;
pub mod registry;

pub use logging::LoggingInterceptor;
pub use registry::InterceptorRegistry;

use crate::types::{ProduceMessage, SendResult};

/// 发送上下文
#[derive(Debug, Clone)]
pub struct ProduceContext {
    pub app: String,
    pub topic: String,
    pub messages: Vec<ProduceMessage>,
}

impl ProduceContext {
    pub fn new(app: impl Into<String>, topic: impl Into<String>, messages: Vec<ProduceMessage>) -> Self {
        Self {
            app: app.into(),
            topic: topic.into(),
            messages,
        }
    }
}

/// 生产者拦截器
pub trait ProducerInterceptor: Send + Sync {
    /// 拦截器名称（用于日志）
    fn name(&self) -> &str;

    /// 发送前调用，返回 false 表示拦截本次发送
    fn pre_send(&self, _context: &ProduceContext) -> bool {
        true
    }

    /// 发送完成后调用
    fn post_send(&self, _context: &ProduceContext, _results: &[SendResult]) {}
}
