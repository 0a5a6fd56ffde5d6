//! 错误构建器
//!
//! 提供链式 API 用于构建错误

use super::{ErrorCode, LocalizedError, ProducerError};

/// 错误构建器
pub struct ErrorBuilder {
    code: ErrorCode,
    reason: String,
    details: Option<String>,
}

impl ErrorBuilder {
    /// 创建新的错误构建器
    pub fn new(code: ErrorCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            details: None,
        }
    }

    /// 添加错误详情
    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// 构建错误信息
    pub fn build(self) -> LocalizedError {
        LocalizedError {
            code: self.code,
            reason: self.reason,
            details: self.details,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 构建 ProducerError
    pub fn build_error(self) -> ProducerError {
        ProducerError::Localized {
            code: self.code,
            reason: self.reason,
            details: self.details,
            timestamp: chrono::Utc::now(),
        }
    }
}
