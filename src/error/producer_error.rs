//! 生产者统一错误类型

use super::code::{ErrorCategory, ErrorCode};
use super::localized::LocalizedError;
use thiserror::Error;

/// 生产者统一错误类型
///
/// 实现了 `Clone`，同一个失败原因可以原样交给同步调用方、回调和 future。
#[derive(Error, Debug, Clone)]
pub enum ProducerError {
    /// 带错误代码的错误（暴露给调用方）
    #[error("错误 [{code}] {reason}", code = .code.as_str())]
    Localized {
        code: ErrorCode,
        reason: String,
        details: Option<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// 系统错误（内部错误）
    #[error("系统错误: {0}")]
    System(String),
}

impl ProducerError {
    /// 创建带错误代码的错误
    pub fn localized(code: ErrorCode, reason: impl Into<String>) -> Self {
        ProducerError::Localized {
            code,
            reason: reason.into(),
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 创建系统错误
    pub fn system(msg: impl Into<String>) -> Self {
        ProducerError::System(msg.into())
    }

    // ============================================================
    // 便捷方法：配置和参数
    // ============================================================

    /// 创建配置错误
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::ConfigurationError, reason)
    }

    /// 创建参数错误
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::InvalidParameter, reason)
    }

    // ============================================================
    // 便捷方法：生命周期
    // ============================================================

    /// 生产者未启动
    pub fn service_not_available(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::ServiceUnavailable, reason)
    }

    // ============================================================
    // 便捷方法：发送和事务
    // ============================================================

    /// 创建消息发送失败错误
    pub fn send_failed(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::MessageSendFailed, reason)
    }

    /// 创建发送超时错误
    pub fn send_timeout(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::SendTimeout, reason)
    }

    /// 创建事务已结束错误
    pub fn transaction_completed(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::TransactionCompleted, reason)
    }

    /// 创建操作超时错误
    pub fn timeout(reason: impl Into<String>) -> Self {
        Self::localized(ErrorCode::OperationTimeout, reason)
    }

    // ============================================================
    // 信息获取方法
    // ============================================================

    /// 获取错误代码
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ProducerError::Localized { code, .. } => Some(*code),
            ProducerError::System(_) => None,
        }
    }

    /// 获取错误类别，系统错误归为 System
    pub fn category(&self) -> ErrorCategory {
        self.code()
            .map(|code| code.category())
            .unwrap_or(ErrorCategory::System)
    }

    /// 获取错误原因
    pub fn reason(&self) -> &str {
        match self {
            ProducerError::Localized { reason, .. } => reason,
            ProducerError::System(msg) => msg,
        }
    }

    /// 转换为可序列化的错误信息
    pub fn to_localized(self) -> LocalizedError {
        match self {
            ProducerError::Localized {
                code,
                reason,
                details,
                timestamp,
            } => LocalizedError {
                code,
                reason,
                details,
                timestamp,
            },
            ProducerError::System(msg) => LocalizedError::new(ErrorCode::InternalError, msg),
        }
    }

    /// 是否为生产者未启动
    pub fn is_service_unavailable(&self) -> bool {
        self.code() == Some(ErrorCode::ServiceUnavailable)
    }

    /// 是否为超时错误（与 broker 返回的失败区分）
    pub fn is_timeout(&self) -> bool {
        self.code().map(|code| code.is_timeout()).unwrap_or(false)
    }

    /// 判断是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        self.code().map(|code| code.is_retryable()).unwrap_or(false)
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ProducerError>;
