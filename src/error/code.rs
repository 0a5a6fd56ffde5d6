//! 错误代码和错误类别定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 生产者错误代码
///
/// 错误代码按类别分组，每个类别占用1000个代码范围：
/// - 1000-1999: 配置相关错误
/// - 2000-2999: 参数相关错误
/// - 4000-4999: 消息发送相关错误
/// - 5000-5999: 事务相关错误
/// - 6000-6999: 系统相关错误
/// - 9000-9999: 通用错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 配置相关错误 (1000-1999)
    // ============================================================
    ConfigurationError = 1000,
    ConfigurationMissing = 1001,

    // ============================================================
    // 参数相关错误 (2000-2999)
    // ============================================================
    InvalidParameter = 2000,
    TopicBlank = 2001,
    TransactionIdBlank = 2002,

    // ============================================================
    // 消息发送相关错误 (4000-4999)
    // ============================================================
    MessageSendFailed = 4000,
    BatchResultMismatch = 4001,
    BrokerRejected = 4002,
    TopicNotExist = 4003,
    SendTimeout = 4004,

    // ============================================================
    // 事务相关错误 (5000-5999)
    // ============================================================
    TransactionFailed = 5000,
    TransactionCompleted = 5001,
    TransactionTimeout = 5002,

    // ============================================================
    // 系统相关错误 (6000-6999)
    // ============================================================
    InternalError = 6000,
    ServiceUnavailable = 6001,
    ResourceExhausted = 6002,
    NetworkError = 6003,

    // ============================================================
    // 通用错误 (9000-9999)
    // ============================================================
    GeneralError = 9000,
    OperationTimeout = 9004,
    UnknownError = 9999,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    /// 获取错误代码的数字值
    #[inline]
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// 从数字值创建错误代码
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            1000 => Some(ErrorCode::ConfigurationError),
            1001 => Some(ErrorCode::ConfigurationMissing),
            2000 => Some(ErrorCode::InvalidParameter),
            2001 => Some(ErrorCode::TopicBlank),
            2002 => Some(ErrorCode::TransactionIdBlank),
            4000 => Some(ErrorCode::MessageSendFailed),
            4001 => Some(ErrorCode::BatchResultMismatch),
            4002 => Some(ErrorCode::BrokerRejected),
            4003 => Some(ErrorCode::TopicNotExist),
            4004 => Some(ErrorCode::SendTimeout),
            5000 => Some(ErrorCode::TransactionFailed),
            5001 => Some(ErrorCode::TransactionCompleted),
            5002 => Some(ErrorCode::TransactionTimeout),
            6000 => Some(ErrorCode::InternalError),
            6001 => Some(ErrorCode::ServiceUnavailable),
            6002 => Some(ErrorCode::ResourceExhausted),
            6003 => Some(ErrorCode::NetworkError),
            9000 => Some(ErrorCode::GeneralError),
            9004 => Some(ErrorCode::OperationTimeout),
            9999 => Some(ErrorCode::UnknownError),
            _ => None,
        }
    }

    /// 获取错误代码的英文标识符
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::ConfigurationMissing => "CONFIGURATION_MISSING",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::TopicBlank => "TOPIC_BLANK",
            ErrorCode::TransactionIdBlank => "TRANSACTION_ID_BLANK",
            ErrorCode::MessageSendFailed => "MESSAGE_SEND_FAILED",
            ErrorCode::BatchResultMismatch => "BATCH_RESULT_MISMATCH",
            ErrorCode::BrokerRejected => "BROKER_REJECTED",
            ErrorCode::TopicNotExist => "TOPIC_NOT_EXIST",
            ErrorCode::SendTimeout => "SEND_TIMEOUT",
            ErrorCode::TransactionFailed => "TRANSACTION_FAILED",
            ErrorCode::TransactionCompleted => "TRANSACTION_COMPLETED",
            ErrorCode::TransactionTimeout => "TRANSACTION_TIMEOUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::ResourceExhausted => "RESOURCE_EXHAUSTED",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::GeneralError => "GENERAL_ERROR",
            ErrorCode::OperationTimeout => "OPERATION_TIMEOUT",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// 获取错误代码的类别（用于错误分类）
    pub fn category(&self) -> ErrorCategory {
        match self.as_u32() {
            1000..=1999 => ErrorCategory::Configuration,
            2000..=2999 => ErrorCategory::Parameter,
            4000..=4999 => ErrorCategory::Send,
            5000..=5999 => ErrorCategory::Transaction,
            6000..=6999 => ErrorCategory::System,
            _ => ErrorCategory::General,
        }
    }

    /// 是否为超时类错误
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ErrorCode::SendTimeout | ErrorCode::TransactionTimeout | ErrorCode::OperationTimeout
        )
    }

    /// 判断是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::SendTimeout
                | ErrorCode::OperationTimeout
                | ErrorCode::NetworkError
                | ErrorCode::ServiceUnavailable
                | ErrorCode::ResourceExhausted
        )
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Configuration,
    Parameter,
    Send,
    Transaction,
    System,
    General,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "CONFIGURATION"),
            ErrorCategory::Parameter => write!(f, "PARAMETER"),
            ErrorCategory::Send => write!(f, "SEND"),
            ErrorCategory::Transaction => write!(f, "TRANSACTION"),
            ErrorCategory::System => write!(f, "SYSTEM"),
            ErrorCategory::General => write!(f, "GENERAL"),
        }
    }
}
