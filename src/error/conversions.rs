//! 错误类型转换实现

use super::{ErrorCode, LocalizedError, ProducerError};
use std::io;

impl From<io::Error> for ProducerError {
    fn from(err: io::Error) -> Self {
        ProducerError::localized(ErrorCode::NetworkError, err.to_string())
    }
}

impl From<toml::de::Error> for ProducerError {
    fn from(err: toml::de::Error) -> Self {
        ProducerError::configuration(format!("TOML 解析错误: {}", err))
    }
}

impl From<serde_json::Error> for ProducerError {
    fn from(err: serde_json::Error) -> Self {
        ProducerError::configuration(format!("JSON 解析错误: {}", err))
    }
}

impl From<tokio::time::error::Elapsed> for ProducerError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ProducerError::timeout(err.to_string())
    }
}

impl From<LocalizedError> for ProducerError {
    fn from(err: LocalizedError) -> Self {
        ProducerError::Localized {
            code: err.code,
            reason: err.reason,
            details: err.details,
            timestamp: err.timestamp,
        }
    }
}
