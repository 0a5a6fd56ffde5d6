//! 生产者错误处理模块
//!
//! 提供统一的错误类型、错误代码分类和错误转换

pub mod builder;
pub mod code;
pub mod conversions;
pub mod localized;
pub mod producer_error;

// 重新导出公共类型和函数
pub use builder::ErrorBuilder;
pub use code::{ErrorCategory, ErrorCode};
pub use localized::LocalizedError;
pub use producer_error::{ProducerError, Result};

/// 参数检查，失败时返回 `InvalidParameter`
pub fn check_argument(expression: bool, reason: &str) -> Result<()> {
    if expression {
        Ok(())
    } else {
        Err(ProducerError::invalid_parameter(reason))
    }
}

/// 字符串非空白检查
pub fn check_not_blank(value: &str, code: ErrorCode, reason: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ErrorBuilder::new(code, reason)
            .details(format!("value {:?} is blank", value))
            .build_error())
    } else {
        Ok(())
    }
}
