use serde::{Deserialize, Serialize};
use std::fmt;

/// 生产者生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceState {
    /// 已构造，配置已检查
    Created,
    /// 发送器和内部调度器已创建，尚未连接
    Validated,
    Started,
    Stopped,
}

impl ServiceState {
    pub fn is_started(&self) -> bool {
        matches!(self, ServiceState::Started)
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Created => write!(f, "CREATED"),
            ServiceState::Validated => write!(f, "VALIDATED"),
            ServiceState::Started => write!(f, "STARTED"),
            ServiceState::Stopped => write!(f, "STOPPED"),
        }
    }
}
