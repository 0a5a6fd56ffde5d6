//! 生产者配置
//!
//! `ProducerConfig` 在构造生产者时校验一次，之后不再修改；
//! `SenderConfig` 是从中派生出来交给发送器的窄视图。

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ErrorBuilder, ErrorCode, ProducerError, Result, check_argument, check_not_blank};
use crate::retry::RetryPolicy;

/// 客户端配置文件（nameserver + producer 两段）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub name_server: NameServerConfig,
    pub producer: ProducerConfig,
}

impl ClientConfig {
    /// 从文件加载，`.json` 结尾按 JSON 解析，其余按 TOML 解析
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = read_config_file(path)?;
        if path.ends_with(".json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(content)?;
        Ok(config)
    }
}

/// 毫秒数超出 u64 时取 u64::MAX
pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn read_config_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| {
        ErrorBuilder::new(ErrorCode::ConfigurationMissing, "failed to read config file")
            .details(format!("{}: {}", path, err))
            .build_error()
    })
}

/// NameServer 连接配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NameServerConfig {
    pub address: String,
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "_DEFAULT_".to_string()
}

impl NameServerConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            app: None,
            token: None,
            region: None,
            namespace: default_namespace(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// 服务质量等级，由内部发送器解释
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosLevel {
    /// 不等待 broker 应答
    OneWay,
    /// broker 收到即应答
    Receive,
    /// broker 持久化后应答
    Persistence,
    /// 副本复制后应答
    Replication,
}

/// 压缩算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompressType {
    #[default]
    Zlib,
    Lz4,
    Snappy,
}

/// 生产者配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProducerConfig {
    /// 应用名称，不能为空
    pub app: String,
    /// 默认发送超时（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_retry_policy")]
    pub retry_policy: Option<RetryPolicy>,
    #[serde(default = "default_qos_level")]
    pub qos_level: Option<QosLevel>,
    #[serde(default = "default_compress")]
    pub compress: bool,
    /// 超过该字节数才压缩
    #[serde(default = "default_compress_threshold")]
    pub compress_threshold: usize,
    #[serde(default)]
    pub compress_type: CompressType,
    #[serde(default = "default_failover")]
    pub failover: bool,
    /// 事务超时（毫秒）
    #[serde(default = "default_transaction_timeout_ms")]
    pub transaction_timeout_ms: u64,
    #[serde(default)]
    pub batch: bool,
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_retry_policy() -> Option<RetryPolicy> {
    Some(RetryPolicy::default())
}

fn default_qos_level() -> Option<QosLevel> {
    Some(QosLevel::Replication)
}

fn default_compress() -> bool {
    true
}

fn default_compress_threshold() -> usize {
    100
}

fn default_failover() -> bool {
    true
}

fn default_transaction_timeout_ms() -> u64 {
    60_000
}

impl ProducerConfig {
    /// 使用默认值创建配置
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            timeout_ms: default_timeout_ms(),
            retry_policy: default_retry_policy(),
            qos_level: default_qos_level(),
            compress: default_compress(),
            compress_threshold: default_compress_threshold(),
            compress_type: CompressType::default(),
            failover: default_failover(),
            transaction_timeout_ms: default_transaction_timeout_ms(),
            batch: false,
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = read_config_file(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ProducerConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = saturating_millis(timeout);
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: Option<RetryPolicy>) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_qos_level(mut self, qos_level: Option<QosLevel>) -> Self {
        self.qos_level = qos_level;
        self
    }

    pub fn with_compress(mut self, compress: bool, threshold: usize, compress_type: CompressType) -> Self {
        self.compress = compress;
        self.compress_threshold = threshold;
        self.compress_type = compress_type;
        self
    }

    pub fn with_failover(mut self, failover: bool) -> Self {
        self.failover = failover;
        self
    }

    pub fn with_transaction_timeout(mut self, timeout: Duration) -> Self {
        self.transaction_timeout_ms = saturating_millis(timeout);
        self
    }

    pub fn with_batch(mut self, batch: bool) -> Self {
        self.batch = batch;
        self
    }

    /// 默认发送超时
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 默认事务超时
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms)
    }

    /// 校验必填项
    pub fn validate(&self) -> Result<()> {
        check_not_blank(&self.app, ErrorCode::InvalidParameter, "producer.app not blank")?;
        if self.retry_policy.is_none() {
            return Err(ProducerError::invalid_parameter("producer.retryPolicy not null"));
        }
        if self.qos_level.is_none() {
            return Err(ProducerError::invalid_parameter("producer.qosLevel not null"));
        }
        check_argument(self.timeout_ms > 0, "producer.timeout must be positive")
    }
}

/// 发送器配置，只包含压缩和批量相关设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderConfig {
    pub compress: bool,
    pub compress_threshold: usize,
    pub compress_type: CompressType,
    pub batch: bool,
}

impl From<&ProducerConfig> for SenderConfig {
    fn from(config: &ProducerConfig) -> Self {
        Self {
            compress: config.compress,
            compress_threshold: config.compress_threshold,
            compress_type: config.compress_type,
            batch: config.batch,
        }
    }
}
