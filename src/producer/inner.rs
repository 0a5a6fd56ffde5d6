//! 内部发送子系统的接口
//!
//! 网络传输、分区选择、重试和故障转移都在这些接口的实现中完成，
//! 生产者只负责把公开 API 归一化后转发过来。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::callback::{AsyncBatchProduceCallback, AsyncProduceCallback};
use crate::client::{ClusterManager, ProducerClientManager};
use crate::config::{NameServerConfig, ProducerConfig, SenderConfig};
use crate::error::Result;
use crate::interceptor::InterceptorRegistry;
use crate::types::{ProduceMessage, SendResult};

/// 事务上下文，随事务内的每次发送传给内部发送器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContext {
    /// 调用方指定的事务 ID，隐式事务为 `None`
    pub transaction_id: Option<String>,
    /// 生产者内唯一的事务序列号
    pub sequence: u64,
    pub app: String,
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    use crate::config::saturating_millis;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(saturating_millis(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

/// 消息发送器，持有到 broker 的连接
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn start(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;
}

/// 内部发送调度器
///
/// `callback` 为 `Some` 时结果通过回调交付，返回值为 `None` / 空列表；
/// `oneway` 为 true 时结果被丢弃。
#[async_trait]
pub trait MessageProducerInner: Send + Sync {
    async fn start(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    async fn send(
        &self,
        message: ProduceMessage,
        transaction: Option<TransactionContext>,
        timeout: Duration,
        oneway: bool,
        failover: bool,
        callback: Option<Arc<dyn AsyncProduceCallback>>,
    ) -> Result<Option<SendResult>>;

    async fn batch_send(
        &self,
        messages: Vec<ProduceMessage>,
        transaction: Option<TransactionContext>,
        timeout: Duration,
        oneway: bool,
        failover: bool,
        callback: Option<Arc<dyn AsyncBatchProduceCallback>>,
    ) -> Result<Vec<SendResult>>;

    /// 主题名加上命名空间
    fn topic_full_name(&self, topic: &str) -> String;

    async fn commit_transaction(&self, transaction: &TransactionContext) -> Result<()>;

    async fn rollback_transaction(&self, transaction: &TransactionContext) -> Result<()>;
}

/// 构造内部调度器所需的共享组件
#[derive(Clone)]
pub struct InnerContext {
    pub config: Arc<ProducerConfig>,
    pub name_server_config: Arc<NameServerConfig>,
    pub sender: Arc<dyn MessageSender>,
    pub cluster_manager: Arc<dyn ClusterManager>,
    pub client_manager: Arc<dyn ProducerClientManager>,
    pub interceptors: Arc<InterceptorRegistry>,
}

/// 在校验阶段创建发送器和内部调度器，不得访问网络
pub trait ProducerInnerFactory: Send + Sync {
    fn create_sender(
        &self,
        client_manager: Arc<dyn ProducerClientManager>,
        config: SenderConfig,
    ) -> Result<Arc<dyn MessageSender>>;

    fn create_inner(&self, context: InnerContext) -> Result<Arc<dyn MessageProducerInner>>;
}
