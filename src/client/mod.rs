//! 外部协作组件
//!
//! 集群管理器和客户端连接管理器由调用方提供，生产者只把它们当作不透明的依赖。

use async_trait::async_trait;

use crate::error::Result;
use crate::types::TopicMetadata;

/// 集群管理器：负责主题元数据查询和拓扑刷新
#[async_trait]
pub trait ClusterManager: Send + Sync {
    /// 查询主题元数据，主题不存在时返回 `None`
    async fn fetch_topic_metadata(
        &self,
        topic_full_name: &str,
        app: &str,
    ) -> Result<Option<TopicMetadata>>;
}

/// 生产者客户端连接管理器
///
/// 生产者只把它转交给发送器，由发送器负责启停。
#[async_trait]
pub trait ProducerClientManager: Send + Sync {
    async fn start(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;
}
