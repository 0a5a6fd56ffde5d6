use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 待发送的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceMessage {
    pub topic: String,
    pub body: Bytes,
    pub business_id: Option<String>,
    pub partition_key: Option<String>,
    pub attributes: HashMap<String, String>,
}

impl ProduceMessage {
    pub fn new(topic: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            topic: topic.into(),
            body: body.into(),
            business_id: None,
            partition_key: None,
            attributes: HashMap::new(),
        }
    }

    pub fn with_business_id(mut self, business_id: impl Into<String>) -> Self {
        self.business_id = Some(business_id.into());
        self
    }

    pub fn with_partition_key(mut self, partition_key: impl Into<String>) -> Self {
        self.partition_key = Some(partition_key.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// 单条消息的发送结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub topic: String,
    pub partition: i16,
    /// broker 分配的位置
    pub offset: i64,
    /// broker 应答令牌（事务或异步确认时使用）
    pub token: Option<String>,
}

impl SendResult {
    pub fn new(topic: impl Into<String>, partition: i16, offset: i64) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// 主题元数据（由集群管理器提供）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMetadata {
    /// 带命名空间的完整主题名
    pub topic: String,
    pub app: String,
    pub partitions: Vec<PartitionMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionMetadata {
    pub partition: i16,
    pub partition_group: i32,
    pub leader: Option<String>,
}
