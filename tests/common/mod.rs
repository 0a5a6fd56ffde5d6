//! 测试用的协作组件
//!
//! 所有 mock 都记录调用次数，用来验证生产者在失败路径上没有访问任何协作组件。

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use journalq_producer::{
    AsyncBatchProduceCallback, AsyncProduceCallback, ClusterManager, DefaultMessageProducer,
    InnerContext, MessageProducerInner, MessageSender, NameServerConfig, PartitionMetadata,
    ProduceMessage, ProducerClientManager, ProducerConfig, ProducerError, ProducerInnerFactory,
    Result, SendResult, SenderConfig, TopicMetadata, TransactionContext,
};
use tokio::sync::Mutex;

pub const TEST_APP: &str = "svc-a";
pub const TEST_NAMESPACE: &str = "test-ns";

pub fn init_logging() {
    journalq_producer::telemetry::init_tracing("journalq_producer=debug");
}

pub fn test_config() -> ProducerConfig {
    ProducerConfig::new(TEST_APP).with_timeout(Duration::from_millis(1000))
}

pub fn test_name_server() -> NameServerConfig {
    NameServerConfig::new("127.0.0.1:50088").with_namespace(TEST_NAMESPACE)
}

pub fn message(topic: &str, body: &str) -> ProduceMessage {
    ProduceMessage::new(topic.to_string(), body.as_bytes().to_vec())
}

// -------- Cluster Manager --------

#[derive(Default)]
pub struct MockClusterManager {
    pub calls: Mutex<Vec<(String, String)>>,
    pub touched: AtomicUsize,
}

#[async_trait]
impl ClusterManager for MockClusterManager {
    async fn fetch_topic_metadata(
        &self,
        topic_full_name: &str,
        app: &str,
    ) -> Result<Option<TopicMetadata>> {
        self.touched.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .await
            .push((topic_full_name.to_string(), app.to_string()));

        if topic_full_name.ends_with("missing") {
            return Ok(None);
        }
        Ok(Some(TopicMetadata {
            topic: topic_full_name.to_string(),
            app: app.to_string(),
            partitions: vec![PartitionMetadata {
                partition: 0,
                partition_group: 0,
                leader: Some("127.0.0.1:50088".to_string()),
            }],
        }))
    }
}

// -------- Client Manager --------

#[derive(Default)]
pub struct MockClientManager {
    pub touched: AtomicUsize,
}

#[async_trait]
impl ProducerClientManager for MockClientManager {
    async fn start(&self) -> Result<()> {
        self.touched.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.touched.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// -------- Sender --------

#[derive(Default)]
pub struct MockSender {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub fail_start: bool,
    pub events: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl MessageSender for MockSender {
    async fn start(&self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.events.lock().await.push("sender.start");
        if self.fail_start {
            return Err(ProducerError::system("sender start failed"));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.events.lock().await.push("sender.stop");
        Ok(())
    }
}

// -------- Inner --------

/// 内部调度器的行为
#[derive(Clone)]
pub enum Behavior {
    /// 返回 offset 从给定值开始的结果
    Echo(i64),
    /// 返回固定错误
    Fail(ProducerError),
    /// 永不完成
    Never,
    /// 批量发送少返回一条结果
    ShortBatch,
}

#[derive(Debug, Clone)]
pub struct SendCall {
    pub topics: Vec<String>,
    pub transaction: Option<TransactionContext>,
    pub timeout: Duration,
    pub oneway: bool,
    pub failover: bool,
    pub has_callback: bool,
}

pub struct MockInner {
    pub behavior: Behavior,
    pub calls: Mutex<Vec<SendCall>>,
    pub touched: AtomicUsize,
    pub commits: Mutex<Vec<TransactionContext>>,
    pub rollbacks: Mutex<Vec<TransactionContext>>,
    pub fail_start: bool,
    pub events: Arc<Mutex<Vec<&'static str>>>,
}

impl MockInner {
    pub fn new(behavior: Behavior, events: Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
            touched: AtomicUsize::new(0),
            commits: Mutex::new(Vec::new()),
            rollbacks: Mutex::new(Vec::new()),
            fail_start: false,
            events,
        }
    }

    pub fn send_calls(&self) -> usize {
        self.touched.load(Ordering::SeqCst)
    }

    async fn record(
        &self,
        topics: Vec<String>,
        transaction: Option<TransactionContext>,
        timeout: Duration,
        oneway: bool,
        failover: bool,
        has_callback: bool,
    ) {
        self.touched.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().await.push(SendCall {
            topics,
            transaction,
            timeout,
            oneway,
            failover,
            has_callback,
        });
    }
}

#[async_trait]
impl MessageProducerInner for MockInner {
    async fn start(&self) -> Result<()> {
        self.events.lock().await.push("inner.start");
        if self.fail_start {
            return Err(ProducerError::system("inner start failed"));
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.events.lock().await.push("inner.stop");
        Ok(())
    }

    async fn send(
        &self,
        message: ProduceMessage,
        transaction: Option<TransactionContext>,
        timeout: Duration,
        oneway: bool,
        failover: bool,
        callback: Option<Arc<dyn AsyncProduceCallback>>,
    ) -> Result<Option<SendResult>> {
        self.record(
            vec![message.topic.clone()],
            transaction,
            timeout,
            oneway,
            failover,
            callback.is_some(),
        )
        .await;

        let offset = match &self.behavior {
            Behavior::Echo(offset) => *offset,
            Behavior::ShortBatch => 0,
            Behavior::Fail(cause) => {
                let cause = cause.clone();
                return match callback {
                    Some(callback) => {
                        tokio::spawn(async move {
                            callback.on_exception(&message, &cause);
                        });
                        Ok(None)
                    }
                    None => Err(cause),
                };
            }
            Behavior::Never => std::future::pending().await,
        };

        let result = SendResult::new(message.topic.clone(), 0, offset);
        if oneway {
            return Ok(None);
        }
        match callback {
            Some(callback) => {
                // 在另一个任务上完成回调
                tokio::spawn(async move {
                    callback.on_success(&message, &result);
                });
                Ok(None)
            }
            None => Ok(Some(result)),
        }
    }

    async fn batch_send(
        &self,
        messages: Vec<ProduceMessage>,
        transaction: Option<TransactionContext>,
        timeout: Duration,
        oneway: bool,
        failover: bool,
        callback: Option<Arc<dyn AsyncBatchProduceCallback>>,
    ) -> Result<Vec<SendResult>> {
        self.record(
            messages.iter().map(|m| m.topic.clone()).collect(),
            transaction,
            timeout,
            oneway,
            failover,
            callback.is_some(),
        )
        .await;

        let results: Vec<SendResult> = match &self.behavior {
            Behavior::Echo(offset) => messages
                .iter()
                .enumerate()
                .map(|(i, m)| SendResult::new(m.topic.clone(), 0, offset + i as i64))
                .collect(),
            Behavior::ShortBatch => messages
                .iter()
                .skip(1)
                .map(|m| SendResult::new(m.topic.clone(), 0, 0))
                .collect(),
            Behavior::Fail(cause) => {
                let cause = cause.clone();
                return match callback {
                    Some(callback) => {
                        tokio::spawn(async move {
                            callback.on_exception(&messages, &cause);
                        });
                        Ok(Vec::new())
                    }
                    None => Err(cause),
                };
            }
            Behavior::Never => std::future::pending().await,
        };

        if oneway {
            return Ok(Vec::new());
        }
        match callback {
            Some(callback) => {
                tokio::spawn(async move {
                    callback.on_success(&messages, &results);
                });
                Ok(Vec::new())
            }
            None => Ok(results),
        }
    }

    fn topic_full_name(&self, topic: &str) -> String {
        format!("{}.{}", TEST_NAMESPACE, topic)
    }

    async fn commit_transaction(&self, transaction: &TransactionContext) -> Result<()> {
        self.commits.lock().await.push(transaction.clone());
        Ok(())
    }

    async fn rollback_transaction(&self, transaction: &TransactionContext) -> Result<()> {
        self.rollbacks.lock().await.push(transaction.clone());
        Ok(())
    }
}

// -------- Factory --------

pub struct MockFactory {
    pub sender: Arc<MockSender>,
    pub inner: Arc<MockInner>,
    pub created: AtomicUsize,
    pub sender_configs: std::sync::Mutex<Vec<SenderConfig>>,
    pub contexts: std::sync::Mutex<Vec<InnerContext>>,
}

impl ProducerInnerFactory for MockFactory {
    fn create_sender(
        &self,
        _client_manager: Arc<dyn ProducerClientManager>,
        config: SenderConfig,
    ) -> Result<Arc<dyn MessageSender>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.sender_configs.lock().unwrap().push(config);
        Ok(self.sender.clone())
    }

    fn create_inner(&self, context: InnerContext) -> Result<Arc<dyn MessageProducerInner>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().unwrap().push(context);
        Ok(self.inner.clone())
    }
}

// -------- Harness --------

pub struct Harness {
    pub cluster_manager: Arc<MockClusterManager>,
    pub client_manager: Arc<MockClientManager>,
    pub factory: Arc<MockFactory>,
    pub events: Arc<Mutex<Vec<&'static str>>>,
}

impl Harness {
    pub fn new(behavior: Behavior) -> Self {
        Self::with_options(behavior, false, false)
    }

    pub fn with_options(behavior: Behavior, sender_fail_start: bool, inner_fail_start: bool) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sender = MockSender {
            fail_start: sender_fail_start,
            events: events.clone(),
            ..Default::default()
        };
        let mut inner = MockInner::new(behavior, events.clone());
        inner.fail_start = inner_fail_start;

        Self {
            cluster_manager: Arc::new(MockClusterManager::default()),
            client_manager: Arc::new(MockClientManager::default()),
            factory: Arc::new(MockFactory {
                sender: Arc::new(sender),
                inner: Arc::new(inner),
                created: AtomicUsize::new(0),
                sender_configs: std::sync::Mutex::new(Vec::new()),
                contexts: std::sync::Mutex::new(Vec::new()),
            }),
            events,
        }
    }

    pub fn inner(&self) -> &Arc<MockInner> {
        &self.factory.inner
    }

    pub fn sender(&self) -> &Arc<MockSender> {
        &self.factory.sender
    }

    pub fn producer(&self, config: ProducerConfig) -> Result<DefaultMessageProducer> {
        DefaultMessageProducer::builder(config)
            .name_server_config(test_name_server())
            .cluster_manager(self.cluster_manager.clone())
            .client_manager(self.client_manager.clone())
            .inner_factory(self.factory.clone())
            .build()
    }

    /// 没有任何协作组件被访问过
    pub fn untouched(&self) -> bool {
        self.factory.created.load(Ordering::SeqCst) == 0
            && self.cluster_manager.touched.load(Ordering::SeqCst) == 0
            && self.client_manager.touched.load(Ordering::SeqCst) == 0
            && self.sender().starts.load(Ordering::SeqCst) == 0
            && self.inner().send_calls() == 0
    }

    pub async fn started(behavior: Behavior) -> (Self, DefaultMessageProducer) {
        init_logging();
        let harness = Self::new(behavior);
        let producer = harness.producer(test_config()).expect("build producer");
        producer.start().await.expect("start producer");
        (harness, producer)
    }
}
