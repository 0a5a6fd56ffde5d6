//! 默认消息生产者
//!
//! 对外提供单条/批量 × 同步/单向/回调/future 的全部发送接口，
//! 所有接口都归一化为 `dispatch_send` 和 `dispatch_batch_send` 两个内部操作，
//! 再转发给内部调度器。
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use journalq_producer::{DefaultMessageProducer, ProduceMessage, ProducerConfig};
//!
//! let producer = DefaultMessageProducer::builder(ProducerConfig::new("svc-a"))
//!     .name_server_config(name_server_config)
//!     .cluster_manager(cluster_manager)
//!     .client_manager(client_manager)
//!     .inner_factory(factory)
//!     .build()?;
//!
//! producer.start().await?;
//! let result = producer.send(ProduceMessage::new("orders", "payload")).await?;
//! producer.stop().await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use super::callback::{AsyncBatchProduceCallback, AsyncProduceCallback};
use super::future::{
    FutureBatchProduceCallback, FutureProduceCallback, SendFuture, check_batch_results, promise,
};
use super::inner::{
    InnerContext, MessageProducerInner, MessageSender, ProducerInnerFactory, TransactionContext,
};
use super::lifecycle::ServiceState;
use super::sequence::TransactionSequence;
use super::transaction::TransactionMessageProducer;
use crate::client::{ClusterManager, ProducerClientManager};
use crate::config::{NameServerConfig, ProducerConfig, SenderConfig, saturating_millis};
use crate::error::{ErrorCode, ProducerError, Result, check_not_blank};
use crate::interceptor::{InterceptorRegistry, ProducerInterceptor};
use crate::types::{ProduceMessage, SendResult, TopicMetadata};

/// 校验阶段创建的组件
#[derive(Clone)]
struct Components {
    sender_config: SenderConfig,
    sender: Arc<dyn MessageSender>,
    inner: Arc<dyn MessageProducerInner>,
    sequence: Arc<TransactionSequence>,
}

struct Lifecycle {
    state: ServiceState,
    components: Option<Components>,
}

/// 默认消息生产者
pub struct DefaultMessageProducer {
    config: Arc<ProducerConfig>,
    name_server_config: Arc<NameServerConfig>,
    cluster_manager: Arc<dyn ClusterManager>,
    client_manager: Arc<dyn ProducerClientManager>,
    inner_factory: Arc<dyn ProducerInnerFactory>,
    interceptors: Arc<InterceptorRegistry>,
    // 状态迁移互斥，发送路径只短暂读取 lifecycle
    transition: Mutex<()>,
    lifecycle: RwLock<Lifecycle>,
}

impl DefaultMessageProducer {
    /// 创建生产者，配置不合法时立即失败，不会访问任何协作组件
    pub fn new(
        config: ProducerConfig,
        name_server_config: NameServerConfig,
        cluster_manager: Arc<dyn ClusterManager>,
        client_manager: Arc<dyn ProducerClientManager>,
        inner_factory: Arc<dyn ProducerInnerFactory>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(config),
            name_server_config: Arc::new(name_server_config),
            cluster_manager,
            client_manager,
            inner_factory,
            interceptors: Arc::new(InterceptorRegistry::new()),
            transition: Mutex::new(()),
            lifecycle: RwLock::new(Lifecycle {
                state: ServiceState::Created,
                components: None,
            }),
        })
    }

    pub fn builder(config: ProducerConfig) -> MessageProducerBuilder {
        MessageProducerBuilder::new(config)
    }

    pub fn config(&self) -> &Arc<ProducerConfig> {
        &self.config
    }

    pub fn name_server_config(&self) -> &Arc<NameServerConfig> {
        &self.name_server_config
    }

    pub async fn state(&self) -> ServiceState {
        self.lifecycle.read().await.state
    }

    pub async fn is_started(&self) -> bool {
        self.state().await.is_started()
    }

    /// 派生出的发送器配置，校验之前为 `None`
    pub async fn sender_config(&self) -> Option<SenderConfig> {
        self.lifecycle
            .read()
            .await
            .components
            .as_ref()
            .map(|components| components.sender_config)
    }

    // ============================================================
    // 生命周期
    // ============================================================

    /// 创建序列号生成器、发送器配置、发送器和内部调度器，不访问网络
    pub async fn validate(&self) -> Result<()> {
        let _guard = self.transition.lock().await;
        self.validate_locked().await
    }

    /// 组件已存在时为空操作
    async fn validate_locked(&self) -> Result<()> {
        if self.lifecycle.read().await.components.is_some() {
            return Ok(());
        }

        let sender_config = SenderConfig::from(self.config.as_ref());
        let sender = self
            .inner_factory
            .create_sender(self.client_manager.clone(), sender_config)?;
        let inner = self.inner_factory.create_inner(InnerContext {
            config: self.config.clone(),
            name_server_config: self.name_server_config.clone(),
            sender: sender.clone(),
            cluster_manager: self.cluster_manager.clone(),
            client_manager: self.client_manager.clone(),
            interceptors: self.interceptors.clone(),
        })?;

        let mut lifecycle = self.lifecycle.write().await;
        lifecycle.components = Some(Components {
            sender_config,
            sender,
            inner,
            sequence: Arc::new(TransactionSequence::new()),
        });
        lifecycle.state = ServiceState::Validated;
        debug!(app = %self.config.app, "Producer validated");
        Ok(())
    }

    /// 依次启动发送器和内部调度器
    ///
    /// 已停止的生产者可以再次启动，沿用原有组件和事务序列号；
    /// 从未启动就被停止的生产者在这里补做校验。
    pub async fn start(&self) -> Result<()> {
        let _guard = self.transition.lock().await;

        if self.lifecycle.read().await.state.is_started() {
            return Ok(());
        }
        self.validate_locked().await?;

        let components = self
            .lifecycle
            .read()
            .await
            .components
            .clone()
            .ok_or_else(|| ProducerError::system("producer components missing after validation"))?;

        if let Err(err) = components.sender.start().await {
            error!(app = %self.config.app, error = %err, "Failed to start message sender");
            return Err(err);
        }
        if let Err(err) = components.inner.start().await {
            error!(app = %self.config.app, error = %err, "Failed to start producer inner");
            if let Err(stop_err) = components.sender.stop().await {
                warn!(error = %stop_err, "Failed to stop message sender after start failure");
            }
            return Err(err);
        }

        self.lifecycle.write().await.state = ServiceState::Started;
        info!(
            app = %self.config.app,
            failover = self.config.failover,
            timeout_ms = self.config.timeout_ms,
            "Producer started"
        );
        Ok(())
    }

    /// 先停内部调度器再停发送器，未初始化的组件直接跳过
    pub async fn stop(&self) {
        let _guard = self.transition.lock().await;

        let (state, components) = {
            let lifecycle = self.lifecycle.read().await;
            (lifecycle.state, lifecycle.components.clone())
        };
        if state == ServiceState::Stopped {
            return;
        }

        if let Some(components) = components {
            if let Err(err) = components.inner.stop().await {
                warn!(app = %self.config.app, error = %err, "Failed to stop producer inner");
            }
            if let Err(err) = components.sender.stop().await {
                warn!(app = %self.config.app, error = %err, "Failed to stop message sender");
            }
        }

        self.lifecycle.write().await.state = ServiceState::Stopped;
        info!(app = %self.config.app, previous = %state, "Producer stopped");
    }

    /// 状态检查：未启动时立即失败，不访问网络
    async fn check_state(&self) -> Result<Components> {
        let lifecycle = self.lifecycle.read().await;
        match (lifecycle.state, lifecycle.components.as_ref()) {
            (ServiceState::Started, Some(components)) => Ok(components.clone()),
            (state, _) => {
                warn!(app = %self.config.app, state = %state, "Producer is not started");
                Err(ProducerError::service_not_available("producer is not started"))
            }
        }
    }

    // ============================================================
    // 同步发送
    // ============================================================

    pub async fn send(&self, message: ProduceMessage) -> Result<SendResult> {
        self.send_with_timeout(message, self.config.timeout()).await
    }

    pub async fn send_with_timeout(
        &self,
        message: ProduceMessage,
        timeout: Duration,
    ) -> Result<SendResult> {
        let result = tokio::time::timeout(timeout, self.dispatch_send(message, timeout, false, None))
            .await
            .map_err(|_| send_timeout(timeout))??;
        result.ok_or_else(|| ProducerError::send_failed("inner sender returned no send result"))
    }

    pub async fn batch_send(&self, messages: Vec<ProduceMessage>) -> Result<Vec<SendResult>> {
        self.batch_send_with_timeout(messages, self.config.timeout())
            .await
    }

    pub async fn batch_send_with_timeout(
        &self,
        messages: Vec<ProduceMessage>,
        timeout: Duration,
    ) -> Result<Vec<SendResult>> {
        let expected = messages.len();
        let results = tokio::time::timeout(
            timeout,
            self.dispatch_batch_send(messages, timeout, false, None),
        )
        .await
        .map_err(|_| send_timeout(timeout))??;
        check_batch_results(expected, results.len())?;
        Ok(results)
    }

    // ============================================================
    // 单向发送
    // ============================================================

    pub async fn send_oneway(&self, message: ProduceMessage) -> Result<()> {
        self.send_oneway_with_timeout(message, self.config.timeout())
            .await
    }

    pub async fn send_oneway_with_timeout(
        &self,
        message: ProduceMessage,
        timeout: Duration,
    ) -> Result<()> {
        self.dispatch_send(message, timeout, true, None).await?;
        Ok(())
    }

    pub async fn batch_send_oneway(&self, messages: Vec<ProduceMessage>) -> Result<()> {
        self.batch_send_oneway_with_timeout(messages, self.config.timeout())
            .await
    }

    pub async fn batch_send_oneway_with_timeout(
        &self,
        messages: Vec<ProduceMessage>,
        timeout: Duration,
    ) -> Result<()> {
        self.dispatch_batch_send(messages, timeout, true, None)
            .await?;
        Ok(())
    }

    // ============================================================
    // 回调发送
    // ============================================================

    /// 提交后立即返回，结果通过回调交付
    pub async fn send_with_callback(
        &self,
        message: ProduceMessage,
        callback: Arc<dyn AsyncProduceCallback>,
    ) -> Result<()> {
        self.send_with_callback_timeout(message, self.config.timeout(), callback)
            .await
    }

    pub async fn send_with_callback_timeout(
        &self,
        message: ProduceMessage,
        timeout: Duration,
        callback: Arc<dyn AsyncProduceCallback>,
    ) -> Result<()> {
        self.dispatch_send(message, timeout, false, Some(callback))
            .await?;
        Ok(())
    }

    pub async fn batch_send_with_callback(
        &self,
        messages: Vec<ProduceMessage>,
        callback: Arc<dyn AsyncBatchProduceCallback>,
    ) -> Result<()> {
        self.batch_send_with_callback_timeout(messages, self.config.timeout(), callback)
            .await
    }

    pub async fn batch_send_with_callback_timeout(
        &self,
        messages: Vec<ProduceMessage>,
        timeout: Duration,
        callback: Arc<dyn AsyncBatchProduceCallback>,
    ) -> Result<()> {
        self.dispatch_batch_send(messages, timeout, false, Some(callback))
            .await?;
        Ok(())
    }

    // ============================================================
    // future 发送：内部创建回调，走回调发送路径
    // ============================================================

    pub async fn send_async(&self, message: ProduceMessage) -> Result<SendFuture<SendResult>> {
        self.send_async_with_timeout(message, self.config.timeout())
            .await
    }

    pub async fn send_async_with_timeout(
        &self,
        message: ProduceMessage,
        timeout: Duration,
    ) -> Result<SendFuture<SendResult>> {
        let (promise, future) = promise();
        let callback = Arc::new(FutureProduceCallback::new(promise));
        self.send_with_callback_timeout(message, timeout, callback)
            .await?;
        Ok(future)
    }

    pub async fn batch_send_async(
        &self,
        messages: Vec<ProduceMessage>,
    ) -> Result<SendFuture<Vec<SendResult>>> {
        self.batch_send_async_with_timeout(messages, self.config.timeout())
            .await
    }

    pub async fn batch_send_async_with_timeout(
        &self,
        messages: Vec<ProduceMessage>,
        timeout: Duration,
    ) -> Result<SendFuture<Vec<SendResult>>> {
        let (promise, future) = promise();
        let callback = Arc::new(FutureBatchProduceCallback::new(promise));
        self.batch_send_with_callback_timeout(messages, timeout, callback)
            .await?;
        Ok(future)
    }

    // ============================================================
    // 内部操作
    // ============================================================

    async fn dispatch_send(
        &self,
        message: ProduceMessage,
        timeout: Duration,
        oneway: bool,
        callback: Option<Arc<dyn AsyncProduceCallback>>,
    ) -> Result<Option<SendResult>> {
        let components = self.check_state().await?;
        let failover = self.config.failover;
        debug!(
            topic = %message.topic,
            timeout_ms = saturating_millis(timeout),
            oneway,
            failover,
            callback = callback.is_some(),
            "Dispatching send"
        );
        components
            .inner
            .send(message, None, timeout, oneway, failover, callback)
            .await
    }

    async fn dispatch_batch_send(
        &self,
        messages: Vec<ProduceMessage>,
        timeout: Duration,
        oneway: bool,
        callback: Option<Arc<dyn AsyncBatchProduceCallback>>,
    ) -> Result<Vec<SendResult>> {
        let components = self.check_state().await?;
        let failover = self.config.failover;
        debug!(
            messages = messages.len(),
            timeout_ms = saturating_millis(timeout),
            oneway,
            failover,
            callback = callback.is_some(),
            "Dispatching batch send"
        );
        components
            .inner
            .batch_send(messages, None, timeout, oneway, failover, callback)
            .await
    }

    // ============================================================
    // 事务
    // ============================================================

    /// 开启隐式事务，事务超时取配置值
    pub async fn begin_transaction(&self) -> Result<TransactionMessageProducer> {
        self.begin_transaction_with_timeout(self.config.transaction_timeout())
            .await
    }

    pub async fn begin_transaction_with_timeout(
        &self,
        timeout: Duration,
    ) -> Result<TransactionMessageProducer> {
        let components = self.check_state().await?;
        Ok(self.new_transaction(None, timeout, &components))
    }

    /// 开启指定 ID 的事务，同一 ID 多次开启得到不同序列号的事务
    pub async fn begin_transaction_with_id(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionMessageProducer> {
        self.begin_transaction_with_id_timeout(transaction_id, self.config.transaction_timeout())
            .await
    }

    pub async fn begin_transaction_with_id_timeout(
        &self,
        transaction_id: &str,
        timeout: Duration,
    ) -> Result<TransactionMessageProducer> {
        let components = self.check_state().await?;
        check_not_blank(
            transaction_id,
            ErrorCode::TransactionIdBlank,
            "transactionId not blank",
        )?;
        Ok(self.new_transaction(Some(transaction_id.to_string()), timeout, &components))
    }

    fn new_transaction(
        &self,
        transaction_id: Option<String>,
        timeout: Duration,
        components: &Components,
    ) -> TransactionMessageProducer {
        let sequence = components.sequence.next();
        info!(
            app = %self.config.app,
            sequence,
            transaction_id = ?transaction_id,
            timeout_ms = saturating_millis(timeout),
            "Transaction begun"
        );

        TransactionMessageProducer::new(
            TransactionContext {
                transaction_id,
                sequence,
                app: self.config.app.clone(),
                timeout,
            },
            self.config.clone(),
            self.cluster_manager.clone(),
            components.sender.clone(),
            components.inner.clone(),
        )
    }

    // ============================================================
    // 元数据与拦截器
    // ============================================================

    /// 查询主题元数据，主题名由内部调度器补全命名空间
    pub async fn topic_metadata(&self, topic: &str) -> Result<Option<TopicMetadata>> {
        let components = self.check_state().await?;
        check_not_blank(topic, ErrorCode::TopicBlank, "topic not blank")?;

        let topic_full_name = components.inner.topic_full_name(topic);
        self.cluster_manager
            .fetch_topic_metadata(&topic_full_name, &self.config.app)
            .await
    }

    /// 注册拦截器，同一实例重复注册返回 false
    pub async fn add_interceptor(&self, interceptor: Arc<dyn ProducerInterceptor>) -> bool {
        self.interceptors.add(interceptor).await
    }

    pub async fn remove_interceptor(&self, interceptor: &Arc<dyn ProducerInterceptor>) -> bool {
        self.interceptors.remove(interceptor).await
    }

    /// 按注册顺序返回拦截器
    pub async fn interceptors(&self) -> Vec<Arc<dyn ProducerInterceptor>> {
        self.interceptors.snapshot().await
    }
}

fn send_timeout(timeout: Duration) -> ProducerError {
    ProducerError::send_timeout(format!("send timeout after {}ms", timeout.as_millis()))
}

/// 生产者构建器
///
/// 协作组件以 `Option` 收集，`build` 时缺少任何一个都会返回参数错误。
pub struct MessageProducerBuilder {
    config: ProducerConfig,
    name_server_config: Option<NameServerConfig>,
    cluster_manager: Option<Arc<dyn ClusterManager>>,
    client_manager: Option<Arc<dyn ProducerClientManager>>,
    inner_factory: Option<Arc<dyn ProducerInnerFactory>>,
}

impl MessageProducerBuilder {
    pub fn new(config: ProducerConfig) -> Self {
        Self {
            config,
            name_server_config: None,
            cluster_manager: None,
            client_manager: None,
            inner_factory: None,
        }
    }

    pub fn name_server_config(mut self, config: NameServerConfig) -> Self {
        self.name_server_config = Some(config);
        self
    }

    pub fn cluster_manager(mut self, cluster_manager: Arc<dyn ClusterManager>) -> Self {
        self.cluster_manager = Some(cluster_manager);
        self
    }

    pub fn client_manager(mut self, client_manager: Arc<dyn ProducerClientManager>) -> Self {
        self.client_manager = Some(client_manager);
        self
    }

    pub fn inner_factory(mut self, factory: Arc<dyn ProducerInnerFactory>) -> Self {
        self.inner_factory = Some(factory);
        self
    }

    pub fn build(self) -> Result<DefaultMessageProducer> {
        let name_server_config = self
            .name_server_config
            .ok_or_else(|| ProducerError::invalid_parameter("nameServer not null"))?;
        let cluster_manager = self
            .cluster_manager
            .ok_or_else(|| ProducerError::invalid_parameter("clusterManager not null"))?;
        let client_manager = self
            .client_manager
            .ok_or_else(|| ProducerError::invalid_parameter("producerClientManager not null"))?;
        let inner_factory = self
            .inner_factory
            .ok_or_else(|| ProducerError::invalid_parameter("producerInnerFactory not null"))?;

        DefaultMessageProducer::new(
            self.config,
            name_server_config,
            cluster_manager,
            client_manager,
            inner_factory,
        )
    }
}
