//! 事务生产者
//!
//! 由 `DefaultMessageProducer::begin_transaction*` 创建，生命周期只覆盖一个事务。
//! 与父生产者共享发送器、集群管理器和配置，不持有独立连接。

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::future::check_batch_results;
use super::inner::{MessageProducerInner, MessageSender, TransactionContext};
use crate::client::ClusterManager;
use crate::config::ProducerConfig;
use crate::error::{ErrorBuilder, ErrorCode, ProducerError, Result};
use crate::types::{ProduceMessage, SendResult};

/// 事务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionState {
    Active,
    Committed,
    RolledBack,
}

/// 事务生产者
pub struct TransactionMessageProducer {
    context: TransactionContext,
    config: Arc<ProducerConfig>,
    cluster_manager: Arc<dyn ClusterManager>,
    sender: Arc<dyn MessageSender>,
    inner: Arc<dyn MessageProducerInner>,
    state: Mutex<TransactionState>,
    began_at: Instant,
}

impl TransactionMessageProducer {
    pub(crate) fn new(
        context: TransactionContext,
        config: Arc<ProducerConfig>,
        cluster_manager: Arc<dyn ClusterManager>,
        sender: Arc<dyn MessageSender>,
        inner: Arc<dyn MessageProducerInner>,
    ) -> Self {
        Self {
            context,
            config,
            cluster_manager,
            sender,
            inner,
            state: Mutex::new(TransactionState::Active),
            began_at: Instant::now(),
        }
    }

    /// 调用方指定的事务 ID
    pub fn transaction_id(&self) -> Option<&str> {
        self.context.transaction_id.as_deref()
    }

    pub fn sequence(&self) -> u64 {
        self.context.sequence
    }

    pub fn timeout(&self) -> Duration {
        self.context.timeout
    }

    pub fn context(&self) -> &TransactionContext {
        &self.context
    }

    pub fn config(&self) -> &Arc<ProducerConfig> {
        &self.config
    }

    pub fn sender(&self) -> &Arc<dyn MessageSender> {
        &self.sender
    }

    pub fn cluster_manager(&self) -> &Arc<dyn ClusterManager> {
        &self.cluster_manager
    }

    pub async fn state(&self) -> TransactionState {
        *self.state.lock().await
    }

    pub async fn send(&self, message: ProduceMessage) -> Result<SendResult> {
        self.send_with_timeout(message, self.config.timeout()).await
    }

    pub async fn send_with_timeout(
        &self,
        message: ProduceMessage,
        timeout: Duration,
    ) -> Result<SendResult> {
        self.ensure_active().await?;
        debug!(
            sequence = self.context.sequence,
            topic = %message.topic,
            "Sending transactional message"
        );

        let send = self.inner.send(
            message,
            Some(self.context.clone()),
            timeout,
            false,
            self.config.failover,
            None,
        );
        let result = tokio::time::timeout(timeout, send)
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
        self.ensure_active().await?;
        let expected = messages.len();

        let send = self.inner.batch_send(
            messages,
            Some(self.context.clone()),
            timeout,
            false,
            self.config.failover,
            None,
        );
        let results = tokio::time::timeout(timeout, send)
            .await
            .map_err(|_| send_timeout(timeout))??;
        check_batch_results(expected, results.len())?;
        Ok(results)
    }

    /// 提交事务，失败时事务保持活跃，可以重试提交或回滚
    pub async fn commit(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.check_active(*state)?;
        self.check_not_expired()?;

        self.inner.commit_transaction(&self.context).await?;
        *state = TransactionState::Committed;
        info!(
            sequence = self.context.sequence,
            transaction_id = ?self.context.transaction_id,
            "Transaction committed"
        );
        Ok(())
    }

    /// 回滚事务，超时后仍然允许回滚
    pub async fn rollback(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.check_active(*state)?;

        self.inner.rollback_transaction(&self.context).await?;
        *state = TransactionState::RolledBack;
        info!(
            sequence = self.context.sequence,
            transaction_id = ?self.context.transaction_id,
            "Transaction rolled back"
        );
        Ok(())
    }

    async fn ensure_active(&self) -> Result<()> {
        let state = *self.state.lock().await;
        self.check_active(state)?;
        self.check_not_expired()
    }

    fn check_active(&self, state: TransactionState) -> Result<()> {
        if state == TransactionState::Active {
            return Ok(());
        }
        warn!(
            sequence = self.context.sequence,
            state = ?state,
            "Transaction already completed"
        );
        Err(ProducerError::transaction_completed(format!(
            "transaction already completed, state {:?}",
            state
        )))
    }

    fn check_not_expired(&self) -> Result<()> {
        let elapsed = self.began_at.elapsed();
        if elapsed <= self.context.timeout {
            return Ok(());
        }
        Err(ErrorBuilder::new(ErrorCode::TransactionTimeout, "transaction timeout")
            .details(format!(
                "elapsed {}ms, timeout {}ms",
                elapsed.as_millis(),
                self.context.timeout.as_millis()
            ))
            .build_error())
    }
}

fn send_timeout(timeout: Duration) -> ProducerError {
    ProducerError::send_timeout(format!("send timeout after {}ms", timeout.as_millis()))
}
