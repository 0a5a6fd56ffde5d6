//! JournalQ Message Producer
//!
//! Client-side producer facade: lifecycle management, send dispatch for every
//! delivery mode (sync, oneway, callback, future; single and batch),
//! transactional producers and interceptor registration. Network transport,
//! partition selection, retry and failover are provided by the inner sender.

pub mod client;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod producer;
pub mod retry;
pub mod telemetry;
pub mod types;

// Re-exports
pub use client::{ClusterManager, ProducerClientManager};
pub use config::{ClientConfig, CompressType, NameServerConfig, ProducerConfig, QosLevel, SenderConfig};
pub use error::{ErrorBuilder, ErrorCategory, ErrorCode, LocalizedError, ProducerError, Result};
pub use interceptor::{InterceptorRegistry, LoggingInterceptor, ProduceContext, ProducerInterceptor};
pub use producer::{
    AsyncBatchProduceCallback, AsyncProduceCallback, DefaultMessageProducer, InnerContext,
    MessageProducerBuilder, MessageProducerInner, MessageSender, ProducerInnerFactory, Promise,
    SendFuture, ServiceState, TransactionContext, TransactionMessageProducer, TransactionSequence,
    TransactionState, promise,
};
pub use retry::{ExponentialBackoffPolicy, FixedRetryPolicy, RetryPolicy, RetryStrategy};
pub use types::{PartitionMetadata, ProduceMessage, SendResult, TopicMetadata};
