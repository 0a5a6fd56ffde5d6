//! 消息生产者
//!
//! - `message_producer`: 生产者门面，生命周期和发送调度
//! - `future`: 回调到 future 的单次赋值桥接
//! - `transaction`: 事务生产者
//! - `inner`: 内部发送子系统接口

pub mod callback;
pub mod future;
pub mod inner;
pub mod lifecycle;
pub mod message_producer;
pub mod sequence;
pub mod transaction;

pub use callback::{AsyncBatchProduceCallback, AsyncProduceCallback};
pub use future::{FutureBatchProduceCallback, FutureProduceCallback, Promise, SendFuture, promise};
pub use inner::{
    InnerContext, MessageProducerInner, MessageSender, ProducerInnerFactory, TransactionContext,
};
pub use lifecycle::ServiceState;
pub use message_producer::{DefaultMessageProducer, MessageProducerBuilder};
pub use sequence::TransactionSequence;
pub use transaction::{TransactionMessageProducer, TransactionState};
