//! 回调到 future 的桥接
//!
//! 每次调用创建一对 `Promise` / `SendFuture`。`Promise` 只能被完成一次，
//! 之后的完成调用全部被忽略；`SendFuture` 等待结果或在超时后返回超时错误。

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::trace;

use super::callback::{AsyncBatchProduceCallback, AsyncProduceCallback};
use crate::error::{ErrorBuilder, ErrorCode, ProducerError, Result};
use crate::types::{ProduceMessage, SendResult};

/// 创建一对单次赋值的结果容器
pub fn promise<T>() -> (Promise<T>, SendFuture<T>) {
    let (tx, rx) = oneshot::channel();
    (
        Promise {
            slot: Mutex::new(Some(tx)),
        },
        SendFuture { receiver: rx },
    )
}

/// 结果写入端
pub struct Promise<T> {
    slot: Mutex<Option<oneshot::Sender<Result<T>>>>,
}

impl<T> Promise<T> {
    /// 写入结果，只有第一次调用生效
    ///
    /// 返回本次调用是否赢得写入权。等待方已经超时放弃时依然返回 true，
    /// 结果被直接丢弃。
    pub fn complete(&self, result: Result<T>) -> bool {
        let sender = {
            let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            slot.take()
        };
        match sender {
            Some(sender) => {
                if sender.send(result).is_err() {
                    trace!("Send result arrived after the waiter gave up");
                }
                true
            }
            None => false,
        }
    }

    pub fn set_response(&self, value: T) -> bool {
        self.complete(Ok(value))
    }

    pub fn set_error(&self, cause: ProducerError) -> bool {
        self.complete(Err(cause))
    }

    pub fn is_completed(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

/// 结果读取端
pub struct SendFuture<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> SendFuture<T> {
    /// 等待结果，超过 `timeout` 返回超时错误
    pub async fn get(self, timeout: Duration) -> Result<T> {
        match tokio::time::timeout(timeout, self).await {
            Ok(result) => result,
            Err(_) => Err(ProducerError::send_timeout(format!(
                "wait for send result timeout after {}ms",
                timeout.as_millis()
            ))),
        }
    }

    /// 非阻塞地查看结果，尚未完成时返回 `None`
    pub fn try_get(&mut self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(abandoned())),
        }
    }
}

/// 批量结果必须与输入一一对应
pub(crate) fn check_batch_results(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ErrorBuilder::new(
            ErrorCode::BatchResultMismatch,
            "batch send result count does not match message count",
        )
        .details(format!("expected {}, got {}", expected, actual))
        .build_error())
    }
}

fn abandoned() -> ProducerError {
    ProducerError::send_failed("send completed without delivering a result")
}

impl<T> Future for SendFuture<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(abandoned())),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// 把单条发送回调转为 future 结果
pub struct FutureProduceCallback {
    promise: Promise<SendResult>,
}

impl FutureProduceCallback {
    pub fn new(promise: Promise<SendResult>) -> Self {
        Self { promise }
    }
}

impl AsyncProduceCallback for FutureProduceCallback {
    fn on_success(&self, _message: &ProduceMessage, result: &SendResult) {
        self.promise.set_response(result.clone());
    }

    fn on_exception(&self, _message: &ProduceMessage, cause: &ProducerError) {
        self.promise.set_error(cause.clone());
    }
}

/// 把批量发送回调转为 future 结果
pub struct FutureBatchProduceCallback {
    promise: Promise<Vec<SendResult>>,
}

impl FutureBatchProduceCallback {
    pub fn new(promise: Promise<Vec<SendResult>>) -> Self {
        Self { promise }
    }
}

impl AsyncBatchProduceCallback for FutureBatchProduceCallback {
    fn on_success(&self, messages: &[ProduceMessage], results: &[SendResult]) {
        if let Err(cause) = check_batch_results(messages.len(), results.len()) {
            self.promise.set_error(cause);
            return;
        }
        self.promise.set_response(results.to_vec());
    }

    fn on_exception(&self, _messages: &[ProduceMessage], cause: &ProducerError) {
        self.promise.set_error(cause.clone());
    }
}
