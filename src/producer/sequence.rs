use std::sync::atomic::{AtomicU64, Ordering};

/// 事务序列号生成器
///
/// 每个生产者实例独享一个，从 0 开始单调递增，不持久化。
#[derive(Debug, Default)]
pub struct TransactionSequence {
    next: AtomicU64,
}

impl TransactionSequence {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// 取出下一个序列号，每次调用恰好消耗一个值
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
