//! 事务生产者测试

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use common::{Behavior, Harness, TEST_APP, message};
use journalq_producer::{ErrorCode, TransactionState};

#[tokio::test]
async fn test_same_transaction_id_gets_distinct_sequences() {
    let (_harness, producer) = Harness::started(Behavior::Echo(0)).await;

    let first = producer.begin_transaction_with_id("tx-1").await.unwrap();
    let second = producer.begin_transaction_with_id("tx-1").await.unwrap();

    assert_eq!(first.transaction_id(), Some("tx-1"));
    assert_eq!(second.transaction_id(), Some("tx-1"));
    assert_ne!(first.sequence(), second.sequence());
    assert_eq!(first.context().app, TEST_APP);
    assert_eq!(first.timeout(), producer.config().transaction_timeout());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_begin_allocates_each_sequence_once() {
    let (_harness, producer) = Harness::started(Behavior::Echo(0)).await;
    let producer = Arc::new(producer);

    let handles = (0..50).map(|_| {
        let producer = producer.clone();
        tokio::spawn(async move { producer.begin_transaction().await.map(|tx| tx.sequence()) })
    });

    let sequences: HashSet<u64> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();
    assert_eq!(sequences, (0..50).collect::<HashSet<u64>>());
}

#[tokio::test]
async fn test_blank_transaction_id_is_rejected() {
    let (_harness, producer) = Harness::started(Behavior::Echo(0)).await;

    for id in ["", "  "] {
        let err = producer.begin_transaction_with_id(id).await.err().unwrap();
        assert_eq!(err.code(), Some(ErrorCode::TransactionIdBlank));
    }

    // 被拒绝的调用不消耗序列号
    let tx = producer.begin_transaction().await.unwrap();
    assert_eq!(tx.sequence(), 0);
    assert!(tx.transaction_id().is_none());
}

#[tokio::test]
async fn test_transaction_shares_parent_components() {
    let (harness, producer) = Harness::started(Behavior::Echo(0)).await;

    let tx = producer
        .begin_transaction_with_timeout(Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(tx.timeout(), Duration::from_secs(5));
    assert!(Arc::ptr_eq(tx.config(), producer.config()));
    assert!(std::ptr::addr_eq(
        Arc::as_ptr(tx.sender()),
        Arc::as_ptr(harness.sender())
    ));
    assert!(std::ptr::addr_eq(
        Arc::as_ptr(tx.cluster_manager()),
        Arc::as_ptr(&harness.cluster_manager)
    ));
}

#[tokio::test]
async fn test_transactional_send_carries_context() {
    let (harness, producer) = Harness::started(Behavior::Echo(3)).await;

    let tx = producer.begin_transaction_with_id("tx-9").await.unwrap();
    let result = tx.send(message("orders", "a")).await.unwrap();
    assert_eq!(result.offset, 3);

    let results = tx
        .batch_send(vec![message("orders", "b"), message("orders", "c")])
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    let calls = harness.inner().calls.lock().await.clone();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert_eq!(call.transaction.as_ref(), Some(tx.context()));
        assert!(!call.oneway);
    }
}

#[tokio::test]
async fn test_commit_completes_transaction() {
    let (harness, producer) = Harness::started(Behavior::Echo(0)).await;

    let tx = producer.begin_transaction_with_id("tx-1").await.unwrap();
    tx.send(message("orders", "a")).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(tx.state().await, TransactionState::Committed);

    let commits = harness.inner().commits.lock().await.clone();
    assert_eq!(commits, vec![tx.context().clone()]);

    let err = tx.send(message("orders", "b")).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TransactionCompleted));
    let err = tx.commit().await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TransactionCompleted));
    let err = tx.rollback().await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TransactionCompleted));

    assert_eq!(harness.inner().send_calls(), 1);
}

#[tokio::test]
async fn test_rollback_completes_transaction() {
    let (harness, producer) = Harness::started(Behavior::Echo(0)).await;

    let tx = producer.begin_transaction().await.unwrap();
    tx.rollback().await.unwrap();
    assert_eq!(tx.state().await, TransactionState::RolledBack);
    assert_eq!(harness.inner().rollbacks.lock().await.len(), 1);
    assert!(harness.inner().commits.lock().await.is_empty());

    let err = tx.send(message("orders", "a")).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TransactionCompleted));
}

#[tokio::test]
async fn test_expired_transaction_rejects_send_and_commit() {
    let (harness, producer) = Harness::started(Behavior::Echo(0)).await;

    let tx = producer
        .begin_transaction_with_id_timeout("tx-1", Duration::from_millis(20))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;

    let err = tx.send(message("orders", "a")).await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TransactionTimeout));
    assert!(err.is_timeout());

    let err = tx.commit().await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TransactionTimeout));
    assert_eq!(tx.state().await, TransactionState::Active);

    // 超时后仍可回滚
    tx.rollback().await.unwrap();
    assert_eq!(tx.state().await, TransactionState::RolledBack);
    assert_eq!(harness.inner().send_calls(), 0);
}

#[tokio::test]
async fn test_begin_transaction_after_stop_fails() {
    let (_harness, producer) = Harness::started(Behavior::Echo(0)).await;
    producer.stop().await;

    let err = producer.begin_transaction().await.err().unwrap();
    assert!(err.is_service_unavailable());
    let err = producer.begin_transaction_with_id("tx-1").await.err().unwrap();
    assert!(err.is_service_unavailable());
}
