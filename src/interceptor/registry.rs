use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::ProducerInterceptor;

/// 拦截器注册表
///
/// 按注册顺序保存拦截器，以引用身份（同一个 `Arc`）判重。
/// 写操作互斥，读操作（发送链路取快照）可以并发。
pub struct InterceptorRegistry {
    interceptors: RwLock<Vec<Arc<dyn ProducerInterceptor>>>,
}

fn same_handle(a: &Arc<dyn ProducerInterceptor>, b: &Arc<dyn ProducerInterceptor>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self {
            interceptors: RwLock::new(Vec::new()),
        }
    }

    /// 注册拦截器，已注册的同一实例返回 false
    pub async fn add(&self, interceptor: Arc<dyn ProducerInterceptor>) -> bool {
        let mut interceptors = self.interceptors.write().await;
        if interceptors.iter().any(|existing| same_handle(existing, &interceptor)) {
            return false;
        }
        debug!(name = interceptor.name(), "Interceptor registered");
        interceptors.push(interceptor);
        true
    }

    /// 注销拦截器，未注册时返回 false
    pub async fn remove(&self, interceptor: &Arc<dyn ProducerInterceptor>) -> bool {
        let mut interceptors = self.interceptors.write().await;
        let before = interceptors.len();
        interceptors.retain(|existing| !same_handle(existing, interceptor));
        let removed = interceptors.len() != before;
        if removed {
            debug!(name = interceptor.name(), "Interceptor removed");
        }
        removed
    }

    /// 按注册顺序返回当前拦截器快照
    pub async fn snapshot(&self) -> Vec<Arc<dyn ProducerInterceptor>> {
        self.interceptors.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.interceptors.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.interceptors.read().await.is_empty()
    }
}

impl Default for InterceptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
