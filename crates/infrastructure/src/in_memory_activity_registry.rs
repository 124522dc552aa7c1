use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use runscope_application::ActivityRegistry;
use runscope_core::AppResult;
use runscope_domain::ActivityDescriptor;
use tokio::sync::RwLock;

/// In-memory activity descriptor registry.
#[derive(Debug, Default)]
pub struct InMemoryActivityRegistry {
    descriptors: RwLock<Vec<ActivityDescriptor>>,
    list_calls: AtomicUsize,
}

impl InMemoryActivityRegistry {
    /// Creates a registry serving `descriptors`.
    #[must_use]
    pub fn new(descriptors: Vec<ActivityDescriptor>) -> Self {
        Self {
            descriptors: RwLock::new(descriptors),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Adds one descriptor.
    pub async fn register(&self, descriptor: ActivityDescriptor) {
        self.descriptors.write().await.push(descriptor);
    }

    /// Returns how many times descriptors were listed.
    #[must_use]
    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ActivityRegistry for InMemoryActivityRegistry {
    async fn list_activity_descriptors(&self) -> AppResult<Vec<ActivityDescriptor>> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.descriptors.read().await.clone())
    }
}
