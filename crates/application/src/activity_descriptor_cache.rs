use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use runscope_core::AppResult;
use runscope_domain::ActivityDescriptor;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::journal_ports::ActivityRegistry;

/// Activity descriptors keyed by activity type name.
#[derive(Debug, Clone, Default)]
pub struct ActivityDescriptorCatalog {
    descriptors: HashMap<String, ActivityDescriptor>,
}

impl ActivityDescriptorCatalog {
    /// Builds a catalog, keeping the first descriptor of duplicated type names.
    #[must_use]
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ActivityDescriptor>) -> Self {
        let mut catalog = HashMap::new();
        for descriptor in descriptors {
            match catalog.entry(descriptor.type_name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(descriptor);
                }
                Entry::Occupied(existing) => {
                    warn!(
                        activity_type = %existing.key(),
                        "duplicate activity descriptor ignored"
                    );
                }
            }
        }

        Self {
            descriptors: catalog,
        }
    }

    /// Returns the descriptor registered for `activity_type`.
    #[must_use]
    pub fn get(&self, activity_type: &str) -> Option<&ActivityDescriptor> {
        self.descriptors.get(activity_type)
    }

    /// Returns the registered descriptor or a synthesized placeholder.
    #[must_use]
    pub fn descriptor_for(&self, activity_type: &str) -> ActivityDescriptor {
        match self.get(activity_type) {
            Some(descriptor) => descriptor.clone(),
            None => {
                warn!(
                    activity_type,
                    "unknown activity type in journal, using placeholder descriptor"
                );
                ActivityDescriptor::placeholder(activity_type)
            }
        }
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Lazily populated descriptor catalog shared by one journal viewer.
pub struct ActivityDescriptorCache {
    registry: Arc<dyn ActivityRegistry>,
    catalog: Mutex<Option<Arc<ActivityDescriptorCatalog>>>,
}

impl ActivityDescriptorCache {
    /// Creates an empty cache backed by `registry`.
    #[must_use]
    pub fn new(registry: Arc<dyn ActivityRegistry>) -> Self {
        Self {
            registry,
            catalog: Mutex::new(None),
        }
    }

    /// Loads the catalog from the registry unless it is already populated.
    ///
    /// Concurrent callers wait for the first load and share its result.
    pub async fn ensure_loaded(&self) -> AppResult<Arc<ActivityDescriptorCatalog>> {
        let mut catalog = self.catalog.lock().await;
        if let Some(loaded) = catalog.as_ref() {
            return Ok(Arc::clone(loaded));
        }

        let descriptors = self.registry.list_activity_descriptors().await?;
        let loaded = Arc::new(ActivityDescriptorCatalog::from_descriptors(descriptors));
        debug!(
            descriptor_count = loaded.len(),
            "loaded activity descriptors"
        );
        *catalog = Some(Arc::clone(&loaded));

        Ok(loaded)
    }

    /// Returns the descriptor for `activity_type`, loading the catalog first.
    pub async fn lookup(&self, activity_type: &str) -> AppResult<ActivityDescriptor> {
        Ok(self.ensure_loaded().await?.descriptor_for(activity_type))
    }

    /// Forgets the loaded catalog so the next access reloads it.
    pub async fn reset(&self) {
        *self.catalog.lock().await = None;
    }

    /// Returns whether the catalog is populated.
    pub async fn is_loaded(&self) -> bool {
        self.catalog.lock().await.is_some()
    }
}
