use async_trait::async_trait;
use runscope_core::AppResult;
use runscope_domain::{StorageDriverDescriptor, VariableTypeDescriptor};

/// Port for the variable types a workflow input can use.
#[async_trait]
pub trait VariableTypeCatalog: Send + Sync {
    /// Lists variable types in presentation order.
    async fn list_variable_types(&self) -> AppResult<Vec<VariableTypeDescriptor>>;
}

/// Port for the storage drivers a workflow input can use.
#[async_trait]
pub trait StorageDriverCatalog: Send + Sync {
    /// Lists storage drivers in presentation order.
    async fn list_storage_drivers(&self) -> AppResult<Vec<StorageDriverDescriptor>>;
}
