use async_trait::async_trait;
use runscope_core::AppResult;

/// Virtualized list handle that renders journal entries.
#[async_trait]
pub trait JournalRenderTarget: Send + Sync {
    /// Discards rendered rows and fetches the visible window again.
    async fn refresh(&self) -> AppResult<()>;
}
