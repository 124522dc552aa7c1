use std::sync::{Arc, PoisonError, RwLock};

use runscope_core::{AppError, AppResult};
use runscope_domain::{FetchRequest, FetchResult, TimeMetricMode, WorkflowInstance};
use tracing::{debug, info, warn};

use crate::activity_descriptor_cache::ActivityDescriptorCache;
use crate::journal_ports::{
    ActivityDisplaySettingsRegistry, ActivityRegistry, JournalRenderTarget, WorkflowJournalSource,
};
use crate::pending_actions_queue::PendingActionsQueue;
use crate::windowed_record_provider::WindowedRecordProvider;

type RenderTargetSlot = Arc<RwLock<Option<Arc<dyn JournalRenderTarget>>>>;

/// Data supply for the virtualized execution journal of one workflow instance.
///
/// The host assigns an instance, attaches the list control once it exists and
/// then forwards the control's fetch requests. The initial refresh requested by
/// [`assign_owner`](Self::assign_owner) waits in a queue until
/// [`attach_render_target`](Self::attach_render_target) is called.
pub struct JournalViewer {
    descriptor_cache: ActivityDescriptorCache,
    record_provider: WindowedRecordProvider,
    pending_actions: PendingActionsQueue,
    render_target: RenderTargetSlot,
    workflow_instance: RwLock<Option<WorkflowInstance>>,
    time_metric_mode: RwLock<TimeMetricMode>,
}

impl JournalViewer {
    /// Creates a viewer with no assigned instance and no render target.
    #[must_use]
    pub fn new(
        journal_source: Arc<dyn WorkflowJournalSource>,
        activity_registry: Arc<dyn ActivityRegistry>,
        display_settings_registry: Arc<dyn ActivityDisplaySettingsRegistry>,
    ) -> Self {
        let render_target: RenderTargetSlot = Arc::new(RwLock::new(None));
        let gate_slot = Arc::clone(&render_target);

        Self {
            descriptor_cache: ActivityDescriptorCache::new(activity_registry),
            record_provider: WindowedRecordProvider::new(journal_source, display_settings_registry),
            pending_actions: PendingActionsQueue::new(move || current_target(&gate_slot).is_some()),
            render_target,
            workflow_instance: RwLock::new(None),
            time_metric_mode: RwLock::new(TimeMetricMode::default()),
        }
    }

    /// Warms the activity descriptor cache.
    pub async fn initialize(&self) -> AppResult<()> {
        self.descriptor_cache.ensure_loaded().await.map(|_| ())
    }

    /// Switches the viewer to another workflow instance.
    ///
    /// Resets the descriptor cache and any pending refresh, reloads
    /// descriptors and requests a refresh of the render target, deferred until
    /// one is attached. The refresh is requested even when reloading the
    /// descriptors fails; that error is returned afterwards and the next fetch
    /// retries the load.
    pub async fn assign_owner(&self, workflow_instance: WorkflowInstance) -> AppResult<()> {
        info!(
            workflow_instance_id = %workflow_instance.id(),
            "assigning workflow instance to journal viewer"
        );

        self.descriptor_cache.reset().await;
        let discarded_actions = self.pending_actions.clear();
        if discarded_actions > 0 {
            debug!(discarded_actions, "discarded pending journal actions");
        }

        *self
            .workflow_instance
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(workflow_instance);

        let descriptors_loaded = self
            .descriptor_cache
            .ensure_loaded()
            .await
            .map(|_| ())
            .inspect_err(|error| {
                warn!(error = %error, "failed to load activity descriptors for journal owner");
            });

        let render_target = Arc::clone(&self.render_target);
        let refreshed = self
            .pending_actions
            .enqueue(move || async move {
                let Some(target) = current_target(&render_target) else {
                    return Err(AppError::Conflict(
                        "journal render target was detached before refresh".to_owned(),
                    ));
                };

                target.refresh().await
            })
            .await;

        descriptors_loaded.and(refreshed)
    }

    /// Signals that the list control exists and runs deferred actions.
    pub async fn attach_render_target(&self, target: Arc<dyn JournalRenderTarget>) -> AppResult<()> {
        *self
            .render_target
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(target);
        debug!(
            pending_actions = self.pending_actions.len(),
            "journal render target attached"
        );

        self.pending_actions.process().await
    }

    /// Detaches the list control, deferring later refreshes again.
    pub fn detach_render_target(&self) -> Option<Arc<dyn JournalRenderTarget>> {
        self.render_target
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Serves one window for the virtualization control.
    pub async fn fetch(&self, request: FetchRequest) -> AppResult<FetchResult> {
        let Some(workflow_instance) = self.workflow_instance() else {
            return Ok(FetchResult::empty());
        };

        let descriptors = self.descriptor_cache.ensure_loaded().await?;
        self.record_provider
            .fetch(
                &workflow_instance,
                request,
                self.time_metric_mode(),
                descriptors.as_ref(),
            )
            .await
    }

    /// Returns the assigned workflow instance.
    #[must_use]
    pub fn workflow_instance(&self) -> Option<WorkflowInstance> {
        self.workflow_instance
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the current time metric mode.
    #[must_use]
    pub fn time_metric_mode(&self) -> TimeMetricMode {
        *self
            .time_metric_mode
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes how subsequently fetched entries compute their time metric.
    pub fn set_time_metric_mode(&self, mode: TimeMetricMode) {
        *self
            .time_metric_mode
            .write()
            .unwrap_or_else(PoisonError::into_inner) = mode;
    }

    /// Applies the journal toggle button state.
    pub fn toggle_time_metric(&self, absolute: bool) {
        self.set_time_metric_mode(TimeMetricMode::from_toggle(absolute));
    }

    /// Returns the number of actions waiting for a render target.
    #[must_use]
    pub fn pending_action_count(&self) -> usize {
        self.pending_actions.len()
    }
}

fn current_target(slot: &RenderTargetSlot) -> Option<Arc<dyn JournalRenderTarget>> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}
