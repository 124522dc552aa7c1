use std::sync::Arc;

use runscope_core::AppResult;
use runscope_domain::{
    ExecutionLogRecord, FetchRequest, FetchResult, JournalEntry, JournalWindow, TimeMetricMode,
    WorkflowInstance, time_metric,
};
use tracing::debug;

use crate::activity_descriptor_cache::ActivityDescriptorCatalog;
use crate::journal_ports::{ActivityDisplaySettingsRegistry, WorkflowJournalSource};

/// Serves virtualization-control windows from a skip/take journal backend.
#[derive(Clone)]
pub struct WindowedRecordProvider {
    journal_source: Arc<dyn WorkflowJournalSource>,
    display_settings_registry: Arc<dyn ActivityDisplaySettingsRegistry>,
}

impl WindowedRecordProvider {
    /// Creates a provider over one journal backend.
    #[must_use]
    pub fn new(
        journal_source: Arc<dyn WorkflowJournalSource>,
        display_settings_registry: Arc<dyn ActivityDisplaySettingsRegistry>,
    ) -> Self {
        Self {
            journal_source,
            display_settings_registry,
        }
    }

    /// Fetches the rows starting at `request.start_index`.
    ///
    /// Windows past row zero read one extra leading record from the backend.
    /// It only serves as the predecessor of the first visible row and the
    /// reported total shrinks by one to keep row indexes aligned.
    pub async fn fetch(
        &self,
        workflow_instance: &WorkflowInstance,
        request: FetchRequest,
        mode: TimeMetricMode,
        descriptors: &ActivityDescriptorCatalog,
    ) -> AppResult<FetchResult> {
        let window = JournalWindow::for_request(request);
        let page = self
            .journal_source
            .fetch_journal_page(
                workflow_instance.id().as_str(),
                window.backend_skip(),
                window.take(),
            )
            .await?;

        let total_count = window.visible_total_count(page.total_count);
        let items = self.build_entries(
            page.records.as_slice(),
            window,
            mode,
            workflow_instance,
            descriptors,
        );

        debug!(
            workflow_instance_id = %workflow_instance.id(),
            start_index = request.start_index,
            requested_count = request.count,
            backend_skip = window.backend_skip(),
            take = window.take(),
            fetched_records = page.records.len(),
            visible_entries = items.len(),
            total_count,
            "served journal window"
        );

        Ok(FetchResult { items, total_count })
    }

    fn build_entries(
        &self,
        records: &[ExecutionLogRecord],
        window: JournalWindow,
        mode: TimeMetricMode,
        workflow_instance: &WorkflowInstance,
        descriptors: &ActivityDescriptorCatalog,
    ) -> Vec<JournalEntry> {
        records
            .iter()
            .enumerate()
            .skip(window.local_skip())
            .enumerate()
            .map(|(visible_position, (index, record))| {
                let previous = index
                    .checked_sub(1)
                    .and_then(|previous_index| records.get(previous_index));

                JournalEntry {
                    record: record.clone(),
                    activity_descriptor: descriptors.descriptor_for(&record.activity_type),
                    display_settings: self
                        .display_settings_registry
                        .settings_for(&record.activity_type),
                    is_even: visible_position % 2 == 0,
                    time_metric: time_metric(
                        mode,
                        record,
                        previous,
                        workflow_instance.created_at(),
                    ),
                }
            })
            .collect()
    }
}
