//! Runscope command-line viewer for workflow instance execution journals.

#![forbid(unsafe_code)]

mod cli_config;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cli_config::{JournalCliConfig, init_tracing};
use runscope_application::{JournalRenderTarget, JournalViewer, WorkflowInstanceLookup};
use runscope_core::{AppError, AppResult};
use runscope_domain::{FetchRequest, JournalEntry, format_time_metric};
use runscope_infrastructure::{HttpStudioClient, StaticActivityDisplaySettingsRegistry};
use tokio::sync::mpsc;
use tracing::info;

/// Render target that signals refresh requests over a channel.
struct ChannelRenderTarget {
    refreshes: mpsc::UnboundedSender<()>,
}

#[async_trait]
impl JournalRenderTarget for ChannelRenderTarget {
    async fn refresh(&self) -> AppResult<()> {
        self.refreshes
            .send(())
            .map_err(|_| AppError::Unavailable("journal output is closed".to_owned()))
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = JournalCliConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let studio_client = Arc::new(HttpStudioClient::new(
        http_client,
        config.api_base_url.clone(),
        config.api_token.clone(),
    ));

    info!(
        api_base_url = %config.api_base_url,
        workflow_instance_id = %config.workflow_instance_id,
        page_size = config.page_size,
        time_metric = config.time_metric_mode.as_str(),
        "runscope journal-cli started"
    );

    let workflow_instance = studio_client
        .find_workflow_instance(config.workflow_instance_id.as_str())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "workflow instance '{}' does not exist",
                config.workflow_instance_id
            ))
        })?;

    let viewer = JournalViewer::new(
        studio_client.clone(),
        studio_client,
        Arc::new(StaticActivityDisplaySettingsRegistry::default()),
    );
    viewer.set_time_metric_mode(config.time_metric_mode);
    viewer.initialize().await?;
    viewer.assign_owner(workflow_instance).await?;

    let (refresh_sender, mut refresh_receiver) = mpsc::unbounded_channel();
    viewer
        .attach_render_target(Arc::new(ChannelRenderTarget {
            refreshes: refresh_sender,
        }))
        .await?;

    if refresh_receiver.recv().await.is_none() {
        return Err(AppError::Internal(
            "journal viewer never requested a refresh".to_owned(),
        ));
    }

    let printed = print_journal(&viewer, config.page_size, &mut io::stdout().lock()).await?;
    viewer.detach_render_target();
    info!(printed_entries = printed, "journal printed");

    Ok(())
}

/// Writes every journal entry, one line each, and returns how many were written.
///
/// Windows past row zero read one extra leading record for the relative metric
/// and report a total one lower than the journal size. They request one extra
/// row so every page holds `page_size` entries, and paging stops on the first
/// empty window rather than on the reported total.
async fn print_journal(
    viewer: &JournalViewer,
    page_size: usize,
    output: &mut impl Write,
) -> AppResult<usize> {
    let mut start_index = 0_usize;

    loop {
        let count = if start_index > 0 {
            page_size.saturating_add(1)
        } else {
            page_size
        };
        let page = viewer.fetch(FetchRequest::new(start_index, count)).await?;
        if page.items.is_empty() {
            return Ok(start_index);
        }

        for (offset, entry) in page.items.iter().enumerate() {
            writeln!(output, "{}", format_entry(start_index + offset, entry)).map_err(|error| {
                AppError::Internal(format!("failed to write journal entry: {error}"))
            })?;
        }

        start_index += page.items.len();
    }
}

fn format_entry(index: usize, entry: &JournalEntry) -> String {
    let marker = if entry.is_even { ' ' } else { '·' };
    let event_name = entry.record.event_name.as_deref().unwrap_or("-");
    let message = entry.record.message.as_deref().unwrap_or_default();

    format!(
        "{marker}{index:>6}  {time:>14}  {activity:<28} {event_name:<12} {message}",
        time = format_time_metric(entry.time_metric),
        activity = entry.activity_descriptor.display_name,
    )
    .trim_end()
    .to_owned()
}
