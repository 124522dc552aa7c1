use async_trait::async_trait;
use reqwest::StatusCode;
use runscope_application::{
    ActivityRegistry, JournalPage, StorageDriverCatalog, VariableTypeCatalog,
    WorkflowInstanceLookup, WorkflowJournalSource,
};
use runscope_core::{AppError, AppResult};
use runscope_domain::{
    ActivityDescriptor, StorageDriverDescriptor, VariableTypeDescriptor, WorkflowInstance,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

mod dto;

use dto::{
    ActivityDescriptorDto, JournalPageDto, ListResponseDto, StorageDriverDescriptorDto,
    VariableTypeDescriptorDto, WorkflowInstanceDto,
};

/// HTTP adapter for the workflow server's studio API.
#[derive(Clone)]
pub struct HttpStudioClient {
    http_client: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpStudioClient {
    /// Creates a client rooted at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url, api_token: Option<String>) -> Self {
        Self {
            http_client,
            base_url,
            api_token: api_token.filter(|token| !token.trim().is_empty()),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "studio api base url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T>(&self, url: Url, query: &[(&str, usize)]) -> AppResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        let mut request = self.http_client.get(url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(api_token) = &self.api_token {
            request = request.bearer_auth(api_token);
        }

        let response = request.send().await.map_err(|error| {
            AppError::Unavailable(format!("studio api request to '{url}' failed: {error}"))
        })?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "studio api responded");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            return Err(status_error(status, &url, body.as_str()));
        }

        response.json::<T>().await.map(Some).map_err(|error| {
            AppError::Internal(format!(
                "studio api returned an unreadable payload for '{url}': {error}"
            ))
        })
    }

    async fn get_list<T>(&self, segments: &[&str]) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let url = self.endpoint(segments)?;
        let response: Option<ListResponseDto<T>> = self.get_json(url.clone(), &[]).await?;
        response
            .map(|list| list.items)
            .ok_or_else(|| AppError::NotFound(format!("studio api resource '{url}'")))
    }
}

fn status_error(status: StatusCode, url: &Url, body: &str) -> AppError {
    let message = format!("studio api request to '{url}' failed with status {status}: {body}");
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        AppError::Unavailable(message)
    } else {
        AppError::Internal(message)
    }
}

#[async_trait]
impl WorkflowJournalSource for HttpStudioClient {
    async fn fetch_journal_page(
        &self,
        workflow_instance_id: &str,
        skip: usize,
        take: usize,
    ) -> AppResult<JournalPage> {
        let url = self.endpoint(&["workflow-instances", workflow_instance_id, "journal"])?;
        let page: JournalPageDto = self
            .get_json(url, &[("skip", skip), ("take", take)])
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "workflow instance '{workflow_instance_id}' does not exist"
                ))
            })?;

        Ok(JournalPage {
            records: page.items.into_iter().map(Into::into).collect(),
            total_count: page.total_count,
        })
    }
}

#[async_trait]
impl WorkflowInstanceLookup for HttpStudioClient {
    async fn find_workflow_instance(
        &self,
        workflow_instance_id: &str,
    ) -> AppResult<Option<WorkflowInstance>> {
        let url = self.endpoint(&["workflow-instances", workflow_instance_id])?;
        let instance: Option<WorkflowInstanceDto> = self.get_json(url, &[]).await?;
        instance.map(WorkflowInstance::try_from).transpose()
    }
}

#[async_trait]
impl ActivityRegistry for HttpStudioClient {
    async fn list_activity_descriptors(&self) -> AppResult<Vec<ActivityDescriptor>> {
        let descriptors: Vec<ActivityDescriptorDto> =
            self.get_list(&["descriptors", "activities"]).await?;
        Ok(descriptors.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl VariableTypeCatalog for HttpStudioClient {
    async fn list_variable_types(&self) -> AppResult<Vec<VariableTypeDescriptor>> {
        let variable_types: Vec<VariableTypeDescriptorDto> =
            self.get_list(&["descriptors", "variables"]).await?;
        Ok(variable_types.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl StorageDriverCatalog for HttpStudioClient {
    async fn list_storage_drivers(&self) -> AppResult<Vec<StorageDriverDescriptor>> {
        let storage_drivers: Vec<StorageDriverDescriptorDto> =
            self.get_list(&["descriptors", "storage-drivers"]).await?;
        Ok(storage_drivers.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests;
