use std::env;

use runscope_core::{AppError, AppResult};
use runscope_domain::{DEFAULT_JOURNAL_PAGE_SIZE, TimeMetricMode};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5001/elsa/api";
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Clone)]
pub struct JournalCliConfig {
    pub api_base_url: Url,
    pub api_token: Option<String>,
    pub workflow_instance_id: String,
    pub page_size: usize,
    pub time_metric_mode: TimeMetricMode,
    pub http_timeout_seconds: u64,
}

impl JournalCliConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let raw_base_url = lookup("JOURNAL_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = Url::parse(raw_base_url.trim()).map_err(|error| {
            AppError::Validation(format!(
                "invalid JOURNAL_API_BASE_URL '{raw_base_url}': {error}"
            ))
        })?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "JOURNAL_API_BASE_URL must use http or https, got '{}'",
                api_base_url.scheme()
            )));
        }

        let api_token = lookup("JOURNAL_API_TOKEN")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let workflow_instance_id = required_non_empty(&lookup, "JOURNAL_WORKFLOW_INSTANCE_ID")?;
        let page_size = parse_or_default(&lookup, "JOURNAL_PAGE_SIZE", DEFAULT_JOURNAL_PAGE_SIZE)?;
        let http_timeout_seconds = parse_or_default(
            &lookup,
            "JOURNAL_HTTP_TIMEOUT_SECONDS",
            DEFAULT_HTTP_TIMEOUT_SECONDS,
        )?;
        let time_metric_mode = lookup("JOURNAL_TIME_METRIC")
            .map(|value| TimeMetricMode::parse(value.as_str()))
            .transpose()?
            .unwrap_or_default();

        if page_size == 0 {
            return Err(AppError::Validation(
                "JOURNAL_PAGE_SIZE must be greater than zero".to_owned(),
            ));
        }

        if http_timeout_seconds == 0 {
            return Err(AppError::Validation(
                "JOURNAL_HTTP_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            api_token,
            workflow_instance_id,
            page_size,
            time_metric_mode,
            http_timeout_seconds,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

fn required_non_empty(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value.to_owned())
}

fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<T>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
