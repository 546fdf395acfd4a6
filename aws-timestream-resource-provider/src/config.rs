//! Configuration for the resource handlers.
//!
//! [`ProviderConfig`] controls how Timestream clients are built and
//! [`HandlerConfig`] tunes handler behaviour. Both read optional overrides
//! from the environment of the Lambda function.

/// Region used when neither the request nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Seconds the caller waits before re-invoking an in-progress delete.
pub const DEFAULT_CALLBACK_DELAY_SECONDS: u32 = 15;

const ENDPOINT_URL_ENV: &str = "TIMESTREAM_ENDPOINT_URL";
const CALLBACK_DELAY_ENV: &str = "TIMESTREAM_CALLBACK_DELAY_SECONDS";

/// Settings for building Timestream clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// AWS region of the Timestream endpoints.
    pub region: String,
    /// Fixed endpoint URL. When set, endpoint discovery is skipped.
    pub endpoint_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
        }
    }
}

impl ProviderConfig {
    /// Builds the configuration for one request.
    ///
    /// The region comes from the request, then `AWS_REGION`, then
    /// [`DEFAULT_REGION`].
    pub fn for_request(request_region: Option<&str>) -> Self {
        let region = request_region
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .or_else(|| std::env::var("AWS_REGION").ok().filter(|r| !r.is_empty()))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        Self {
            region,
            endpoint_url: std::env::var(ENDPOINT_URL_ENV).ok().filter(|u| !u.is_empty()),
        }
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

/// Tuning for the lifecycle handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Delay requested between polls of an in-progress delete.
    pub callback_delay_seconds: u32,
    /// Page size requested from the provider when listing.
    pub list_page_size: i32,
}

impl HandlerConfig {
    /// Creates a configuration with the given list page size and the
    /// default callback delay.
    pub const fn with_page_size(list_page_size: i32) -> Self {
        Self {
            callback_delay_seconds: DEFAULT_CALLBACK_DELAY_SECONDS,
            list_page_size,
        }
    }

    pub const fn with_callback_delay(self, seconds: u32) -> Self {
        Self {
            callback_delay_seconds: seconds,
            list_page_size: self.list_page_size,
        }
    }

    /// Applies `TIMESTREAM_CALLBACK_DELAY_SECONDS` when it is set and valid.
    pub fn from_env(self) -> Self {
        match std::env::var(CALLBACK_DELAY_ENV).ok().and_then(|v| v.parse().ok()) {
            Some(seconds) => self.with_callback_delay(seconds),
            None => self,
        }
    }
}
