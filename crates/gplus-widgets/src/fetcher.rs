//! Upstream API client
//!
//! Builds and performs the people API requests and decodes the payload
//! into a [`FetchResult`] envelope.

use crate::config::WidgetConfig;
use crate::error::Result;
use crate::render::WidgetKind;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Browser-like user agent sent with every API request.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.2; WOW64) AppleWebKit/537.31 (KHTML, like Gecko) Chrome/26.0.1410.64 Safari/537.31";

/// Connect timeout for API requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Shown in place of widget data when no developer key is configured.
const SETUP_HINT: &str =
    "Edit 'gplus.toml' to set up your Google API developer key or OAuth2 access.";

/// Outcome of an upstream fetch.
///
/// Immutable once produced, except that the localizer may rewrite image
/// URLs inside a `Payload` before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    /// No developer key configured; carries setup instructions.
    NotConfigured(String),
    /// Decoded upstream payload.
    Payload(Value),
    /// The upstream body was not valid JSON.
    DecodeError(String),
}

impl FetchResult {
    /// Template context in the `{status, record}` shape. A `Payload`
    /// carries the decoded record under `status: true`; both failure
    /// variants carry their message under `status: false`.
    pub fn into_context(self) -> Value {
        match self {
            FetchResult::Payload(record) => json!({ "status": true, "record": record }),
            FetchResult::NotConfigured(msg) | FetchResult::DecodeError(msg) => {
                json!({ "status": false, "record": msg })
            }
        }
    }
}

/// HTTP client for the people API
pub struct ApiFetcher {
    client: Client,
    api_base: String,
    developer_key: Option<String>,
    profile_user: String,
    activity_user: String,
    activity_results: u32,
}

impl ApiFetcher {
    /// Create a fetcher for the configured users and key.
    ///
    /// Certificate verification stays enabled; the upstream API serves a
    /// valid certificate and there is no reason to trade that away.
    pub fn new(config: &WidgetConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            developer_key: config.developer_key().map(str::to_string),
            profile_user: config.profile.user.clone(),
            activity_user: config.activity.user.clone(),
            activity_results: config.activity.results,
        })
    }

    /// Fetch and decode the payload for a widget.
    ///
    /// Without a developer key this short-circuits to `NotConfigured`
    /// and performs no network call. Transport failures propagate as
    /// errors; a body that is not valid JSON becomes `DecodeError`.
    pub async fn fetch(&self, operation: WidgetKind) -> Result<FetchResult> {
        let Some(key) = self.developer_key.as_deref() else {
            return Ok(FetchResult::NotConfigured(SETUP_HINT.to_string()));
        };

        let url = self.request_url(operation, key);
        debug!(url = %url, operation = operation.as_str(), "Requesting upstream payload");

        let response = self.client.get(&url).send().await?;
        let body = response.bytes().await?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(record) => Ok(FetchResult::Payload(record)),
            Err(e) => {
                warn!(error = %e, operation = operation.as_str(), "Upstream payload is not valid JSON");
                Ok(FetchResult::DecodeError(format!(
                    "Upstream response could not be decoded: {}",
                    e
                )))
            }
        }
    }

    fn request_url(&self, operation: WidgetKind, key: &str) -> String {
        match operation {
            WidgetKind::Profile => format!(
                "{}/{}?key={}",
                self.api_base,
                urlencoding::encode(&self.profile_user),
                urlencoding::encode(key)
            ),
            WidgetKind::Activity => format!(
                "{}/{}/activities/public?maxResults={}&key={}",
                self.api_base,
                urlencoding::encode(&self.activity_user),
                self.activity_results,
                urlencoding::encode(key)
            ),
        }
    }
}
