//! HTTP client for the Algolia REST APIs.
//!
//! One `reqwest::Client` is shared by every tool. Requests are
//! described with [`ApiRequest`] and executed with
//! [`AlgoliaClient::send`], which picks the host, attaches the
//! credentials and turns non-2xx responses into [`AlgoliaError::Api`].

use crate::core::config::{Config, HostsConfig};
use crate::core::error::{AlgoliaError, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use url::Url;

const HEADER_APP_ID: &str = "x-algolia-application-id";
const HEADER_API_KEY: &str = "x-algolia-api-key";

/// Query Suggestions is hosted per region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Us,
    Eu,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Eu => "eu",
        }
    }
}

impl FromStr for Region {
    type Err = AlgoliaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            _ => Err(AlgoliaError::InvalidArgument(
                "region must be 'us' or 'eu'".to_string(),
            )),
        }
    }
}

/// Which Algolia API a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Search,
    Analytics,
    Status,
    Usage,
    Experiences,
    QuerySuggestions(Region),
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Api::Search => write!(f, "search"),
            Api::Analytics => write!(f, "analytics"),
            Api::Status => write!(f, "status"),
            Api::Usage => write!(f, "usage"),
            Api::Experiences => write!(f, "experiences"),
            Api::QuerySuggestions(region) => write!(f, "query-suggestions/{}", region.as_str()),
        }
    }
}

/// Credentials attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Search (read) API key
    Read,
    /// Admin key; the string names the action for the missing-key error
    Write(&'static str),
    /// No auth headers (public status API)
    None,
}

/// A single call against one of the Algolia APIs
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    api: Api,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
    key: KeyKind,
}

impl ApiRequest {
    pub fn new(method: Method, api: Api, segments: &[&str]) -> Self {
        Self {
            method,
            api,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            body: None,
            key: KeyKind::Read,
        }
    }

    pub fn get(api: Api, segments: &[&str]) -> Self {
        Self::new(Method::GET, api, segments)
    }

    pub fn post(api: Api, segments: &[&str]) -> Self {
        Self::new(Method::POST, api, segments)
    }

    pub fn put(api: Api, segments: &[&str]) -> Self {
        Self::new(Method::PUT, api, segments)
    }

    pub fn delete(api: Api, segments: &[&str]) -> Self {
        Self::new(Method::DELETE, api, segments)
    }

    /// Append a query parameter; repeated names are kept
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present
    pub fn query_opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Use the write key; `action` completes "cannot ..." in the error
    pub fn write(mut self, action: &'static str) -> Self {
        self.key = KeyKind::Write(action);
        self
    }

    /// Send without credentials
    pub fn public(mut self) -> Self {
        self.key = KeyKind::None;
        self
    }
}

/// Shared Algolia client
#[derive(Debug, Clone)]
pub struct AlgoliaClient {
    http: reqwest::Client,
    app_id: String,
    api_key: String,
    write_api_key: Option<String>,
    hosts: HostsConfig,
}

impl AlgoliaClient {
    /// Build the client from loaded configuration
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_sec))
            .user_agent(concat!("algolia-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            app_id: config.algolia.app_id.clone(),
            api_key: config.algolia.api_key.clone(),
            write_api_key: config.algolia.write_api_key.clone(),
            hosts: config.hosts.clone(),
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn has_write_key(&self) -> bool {
        self.write_api_key.is_some()
    }

    /// Execute a request and return the decoded JSON body
    pub async fn send(&self, request: ApiRequest) -> Result<Value> {
        let headers = self.headers(request.key)?;
        let url = self.url_for(&request)?;

        tracing::debug!("{} {} ({})", request.method, url.path(), request.api);
        let start = Instant::now();

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(
            "{} {} -> {} in {}ms",
            request.method,
            request.segments.join("/"),
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(AlgoliaError::Api {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn headers(&self, key: KeyKind) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let api_key = match key {
            KeyKind::None => return Ok(headers),
            KeyKind::Read => self.api_key.as_str(),
            KeyKind::Write(action) => self.write_api_key.as_deref().ok_or_else(|| {
                AlgoliaError::MissingCredentials(format!(
                    "write API key not set, cannot {action}"
                ))
            })?,
        };

        headers.insert(HEADER_APP_ID, header_value(&self.app_id)?);
        headers.insert(HEADER_API_KEY, header_value(api_key)?);
        Ok(headers)
    }

    fn base_url(&self, api: Api) -> String {
        let template = match api {
            Api::Search => &self.hosts.search,
            Api::Analytics => &self.hosts.analytics,
            Api::Status => &self.hosts.status,
            Api::Usage => &self.hosts.usage,
            Api::Experiences => &self.hosts.experiences,
            Api::QuerySuggestions(_) => &self.hosts.query_suggestions,
        };

        let mut base = template.replace("{app_id}", &self.app_id.to_lowercase());
        if let Api::QuerySuggestions(region) = api {
            base = base.replace("{region}", region.as_str());
        }
        base
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = Url::parse(&self.base_url(request.api))?;

        // path_segments_mut percent-encodes each segment
        url.path_segments_mut()
            .map_err(|_| {
                AlgoliaError::ConfigError(format!("Host for {} cannot be a base URL", request.api))
            })?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.query {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| AlgoliaError::ConfigError("Credential contains invalid characters".to_string()))
}

/// Pull `message` out of an Algolia error body, falling back to the raw text
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("status {status}")
    } else {
        trimmed.to_string()
    }
}
