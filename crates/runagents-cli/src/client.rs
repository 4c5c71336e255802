//! Shared HTTP pipeline, error types, and connection resolution for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode, Url};
use runagents_config::{ConfigError, ConfigRecord, ConfigStore};
use serde::Serialize;
use thiserror::Error;

use crate::cli::{GlobalArgs, OutputFormat};

/// Per-request timeout applied when `--timeout` is not supplied.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("runagents-cli/", env!("CARGO_PKG_VERSION"));
const MISSING_ENDPOINT: &str =
    "no endpoint configured; run 'runagents config set endpoint <url>' or use --endpoint";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        Self::failure(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        if error.is_user_input() {
            Self::validation(error.to_string())
        } else {
            Self::failure(error)
        }
    }
}

/// Failures produced by the request pipeline.
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("failed to build HTTP client")]
    Client { source: reqwest::Error },
    #[error("failed to create request for '{url}'")]
    InvalidUrl { url: String, source: url::ParseError },
    #[error("failed to marshal request body")]
    Encode { source: serde_json::Error },
    #[error("request to {url} failed")]
    Transport { url: Url, source: reqwest::Error },
    #[error("failed to read response from {url}")]
    ReadBody { url: Url, source: reqwest::Error },
    #[error("API error (HTTP {status}): {body}")]
    Status { status: u16, body: String },
}

/// Outcome of a completed round trip, classified purely by status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ResponseOutcome {
    Success(Vec<u8>),
    Failure { status: u16, body: String },
}

impl ResponseOutcome {
    /// Codes of 400 and above are failures; everything else is success.
    pub(crate) fn classify(status: StatusCode, body: Vec<u8>) -> Self {
        let code = status.as_u16();
        if code >= 400 {
            Self::Failure {
                status: code,
                body: String::from_utf8_lossy(&body).into_owned(),
            }
        } else {
            Self::Success(body)
        }
    }

    pub(crate) fn into_result(self) -> Result<Vec<u8>, ApiError> {
        match self {
            Self::Success(body) => Ok(body),
            Self::Failure { status, body } => Err(ApiError::Status { status, body }),
        }
    }
}

/// HTTP client bound to one endpoint and an optional bearer credential.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl ApiClient {
    pub(crate) fn new(
        base_url: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ApiError::Client { source })?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    /// Resolve an API path against the endpoint, keeping any path prefix the
    /// endpoint carries.
    pub(crate) fn url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&raw).map_err(|source| ApiError::InvalidUrl { url: raw, source })
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        self.execute(Method::GET, path, None).await
    }

    pub(crate) async fn post<T>(&self, path: &str, payload: Option<&T>) -> Result<Vec<u8>, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let body = encode_payload(payload)?;
        self.execute(Method::POST, path, body).await
    }

    // No command issues PATCH yet.
    #[allow(dead_code)]
    pub(crate) async fn patch<T>(&self, path: &str, payload: Option<&T>) -> Result<Vec<u8>, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let body = encode_payload(payload)?;
        self.execute(Method::PATCH, path, body).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, None).await.map(|_| ())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(
            %method,
            %url,
            has_body = body.is_some(),
            authenticated = self.api_key.is_some(),
            "sending request"
        );

        let mut request = self.client.request(method, url.clone());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        // No payload means no body and no content type, not an empty document.
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::ReadBody { url, source })?;
        tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "received response");

        ResponseOutcome::classify(status, bytes.to_vec()).into_result()
    }
}

fn encode_payload<T>(payload: Option<&T>) -> Result<Option<Vec<u8>>, ApiError>
where
    T: Serialize + ?Sized,
{
    payload
        .map(serde_json::to_vec)
        .transpose()
        .map_err(|source| ApiError::Encode { source })
}

/// Endpoint and credential in effect for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Connection {
    pub(crate) endpoint: Url,
    pub(crate) api_key: Option<String>,
}

/// Combine command-line overrides with the persisted record; overrides win.
pub(crate) fn resolve_connection(
    record: &ConfigRecord,
    endpoint_override: Option<&Url>,
    api_key_override: Option<&str>,
) -> CliResult<Connection> {
    let endpoint = match endpoint_override {
        Some(url) => url.clone(),
        None => {
            let stored = non_empty(Some(record.endpoint.as_str()))
                .ok_or_else(|| CliError::validation(MISSING_ENDPOINT))?;
            parse_url(stored).map_err(CliError::validation)?
        }
    };

    let api_key = non_empty(api_key_override)
        .or_else(|| non_empty(Some(record.api_key.as_str())))
        .map(str::to_string);

    Ok(Connection { endpoint, api_key })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Application context passed to command handlers that talk to the API.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) api: ApiClient,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Load the stored record and build a client for the effective endpoint.
    pub(crate) fn from_global(global: &GlobalArgs, store: &ConfigStore) -> CliResult<Self> {
        let record = store.load()?;
        let endpoint_override = non_empty(global.endpoint.as_deref())
            .map(parse_url)
            .transpose()
            .map_err(CliError::validation)?;
        let connection = resolve_connection(
            &record,
            endpoint_override.as_ref(),
            global.api_key.as_deref(),
        )?;
        let api = ApiClient::new(
            connection.endpoint,
            connection.api_key,
            Duration::from_secs(global.timeout),
        )?;
        Ok(Self {
            api,
            output: global.output,
        })
    }
}

#[cfg(test)]
pub(crate) fn test_context(base_url: &str, api_key: Option<&str>, output: OutputFormat) -> AppContext {
    let base_url = parse_url(base_url).expect("valid test URL");
    AppContext {
        api: ApiClient::new(
            base_url,
            api_key.map(str::to_string),
            Duration::from_secs(5),
        )
        .expect("client builds"),
        output,
    }
}
