//! GraphQL transport for the Nimbus operations.
//!
//! DESIGN
//! ======
//! `NimbusClient::execute` posts a `graphql_client` request body and hands the
//! response text to `parse_graphql_response`, which unwraps the envelope and
//! decodes `data` through the conformance checker. A response with a
//! non-empty `errors` array is reported as an error even when partial `data`
//! is present.

use std::time::Duration;

use queries::conformance::{self, ShapeError};
use reqwest::header::HeaderValue;
use queries::{
    CreateExperimentMutation, ExperimentInput, GetConfigQuery, Operation, Response, create_experiment, get_config,
};
use serde_json::Value;

use crate::config::ClientConfig;

/// Header carrying the caller's identity, as set by the Experimenter dev proxy.
pub const AUTH_EMAIL_HEADER: &str = "X-Forwarded-Email";

/// Longest slice of an error-status body kept in [`ClientError::HttpStatus`]'s message.
const BODY_EXCERPT_CHARS: usize = 200;

/// Errors produced by [`NimbusClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The configured auth email is not a valid header value.
    #[error("invalid X-Forwarded-Email header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("{operation}: endpoint returned HTTP {status}: {}", body_excerpt(.body))]
    HttpStatus { operation: &'static str, status: u16, body: String },

    /// The body is not a GraphQL response envelope.
    #[error("{operation}: response is not a GraphQL envelope: {source}")]
    Envelope { operation: &'static str, source: serde_json::Error },

    /// The envelope carried a non-empty `errors` array.
    #[error("{operation}: server reported errors: {}", .messages.join("; "))]
    GraphQl { operation: &'static str, messages: Vec<String> },

    /// The envelope carried neither errors nor data.
    #[error("{operation}: response carried no data")]
    MissingData { operation: &'static str },

    /// `data` does not match the operation's selection set.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl ClientError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self {
            Self::Request(e) => !e.is_builder(),
            Self::HttpStatus { status, .. } => matches!(*status, 429 | 500..=599),
            _ => false,
        }
    }
}

/// First [`BODY_EXCERPT_CHARS`] characters of `body`, whitespace-trimmed.
fn body_excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty body>".to_owned();
    }
    let mut chars = body.chars();
    let excerpt: String = chars.by_ref().take(BODY_EXCERPT_CHARS).collect();
    if chars.next().is_some() { format!("{excerpt}…") } else { excerpt }
}

/// Async client for the Nimbus GraphQL endpoint. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NimbusClient {
    http: reqwest::Client,
    endpoint: String,
    auth_email: Option<HeaderValue>,
}

impl NimbusClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidHeader`] if the auth email cannot be sent
    /// as a header, or [`ClientError::HttpClientBuild`] if reqwest rejects the
    /// settings.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let auth_email = config.auth_email.as_deref().map(HeaderValue::from_str).transpose()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: config.endpoint.clone(), auth_email })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute operation `O` and return its decoded data.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-2xx statuses, GraphQL
    /// errors, missing data, or data that does not match the selection set.
    pub async fn execute<O: Operation>(&self, variables: O::Variables) -> Result<O::ResponseData, ClientError> {
        let body = O::build_query(variables);
        tracing::debug!(operation = O::NAME, endpoint = %self.endpoint, "sending operation");

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(email) = &self.auth_email {
            request = request.header(AUTH_EMAIL_HEADER, email.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(
                operation = O::NAME,
                status = status.as_u16(),
                body = %body_excerpt(&text),
                "endpoint returned error status"
            );
            return Err(ClientError::HttpStatus { operation: O::NAME, status: status.as_u16(), body: text });
        }

        parse_graphql_response::<O>(&text).inspect_err(|e| {
            tracing::warn!(operation = O::NAME, error = %e, "operation failed");
        })
    }

    /// Run `getConfig`.
    ///
    /// # Errors
    ///
    /// Same as [`NimbusClient::execute`].
    pub async fn get_config(&self) -> Result<get_config::ResponseData, ClientError> {
        self.execute::<GetConfigQuery>(get_config::Variables::default()).await
    }

    /// Run `createExperiment` with `input`.
    ///
    /// # Errors
    ///
    /// Same as [`NimbusClient::execute`]. A rejected creation (status 400 with
    /// field errors) is a successful response; inspect the payload's outcome.
    pub async fn create_experiment(&self, input: ExperimentInput) -> Result<create_experiment::ResponseData, ClientError> {
        self.execute::<CreateExperimentMutation>(create_experiment::Variables { input }).await
    }
}

/// Unwrap a GraphQL envelope and decode its `data` for operation `O`.
///
/// # Errors
///
/// See [`ClientError`]; every variant except the transport ones can come
/// from here.
pub fn parse_graphql_response<O: Operation>(text: &str) -> Result<O::ResponseData, ClientError> {
    let envelope: Response<Value> =
        serde_json::from_str(text).map_err(|source| ClientError::Envelope { operation: O::NAME, source })?;

    if let Some(errors) = envelope.errors
        && !errors.is_empty()
    {
        let messages = errors.into_iter().map(|e| e.message).collect();
        return Err(ClientError::GraphQl { operation: O::NAME, messages });
    }

    let data = envelope.data.ok_or(ClientError::MissingData { operation: O::NAME })?;
    Ok(conformance::check::<O>(&data)?)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
