use crate::core::errors::{Error, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

/*-------------------------------------------------------------------------------------------------
  Lifecycle Event
-------------------------------------------------------------------------------------------------*/

/// CloudFormation custom resource request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// CloudFormation custom resource request.
///
/// Every field except `RequestType` is lenient. Requests that still fail to decode are answered
/// from their raw payload; see [LifecycleResponse::undecodable].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: RequestType,

    #[serde(rename = "ResponseURL", default)]
    pub response_url: String,

    #[serde(default)]
    pub stack_id: String,

    #[serde(default)]
    pub request_id: String,

    #[serde(default)]
    pub logical_resource_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub resource_properties: SeedProperties,
}

/// `ResourceProperties` of the seed custom resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SeedProperties {
    /// Function to invoke with the synthetic notification.
    #[serde(rename = "LambdaARN", default, skip_serializing_if = "Option::is_none")]
    pub lambda_arn: Option<String>,

    /// Fail `Create` requests; used to exercise stack rollback.
    #[serde(rename = "FailCreate", default, deserialize_with = "deserialize_flag")]
    pub fail_create: bool,
}

/// CloudFormation passes properties through as typed by the template author, usually as strings.
/// Any value counts as set except `false`, `0`, `null`, empty values and the string `"false"`
/// (in any case), so that a request to fail is never mistaken for a malformed request.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(number)) => number.as_f64().map_or(true, |number| number != 0.0),
        Some(Value::String(text)) => !(text.is_empty() || text.eq_ignore_ascii_case("false")),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    };
    Ok(flag)
}

/*-------------------------------------------------------------------------------------------------
  Lifecycle Response
-------------------------------------------------------------------------------------------------*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
}

/// Body PUT to the pre-signed `ResponseURL`. The reason never carries error details; it points
/// at the function's log stream instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleResponse {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl LifecycleResponse {
    pub fn new(
        event: &LifecycleEvent,
        status: ResponseStatus,
        physical_resource_id: &str,
        log_stream_name: &str,
    ) -> Self {
        Self {
            status,
            reason: log_stream_reason(log_stream_name),
            physical_resource_id: physical_resource_id.to_string(),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            no_echo: false,
            data: serde_json::Map::new(),
        }
    }

    /// `FAILED` response to a request that could not be decoded, addressed with whatever
    /// identifying fields the raw payload carries.
    pub fn undecodable(payload: &Value, physical_resource_id: &str, log_stream_name: &str) -> Self {
        let field = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            status: ResponseStatus::Failed,
            reason: log_stream_reason(log_stream_name),
            physical_resource_id: physical_resource_id.to_string(),
            stack_id: field("StackId"),
            request_id: field("RequestId"),
            logical_resource_id: field("LogicalResourceId"),
            no_echo: false,
            data: serde_json::Map::new(),
        }
    }
}

// Error details stay in the log; the caller only learns where to look.
fn log_stream_reason(log_stream_name: &str) -> String {
    format!("See the details in CloudWatch Log Stream: {}", log_stream_name)
}

/// `ResponseURL` of a raw request payload.
pub fn response_url(payload: &Value) -> Option<&str> {
    payload
        .get("ResponseURL")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
}

/*-------------------------------------------------------------------------------------------------
  Lifecycle Responder
-------------------------------------------------------------------------------------------------*/

/// Delivers the completion signal for a lifecycle request.
#[async_trait]
pub trait LifecycleResponder: Send + Sync {
    async fn send(&self, response_url: &str, response: &LifecycleResponse) -> Result<()>;
}

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends the response with an HTTP PUT to the request's pre-signed S3 URL.
#[derive(Debug, Clone)]
pub struct HttpLifecycleResponder {
    client: reqwest::Client,
}

impl HttpLifecycleResponder {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|error| {
                Error::invocation(format!("Failed to build HTTP client: {}", error))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LifecycleResponder for HttpLifecycleResponder {
    async fn send(&self, response_url: &str, response: &LifecycleResponse) -> Result<()> {
        let body = serde_json::to_string(response)?;
        debug!("Response body: {}", body);

        // The pre-signed URL is signed for an empty content type
        let result = self
            .client
            .put(response_url)
            .header(reqwest::header::CONTENT_TYPE, "")
            .body(body)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(reply) => {
                info!("Lifecycle response status code: {}", reply.status());
                Ok(())
            }
            Err(error) => Err(Error::invocation(format!(
                "Failed to send lifecycle response: {}",
                error
            ))),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
