use crate::core::config::IP_RANGES_URL;
use crate::core::errors::{log_error, Error, Result};
use crate::core::integrity::ExpectedDigest;
use crate::core::lifecycle::{
    self, LifecycleEvent, LifecycleResponder, LifecycleResponse, RequestType, ResponseStatus,
};
use crate::core::notification::{ChangeNotification, SnsEnvelope};
use async_trait::async_trait;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use log::{error, info};
use serde::Deserialize;
use serde_json::Value;

/*-------------------------------------------------------------------------------------------------
  Seed Trigger
-------------------------------------------------------------------------------------------------*/

/// Physical resource id reported for the seed custom resource.
pub const PHYSICAL_RESOURCE_ID: &str = "Seed-WAF-IPSet";

/// Label written into the IP set description by the initial synchronization.
pub const SEED_LABEL: &str = "Initial Seed";

const SEED_SYNC_TOKEN: &str = "0123456789";

/// The notification sent to the update pipeline on stack creation. Its `md5` is the `seed`
/// sentinel, so the first synchronization skips digest verification.
pub fn seed_notification() -> ChangeNotification {
    ChangeNotification {
        create_time: SEED_LABEL.to_string(),
        synctoken: SEED_SYNC_TOKEN.to_string(),
        md5: ExpectedDigest::Seed,
        url: IP_RANGES_URL.to_string(),
    }
}

/// Asynchronous (fire-and-forget) function invocation.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    async fn invoke_async(&self, function: &str, payload: Vec<u8>) -> Result<()>;
}

/// Seeds the IP set when the stack is created by invoking the update function once.
#[derive(Debug)]
pub struct SeedTrigger<I, R> {
    invoker: I,
    responder: R,
    log_stream_name: String,
}

impl<I, R> SeedTrigger<I, R>
where
    I: FunctionInvoker,
    R: LifecycleResponder,
{
    pub fn new(invoker: I, responder: R, log_stream_name: impl Into<String>) -> Self {
        Self {
            invoker,
            responder,
            log_stream_name: log_stream_name.into(),
        }
    }

    /// Handle a raw lifecycle request payload. A payload that does not decode is still answered
    /// with `FAILED` as long as it names a `ResponseURL`.
    pub async fn handle_payload(&self, payload: &Value) -> Result<ResponseStatus> {
        let error = match LifecycleEvent::deserialize(payload) {
            Ok(event) => return self.handle(&event).await,
            Err(error) => error,
        };
        error!("Invalid lifecycle request: {}", error);

        let response_url = lifecycle::response_url(payload).ok_or_else(|| {
            Error::parse(format!("Lifecycle request without ResponseURL: {}", error))
        })?;
        let response =
            LifecycleResponse::undecodable(payload, PHYSICAL_RESOURCE_ID, &self.log_stream_name);
        self.responder
            .send(response_url, &response)
            .await
            .inspect_err(log_error)?;

        Ok(ResponseStatus::Failed)
    }

    /// Handle a lifecycle request and always answer it. Returns the status that was signalled;
    /// fails only when the response itself could not be delivered.
    pub async fn handle(&self, event: &LifecycleEvent) -> Result<ResponseStatus> {
        info!("Input event: {:?}", event);

        let status = match self.seed(event).await {
            Ok(()) => ResponseStatus::Success,
            Err(error) => {
                error!("Seed {:?} request failed: {}", event.request_type, error);
                ResponseStatus::Failed
            }
        };

        let response =
            LifecycleResponse::new(event, status, PHYSICAL_RESOURCE_ID, &self.log_stream_name);
        self.responder
            .send(&event.response_url, &response)
            .await
            .inspect_err(log_error)?;

        Ok(status)
    }

    async fn seed(&self, event: &LifecycleEvent) -> Result<()> {
        match event.request_type {
            RequestType::Create => {
                let properties = &event.resource_properties;
                if properties.fail_create {
                    return Err(Error::invocation("Create failure requested"));
                }

                let function = properties
                    .lambda_arn
                    .as_deref()
                    .filter(|arn| !arn.is_empty())
                    .ok_or_else(|| Error::config("LambdaARN resource property is required"))?;

                let envelope = SnsEnvelope::synthetic(&seed_notification())?;
                let payload = serde_json::to_vec(&envelope)?;

                info!("Invoking {} with the seed notification", function);
                self.invoker.invoke_async(function, payload).await
            }
            RequestType::Update | RequestType::Delete => {
                info!("{:?} request; nothing to do", event.request_type);
                Ok(())
            }
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  AWS Lambda Invoker
-------------------------------------------------------------------------------------------------*/

/// [FunctionInvoker] using the Lambda `Invoke` API with the `Event` invocation type.
#[derive(Debug, Clone)]
pub struct LambdaInvoker {
    client: aws_sdk_lambda::Client,
}

impl LambdaInvoker {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl FunctionInvoker for LambdaInvoker {
    async fn invoke_async(&self, function: &str, payload: Vec<u8>) -> Result<()> {
        let output = self
            .client
            .invoke()
            .function_name(function)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|error| {
                Error::invocation(format!(
                    "Invoke {} failed: {}",
                    function,
                    aws_sdk_lambda::error::DisplayErrorContext(&error)
                ))
            })?;

        info!("Invoke {} status code: {}", function, output.status_code());
        Ok(())
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
