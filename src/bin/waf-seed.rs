//! Lambda entry point for the seed custom resource. On stack creation it asynchronously invokes
//! the update function named by the `LambdaARN` resource property.
//!
//! The event is taken as raw JSON so that a request which fails to decode is still answered.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use wafipsync::{logging, HttpLifecycleResponder, LambdaInvoker, ResponseStatus, SeedTrigger};

type Trigger = SeedTrigger<LambdaInvoker, HttpLifecycleResponder>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init(logging::handler_level(true))?;

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let log_stream_name = std::env::var("AWS_LAMBDA_LOG_STREAM_NAME").unwrap_or_default();
    let trigger = SeedTrigger::new(
        LambdaInvoker::new(&sdk_config),
        HttpLifecycleResponder::new()?,
        log_stream_name,
    );

    let trigger = &trigger;
    run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle(trigger, event).await
    }))
    .await
}

async fn handle(trigger: &Trigger, event: LambdaEvent<Value>) -> Result<ResponseStatus, Error> {
    Ok(trigger.handle_payload(&event.payload).await?)
}
