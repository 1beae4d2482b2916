//! Lambda entry point for the update pipeline, subscribed to the `AmazonIpSpaceChanged` SNS topic.
//!
//! Environment: `IPSET_NAME` (required), `SERVICE`, `IPSET_SCOPE`, `DEBUG`.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use wafipsync::{
    debug_enabled, logging, HttpRangeFeed, SnsEnvelope, UpdateConfig, UpdateIpSetResponse,
    UpdatePipeline, WafIpSetStore,
};

type Pipeline = UpdatePipeline<HttpRangeFeed, WafIpSetStore>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init(logging::handler_level(debug_enabled(|name| {
        std::env::var(name).ok()
    })))?;

    let config = UpdateConfig::from_env().inspect_err(|error| log::error!("{}", error))?;
    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let pipeline = UpdatePipeline::new(
        HttpRangeFeed::new()?,
        WafIpSetStore::new(&sdk_config),
        config,
    );

    let pipeline = &pipeline;
    run(service_fn(move |event: LambdaEvent<SnsEnvelope>| async move {
        handle(pipeline, event).await
    }))
    .await
}

async fn handle(
    pipeline: &Pipeline,
    event: LambdaEvent<SnsEnvelope>,
) -> Result<UpdateIpSetResponse, Error> {
    log::info!("Request id: {}", event.context.request_id);
    Ok(pipeline.handle_event(&event.payload).await?)
}
