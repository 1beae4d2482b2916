use crate::core::config::UpdateConfig;
use crate::core::errors::{log_error, Result};
use crate::core::feed::RangeFeed;
use crate::core::filter::{ServiceFilter, ServicePrefix};
use crate::core::integrity;
use crate::core::ipset::{self, IpSetStore, UpdateIpSetResponse};
use crate::core::json;
use crate::core::notification::{ChangeNotification, SnsEnvelope};
use log::{info, warn};

/*-------------------------------------------------------------------------------------------------
  Retrieve Service Prefixes
-------------------------------------------------------------------------------------------------*/

/// Fetch, verify, parse and filter: the read-only half of the update pipeline.
///
/// Verification runs before parsing, so a document with an unexpected digest is rejected without
/// being interpreted.
pub async fn retrieve_prefixes<F>(
    feed: &F,
    notification: &ChangeNotification,
    service: &str,
) -> Result<Vec<ServicePrefix>>
where
    F: RangeFeed + ?Sized,
{
    let bytes = feed.fetch(&notification.url).await?;
    integrity::verify(&bytes, &notification.md5)?;

    let document = json::parse(&bytes)?;
    if let Some(sync_token) = &document.sync_token {
        info!("Range document syncToken {}", sync_token);
    }
    if let Some(create_date) = &document.create_date {
        info!("Range document createDate {}", create_date);
    }

    let prefixes = ServiceFilter::new(service).apply(&document);
    for prefix in prefixes.iter().filter(|prefix| prefix.network().is_none()) {
        warn!("Prefix {} for service {} is not a CIDR block", prefix.ip_prefix, service);
    }
    info!(
        "Selected {} of {} prefixes for service {}",
        prefixes.len(),
        document.prefixes.len(),
        service
    );
    Ok(prefixes)
}

/*-------------------------------------------------------------------------------------------------
  Update Pipeline
-------------------------------------------------------------------------------------------------*/

/// Replaces the configured IP set's addresses with the current prefixes of the configured
/// service, once per change notification.
///
/// Each run re-fetches the document and re-reads the IP set; nothing is carried between runs.
#[derive(Debug)]
pub struct UpdatePipeline<F, S> {
    feed: F,
    store: S,
    config: UpdateConfig,
}

impl<F, S> UpdatePipeline<F, S>
where
    F: RangeFeed,
    S: IpSetStore,
{
    pub fn new(feed: F, store: S, config: UpdateConfig) -> Self {
        Self {
            feed,
            store,
            config,
        }
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Handle an SNS event carrying a change notification.
    pub async fn handle_event(&self, envelope: &SnsEnvelope) -> Result<UpdateIpSetResponse> {
        let notification = envelope.notification().inspect_err(log_error)?;
        self.run(&notification).await
    }

    /// Run the pipeline for one notification. Errors are logged before they are returned.
    pub async fn run(&self, notification: &ChangeNotification) -> Result<UpdateIpSetResponse> {
        self.execute(notification).await.inspect_err(log_error)
    }

    async fn execute(&self, notification: &ChangeNotification) -> Result<UpdateIpSetResponse> {
        info!(
            "Change notification create-time: {} synctoken: {} url: {}",
            notification.create_time, notification.synctoken, notification.url
        );

        let service = self.config.service();
        let prefixes: Vec<String> = retrieve_prefixes(&self.feed, notification, service)
            .await?
            .into_iter()
            .map(|prefix| prefix.ip_prefix)
            .collect();

        let response = ipset::replace_addresses(
            &self.store,
            self.config.ipset_name(),
            self.config.scope(),
            ipset::ip_set_description(service, &notification.create_time),
            &prefixes,
        )
        .await?;

        info!(
            "Updated IP set {}; next lock token {}",
            self.config.ipset_name(),
            response.next_lock_token
        );
        Ok(response)
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
