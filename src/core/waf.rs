use crate::core::errors::{Error, Result};
use crate::core::ipset::{IpSetStore, IpSetSummary, IpSetUpdate, Scope, UpdateIpSetResponse};
use async_trait::async_trait;
use aws_sdk_wafv2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_wafv2::types::Scope as WafScope;
use log::debug;
use std::fmt::Debug;

/*-------------------------------------------------------------------------------------------------
  AWS WAF IP Set Store
-------------------------------------------------------------------------------------------------*/

const OPTIMISTIC_LOCK_EXCEPTION: &str = "WAFOptimisticLockException";
const NONEXISTENT_ITEM_EXCEPTION: &str = "WAFNonexistentItemException";

/// [IpSetStore] backed by the AWS WAFv2 API.
#[derive(Debug, Clone)]
pub struct WafIpSetStore {
    client: aws_sdk_wafv2::Client,
}

impl WafIpSetStore {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_wafv2::Client::new(sdk_config),
        }
    }
}

impl From<aws_sdk_wafv2::Client> for WafIpSetStore {
    fn from(client: aws_sdk_wafv2::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IpSetStore for WafIpSetStore {
    async fn list_ip_sets(&self, scope: Scope) -> Result<Vec<IpSetSummary>> {
        let mut ip_sets = Vec::new();
        let mut next_marker: Option<String> = None;

        loop {
            let output = self
                .client
                .list_ip_sets()
                .scope(waf_scope(scope))
                .set_next_marker(next_marker.take())
                .send()
                .await
                .map_err(|error| classify("ListIPSets", error))?;

            let page = output.ip_sets();
            debug!("ListIPSets returned {} IP set(s) in {}", page.len(), scope);

            ip_sets.extend(page.iter().map(|summary| IpSetSummary {
                name: summary.name().unwrap_or_default().to_string(),
                id: summary.id().unwrap_or_default().to_string(),
                lock_token: summary.lock_token().unwrap_or_default().to_string(),
            }));

            // WAF can hand back a marker with an empty final page
            match output.next_marker() {
                Some(marker) if !marker.is_empty() && !page.is_empty() => {
                    next_marker = Some(marker.to_string())
                }
                _ => break,
            }
        }

        Ok(ip_sets)
    }

    async fn update_ip_set(&self, update: IpSetUpdate) -> Result<UpdateIpSetResponse> {
        let output = self
            .client
            .update_ip_set()
            .name(update.name)
            .scope(waf_scope(update.scope))
            .id(update.id)
            .description(update.description)
            .set_addresses(Some(update.addresses))
            .lock_token(update.lock_token)
            .send()
            .await
            .map_err(|error| classify("UpdateIPSet", error))?;

        Ok(UpdateIpSetResponse {
            next_lock_token: output.next_lock_token().unwrap_or_default().to_string(),
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

fn waf_scope(scope: Scope) -> WafScope {
    match scope {
        Scope::Regional => WafScope::Regional,
        Scope::CloudFront => WafScope::Cloudfront,
    }
}

fn classify<E, R>(operation: &str, error: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    let code = error.code().map(str::to_string);
    let message = format!("{} failed: {}", operation, DisplayErrorContext(&error));
    error_for_code(code.as_deref(), message)
}

fn error_for_code(code: Option<&str>, message: String) -> Error {
    match code {
        Some(OPTIMISTIC_LOCK_EXCEPTION) => Error::conflict(message),
        Some(NONEXISTENT_ITEM_EXCEPTION) => Error::not_found(message),
        _ => Error::service(message),
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
