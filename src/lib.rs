//! Keep an AWS WAF IP set in sync with the [AWS IP Ranges](https://docs.aws.amazon.com/vpc/latest/userguide/aws-ip-ranges.html).
//!
//! Two Lambda handlers ship with the crate:
//!
//! - `waf-update` receives `AmazonIpSpaceChanged` SNS notifications, fetches the IP ranges
//!   document, verifies its MD5 digest, selects the prefixes of one service and replaces the
//!   addresses of a named WAF IP set with them.
//! - `waf-seed` backs a CloudFormation custom resource; on stack creation it invokes `waf-update`
//!   once with a synthetic notification so the IP set is populated immediately.
//!
//! The feed and the IP set API are reached through the [RangeFeed] and [IpSetStore] traits.
//!
//! ```
//! # #[tokio::main]
//! # async fn main() -> wafipsync::Result<()> {
//! # let path = std::env::temp_dir().join("wafipsync-doc-ip-ranges.json");
//! # std::fs::write(&path, r#"{"prefixes":[{"ip_prefix":"10.0.0.0/8","region":"GLOBAL","service":"CLOUDFRONT"}]}"#).unwrap();
//! let notification = wafipsync::ChangeNotification {
//!     create_time: "manual".to_string(),
//!     synctoken: String::new(),
//!     md5: wafipsync::ExpectedDigest::Seed,
//!     url: path.to_str().unwrap().to_string(),
//! };
//!
//! let prefixes =
//!     wafipsync::retrieve_prefixes(&wafipsync::FileRangeFeed, &notification, "CLOUDFRONT").await?;
//! assert_eq!(prefixes[0].ip_prefix, "10.0.0.0/8");
//! # Ok(())
//! # }
//! ```

mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::config::{
    debug_enabled, UpdateConfig, UpdateConfigBuilder, DEFAULT_SERVICE, IP_RANGES_URL,
};
pub use crate::core::errors::{Error, Result};
pub use crate::core::feed::{FileRangeFeed, HttpRangeFeed, RangeFeed};
pub use crate::core::filter::{ServiceFilter, ServicePrefix};
pub use crate::core::integrity::{md5_hex, verify, ExpectedDigest, SEED_DIGEST};
pub use crate::core::ipset::{
    find_ip_set, ip_set_description, replace_addresses, IpSetStore, IpSetSummary, IpSetUpdate,
    Scope, UpdateIpSetResponse,
};
pub use crate::core::json;
pub use crate::core::lifecycle::{
    HttpLifecycleResponder, LifecycleEvent, LifecycleResponder, LifecycleResponse, RequestType,
    ResponseStatus, SeedProperties,
};
pub use crate::core::logging;
pub use crate::core::notification::{ChangeNotification, SnsEnvelope, SnsMessage, SnsRecord};
pub use crate::core::pipeline::{retrieve_prefixes, UpdatePipeline};
pub use crate::core::seed::{
    seed_notification, FunctionInvoker, LambdaInvoker, SeedTrigger, PHYSICAL_RESOURCE_ID,
};
pub use crate::core::waf::WafIpSetStore;

/*-------------------------------------------------------------------------------------------------
  Re-exports
-------------------------------------------------------------------------------------------------*/

pub use ipnetwork;
