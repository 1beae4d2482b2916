use crate::core::json::{JsonIpPrefix, JsonRangeDocument};
use ipnetwork::IpNetwork;
use log::info;
use serde::Serialize;

/*-------------------------------------------------------------------------------------------------
  Service Prefix
-------------------------------------------------------------------------------------------------*/

/// A prefix record selected by a [ServiceFilter], detached from the document it came from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ServicePrefix {
    /// The prefix string exactly as published in the document.
    pub ip_prefix: String,
    pub region: String,
    pub service: String,
}

impl ServicePrefix {
    /// The prefix as a CIDR block, or `None` if the published string is not one.
    pub fn network(&self) -> Option<IpNetwork> {
        self.ip_prefix.parse().ok()
    }
}

impl From<&JsonIpPrefix<'_>> for ServicePrefix {
    fn from(prefix: &JsonIpPrefix<'_>) -> Self {
        Self {
            ip_prefix: prefix.ip_prefix.to_string(),
            region: prefix.region.to_string(),
            service: prefix.service.to_string(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Service Filter
-------------------------------------------------------------------------------------------------*/

/// Selects the prefixes used by a single AWS service.
///
/// Matching is an exact, case-sensitive comparison against the record's `service` field. Results
/// keep document order and duplicates are not removed.
///
/// ```
/// let document = wafipsync::json::parse(
///     br#"{"prefixes":[{"ip_prefix":"10.0.0.0/8","region":"GLOBAL","service":"CLOUDFRONT"}]}"#,
/// ).unwrap();
///
/// let prefixes = wafipsync::ServiceFilter::new("CLOUDFRONT").apply(&document);
/// assert_eq!(prefixes[0].ip_prefix.to_string(), "10.0.0.0/8");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ServiceFilter<'s> {
    service: &'s str,
}

impl<'s> ServiceFilter<'s> {
    pub fn new(service: &'s str) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &str {
        self.service
    }

    /// Records of `document` used by the service, in document order.
    pub fn records<'d, 'j>(
        &'d self,
        document: &'d JsonRangeDocument<'j>,
    ) -> impl Iterator<Item = &'d JsonIpPrefix<'j>> + 'd {
        let service: &'d str = self.service;
        document
            .prefixes
            .iter()
            .filter(move |prefix| prefix.service == service)
    }

    /// Prefixes of `document` used by the service, in document order.
    pub fn apply(&self, document: &JsonRangeDocument) -> Vec<ServicePrefix> {
        self.records(document)
            .inspect(|prefix| {
                info!(
                    "Found {} region: {} range: {}",
                    self.service, prefix.region, prefix.ip_prefix
                )
            })
            .map(ServicePrefix::from)
            .collect()
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
