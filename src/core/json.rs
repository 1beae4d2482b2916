use crate::core::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/*-------------------------------------------------------------------------------------------------
  Parse JSON
-------------------------------------------------------------------------------------------------*/

/// Parse a range document. Fails with a parse error when the bytes are not JSON, when `prefixes`
/// is missing, or when a prefix record lacks `ip_prefix`, `region` or `service`.
///
/// Prefix strings are kept exactly as published; they are not interpreted here.
pub fn parse(json: &[u8]) -> Result<JsonRangeDocument<'_>> {
    Ok(serde_json::from_slice(json)?)
}

/*-------------------------------------------------------------------------------------------------
  JSON Data Structures
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  JSON Range Document
--------------------------------------------------------------------------------------*/

#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JsonRangeDocument<'j> {
    #[serde(rename = "syncToken", default, skip_serializing_if = "Option::is_none")]
    pub sync_token: Option<String>,

    #[serde(
        rename = "createDate",
        default,
        with = "crate::core::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_date: Option<DateTime<Utc>>,

    #[serde(borrow)]
    pub prefixes: Vec<JsonIpPrefix<'j>>,
}

/*--------------------------------------------------------------------------------------
  JSON IP (IPv4) Prefix
--------------------------------------------------------------------------------------*/

#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JsonIpPrefix<'j> {
    #[serde(borrow)]
    pub ip_prefix: Cow<'j, str>,

    #[serde(borrow)]
    pub region: Cow<'j, str>,

    #[serde(borrow)]
    pub service: Cow<'j, str>,
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::errors::Error;
    use chrono::TimeZone;

    pub(crate) const TEST_RANGE_DOCUMENT: &str = r#"{"prefixes":[{"ip_prefix":"10.0.0.0/8","region":"GLOBAL","service":"CLOUDFRONT"},{"ip_prefix":"10.1.0.0/16","region":"us-east-1","service":"EC2"}]}"#;

    #[test]
    fn test_parse_minimal_document() {
        let document = parse(TEST_RANGE_DOCUMENT.as_bytes()).unwrap();

        assert_eq!(document.sync_token, None);
        assert_eq!(document.create_date, None);
        assert_eq!(
            document.prefixes,
            vec![
                JsonIpPrefix {
                    ip_prefix: Cow::Borrowed("10.0.0.0/8"),
                    region: Cow::Borrowed("GLOBAL"),
                    service: Cow::Borrowed("CLOUDFRONT"),
                },
                JsonIpPrefix {
                    ip_prefix: Cow::Borrowed("10.1.0.0/16"),
                    region: Cow::Borrowed("us-east-1"),
                    service: Cow::Borrowed("EC2"),
                },
            ]
        );
    }

    #[test]
    fn test_parse_full_aws_document() {
        let aws_ip_ranges_test_json = r#"{
          "syncToken": "1640995200",
          "createDate": "2022-01-01-00-00-00",
          "prefixes": [
            {
              "ip_prefix": "10.0.0.0/8",
              "region": "us-east-1",
              "network_border_group": "us-east-1",
              "service": "AMAZON"
            }
          ],
          "ipv6_prefixes": [
            {
              "ipv6_prefix": "2001:db8::/32",
              "region": "us-east-1",
              "network_border_group": "us-east-1",
              "service": "AMAZON"
            }
          ]
        }"#;

        let document = parse(aws_ip_ranges_test_json.as_bytes()).unwrap();

        assert_eq!(document.sync_token.as_deref(), Some("1640995200"));
        assert_eq!(
            document.create_date,
            Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(document.prefixes.len(), 1);
        assert_eq!(document.prefixes[0].service, "AMAZON");
    }

    #[test]
    fn test_prefix_strings_are_kept_verbatim() {
        let document = parse(
            br#"{"prefixes":[
                {"ip_prefix":"2600:9000::/28","region":"GLOBAL","service":"EC2"},
                {"ip_prefix":"10.0.0.1","region":"GLOBAL","service":"CLOUDFRONT"},
                {"ip_prefix":"010.000.000.000/8","region":"GLOBAL","service":"S3"}
            ]}"#,
        )
        .unwrap();

        let prefixes: Vec<&str> = document
            .prefixes
            .iter()
            .map(|prefix| prefix.ip_prefix.as_ref())
            .collect();
        assert_eq!(prefixes, vec!["2600:9000::/28", "10.0.0.1", "010.000.000.000/8"]);
    }

    #[test]
    fn test_parse_errors() {
        let not_json = parse(b"<html>not json</html>");
        assert!(matches!(not_json, Err(Error::Parse(_))));

        let missing_prefixes = parse(br#"{"syncToken": "1"}"#);
        assert!(matches!(missing_prefixes, Err(Error::Parse(_))));

        let missing_service =
            parse(br#"{"prefixes":[{"ip_prefix":"10.0.0.0/8","region":"GLOBAL"}]}"#);
        assert!(matches!(missing_service, Err(Error::Parse(_))));

        let missing_prefix = parse(br#"{"prefixes":[{"region":"GLOBAL","service":"EC2"}]}"#);
        assert!(matches!(missing_prefix, Err(Error::Parse(_))));
    }
}
