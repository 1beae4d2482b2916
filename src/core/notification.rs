use crate::core::errors::{Error, Result};
use crate::core::integrity::ExpectedDigest;
use serde::{Deserialize, Serialize};

/*-------------------------------------------------------------------------------------------------
  Change Notification
-------------------------------------------------------------------------------------------------*/

/// Body of an `AmazonIpSpaceChanged` notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChangeNotification {
    /// Label for the update; embedded in the IP set description.
    #[serde(rename = "create-time")]
    pub create_time: String,

    /// Feed version marker. Logged, otherwise unused.
    #[serde(default)]
    pub synctoken: String,

    pub md5: ExpectedDigest,

    /// Location of the range document.
    pub url: String,
}

/*-------------------------------------------------------------------------------------------------
  SNS Envelope
-------------------------------------------------------------------------------------------------*/

/// SNS event delivered to a Lambda function. The notification travels JSON-encoded in
/// `Records[0].Sns.Message`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Records")]
    pub records: Vec<SnsRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_subscription_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,

    pub sns: SnsMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_cert_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsubscribe_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    pub message: String,
}

impl SnsEnvelope {
    /// Decode the change notification carried by the first record.
    pub fn notification(&self) -> Result<ChangeNotification> {
        let record = self
            .records
            .first()
            .ok_or_else(|| Error::parse("SNS event contains no records"))?;
        Ok(serde_json::from_str(&record.sns.message)?)
    }

    /// Wrap `notification` in a single-record envelope with placeholder SNS metadata, shaped like
    /// a console test invocation.
    pub fn synthetic(notification: &ChangeNotification) -> Result<Self> {
        let placeholder = || Some("EXAMPLE".to_string());

        Ok(Self {
            records: vec![SnsRecord {
                event_version: Some("1.0".to_string()),
                event_subscription_arn: Some("arn:aws:sns:EXAMPLE".to_string()),
                event_source: Some("aws:sns".to_string()),
                sns: SnsMessage {
                    signature_version: Some("1".to_string()),
                    timestamp: Some("1970-01-01T00:00:00.000Z".to_string()),
                    signature: placeholder(),
                    signing_cert_url: placeholder(),
                    message_id: Some("95df01b4-ee98-5cb9-9903-4c221d41eb5e".to_string()),
                    r#type: Some("Notification".to_string()),
                    unsubscribe_url: placeholder(),
                    topic_arn: Some("arn:aws:sns:EXAMPLE".to_string()),
                    subject: Some("TestInvoke".to_string()),
                    message: serde_json::to_string(notification)?,
                },
            }],
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;

    const SNS_EVENT: &str = r#"{
      "Records": [
        {
          "EventVersion": "1.0",
          "EventSubscriptionArn": "arn:aws:sns:us-east-1:806199016981:AmazonIpSpaceChanged:example",
          "EventSource": "aws:sns",
          "Sns": {
            "SignatureVersion": "1",
            "Timestamp": "2024-01-01T00:00:00.000Z",
            "Signature": "EXAMPLE",
            "SigningCertUrl": "EXAMPLE",
            "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
            "Message": "{\"create-time\": \"2024-01-01-00-00-00\", \"synctoken\": \"1704067200\", \"md5\": \"d41d8cd98f00b204e9800998ecf8427e\", \"url\": \"https://ip-ranges.amazonaws.com/ip-ranges.json\"}",
            "Type": "Notification",
            "UnsubscribeUrl": "EXAMPLE",
            "TopicArn": "arn:aws:sns:us-east-1:806199016981:AmazonIpSpaceChanged",
            "Subject": "[AmazonIpSpaceChanged]"
          }
        }
      ]
    }"#;

    #[test]
    fn test_decode_notification() {
        let envelope: SnsEnvelope = serde_json::from_str(SNS_EVENT).unwrap();
        let notification = envelope.notification().unwrap();

        assert_eq!(
            notification,
            ChangeNotification {
                create_time: "2024-01-01-00-00-00".to_string(),
                synctoken: "1704067200".to_string(),
                md5: ExpectedDigest::Md5("d41d8cd98f00b204e9800998ecf8427e".to_string()),
                url: "https://ip-ranges.amazonaws.com/ip-ranges.json".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_envelope_is_parse_error() {
        let envelope: SnsEnvelope = serde_json::from_str(r#"{"Records": []}"#).unwrap();
        assert!(matches!(envelope.notification(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_malformed_message_is_parse_error() {
        let envelope: SnsEnvelope =
            serde_json::from_str(r#"{"Records": [{"Sns": {"Message": "{\"url\": 1}"}}]}"#)
                .unwrap();
        assert!(matches!(envelope.notification(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_synthetic_envelope_carries_notification() {
        let notification = ChangeNotification {
            create_time: "Initial Seed".to_string(),
            synctoken: "0123456789".to_string(),
            md5: ExpectedDigest::Seed,
            url: "https://ip-ranges.amazonaws.com/ip-ranges.json".to_string(),
        };

        let envelope = SnsEnvelope::synthetic(&notification).unwrap();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["Records"][0]["EventSource"], "aws:sns");
        assert_eq!(json["Records"][0]["Sns"]["Subject"], "TestInvoke");

        let message: serde_json::Value =
            serde_json::from_str(json["Records"][0]["Sns"]["Message"].as_str().unwrap()).unwrap();
        assert_eq!(message["md5"], "seed");
        assert_eq!(message["create-time"], "Initial Seed");

        assert_eq!(envelope.notification().unwrap(), notification);
    }
}
