use crate::core::errors::{Error, Result};
use log::info;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

/*-------------------------------------------------------------------------------------------------
  Expected Digest
-------------------------------------------------------------------------------------------------*/

/// Sentinel `md5` value used by the seed trigger to bypass verification.
pub const SEED_DIGEST: &str = "seed";

/// The `md5` field of a change notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ExpectedDigest {
    /// Trusted bypass; any content verifies.
    Seed,
    /// Lowercase hex MD5 of the document.
    Md5(String),
}

impl From<String> for ExpectedDigest {
    fn from(value: String) -> Self {
        if value == SEED_DIGEST {
            ExpectedDigest::Seed
        } else {
            ExpectedDigest::Md5(value)
        }
    }
}

impl From<&str> for ExpectedDigest {
    fn from(value: &str) -> Self {
        ExpectedDigest::from(value.to_string())
    }
}

impl From<ExpectedDigest> for String {
    fn from(digest: ExpectedDigest) -> Self {
        match digest {
            ExpectedDigest::Seed => SEED_DIGEST.to_string(),
            ExpectedDigest::Md5(hex) => hex,
        }
    }
}

impl fmt::Display for ExpectedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedDigest::Seed => f.write_str(SEED_DIGEST),
            ExpectedDigest::Md5(hex) => f.write_str(hex),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Verification
-------------------------------------------------------------------------------------------------*/

pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", Md5::digest(bytes))
}

/// Verify `bytes` against the expected digest. The comparison is an exact string match.
pub fn verify(bytes: &[u8], expected: &ExpectedDigest) -> Result<()> {
    match expected {
        ExpectedDigest::Seed => {
            info!("hash set to seed, bypassing md5 check");
            Ok(())
        }
        ExpectedDigest::Md5(expected) => {
            let actual = md5_hex(bytes);
            if &actual == expected {
                Ok(())
            } else {
                Err(Error::Integrity {
                    expected: expected.clone(),
                    actual,
                })
            }
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_seed_always_verifies() {
        assert!(verify(b"", &ExpectedDigest::Seed).is_ok());
        assert!(verify(b"anything at all", &ExpectedDigest::Seed).is_ok());
    }

    #[test]
    fn test_matching_digest_verifies() {
        let expected = ExpectedDigest::from("900150983cd24fb0d6963f7d28e17f72");
        assert!(verify(b"abc", &expected).is_ok());
    }

    #[test]
    fn test_mismatched_digest_fails() {
        let expected = ExpectedDigest::from("d41d8cd98f00b204e9800998ecf8427e");
        let result = verify(b"abc", &expected);
        match result {
            Err(Error::Integrity { expected, actual }) => {
                assert_eq!(expected, "d41d8cd98f00b204e9800998ecf8427e");
                assert_eq!(actual, "900150983cd24fb0d6963f7d28e17f72");
            }
            other => panic!("expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_digest_comparison_is_case_sensitive() {
        let expected = ExpectedDigest::from("900150983CD24FB0D6963F7D28E17F72");
        assert!(verify(b"abc", &expected).is_err());
    }

    #[test]
    fn test_expected_digest_serde() {
        let seed: ExpectedDigest = serde_json::from_str("\"seed\"").unwrap();
        assert_eq!(seed, ExpectedDigest::Seed);

        let md5: ExpectedDigest = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(md5, ExpectedDigest::Md5("abc".to_string()));

        assert_eq!(serde_json::to_string(&ExpectedDigest::Seed).unwrap(), "\"seed\"");
    }
}
