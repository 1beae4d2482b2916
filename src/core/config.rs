use crate::core::errors::{Error, Result};
use crate::core::ipset::Scope;
use log::{info, warn};
use std::env;

/*-------------------------------------------------------------------------------------------------
  Configuration
-------------------------------------------------------------------------------------------------*/

/// Published location of the AWS IP Ranges document.
pub const IP_RANGES_URL: &str = "https://ip-ranges.amazonaws.com/ip-ranges.json";

/// Service whose prefixes are synchronized when `SERVICE` is not set.
pub const DEFAULT_SERVICE: &str = "CLOUDFRONT";

pub const SERVICE_ENV_VAR: &str = "SERVICE";
pub const IPSET_NAME_ENV_VAR: &str = "IPSET_NAME";
pub const IPSET_SCOPE_ENV_VAR: &str = "IPSET_SCOPE";
pub const DEBUG_ENV_VAR: &str = "DEBUG";

/*-------------------------------------------------------------------------------------------------
  Update Config Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [UpdateConfig] struct. The [UpdateConfigBuilder::from_env] method sources
/// values from environment variables; the setters override individual values.
///
/// ```
/// let config = wafipsync::UpdateConfigBuilder::default()
///     .service("CLOUDFRONT")
///     .ipset_name("CloudFront-IPs")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.service(), "CLOUDFRONT");
/// assert_eq!(config.ipset_name(), "CloudFront-IPs");
/// ```
#[derive(Debug, Clone)]
pub struct UpdateConfigBuilder {
    service: String,
    ipset_name: Option<String>,
    scope: Scope,
}

impl Default for UpdateConfigBuilder {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            ipset_name: None,
            scope: Scope::Regional,
        }
    }
}

impl UpdateConfigBuilder {
    /// Create a new [UpdateConfigBuilder] from the process environment:
    /// - `SERVICE`
    /// - `IPSET_NAME`
    /// - `IPSET_SCOPE`
    ///
    /// `DEBUG` only selects the log level and is read separately by [debug_enabled].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Create a new [UpdateConfigBuilder] using `lookup` to resolve each variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = UpdateConfigBuilder::default();

        let scope = match lookup(IPSET_SCOPE_ENV_VAR) {
            Some(value) => value.parse::<Scope>().map_err(|_| {
                Error::config(format!("Invalid {}: {}", IPSET_SCOPE_ENV_VAR, value))
            })?,
            None => default.scope,
        };

        Ok(Self {
            service: get_var(&lookup, SERVICE_ENV_VAR, default.service),
            ipset_name: lookup(IPSET_NAME_ENV_VAR),
            scope,
        })
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the service whose prefixes are written to the IP set; defaults to `CLOUDFRONT`.
    /// Matching is case-sensitive.
    pub fn service(&mut self, service: &str) -> &mut Self {
        self.service = service.to_string();
        self
    }

    /// Set the name of the IP set to update. Required.
    pub fn ipset_name(&mut self, ipset_name: &str) -> &mut Self {
        self.ipset_name = Some(ipset_name.to_string());
        self
    }

    /// Set the scope the IP set lives in; defaults to `REGIONAL`.
    pub fn scope(&mut self, scope: Scope) -> &mut Self {
        self.scope = scope;
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    pub fn build(&self) -> Result<UpdateConfig> {
        let ipset_name = self
            .ipset_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::config(format!("{} is required", IPSET_NAME_ENV_VAR)))?;

        if self.service.is_empty() {
            return Err(Error::config(format!("{} cannot be empty", SERVICE_ENV_VAR)));
        }

        Ok(UpdateConfig {
            service: self.service.clone(),
            ipset_name: ipset_name.to_string(),
            scope: self.scope,
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  Update Config
-------------------------------------------------------------------------------------------------*/

/// Validated configuration for the update pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConfig {
    service: String,
    ipset_name: String,
    scope: Scope,
}

impl UpdateConfig {
    pub fn from_env() -> Result<Self> {
        UpdateConfigBuilder::from_env()?.build()
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn ipset_name(&self) -> &str {
        &self.ipset_name
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// `DEBUG=true` (exactly) enables verbose logging. Read before any other configuration so that
/// configuration errors are logged at the requested level.
pub fn debug_enabled<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(DEBUG_ENV_VAR).is_some_and(|value| value == "true")
}

fn get_var<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", name, value))
                .inspect_err(|_| warn!("Invalid {}: {}", name, value))
                .ok()
        })
        .unwrap_or(default)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
