use crate::error::{CheckoutError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Merchant settings passed to the hosted widget with every payment.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantConfig {
    pub sandbox: bool,
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
}

/// Where the payer is sent once a checkout reaches a terminal status.
#[derive(Debug, Clone, PartialEq)]
pub struct Destinations {
    pub success_url: String,
    pub failure_url: String,
}

/// Fixed-interval polling bounded by a number of status queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcilePolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    pub backend_url: Option<String>,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfig {
    pub merchant: MerchantConfig,
    pub destinations: Destinations,
    pub reconcile: ReconcilePolicy,
    pub http: HttpConfig,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            merchant: MerchantConfig {
                sandbox: true,
                return_url: "http://localhost:3000/payment/return".to_string(),
                cancel_url: "http://localhost:3000/payment/cancel".to_string(),
                notify_url: "http://localhost:8080/payments/notify".to_string(),
            },
            destinations: Destinations {
                success_url: "/payment/success".to_string(),
                failure_url: "/payment/failed".to_string(),
            },
            reconcile: ReconcilePolicy::default(),
            http: HttpConfig {
                backend_url: None,
                request_timeout: Duration::from_secs(30),
            },
        }
    }
}

impl CheckoutConfig {
    /// Builds the configuration from `CHECKOUT_*` environment variables, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`CheckoutConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(sandbox) = parsed::<bool>(&lookup, "CHECKOUT_SANDBOX")? {
            config.merchant.sandbox = sandbox;
        }
        if let Some(url) = lookup("CHECKOUT_RETURN_URL") {
            config.merchant.return_url = url;
        }
        if let Some(url) = lookup("CHECKOUT_CANCEL_URL") {
            config.merchant.cancel_url = url;
        }
        if let Some(url) = lookup("CHECKOUT_NOTIFY_URL") {
            config.merchant.notify_url = url;
        }
        if let Some(url) = lookup("CHECKOUT_SUCCESS_URL") {
            config.destinations.success_url = url;
        }
        if let Some(url) = lookup("CHECKOUT_FAILURE_URL") {
            config.destinations.failure_url = url;
        }
        if let Some(ms) = parsed::<u64>(&lookup, "CHECKOUT_POLL_INTERVAL_MS")? {
            config.reconcile.interval = Duration::from_millis(ms);
        }
        if let Some(max) = parsed::<u32>(&lookup, "CHECKOUT_MAX_ATTEMPTS")? {
            config.reconcile.max_attempts = max;
        }
        if let Some(url) = lookup("CHECKOUT_BACKEND_URL") {
            config.http.backend_url = Some(url);
        }
        if let Some(secs) = parsed::<u64>(&lookup, "CHECKOUT_REQUEST_TIMEOUT_SECS")? {
            config.http.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.reconcile.max_attempts == 0 {
            return Err(CheckoutError::Config(
                "max attempts must be at least 1".to_string(),
            ));
        }
        if self.reconcile.interval.is_zero() {
            return Err(CheckoutError::Config(
                "poll interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CheckoutError::Config(format!("{key} has invalid value '{raw}'"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_reference_polling() {
        let config = CheckoutConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.reconcile.interval, Duration::from_secs(1));
        assert_eq!(config.reconcile.max_attempts, 10);
        assert!(config.merchant.sandbox);
        assert!(config.http.backend_url.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = CheckoutConfig::from_lookup(lookup(&[
            ("CHECKOUT_SANDBOX", "false"),
            ("CHECKOUT_POLL_INTERVAL_MS", "250"),
            ("CHECKOUT_MAX_ATTEMPTS", "3"),
            ("CHECKOUT_SUCCESS_URL", "/done"),
            ("CHECKOUT_BACKEND_URL", "http://api.local"),
        ]))
        .unwrap();

        assert!(!config.merchant.sandbox);
        assert_eq!(config.reconcile.interval, Duration::from_millis(250));
        assert_eq!(config.reconcile.max_attempts, 3);
        assert_eq!(config.destinations.success_url, "/done");
        assert_eq!(config.http.backend_url.as_deref(), Some("http://api.local"));
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let bad_number = CheckoutConfig::from_lookup(lookup(&[("CHECKOUT_MAX_ATTEMPTS", "ten")]));
        assert!(matches!(bad_number, Err(CheckoutError::Config(_))));

        let zero = CheckoutConfig::from_lookup(lookup(&[("CHECKOUT_MAX_ATTEMPTS", "0")]));
        assert!(matches!(zero, Err(CheckoutError::Config(_))));
    }
}
