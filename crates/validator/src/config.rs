//! Validator endpoint configuration.

/// The scaffold value shipped in example environment files. A URL equal
/// to this means the deployment was never configured, and dispatch must
/// fail fast instead of posting to a dead address.
pub const PLACEHOLDER_URL: &str = "https://your-validator-instance.com/webhook/validate-note";

/// Configuration for the external validation engine.
///
/// | Variable                | Meaning                       | Default |
/// |-------------------------|-------------------------------|---------|
/// | `VALIDATOR_WEBHOOK_URL` | Engine webhook endpoint       | unset   |
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    pub webhook_url: Option<String>,
}

impl ValidatorConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var("VALIDATOR_WEBHOOK_URL")
                .ok()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        }
    }

    /// The usable endpoint URL, if one is actually configured.
    ///
    /// Unset, empty, and placeholder values all count as unconfigured.
    pub fn resolve(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .filter(|url| *url != PLACEHOLDER_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_counts_as_unconfigured() {
        let config = ValidatorConfig {
            webhook_url: Some(PLACEHOLDER_URL.to_string()),
        };
        assert_eq!(config.resolve(), None);
    }

    #[test]
    fn unset_counts_as_unconfigured() {
        assert_eq!(ValidatorConfig::default().resolve(), None);
    }

    #[test]
    fn real_url_resolves() {
        let config = ValidatorConfig {
            webhook_url: Some("https://engine.example.com/hook".to_string()),
        };
        assert_eq!(config.resolve(), Some("https://engine.example.com/hook"));
    }
}
