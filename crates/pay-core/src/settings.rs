//! # Gateway Settings
//!
//! Merchant-facing display settings for a checkout gateway: whether it is
//! offered at checkout and the title/description shoppers see.
//! Loaded from `config/gateway.toml` when present.

use serde::{Deserialize, Serialize};

/// Display settings for one gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Stable gateway identifier (e.g., "abmex_gateway")
    pub id: String,

    /// Whether shoppers can pick this gateway
    #[serde(default)]
    pub enabled: bool,

    /// Title the shopper sees during checkout
    pub title: String,

    /// Description the shopper sees during checkout
    #[serde(default)]
    pub description: String,

    /// Name shown to the merchant in admin listings
    #[serde(default)]
    pub method_title: String,

    /// Explanation shown to the merchant in admin listings
    #[serde(default)]
    pub method_description: String,
}

impl GatewaySettings {
    /// Create settings with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let title: String = title.into();
        Self {
            id: id.into(),
            enabled: false,
            method_title: title.clone(),
            title,
            description: String::new(),
            method_description: String::new(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set admin-facing description
    pub fn with_method_description(mut self, description: impl Into<String>) -> Self {
        self.method_description = description.into();
        self
    }

    /// Builder: enable/disable
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Load from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_builder() {
        let settings = GatewaySettings::new("abmex_gateway", "ABMEX Gateway")
            .with_description("Pay with your card")
            .enabled(true);

        assert_eq!(settings.id, "abmex_gateway");
        assert_eq!(settings.method_title, "ABMEX Gateway");
        assert!(settings.enabled);
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = GatewaySettings::from_toml(
            r#"
            id = "abmex_gateway"
            enabled = true
            title = "Cartão de crédito"
            description = "Pague com cartão"
            "#,
        )
        .unwrap();

        assert!(settings.enabled);
        assert_eq!(settings.title, "Cartão de crédito");
        assert_eq!(settings.method_title, "");
    }

    #[test]
    fn test_settings_disabled_by_default() {
        let settings = GatewaySettings::from_toml(
            r#"
            id = "abmex_gateway"
            title = "ABMEX"
            "#,
        )
        .unwrap();

        assert!(!settings.enabled);
        assert!(settings.description.is_empty());
    }
}
