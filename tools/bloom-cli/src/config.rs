//! Store configuration files.

use std::path::Path;

use anyhow::{Context, Result};
use bloom_storefront::StoreConfig;

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Load config from a file.
pub fn load(path: &Path) -> Result<StoreConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        format = if is_json(path) { "json" } else { "toml" },
        "reading store config"
    );
    if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }
}

/// Save config to a file.
pub fn save(config: &StoreConfig, path: &Path) -> Result<()> {
    let content = if is_json(path) {
        serde_json::to_string_pretty(config)?
    } else {
        generate_config(config)?
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}

/// Render a bouquet.toml with a short header.
pub fn generate_config(config: &StoreConfig) -> Result<String> {
    let body = toml::to_string_pretty(config).context("Failed to serialize config")?;
    Ok(format!(
        "# Bouquet Bar store configuration\n\
         #\n\
         # Amounts are in paise (1 INR = 100). Coupon percentages are in basis\n\
         # points (2000 = 20%).\n\n{}",
        body
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_commerce::{DeliveryOptionId, Money};

    #[test]
    fn test_generated_config_loads_back() {
        let dir = std::env::temp_dir().join(format!("bouquet-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bouquet.toml");

        save(&StoreConfig::default(), &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, StoreConfig::default());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: StoreConfig = toml::from_str(
            r#"
store_name = "Bouquet Bar Koramangala"
sync_cart = false

[cod_fee]
amount_cents = 7500
currency = "INR"
"#,
        )
        .unwrap();
        assert_eq!(config.store_name, "Bouquet Bar Koramangala");
        assert!(!config.sync_cart);
        assert_eq!(config.cod_fee, Money::inr(75));
        assert!(config
            .delivery_option(&DeliveryOptionId::new("express"))
            .is_some());
        assert!(config.validate().is_empty());
    }
}
