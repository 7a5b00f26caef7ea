//! # Feature-Flag Configuration
//!
//! Loads the `FeatureFlags` snapshot (spec.md §3, §6) consumed by the
//! inbound builder. Layered sources, later overriding earlier:
//!
//! 1. Defaults (`FeatureFlags::default()`, everything off).
//! 2. An optional configuration file.
//! 3. Environment variables with an `RDS_` prefix (e.g. `RDS_ENABLE_WASM_STATS=true`).

use crate::errors::Result;
use crate::policy::FeatureFlags;
use config::{Config, Environment, File};
use std::path::Path;

/// Load feature flags from defaults, an optional file, and `RDS_`-prefixed
/// environment variables, in that order of precedence.
pub fn load_feature_flags<P: AsRef<Path>>(config_path: Option<P>) -> Result<FeatureFlags> {
    let mut builder = Config::builder();

    builder = builder.add_source(Config::try_from(&FeatureFlags::default())?);

    if let Some(path) = config_path {
        let path = path.as_ref();
        if path.exists() {
            builder = builder.add_source(File::from(path));
        } else {
            return Err(crate::errors::RdsError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
    }

    builder = builder.add_source(Environment::with_prefix("RDS").separator("_").try_parsing(true));

    let config = builder.build()?;
    Ok(config.try_deserialize()?)
}

/// Load feature flags from environment variables only, useful for
/// containerized deployments with no mounted config file.
pub fn load_feature_flags_from_env() -> Result<FeatureFlags> {
    load_feature_flags::<&str>(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn defaults_to_flags_disabled() {
        let flags = load_feature_flags_from_env().unwrap();
        assert!(!flags.enable_wasm_stats);
    }

    #[test]
    fn env_var_enables_wasm_stats() {
        env::set_var("RDS_ENABLE_WASM_STATS", "true");
        let flags = load_feature_flags_from_env().unwrap();
        assert!(flags.enable_wasm_stats);
        env::remove_var("RDS_ENABLE_WASM_STATS");
    }
}
