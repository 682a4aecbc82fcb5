//! CLI configuration, a thin wrapper around `hydrawise_config`.
//!
//! Adds the flag overrides from `GlobalOpts` (--endpoint, --token, --timeout)
//! on top of the shared profile resolution.

use std::time::Duration;

use secrecy::SecretString;

use hydrawise_api::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hydrawise_config::{
    Config, Profile, config_path, load_config, profile_to_client_config,
    resolve_token, store_token,
};

/// Everything needed to open a client.
pub struct Connection {
    pub config: ClientConfig,
    pub token: SecretString,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Combine the config file, the active profile, and CLI flags.
///
/// A missing profile is fine as long as a token comes from the flags or
/// environment; the endpoint then defaults to production.
pub fn resolve_connection(global: &GlobalOpts) -> Result<Connection, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            let names = cfg.profile_names();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    // 1. Endpoint (flag > env > profile)
    let profile = Profile {
        endpoint: global.endpoint.clone().unwrap_or(profile.endpoint),
        ..profile
    };
    let mut config = profile_to_client_config(&profile, &cfg.defaults)?;

    // 2. Timeout (flag > env > profile > defaults)
    if let Some(secs) = global.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    // 3. Token (flag > env > token_env > keyring > plaintext)
    let token = match global.token {
        Some(ref t) => SecretString::from(t.clone()),
        None => resolve_token(&profile, &profile_name)?,
    };

    Ok(Connection { config, token })
}
