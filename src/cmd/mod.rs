pub mod help;
pub mod id;
pub mod info;
pub mod ls;
pub mod mkdir;
pub mod path;

use crate::cache::PathCache;
use crate::config::{self, AppConfig};
use crate::drive::{DriveClient, DriveConfig};
use crate::resolver::PathResolver;
use anyhow::Result;
use tracing::debug;

pub fn cli_config() -> Result<AppConfig> {
    AppConfig::load()
}

pub fn cli_client(config: &AppConfig) -> Result<DriveClient> {
    DriveClient::from_config(DriveConfig {
        drive_base_url: config.drive_base_url.clone(),
        access_token: config::access_token()?,
    })
}

/// A resolver with a fresh cache, scoped to one command run.
pub fn cli_resolver<'s>(client: &'s DriveClient, config: &AppConfig) -> PathResolver<'s, DriveClient> {
    PathResolver::new(client, PathCache::new()).with_policies(config.ambiguity, config.parents)
}

pub fn log_cache_size(resolver: &PathResolver<'_, DriveClient>) {
    debug!(entries = resolver.cache().len(), "path cache at exit");
}

/// Takes exactly one positional argument or fails with `usage`.
pub fn single_arg<'a>(args: &'a [String], usage: &str) -> Result<&'a str> {
    match args {
        [one] if !one.is_empty() => Ok(one.as_str()),
        _ => Err(anyhow::anyhow!("{usage}")),
    }
}
