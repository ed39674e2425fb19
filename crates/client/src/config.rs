use crate::error::Result;
use anchorfs_ledger::LedgerConfig;
use anchorfs_store::StoreConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one client instance.
///
/// Everything a client needs is in here — two clients built from two
/// configs share nothing, so a process can run isolated instances side
/// by side (production gateways next to test fakes, different tenants,
/// and so on).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub store: StoreConfig,
    pub ledger: LedgerConfig,
}

impl ClientConfig {
    /// Load from a config file (TOML/JSON/YAML by extension), with
    /// `ANCHORFS_*` environment variables layered on top
    /// (e.g. `ANCHORFS_STORE__AUTH_TOKEN`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("ANCHORFS").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
