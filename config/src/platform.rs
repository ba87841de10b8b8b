//! Local platform accounts
//!
//! Each named account carries the settings a local task launcher needs.
//! Only the configuration model lives here; launching is not part of
//! PageHaus.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub local: LocalPlatformProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalPlatformProperties {
    #[serde(default)]
    pub accounts: BTreeMap<String, LocalDeployerProperties>,
}

impl LocalPlatformProperties {
    pub fn account(&self, name: &str) -> Option<&LocalDeployerProperties> {
        self.accounts.get(name)
    }
}

/// Settings of one local platform account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalDeployerProperties {
    /// Seconds to wait for a launched process to stop
    pub shutdown_timeout: u64,
    pub java_opts: Option<String>,
    pub java_cmd: Option<String>,
    pub working_directories_root: Option<PathBuf>,
    pub delete_files_on_exit: bool,
    pub env_vars_to_inherit: Vec<String>,
    pub inherit_logging: bool,
    pub debug_port: Option<u16>,
    pub debug_suspend: Option<String>,
}

impl Default for LocalDeployerProperties {
    fn default() -> Self {
        Self {
            shutdown_timeout: 30,
            java_opts: None,
            java_cmd: None,
            working_directories_root: None,
            delete_files_on_exit: true,
            env_vars_to_inherit: vec![
                "TMP".to_string(),
                "LANG".to_string(),
                "LANGUAGE".to_string(),
                "LC_.*".to_string(),
                "PATH".to_string(),
            ],
            inherit_logging: false,
            debug_port: None,
            debug_suspend: None,
        }
    }
}

impl LocalDeployerProperties {
    pub(crate) fn validate(&self, account: &str) -> Result<(), ConfigError> {
        if self.shutdown_timeout == 0 {
            return Err(ConfigError::Invalid(format!(
                "Platform account '{}' shutdown_timeout must be greater than 0",
                account
            )));
        }
        if self.debug_port == Some(0) {
            return Err(ConfigError::Invalid(format!(
                "Platform account '{}' debug_port cannot be zero",
                account
            )));
        }
        if let Some(suspend) = &self.debug_suspend {
            if suspend != "y" && suspend != "n" {
                return Err(ConfigError::Invalid(format!(
                    "Platform account '{}' debug_suspend must be 'y' or 'n'",
                    account
                )));
            }
        }
        Ok(())
    }
}
