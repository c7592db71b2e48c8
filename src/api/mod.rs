//! Remote API surface
//!
//! Commands and choice providers talk to the hosting API only through the
//! [`Endpoint`] trait. [`ApiClient`] is the HTTP implementation.

mod client;
#[cfg(test)]
mod mock;

pub use client::ApiClient;
#[cfg(test)]
pub use mock::MockEndpoint;

use crate::error::CliError;
use crate::input::Filter;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

/// One resource as returned by the API
pub type Record = Map<String, Value>;

/// API resource collections
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Collection {
    CloudAccounts,
    Backups { cloud_account_id: i64 },
    Packages,
    SslCertificates,
    SslImports,
    ApiTokens,
    Apps,
    Clouds,
}

impl Collection {
    /// Request path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Collection::CloudAccounts => "cloud-account".to_string(),
            Collection::Backups { cloud_account_id } => {
                format!("cloud-account/{}/backup", cloud_account_id)
            }
            Collection::Packages => "package".to_string(),
            Collection::SslCertificates => "ssl-cert".to_string(),
            Collection::SslImports => "ssl-cert/import".to_string(),
            Collection::ApiTokens => "api-token".to_string(),
            Collection::Apps => "app".to_string(),
            Collection::Clouds => "cloud".to_string(),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Accept a name only if it stays inside the directory it is joined to
pub fn plain_filename(name: &str) -> Result<&str, CliError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
    {
        return Err(CliError::UnsafeFilename {
            filename: name.to_string(),
        });
    }
    Ok(name)
}

/// Blocking access to the API's resource collections
pub trait Endpoint: Send + Sync {
    fn list(&self, collection: &Collection, filter: &Filter) -> Result<Vec<Record>, CliError>;

    fn retrieve(&self, collection: &Collection, id: &str) -> Result<Record, CliError>;

    fn create(&self, collection: &Collection, body: &Value) -> Result<Record, CliError>;

    fn delete(&self, collection: &Collection, id: &str) -> Result<(), CliError>;

    /// Save the resource's file into `dir`, returning the written path.
    ///
    /// Never replaces an existing file.
    fn download(&self, collection: &Collection, id: &str, dir: &Path)
    -> Result<PathBuf, CliError>;
}
