use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Exit code for anything not classified below
pub const EXIT_CATCHALL: i32 = 1;

/// Exit code for errors reported by the remote API
pub const EXIT_API_ERROR: i32 = 100;

/// Exit code for console / profile configuration errors
pub const EXIT_CONSOLE_ERROR: i32 = 101;

/// Resource domains that can supply choices for an input.
///
/// Each domain has its own "nothing to choose from" error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceDomain {
    CloudAccount,
    Backup,
    CloudAccountPackage,
    SslPackage,
    SslCertificate,
    ApiToken,
    App,
    Cloud,
}

impl ChoiceDomain {
    /// Stable numeric code, distinct per domain
    pub fn code(self) -> u32 {
        match self {
            ChoiceDomain::CloudAccount => 1,
            ChoiceDomain::Backup => 2,
            ChoiceDomain::CloudAccountPackage => 3,
            ChoiceDomain::SslPackage => 4,
            ChoiceDomain::SslCertificate => 5,
            ChoiceDomain::ApiToken => 6,
            ChoiceDomain::App => 7,
            ChoiceDomain::Cloud => 8,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            ChoiceDomain::CloudAccount => "cloud accounts",
            ChoiceDomain::Backup => "backups",
            ChoiceDomain::CloudAccountPackage => "cloud account packages",
            ChoiceDomain::SslPackage => "SSL packages",
            ChoiceDomain::SslCertificate => "SSL certificates",
            ChoiceDomain::ApiToken => "API tokens",
            ChoiceDomain::App => "apps",
            ChoiceDomain::Cloud => "clouds",
        }
    }
}

impl fmt::Display for ChoiceDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Structured diagnostic context attached to some errors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext(pub IndexMap<String, Value>);

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }

        let pairs: Vec<String> = self
            .0
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{}: {}", key, s),
                other => format!("{}: {}", key, other),
            })
            .collect();
        write!(f, " ({})", pairs.join(", "))
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid list filter '{filter}': expected exactly one ':' as in key:value")]
    InvalidFilterFormat { filter: String },

    #[error("Command '{command}' requires a value for '{name}'")]
    MissingInput { command: String, name: String },

    #[error("Command '{command}' has no input named '{name}'")]
    NoSuchInput { command: String, name: String },

    #[error("No {domain} available to choose from{context}")]
    NoChoicesAvailable {
        domain: ChoiceDomain,
        context: ErrorContext,
    },

    #[error("'{lookup}' does not match any {input} (available: {})", .choices.join("|"))]
    NoLookupMatch {
        input: String,
        lookup: String,
        choices: Vec<String>,
    },

    #[error("'{lookup}' matches more than one {input}: {}", .matches.join(", "))]
    LookupMatchAmbiguous {
        input: String,
        lookup: String,
        matches: Vec<String>,
    },

    #[error("At least one approver email is required (use --approver-email domain:email)")]
    NoApproverEmail,

    #[error("Invalid approver email '{approver}': expected domain:email")]
    InvalidApproverEmail { approver: String },

    #[error("File does not exist: {filename}")]
    InvalidFilename { filename: String },

    #[error("'{filename}' is not a plain file name")]
    UnsafeFilename { filename: String },

    #[error("Invalid download path: '{path}'")]
    InvalidPath { path: String },

    #[error("Timed out after {seconds}s waiting for {what}")]
    WaitTimedOut { what: String, seconds: u64 },

    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unsupported profile type '{kind}' (supported: {supported})")]
    UnsupportedProfileType { kind: String, supported: String },

    #[error("Profile '{profile}' could not be found")]
    ProfileNotFound { profile: String },

    #[error("Command '{command}' is not available for {config_type} profiles (only {allowed})")]
    CommandRestricted {
        command: String,
        config_type: String,
        allowed: String,
    },

    #[error("Invalid base URL '{url}'")]
    InvalidBaseUrl { url: String },

    #[error("Refusing to overwrite {path} (use --force)")]
    FileExists { path: String },

    #[error("Invalid config type '{kind}' (expected nexcess or thermo)")]
    InvalidConfigType { kind: String },

    #[error("Profile '{profile}' could not be parsed: {reason}")]
    ProfileParse { profile: String, reason: String },

    #[error("Could not reach the API")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code this error maps to
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Api { .. } | CliError::Network(_) => EXIT_API_ERROR,
            CliError::UnsupportedProfileType { .. }
            | CliError::ProfileNotFound { .. }
            | CliError::InvalidConfigType { .. }
            | CliError::InvalidBaseUrl { .. }
            | CliError::CommandRestricted { .. }
            | CliError::ProfileParse { .. } => EXIT_CONSOLE_ERROR,
            _ => EXIT_CATCHALL,
        }
    }

    /// Short machine-readable name for structured output
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::InvalidFilterFormat { .. } => "InvalidFilterFormat",
            CliError::MissingInput { .. } => "MissingInput",
            CliError::NoSuchInput { .. } => "NoSuchInput",
            CliError::NoChoicesAvailable { .. } => "NoChoicesAvailable",
            CliError::NoLookupMatch { .. } => "NoLookupMatch",
            CliError::LookupMatchAmbiguous { .. } => "LookupMatchAmbiguous",
            CliError::NoApproverEmail => "NoApproverEmail",
            CliError::InvalidApproverEmail { .. } => "InvalidApproverEmail",
            CliError::InvalidFilename { .. } => "InvalidFilename",
            CliError::UnsafeFilename { .. } => "UnsafeFilename",
            CliError::InvalidPath { .. } => "InvalidPath",
            CliError::WaitTimedOut { .. } => "WaitTimedOut",
            CliError::Api { .. } => "Api",
            CliError::UnsupportedProfileType { .. } => "UnsupportedProfileType",
            CliError::ProfileNotFound { .. } => "ProfileNotFound",
            CliError::InvalidConfigType { .. } => "InvalidConfigType",
            CliError::CommandRestricted { .. } => "CommandRestricted",
            CliError::InvalidBaseUrl { .. } => "InvalidBaseUrl",
            CliError::FileExists { .. } => "FileExists",
            CliError::ProfileParse { .. } => "ProfileParse",
            CliError::Network(_) => "Network",
            CliError::Io(_) => "Io",
        }
    }
}

/// JSON representation of an error for `--json` output
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub error_type: String,
    /// Per-domain code of a `NoChoicesAvailable` error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    pub message: String,
}

/// Picks the exit code for an error bubbling out of a command handler
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CliError>())
        .map_or(EXIT_CATCHALL, CliError::exit_code)
}

/// Builds the structured form of an error bubbling out of a command handler
pub fn to_json(err: &anyhow::Error) -> JsonError {
    let cli_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<CliError>());
    let code = match cli_error {
        Some(CliError::NoChoicesAvailable { domain, .. }) => Some(domain.code()),
        _ => None,
    };

    JsonError {
        error_type: cli_error.map_or("Unexpected", CliError::kind).to_string(),
        code,
        message: format!("{:#}", err),
    }
}
