use crate::error::CliError;
use crate::traits::FileSystem;
use crate::wait::WaitPolicy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Profile used when neither `--profile` nor `NEXCESS_PROFILE` is given
pub const DEFAULT_PROFILE: &str = "nexcess";

const SUPPORTED_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Which hosting brand the API belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigType {
    #[default]
    Nexcess,
    Thermo,
}

impl ConfigType {
    pub fn parse(kind: &str) -> Result<Self, CliError> {
        match kind.to_ascii_lowercase().as_str() {
            "nexcess" => Ok(ConfigType::Nexcess),
            "thermo" => Ok(ConfigType::Thermo),
            _ => Err(CliError::InvalidConfigType {
                kind: kind.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConfigType::Nexcess => "nexcess",
            ConfigType::Thermo => "thermo",
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            ConfigType::Nexcess => "https://nocworx.nexcess.net",
            ConfigType::Thermo => "https://core.thermo.io",
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct WaitSection {
    always: bool,
    interval_secs: u64,
    timeout_secs: u64,
}

impl Default for WaitSection {
    fn default() -> Self {
        let policy = WaitPolicy::default();
        Self {
            always: false,
            interval_secs: policy.interval.as_secs(),
            timeout_secs: policy.timeout.as_secs(),
        }
    }
}

/// On-disk profile contents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Profile {
    #[serde(rename = "type")]
    kind: Option<String>,
    base_url: Option<String>,
    api_token: Option<String>,
    debug: bool,
    wait: WaitSection,
}

/// Flags that take precedence over the environment and the profile
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub api_token: Option<String>,
    pub wait: bool,
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub profile: String,
    pub profile_path: Option<PathBuf>,
    pub config_type: ConfigType,
    pub base_url: String,
    pub api_token: String,
    pub debug: bool,
    pub wait_always: bool,
    pub wait: WaitPolicy,
}

/// Everything profile loading reads from the outside world
pub struct Environment<'a> {
    pub vars: &'a dyn Fn(&str) -> Option<String>,
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
    pub fs: &'a dyn FileSystem,
}

impl Settings {
    pub fn load(overrides: &Overrides, env: &Environment<'_>) -> Result<Self> {
        let profile_name = overrides
            .profile
            .clone()
            .or_else(|| (env.vars)("NEXCESS_PROFILE"))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        let (profile, profile_path, config_type) = match Path::new(&profile_name).extension() {
            None => (
                Profile::default(),
                None,
                ConfigType::parse(&profile_name)?,
            ),
            Some(ext) => {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                    return Err(CliError::UnsupportedProfileType {
                        kind: ext,
                        supported: SUPPORTED_EXTENSIONS.join(", "),
                    }
                    .into());
                }

                let path = find_profile(&profile_name, env)?;
                let profile = read_profile(&profile_name, &path, &ext, env.fs)?;
                let config_type = profile
                    .kind
                    .as_deref()
                    .map(ConfigType::parse)
                    .transpose()?
                    .unwrap_or_default();
                (profile, Some(path), config_type)
            }
        };

        let api_token = overrides
            .api_token
            .clone()
            .or_else(|| (env.vars)("NEXCESS_API_TOKEN"))
            .or_else(|| profile.api_token.clone())
            .unwrap_or_default();

        tracing::debug!(
            profile = %profile_name,
            path = ?profile_path,
            config_type = ?config_type,
            has_token = !api_token.is_empty(),
            "Loaded profile"
        );

        Ok(Self {
            profile: profile_name,
            profile_path,
            config_type,
            base_url: profile
                .base_url
                .clone()
                .unwrap_or_else(|| config_type.base_url().to_string()),
            api_token,
            debug: profile.debug,
            wait_always: overrides.wait || profile.wait.always,
            wait: WaitPolicy {
                interval: Duration::from_secs(profile.wait.interval_secs),
                timeout: Duration::from_secs(profile.wait.timeout_secs),
            },
        })
    }
}

/// The profile as given, then by file name in the working directory and each
/// parent, then in `~/.nexcess/`
fn find_profile(name: &str, env: &Environment<'_>) -> Result<PathBuf, CliError> {
    let given = env.cwd.join(name);
    if env.fs.is_file(&given) {
        return Ok(given);
    }

    let not_found = || CliError::ProfileNotFound {
        profile: name.to_string(),
    };
    let file_name = Path::new(name).file_name().ok_or_else(not_found)?;

    let mut dir = Some(env.cwd.as_path());
    while let Some(current) = dir {
        let candidate = current.join(file_name);
        if env.fs.is_file(&candidate) {
            return Ok(candidate);
        }
        dir = current.parent();
    }

    if let Some(home) = &env.home {
        let candidate = home.join(".nexcess").join(file_name);
        if env.fs.is_file(&candidate) {
            return Ok(candidate);
        }
    }

    Err(not_found())
}

fn read_profile(name: &str, path: &Path, ext: &str, fs: &dyn FileSystem) -> Result<Profile> {
    let contents = fs
        .read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;

    let parsed = if ext == "json" {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<Option<Profile>>(&contents)
            .map(Option::unwrap_or_default)
            .map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| {
        CliError::ProfileParse {
            profile: name.to_string(),
            reason,
        }
        .into()
    })
}
