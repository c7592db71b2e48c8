use crate::api::Endpoint;
use crate::config::ConfigType;
use crate::phrases::Phrasebook;
use crate::traits::{
    FileSystem, InquireUserInput, Output, RealFileSystem, TerminalOutput, UserInput,
};
use crate::wait::WaitPolicy;
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

/// Global flags every command honours
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Print summaries as JSON and keep stdout free of chatter
    pub json: bool,
    /// Prompt for inputs still unresolved after the command line
    pub interactive: bool,
    /// Block until long-running operations finish
    pub wait: bool,
    pub wait_policy: WaitPolicy,
    /// Brand of the API the profile talks to
    pub config_type: ConfigType,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            json: false,
            interactive: true,
            wait: false,
            wait_policy: WaitPolicy::default(),
            config_type: ConfigType::default(),
        }
    }
}

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub input: Arc<dyn UserInput>,
    pub output: Arc<dyn Output>,
    pub endpoint: Arc<dyn Endpoint>,
    pub phrases: Arc<Phrasebook>,
    pub options: RunOptions,
}

impl Context {
    /// Create a new context with terminal implementations talking to `endpoint`
    pub fn new(endpoint: Arc<dyn Endpoint>, options: RunOptions) -> Result<Self> {
        Ok(Self {
            fs: Arc::new(RealFileSystem),
            input: Arc::new(InquireUserInput),
            output: Arc::new(TerminalOutput),
            endpoint,
            phrases: Arc::new(Phrasebook::english()?),
            options,
        })
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    pub fn test_with(
        fs: Arc<dyn FileSystem>,
        input: Arc<dyn UserInput>,
        output: Arc<dyn Output>,
        endpoint: Arc<dyn Endpoint>,
    ) -> Self {
        Self {
            fs,
            input,
            output,
            endpoint,
            phrases: Arc::new(Phrasebook::english().expect("built-in phrasebook")),
            options: RunOptions {
                interactive: false,
                wait_policy: WaitPolicy {
                    interval: std::time::Duration::ZERO,
                    timeout: std::time::Duration::from_secs(5),
                },
                ..RunOptions::default()
            },
        }
    }

    /// Render `<command>.<key>`
    pub fn phrase<T: Serialize>(&self, command: &str, key: &str, context: &T) -> String {
        self.phrases.phrase(command, key, context)
    }

    /// Progress chatter, suppressed in JSON mode
    pub fn say(&self, message: &str) {
        if !self.options.json {
            self.output.info(message);
        }
    }
}
