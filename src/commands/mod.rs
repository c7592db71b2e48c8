//! Command handlers
//!
//! Commands that collect inputs implement [`InputCommand`] and are driven by
//! [`run`]. The clap tree in `main.rs` is the only registry of commands.

pub mod api_token;
pub mod backup;
pub mod cloud_account;
pub mod list;
pub mod ssl;

use crate::choices::{ChoiceEngine, ChoiceProvider, ChoiceSource};
use crate::config::ConfigType;
use crate::context::Context;
use crate::error::CliError;
use crate::input::{InputSet, InputSpec, Invocation, interact};
use anyhow::Result;
use serde::Serialize;

/// Commands only the Nexcess API offers
pub(crate) const NEXCESS_ONLY: &[ConfigType] = &[ConfigType::Nexcess];

/// A command whose inputs are declared up front and may be prompted for
pub trait InputCommand {
    /// Phrase namespace, also reported in input errors
    const NAME: &'static str;

    const INPUTS: InputSpec;

    /// API types the command works against; empty means all of them
    const RESTRICT_TO: &'static [ConfigType] = &[];

    /// What the command line supplied for the declared inputs
    fn invocation(&self) -> Invocation;

    /// Choice lists offered for individual inputs
    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        Vec::new()
    }

    /// Runs after command-line resolution and before prompting
    fn initialize(&self, _inputs: &mut InputSet, _choices: &mut dyn ChoiceProvider) -> Result<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()>;
}

/// Resolve, complete and execute one command invocation.
///
/// The choice cache lives exactly as long as this call.
pub fn run<C: InputCommand>(ctx: &Context, command: &C) -> Result<()> {
    ensure_enabled(ctx, C::NAME, C::RESTRICT_TO)?;

    let invocation = command.invocation();
    let mut inputs = InputSet::resolve_from_cli(C::NAME, C::INPUTS, &invocation);

    let mut choices = command
        .choice_sources()
        .into_iter()
        .fold(
            ChoiceEngine::new(ctx.endpoint.as_ref(), ctx.phrases.as_ref()),
            |engine, (input, source)| engine.with_source(input, source),
        );

    command.initialize(&mut inputs, &mut choices)?;

    if ctx.options.interactive {
        interact(&mut inputs, &mut choices, ctx.input.as_ref(), ctx.phrases.as_ref())?;
    } else {
        tracing::debug!(command = C::NAME, unresolved = ?inputs.unresolved(), "Skipping prompts");
    }

    command.execute(ctx, &inputs)
}

/// Refuse a command the current profile's API type does not offer
pub(crate) fn ensure_enabled(
    ctx: &Context,
    command: &str,
    restrict_to: &[ConfigType],
) -> Result<(), CliError> {
    let config_type = ctx.options.config_type;
    if restrict_to.is_empty() || restrict_to.contains(&config_type) {
        return Ok(());
    }

    tracing::debug!(command, %config_type, "Command not enabled for profile type");
    Err(CliError::CommandRestricted {
        command: command.to_string(),
        config_type: config_type.to_string(),
        allowed: restrict_to
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Ask before destroying something; `--force` skips the question.
///
/// Without a terminal to ask on, nothing is confirmed.
pub(crate) fn confirmed<T: Serialize>(
    ctx: &Context,
    command: &str,
    force: bool,
    details: &T,
) -> Result<bool> {
    if force {
        return Ok(true);
    }
    if !ctx.options.interactive {
        tracing::debug!(command, "Not confirmed: prompting disabled and no --force");
        return Ok(false);
    }

    ctx.input.confirm(&ctx.phrase(command, "confirm", details), false)
}
