use super::{InputCommand, NEXCESS_ONLY};
use crate::api::{Collection, Record, plain_filename};
use crate::choices::{ChoiceSource, backups, cloud_accounts};
use crate::config::ConfigType;
use crate::context::Context;
use crate::error::CliError;
use crate::input::{InputSet, InputSpec, Invocation, ValueFilter, input};
use crate::summary::{pick, say_list, say_summary, timestamp};
use crate::wait::wait_until;
use anyhow::{Context as AnyhowContext, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

const LIST_KEYS: &[&str] = &["filename", "filedate", "complete", "filesize"];
const SHOW_KEYS: &[&str] = &["filename", "type", "filesize", "filedate", "complete"];
const CREATE_KEYS: &[&str] = &["filename", "complete"];

const ACCOUNT_INPUT: InputSpec = &[input("cloud_account_id", ValueFilter::Int)];
const BACKUP_INPUTS: InputSpec = &[
    input("cloud_account_id", ValueFilter::Int),
    input("filename", ValueFilter::String),
];

fn backups_of(cloud_account_id: i64) -> Collection {
    Collection::Backups { cloud_account_id }
}

/// The API reports completion as a bool, 0/1 or a string of either
fn is_complete(backup: &Record) -> bool {
    match backup.get("complete") {
        Some(Value::Bool(done)) => *done,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(s)) => matches!(s.as_str(), "1" | "true" | "yes"),
        _ => false,
    }
}

/// Summary of a backup with a readable date and a YES/NO completion flag
fn summarize(backup: &Record, keys: &[&str]) -> Record {
    let mut summary = pick(backup, keys);
    if let Some(date) = summary.get("filedate").map(timestamp) {
        summary.insert("filedate".to_string(), date);
    }
    if summary.contains_key("complete") {
        let flag = if is_complete(backup) { "YES" } else { "NO" };
        summary.insert("complete".to_string(), Value::from(flag));
    }
    summary
}

fn account_invocation(cloud_account_id: &Option<String>) -> Invocation {
    Invocation::new().option("cloud-account-id", cloud_account_id.clone())
}

pub struct List {
    pub cloud_account_id: Option<String>,
}

impl InputCommand for List {
    const NAME: &'static str = "cloud_account.backup.list";
    const INPUTS: InputSpec = ACCOUNT_INPUT;

    fn invocation(&self) -> Invocation {
        account_invocation(&self.cloud_account_id)
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("cloud_account_id", cloud_accounts())]
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let cloud_account_id = inputs.required_int("cloud_account_id")?;
        let backups = ctx
            .endpoint
            .list(&backups_of(cloud_account_id), &Default::default())?;

        let items: Vec<Record> = backups
            .iter()
            .map(|backup| summarize(backup, LIST_KEYS))
            .collect();
        say_list(ctx, Self::NAME, &items)
    }
}

pub struct Show {
    pub cloud_account_id: Option<String>,
    pub filename: Option<String>,
}

impl InputCommand for Show {
    const NAME: &'static str = "cloud_account.backup.show";
    const RESTRICT_TO: &'static [ConfigType] = NEXCESS_ONLY;
    const INPUTS: InputSpec = BACKUP_INPUTS;

    fn invocation(&self) -> Invocation {
        account_invocation(&self.cloud_account_id).option("filename", self.filename.clone())
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("cloud_account_id", cloud_accounts()), ("filename", backups())]
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let cloud_account_id = inputs.required_int("cloud_account_id")?;
        let filename = inputs.required_string("filename")?;

        let backup = ctx
            .endpoint
            .retrieve(&backups_of(cloud_account_id), &filename)?;
        say_summary(ctx, Self::NAME, &summarize(&backup, SHOW_KEYS))?;

        if !ctx.options.json {
            let details = json!({
                "cloud_account_id": cloud_account_id,
                "filename": backup.get("filename").cloned().unwrap_or(Value::from(filename)),
            });
            ctx.output.blank();
            ctx.output.command_suggestion(
                &ctx.phrase(Self::NAME, "how_to_download_label", &details),
                &ctx.phrase(Self::NAME, "how_to_download", &details),
            );
        }
        Ok(())
    }
}

/// `cloud-account backup create`, optionally waiting for completion and
/// downloading the finished file
pub struct Create {
    pub cloud_account_id: Option<String>,
    pub download: Option<String>,
}

impl Create {
    fn wait_for(&self, ctx: &Context, collection: &Collection, filename: &str) -> Result<()> {
        let what = format!("backup {}", filename);
        wait_until(&ctx.options.wait_policy, &what, || {
            ctx.endpoint
                .retrieve(collection, filename)
                .map(|backup| is_complete(&backup))
        })?;
        Ok(())
    }
}

impl InputCommand for Create {
    const NAME: &'static str = "cloud_account.backup.create";
    const RESTRICT_TO: &'static [ConfigType] = NEXCESS_ONLY;
    const INPUTS: InputSpec = ACCOUNT_INPUT;

    fn invocation(&self) -> Invocation {
        account_invocation(&self.cloud_account_id)
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("cloud_account_id", cloud_accounts())]
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let cloud_account_id = inputs.required_int("cloud_account_id")?;
        let collection = backups_of(cloud_account_id);

        ctx.say(&ctx.phrase(Self::NAME, "starting_backup", &()));
        let backup = ctx.endpoint.create(&collection, &json!({}))?;
        say_summary(ctx, Self::NAME, &summarize(&backup, CREATE_KEYS))?;

        let filename = backup
            .get("filename")
            .and_then(Value::as_str)
            .map(str::to_string)
            .with_context(|| format!("Backup of cloud account #{} has no filename", cloud_account_id))?;
        let details = json!({ "cloud_account_id": cloud_account_id, "filename": filename });

        if let Some(dir) = self.download.as_deref() {
            plain_filename(&filename)?;
            ctx.say(&ctx.phrase(Self::NAME, "downloading", &details));
            self.wait_for(ctx, &collection, &filename)?;
            let path = ctx.endpoint.download(&collection, &filename, Path::new(dir))?;
            ctx.output.success(&ctx.phrase(
                Self::NAME,
                "download_complete",
                &json!({ "path": path.display().to_string() }),
            ));
            return Ok(());
        }

        if ctx.options.wait {
            ctx.say(&ctx.phrase(Self::NAME, "waiting", &details));
            self.wait_for(ctx, &collection, &filename)?;
            ctx.output.success(&ctx.phrase(Self::NAME, "backup_complete", &details));
            return Ok(());
        }

        ctx.say(&ctx.phrase(Self::NAME, "backup_started", &details));
        Ok(())
    }
}

pub struct Download {
    pub cloud_account_id: Option<String>,
    pub filename: Option<String>,
    pub download_path: Option<String>,
    pub force: bool,
}

impl InputCommand for Download {
    const NAME: &'static str = "cloud_account.backup.download";
    const RESTRICT_TO: &'static [ConfigType] = NEXCESS_ONLY;
    const INPUTS: InputSpec = &[
        input("cloud_account_id", ValueFilter::Int),
        input("filename", ValueFilter::String),
        input("download_path", ValueFilter::String),
    ];

    fn invocation(&self) -> Invocation {
        account_invocation(&self.cloud_account_id)
            .option("filename", self.filename.clone())
            .option("download-path", self.download_path.clone())
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("cloud_account_id", cloud_accounts()), ("filename", backups())]
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let cloud_account_id = inputs.required_int("cloud_account_id")?;
        let filename = inputs.required_string("filename")?;
        let download_path = inputs
            .string("download_path", false)?
            .map(|path| path.trim().to_string())
            .unwrap_or_default();
        if download_path.is_empty() {
            return Err(CliError::InvalidPath {
                path: download_path,
            }
            .into());
        }

        let dir = PathBuf::from(&download_path);
        let target = dir.join(plain_filename(&filename)?);
        if ctx.fs.exists(&target) {
            if !self.force {
                return Err(CliError::FileExists {
                    path: target.display().to_string(),
                }
                .into());
            }
            tracing::debug!(path = %target.display(), "Removing existing download");
            ctx.fs.remove_file(&target)?;
        }

        let details = json!({ "filename": filename, "download_path": download_path });
        ctx.say(&ctx.phrase(Self::NAME, "downloading", &details));

        let path = ctx
            .endpoint
            .download(&backups_of(cloud_account_id), &filename, &dir)?;
        ctx.output.success(&ctx.phrase(
            Self::NAME,
            "done",
            &json!({ "path": path.display().to_string() }),
        ));
        Ok(())
    }
}

pub struct Delete {
    pub cloud_account_id: Option<String>,
    pub filename: Option<String>,
}

impl InputCommand for Delete {
    const NAME: &'static str = "cloud_account.backup.delete";
    const RESTRICT_TO: &'static [ConfigType] = NEXCESS_ONLY;
    const INPUTS: InputSpec = BACKUP_INPUTS;

    fn invocation(&self) -> Invocation {
        account_invocation(&self.cloud_account_id).option("filename", self.filename.clone())
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("cloud_account_id", cloud_accounts()), ("filename", backups())]
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let cloud_account_id = inputs.required_int("cloud_account_id")?;
        let filename = inputs.required_string("filename")?;
        if filename.trim().is_empty() {
            return Err(CliError::MissingInput {
                command: Self::NAME.to_string(),
                name: "filename".to_string(),
            }
            .into());
        }

        let details = json!({ "filename": filename });
        ctx.say(&ctx.phrase(Self::NAME, "deleting", &details));
        ctx.endpoint
            .delete(&backups_of(cloud_account_id), &filename)?;
        ctx.output.success(&ctx.phrase(Self::NAME, "done", &details));
        Ok(())
    }
}
