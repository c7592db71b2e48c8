use super::list::ListCommand;
use super::{InputCommand, NEXCESS_ONLY, confirmed};
use crate::api::{Collection, Record};
use crate::choices::{
    ChoiceProvider, ChoiceSource, apps, cloud_account_packages, cloud_accounts, clouds,
};
use crate::config::ConfigType;
use crate::context::Context;
use crate::input::{InputSet, InputSpec, Invocation, ValueFilter, input, lookup_choice};
use crate::summary::{pick, say_summary, timestamp};
use anyhow::Result;
use serde_json::{Value, json};

const LIST_KEYS: &[&str] = &["id", "domain", "ip"];

const SHOW_KEYS: &[&str] = &[
    "id",
    "app",
    "deploy_date",
    "domain",
    "environment",
    "ip",
    "location",
    "service",
    "service.status",
    "status",
    "temp_domain",
    "unix_username",
];

pub fn list(ctx: &Context, filters: &[String]) -> Result<()> {
    ListCommand::execute(
        ctx,
        "cloud_account.list",
        Collection::CloudAccounts,
        LIST_KEYS,
        filters,
    )
}

/// `cloud-account show`, with `--domain`/`--ip` as lookups for the id
pub struct Show {
    pub id: Option<String>,
    pub domain: Option<String>,
    pub ip: Option<String>,
}

impl InputCommand for Show {
    const NAME: &'static str = "cloud_account.show";
    const RESTRICT_TO: &'static [ConfigType] = NEXCESS_ONLY;
    const INPUTS: InputSpec = &[input("id", ValueFilter::Int)];

    fn invocation(&self) -> Invocation {
        Invocation::new().argument("id", self.id.clone())
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("id", cloud_accounts())]
    }

    fn initialize(&self, inputs: &mut InputSet, choices: &mut dyn ChoiceProvider) -> Result<()> {
        if !inputs.is_unresolved("id") {
            return Ok(());
        }

        let search = self.domain.as_deref().or(self.ip.as_deref());
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            lookup_choice(inputs, choices, "id", search)?;
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let id = inputs.required_int("id")?;
        let account = ctx
            .endpoint
            .retrieve(&Collection::CloudAccounts, &id.to_string())?;

        let mut summary = pick(&account, SHOW_KEYS);
        if let Some(date) = summary.get("deploy_date").map(timestamp) {
            summary.insert("deploy_date".to_string(), date);
        }
        for (key, phrase) in [("app", "summary_app"), ("location", "summary_location")] {
            let text = match summary.get(key) {
                Some(Value::Object(details)) => ctx.phrase(Self::NAME, phrase, details),
                _ => continue,
            };
            summary.insert(key.to_string(), Value::from(text));
        }

        say_summary(ctx, Self::NAME, &summary)
    }
}

/// `cloud-account create`; the optional `app` argument looks up `app_id`
pub struct Create {
    pub app: Option<String>,
    pub app_id: Option<String>,
    pub cloud_id: Option<String>,
    pub domain: Option<String>,
    pub install_app: bool,
    pub package_id: Option<String>,
}

impl Create {
    fn summary(&self, ctx: &Context, account: &Record) -> Record {
        let field = |key: &str| account.get(key).cloned().unwrap_or(Value::Null);
        let nested = |key: &str, inner: &str| {
            account
                .get(key)
                .and_then(|value| value.get(inner))
                .cloned()
                .unwrap_or(Value::Null)
        };
        let cloud = match account.get("location") {
            Some(Value::Object(location)) => {
                Value::from(ctx.phrase(Self::NAME, "summary_cloud", location))
            }
            _ => Value::Null,
        };

        let summary = json!({
            "status": field("status"),
            "domain": field("cloud_account_domain"),
            "temp_domain": field("cloud_account_temp_domain"),
            "app": nested("cloud_account_app", "name"),
            "service_level": field("description"),
            "cloud": cloud,
        });
        match summary {
            Value::Object(map) => map,
            _ => Record::new(),
        }
    }
}

impl InputCommand for Create {
    const NAME: &'static str = "cloud_account.create";
    const RESTRICT_TO: &'static [ConfigType] = NEXCESS_ONLY;
    const INPUTS: InputSpec = &[
        input("app_id", ValueFilter::Int),
        input("cloud_id", ValueFilter::Int),
        input("domain", ValueFilter::Passthrough),
        input("install_app", ValueFilter::Bool),
        input("package_id", ValueFilter::Int),
    ];

    fn invocation(&self) -> Invocation {
        Invocation::new()
            .option("app-id", self.app_id.clone())
            .option("cloud-id", self.cloud_id.clone())
            .option("domain", self.domain.clone())
            .flag("install-app", self.install_app)
            .option("package-id", self.package_id.clone())
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![
            ("app_id", apps()),
            ("cloud_id", clouds()),
            ("package_id", cloud_account_packages()),
        ]
    }

    fn initialize(&self, inputs: &mut InputSet, choices: &mut dyn ChoiceProvider) -> Result<()> {
        if let Some(app) = self.app.as_deref() {
            lookup_choice(inputs, choices, "app_id", app)?;
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        inputs.required_int("app_id")?;
        inputs.required_int("cloud_id")?;
        inputs.required_string("domain")?;
        inputs.required_int("package_id")?;

        let body: serde_json::Map<String, Value> = inputs
            .all()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        ctx.say(&ctx.phrase(Self::NAME, "creating", &()));
        let account = ctx
            .endpoint
            .create(&Collection::CloudAccounts, &Value::Object(body))?;

        ctx.say(&ctx.phrase(Self::NAME, "created", &account));
        say_summary(ctx, Self::NAME, &self.summary(ctx, &account))
    }
}

pub struct Delete {
    pub id: Option<String>,
    pub force: bool,
}

impl InputCommand for Delete {
    const NAME: &'static str = "cloud_account.delete";
    const INPUTS: InputSpec = &[input("id", ValueFilter::Int)];

    fn invocation(&self) -> Invocation {
        Invocation::new().argument("id", self.id.clone())
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("id", cloud_accounts())]
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let id = inputs.required_int("id")?;
        let details = json!({ "id": id });

        if !confirmed(ctx, Self::NAME, self.force, &details)? {
            ctx.output.warning(&ctx.phrase(Self::NAME, "cancelled", &details));
            return Ok(());
        }

        ctx.say(&ctx.phrase(Self::NAME, "deleting", &details));
        ctx.endpoint
            .delete(&Collection::CloudAccounts, &id.to_string())?;
        ctx.output.success(&ctx.phrase(Self::NAME, "deleted", &details));
        Ok(())
    }
}
