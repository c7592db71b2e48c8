use super::list::ListCommand;
use super::{InputCommand, confirmed};
use crate::api::Collection;
use crate::choices::{ChoiceSource, api_tokens};
use crate::context::Context;
use crate::input::{InputSet, InputSpec, Invocation, ValueFilter, input};
use crate::summary::say_summary;
use anyhow::Result;
use serde_json::json;

const LIST_KEYS: &[&str] = &["id", "name"];

pub fn list(ctx: &Context, filters: &[String]) -> Result<()> {
    ListCommand::execute(ctx, "api_token.list", Collection::ApiTokens, LIST_KEYS, filters)
}

pub struct Create {
    pub name: Option<String>,
}

impl InputCommand for Create {
    const NAME: &'static str = "api_token.create";
    const INPUTS: InputSpec = &[input("name", ValueFilter::String)];

    fn invocation(&self) -> Invocation {
        Invocation::new().option("name", self.name.clone())
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let name = inputs.required_string("name")?;

        ctx.say(&ctx.phrase(Self::NAME, "creating", &()));
        let token = ctx
            .endpoint
            .create(&Collection::ApiTokens, &json!({ "name": name }))?;

        ctx.say(&ctx.phrase(Self::NAME, "created", &token));
        say_summary(ctx, Self::NAME, &token)
    }
}

pub struct Delete {
    pub id: Option<String>,
    pub force: bool,
}

impl InputCommand for Delete {
    const NAME: &'static str = "api_token.delete";
    const INPUTS: InputSpec = &[input("id", ValueFilter::Int)];

    fn invocation(&self) -> Invocation {
        Invocation::new().argument("id", self.id.clone())
    }

    fn choice_sources(&self) -> Vec<(&'static str, ChoiceSource)> {
        vec![("id", api_tokens())]
    }

    fn execute(&self, ctx: &Context, inputs: &InputSet) -> Result<()> {
        let id = inputs.required_int("id")?;
        let details = json!({ "id": id });

        if !confirmed(ctx, Self::NAME, self.force, &details)? {
            ctx.output.warning(&ctx.phrase(Self::NAME, "cancelled", &details));
            return Ok(());
        }

        ctx.endpoint.delete(&Collection::ApiTokens, &id.to_string())?;
        ctx.output.success(&ctx.phrase(Self::NAME, "deleted", &details));
        Ok(())
    }
}
