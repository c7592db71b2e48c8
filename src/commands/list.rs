use crate::api::{Collection, Record};
use crate::context::Context;
use crate::input::parse_filters;
use crate::summary::{pick, say_list};
use anyhow::Result;

/// Lists a collection narrowed by `key:value` filters
pub struct ListCommand;

impl ListCommand {
    pub fn execute(
        ctx: &Context,
        command: &str,
        collection: Collection,
        keys: &[&str],
        filters: &[String],
    ) -> Result<()> {
        let filter = parse_filters(filters)?;
        tracing::debug!(command, collection = %collection, ?filter, "Listing");

        let records = ctx.endpoint.list(&collection, &filter)?;
        let items: Vec<Record> = records.iter().map(|record| pick(record, keys)).collect();

        say_list(ctx, command, &items)
    }
}
