//! Command result summaries
//!
//! A command narrows the API record to its summary keys, then prints it either
//! as an indented `key: value` tree or, with `--json`, as pretty JSON.

use crate::api::Record;
use crate::context::Context;
use crate::traits::Output;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// `record` narrowed to `keys`, in their order.
///
/// Empty `keys` keeps the whole record. Dotted keys (`service.status`) reach
/// into nested objects; keys that are absent come back as null.
pub fn pick(record: &Record, keys: &[&str]) -> Record {
    if keys.is_empty() {
        return record.clone();
    }

    keys.iter()
        .map(|key| {
            let value = lookup(record, key).cloned().unwrap_or(Value::Null);
            (key.to_string(), value)
        })
        .collect()
}

fn lookup<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    if let Some(value) = record.get(key) {
        return Some(value);
    }

    let (head, rest) = key.split_once('.')?;
    match record.get(head)? {
        Value::Object(child) => lookup(child, rest),
        _ => None,
    }
}

/// Scalar text of a summary value
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Unix seconds as `YYYY-MM-DD HH:MM:SS UTC`; anything else is kept as is
pub fn timestamp(value: &Value) -> Value {
    let seconds = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    seconds
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map_or_else(
            || value.clone(),
            |date| Value::from(date.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        )
}

/// Print one record under the command's `summary_title`
pub fn say_summary(ctx: &Context, command: &str, summary: &Record) -> Result<()> {
    if ctx.options.json {
        ctx.output.plain(&serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    let title = ctx.phrase(command, "summary_title", summary);
    if title != "summary_title" {
        ctx.output.section(&title);
    }
    say_tree(ctx.output.as_ref(), summary, 0);
    Ok(())
}

/// Print a list of records, one `summary_item` line each
pub fn say_list(ctx: &Context, command: &str, items: &[Record]) -> Result<()> {
    if ctx.options.json {
        ctx.output.plain(&serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    if items.is_empty() {
        ctx.output.info(&ctx.phrase(command, "empty", &()));
        return Ok(());
    }

    ctx.output.section(&ctx.phrase(command, "summary_title", &()));
    for item in items {
        ctx.output.list_item(&ctx.phrase(command, "summary_item", item));
    }
    Ok(())
}

fn say_tree(output: &dyn Output, map: &Record, depth: usize) {
    for (key, value) in map {
        match value {
            Value::Object(child) => {
                output.branch(depth, key);
                say_tree(output, child, depth + 1);
            }
            Value::Array(items) if items.iter().any(|item| item.is_object() || item.is_array()) => {
                output.branch(depth, key);
                let indexed: Record = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), item.clone()))
                    .collect();
                say_tree(output, &indexed, depth + 1);
            }
            Value::Array(items) => {
                let joined = items.iter().map(display_value).collect::<Vec<_>>().join(", ");
                output.key_value(depth, key, &joined);
            }
            scalar => output.key_value(depth, key, &display_value(scalar)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockEndpoint;
    use crate::traits::{MockFileSystem, MockOutput, MockUserInput, OutputMessage};
    use serde_json::json;
    use std::sync::Arc;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn context(output: Arc<MockOutput>) -> Context {
        Context::test_with(
            Arc::new(MockFileSystem::new()),
            Arc::new(MockUserInput::new()),
            output,
            Arc::new(MockEndpoint::new()),
        )
    }

    #[test]
    fn test_pick_keeps_declared_order_and_nests() {
        let account = record(json!({
            "status": "enabled",
            "id": 7,
            "service": {"status": "active", "name": "cloud"},
            "ip": "10.0.0.7"
        }));

        let summary = pick(&account, &["id", "service.status", "missing"]);

        assert_eq!(
            Value::Object(summary),
            json!({"id": 7, "service.status": "active", "missing": null})
        );
    }

    #[test]
    fn test_pick_without_keys_keeps_everything() {
        let token = record(json!({"id": 1, "name": "ci"}));
        assert_eq!(pick(&token, &[]), token);
    }

    #[test]
    fn test_timestamp_formats_unix_seconds() {
        assert_eq!(timestamp(&json!(1_700_000_000)), json!("2023-11-14 22:13:20 UTC"));
        assert_eq!(timestamp(&json!("0")), json!("1970-01-01 00:00:00 UTC"));
        assert_eq!(timestamp(&json!("soon")), json!("soon"));
        assert_eq!(timestamp(&Value::Null), Value::Null);
    }

    #[test]
    fn test_text_summary_is_an_indented_tree() {
        let output = Arc::new(MockOutput::new());
        let ctx = context(output.clone());
        let summary = record(json!({
            "id": 3,
            "location": {"name": "Southfield", "code": "sfd"},
            "complete": null
        }));

        say_summary(&ctx, "cloud_account.show", &summary).unwrap();

        assert_eq!(
            output.get_messages(),
            vec![
                OutputMessage::Section("Cloud account".to_string()),
                OutputMessage::KeyValue(0, "id".to_string(), "3".to_string()),
                OutputMessage::Branch(0, "location".to_string()),
                OutputMessage::KeyValue(1, "name".to_string(), "Southfield".to_string()),
                OutputMessage::KeyValue(1, "code".to_string(), "sfd".to_string()),
                OutputMessage::KeyValue(0, "complete".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_json_summary_is_pretty_printed() {
        let output = Arc::new(MockOutput::new());
        let mut ctx = context(output.clone());
        ctx.options.json = true;

        say_summary(&ctx, "ssl.show", &record(json!({"id": 9}))).unwrap();

        assert_eq!(output.plain_text(), "{\n  \"id\": 9\n}");
    }

    #[test]
    fn test_list_renders_items_from_phrase() {
        let output = Arc::new(MockOutput::new());
        let ctx = context(output.clone());
        let items = vec![record(json!({"id": 4, "name": "deploy"}))];

        say_list(&ctx, "api_token.list", &items).unwrap();

        assert!(output.contains_message(&OutputMessage::ListItem("#4  deploy".to_string())));
    }

    #[test]
    fn test_empty_list_says_so() {
        let output = Arc::new(MockOutput::new());
        let ctx = context(output.clone());

        say_list(&ctx, "ssl.list", &[]).unwrap();

        assert_eq!(
            output.get_messages(),
            vec![OutputMessage::Info("No SSL certificates found.".to_string())]
        );
    }
}
