use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use serde_yaml::Value as YamlValue;

const ENGLISH: &str = include_str!("lang/en.yaml");

/// User-facing text, as handlebars templates keyed by dotted path.
///
/// Rendering never fails: a missing or broken phrase falls back to its key.
pub struct Phrasebook {
    handlebars: Handlebars<'static>,
}

impl Phrasebook {
    /// The built-in English phrasebook
    pub fn english() -> Result<Self> {
        Self::from_yaml(ENGLISH)
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        let tree: YamlValue = serde_yaml::from_str(source).context("Failed to parse phrasebook")?;

        let mut phrases = Vec::new();
        flatten("", &tree, &mut phrases);

        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        for (key, template) in phrases {
            handlebars
                .register_template_string(&key, template)
                .with_context(|| format!("Invalid phrase template: {}", key))?;
        }

        Ok(Self { handlebars })
    }

    pub fn has(&self, key: &str) -> bool {
        self.handlebars.has_template(key)
    }

    /// Render the phrase at an absolute key
    pub fn text<T: Serialize>(&self, key: &str, context: &T) -> String {
        if !self.has(key) {
            return key.to_string();
        }

        match self.handlebars.render(key, context) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to render phrase");
                key.to_string()
            }
        }
    }

    /// Render `<command>.<key>`, falling back to the bare `key`
    pub fn phrase<T: Serialize>(&self, command: &str, key: &str, context: &T) -> String {
        let full = format!("{}.{}", command, key);
        if self.has(&full) {
            self.text(&full, context)
        } else {
            key.to_string()
        }
    }
}

fn flatten(prefix: &str, value: &YamlValue, out: &mut Vec<(String, String)>) {
    match value {
        YamlValue::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = scalar(key) else { continue };
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, child, out);
            }
        }
        other => {
            if let Some(text) = scalar(other) {
                out.push((prefix.to_string(), text));
            }
        }
    }
}

fn scalar(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_english_phrasebook_loads() {
        let phrases = Phrasebook::english().unwrap();
        assert!(phrases.has("choices.backup"));
        assert!(phrases.has("cloud_account.backup.show.how_to_download"));
    }

    #[test]
    fn test_renders_without_escaping() {
        let phrases = Phrasebook::from_yaml("greet: \"<{{name}}> & co\"").unwrap();
        assert_eq!(phrases.text("greet", &json!({"name": "a&b"})), "<a&b> & co");
    }

    #[test]
    fn test_missing_phrase_falls_back_to_key() {
        let phrases = Phrasebook::from_yaml("a:\n  b: \"hello\"").unwrap();
        assert_eq!(phrases.text("a.c", &()), "a.c");
        assert_eq!(phrases.phrase("a", "b", &()), "hello");
        assert_eq!(phrases.phrase("a", "choose_id", &()), "choose_id");
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let phrases = Phrasebook::from_yaml("x: \"[{{nope}}]\"").unwrap();
        assert_eq!(phrases.text("x", &json!({})), "[]");
    }
}
