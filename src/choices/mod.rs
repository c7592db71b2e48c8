//! Choice lists offered for command inputs
//!
//! A [`ChoiceProvider`] maps an input name to the set of values the user may
//! pick from. The production provider is [`ChoiceEngine`], driven by one
//! [`ChoiceSource`] per input; [`StaticChoices`] serves fixed lists.

mod domains;
mod engine;
mod pad;

pub use domains::{
    api_tokens, apps, backups, cloud_account_packages, cloud_accounts, clouds, ssl_certificates,
    ssl_packages,
};
pub use engine::{ChoiceEngine, ChoiceSource};

use crate::error::CliError;
use crate::input::InputSet;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Machine key of a choice: a numeric id or a name such as a backup filename
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChoiceKey {
    Id(i64),
    Name(String),
}

impl ChoiceKey {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(ChoiceKey::Id),
            Value::String(s) => Some(ChoiceKey::Name(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceKey::Id(id) => write!(f, "{}", id),
            ChoiceKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<ChoiceKey> for Value {
    fn from(key: ChoiceKey) -> Self {
        match key {
            ChoiceKey::Id(id) => Value::from(id),
            ChoiceKey::Name(name) => Value::from(name),
        }
    }
}

/// Ordered key to label mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceSet(IndexMap<ChoiceKey, String>);

impl ChoiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn get(&self, key: &ChoiceKey) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChoiceKey, &String)> {
        self.0.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.0.values().cloned().collect()
    }

    /// Key of the choice at `index`, in the order of [`labels`](Self::labels)
    pub fn key_at(&self, index: usize) -> Option<&ChoiceKey> {
        self.0.get_index(index).map(|(key, _)| key)
    }
}

impl FromIterator<(ChoiceKey, String)> for ChoiceSet {
    fn from_iter<I: IntoIterator<Item = (ChoiceKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Supplies the valid values for a named input.
///
/// `formatted` selects human-readable descriptions over raw labels. Inputs the
/// provider knows nothing about yield an empty set.
pub trait ChoiceProvider {
    fn choices(
        &mut self,
        input: &str,
        formatted: bool,
        inputs: &InputSet,
    ) -> Result<ChoiceSet, CliError>;
}

/// Fixed choice lists, identical formatted or not
#[cfg(test)]
#[derive(Debug, Default)]
pub struct StaticChoices(IndexMap<String, ChoiceSet>);

#[cfg(test)]
impl StaticChoices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, input: &str, choices: ChoiceSet) -> Self {
        self.0.insert(input.to_string(), choices);
        self
    }
}

#[cfg(test)]
impl ChoiceProvider for StaticChoices {
    fn choices(
        &mut self,
        input: &str,
        _formatted: bool,
        _inputs: &InputSet,
    ) -> Result<ChoiceSet, CliError> {
        Ok(self.0.get(input).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_choice_key_from_value() {
        assert_eq!(ChoiceKey::from_value(&json!(7)), Some(ChoiceKey::Id(7)));
        assert_eq!(
            ChoiceKey::from_value(&json!("a.tgz")),
            Some(ChoiceKey::Name("a.tgz".to_string()))
        );
        assert_eq!(ChoiceKey::from_value(&json!(null)), None);
    }

    #[test]
    fn test_key_at_follows_label_order() {
        let choices: ChoiceSet = [
            (ChoiceKey::Id(1), "alpha".to_string()),
            (ChoiceKey::Id(2), "alpha".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(choices.labels(), vec!["alpha", "alpha"]);
        assert_eq!(choices.key_at(1), Some(&ChoiceKey::Id(2)));
        assert_eq!(choices.key_at(2), None);
    }
}
