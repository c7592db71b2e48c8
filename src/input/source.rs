use indexmap::IndexMap;
use serde_json::Value;

/// What the command line offered for a single invocation
pub trait ArgSource {
    fn has_argument(&self, name: &str) -> bool;

    fn argument(&self, name: &str) -> Value;

    /// `name` is the long-option spelling (`cloud-account-id`)
    fn has_option(&self, name: &str) -> bool;

    fn option(&self, name: &str) -> Value;
}

/// Arguments and options declared by a command, with their parsed values.
///
/// A declared but absent argument or option is stored as null; value-less
/// flags are stored as booleans.
#[derive(Debug, Default, Clone)]
pub struct Invocation {
    arguments: IndexMap<String, Value>,
    options: IndexMap<String, Value>,
}

impl Invocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn argument<V: Into<Value>>(mut self, name: &str, value: Option<V>) -> Self {
        self.arguments
            .insert(name.to_string(), value.map_or(Value::Null, Into::into));
        self
    }

    pub fn option<V: Into<Value>>(mut self, name: &str, value: Option<V>) -> Self {
        self.options
            .insert(name.to_string(), value.map_or(Value::Null, Into::into));
        self
    }

    pub fn flag(mut self, name: &str, set: bool) -> Self {
        self.options.insert(name.to_string(), Value::Bool(set));
        self
    }
}

impl ArgSource for Invocation {
    fn has_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    fn argument(&self, name: &str) -> Value {
        self.arguments.get(name).cloned().unwrap_or(Value::Null)
    }

    fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    fn option(&self, name: &str) -> Value {
        self.options.get(name).cloned().unwrap_or(Value::Null)
    }
}
