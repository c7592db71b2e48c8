use super::source::ArgSource;
use super::spec::{InputDef, InputSpec};
use crate::error::CliError;
use indexmap::IndexMap;
use serde_json::Value;

/// Live input values for one command invocation.
///
/// Keys are exactly the names declared in the command's [`InputSpec`], in
/// declaration order. Values are stored raw; filters run on read so that null
/// keeps meaning "not resolved yet".
#[derive(Debug, Clone)]
pub struct InputSet {
    command: &'static str,
    spec: InputSpec,
    values: IndexMap<&'static str, Value>,
}

impl InputSet {
    /// Every declared input set to null
    pub fn new(command: &'static str, spec: InputSpec) -> Self {
        let values = spec.iter().map(|def| (def.name, Value::Null)).collect();
        Self {
            command,
            spec,
            values,
        }
    }

    /// Fill inputs from matching arguments, then from matching long options
    pub fn resolve_from_cli(
        command: &'static str,
        spec: InputSpec,
        source: &dyn ArgSource,
    ) -> Self {
        let mut set = Self::new(command, spec);
        for def in spec {
            let option_name = def.name.replace('_', "-");
            let value = if source.has_argument(def.name) {
                tracing::trace!(input = def.name, "Taking input from argument");
                source.argument(def.name)
            } else if source.has_option(&option_name) {
                tracing::trace!(input = def.name, option = %option_name, "Taking input from option");
                source.option(&option_name)
            } else {
                continue;
            };
            set.values.insert(def.name, value);
        }
        set
    }

    pub fn command(&self) -> &'static str {
        self.command
    }

    fn def(&self, name: &str) -> Result<&InputDef, CliError> {
        self.spec
            .iter()
            .find(|def| def.name == name)
            .ok_or_else(|| CliError::NoSuchInput {
                command: self.command.to_string(),
                name: name.to_string(),
            })
    }

    /// Filtered value of `name`; null is an error when `required`
    pub fn get(&self, name: &str, required: bool) -> Result<Value, CliError> {
        let def = self.def(name)?;
        let raw = self.values.get(def.name).unwrap_or(&Value::Null);
        let value = def.filter.apply(raw);

        if required && value.is_null() {
            return Err(self.missing(name));
        }
        Ok(value)
    }

    /// All inputs that are non-null after filtering
    pub fn all(&self) -> IndexMap<&'static str, Value> {
        self.spec
            .iter()
            .filter_map(|def| {
                let value = def.filter.apply(self.values.get(def.name)?);
                (!value.is_null()).then_some((def.name, value))
            })
            .collect()
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), CliError> {
        let key = self.def(name)?.name;
        self.values.insert(key, value.into());
        Ok(())
    }

    /// Raw (unfiltered) value is still null
    pub fn is_unresolved(&self, name: &str) -> bool {
        self.values.get(name).is_none_or(Value::is_null)
    }

    /// Unresolved input names, in declaration order
    pub fn unresolved(&self) -> Vec<&'static str> {
        self.spec
            .iter()
            .map(|def| def.name)
            .filter(|name| self.is_unresolved(name))
            .collect()
    }

    pub fn int(&self, name: &str, required: bool) -> Result<Option<i64>, CliError> {
        Ok(self.get(name, required)?.as_i64())
    }

    pub fn string(&self, name: &str, required: bool) -> Result<Option<String>, CliError> {
        Ok(match self.get(name, required)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    pub fn required_int(&self, name: &str) -> Result<i64, CliError> {
        self.int(name, true)?.ok_or_else(|| self.missing(name))
    }

    pub fn required_string(&self, name: &str) -> Result<String, CliError> {
        self.string(name, true)?.ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> CliError {
        CliError::MissingInput {
            command: self.command.to_string(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::source::Invocation;
    use crate::input::spec::{ValueFilter, input};
    use serde_json::json;

    const SPEC: InputSpec = &[
        input("id", ValueFilter::Int),
        input("domain", ValueFilter::Passthrough),
        input("cloud_account_id", ValueFilter::Int),
        input("install_app", ValueFilter::Bool),
    ];

    #[test]
    fn test_argument_value_is_taken() {
        let invocation = Invocation::new().argument("domain", Some("example.com"));
        let set = InputSet::resolve_from_cli("test.show", SPEC, &invocation);

        assert_eq!(set.get("domain", false).unwrap(), json!("example.com"));
        assert!(set.get("id", false).unwrap().is_null());
    }

    #[test]
    fn test_option_uses_hyphenated_name() {
        let invocation = Invocation::new().option("cloud-account-id", Some("12"));
        let set = InputSet::resolve_from_cli("test.show", SPEC, &invocation);

        assert_eq!(set.int("cloud_account_id", true).unwrap(), Some(12));
    }

    #[test]
    fn test_argument_wins_over_option() {
        let invocation = Invocation::new()
            .argument("domain", Some("arg.example"))
            .option("domain", Some("opt.example"));
        let set = InputSet::resolve_from_cli("test.show", SPEC, &invocation);

        assert_eq!(set.get("domain", false).unwrap(), json!("arg.example"));
    }

    #[test]
    fn test_required_missing_input() {
        let set = InputSet::new("test.show", SPEC);

        let err = set.get("id", true).unwrap_err();
        assert!(matches!(
            err,
            CliError::MissingInput { ref command, ref name } if command == "test.show" && name == "id"
        ));
        assert_eq!(set.get("id", false).unwrap(), Value::Null);
    }

    #[test]
    fn test_undeclared_input() {
        let mut set = InputSet::new("test.show", SPEC);

        assert!(matches!(
            set.get("nope", false),
            Err(CliError::NoSuchInput { .. })
        ));
        assert!(matches!(set.set("nope", 1), Err(CliError::NoSuchInput { .. })));
    }

    #[test]
    fn test_filters_apply_on_read() {
        let mut set = InputSet::new("test.show", SPEC);
        set.set("id", "abc").unwrap();

        // still counts as resolved, but coerces to null
        assert!(!set.is_unresolved("id"));
        assert!(set.get("id", false).unwrap().is_null());
    }

    #[test]
    fn test_all_drops_nulls_after_filtering() {
        let mut set = InputSet::new("test.show", SPEC);
        set.set("id", "abc").unwrap();
        set.set("domain", "example.com").unwrap();
        set.set("install_app", "yes").unwrap();

        let all = set.all();
        assert_eq!(all.keys().copied().collect::<Vec<_>>(), vec!["domain", "install_app"]);
        assert_eq!(all["install_app"], json!(true));
    }

    #[test]
    fn test_unresolved_in_declaration_order() {
        let invocation = Invocation::new().flag("install-app", false);
        let set = InputSet::resolve_from_cli("test.create", SPEC, &invocation);

        assert_eq!(set.unresolved(), vec!["id", "domain", "cloud_account_id"]);
    }
}
