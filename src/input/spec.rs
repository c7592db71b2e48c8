use serde_json::Value;

/// Coercion applied when an input is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFilter {
    Int,
    String,
    Bool,
    Passthrough,
}

impl ValueFilter {
    /// Coerce `value`; null stays null and values that cannot be coerced become null
    pub fn apply(self, value: &Value) -> Value {
        if value.is_null() {
            return Value::Null;
        }

        match self {
            ValueFilter::Passthrough => value.clone(),
            ValueFilter::Int => to_int(value).map_or(Value::Null, Value::from),
            ValueFilter::String => to_string(value).map_or(Value::Null, Value::from),
            ValueFilter::Bool => to_bool(value).map_or(Value::Null, Value::from),
        }
    }
}

fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok()
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// One declared input of a command
#[derive(Debug, Clone, Copy)]
pub struct InputDef {
    pub name: &'static str,
    pub filter: ValueFilter,
}

pub const fn input(name: &'static str, filter: ValueFilter) -> InputDef {
    InputDef { name, filter }
}

/// Static, ordered declaration of a command's inputs
pub type InputSpec = &'static [InputDef];
