use crate::error::DecodeError;
use serde::Serialize;
use std::collections::HashMap;

/// Compile-time-checked identity of an option. Every option the binder can
/// assign is listed here; the schema and the option store are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OptionId {
    Help,
    Version,
    Entrypoint,
    GraphMaxDepth,
    IgnoreFiles,
}

/// Whether a name is registered for single-dash (`-h`) or double-dash
/// (`--help`) use. A name only matches at its registered arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashArity {
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    String,
    Boolean,
    Number,
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    String(String),
    Boolean(bool),
    Number(i64),
}

impl OptionValue {
    pub fn type_of(&self) -> OptionType {
        match self {
            OptionValue::String(_) => OptionType::String,
            OptionValue::Boolean(_) => OptionType::Boolean,
            OptionValue::Number(_) => OptionType::Number,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

pub type DecodeFn = fn(&str) -> Result<OptionValue, DecodeError>;
pub type ValidateFn = fn(&OptionValue) -> bool;

/// One entry of the option schema: everything the binder needs to turn a
/// parsed argument into a typed assignment.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub id: OptionId,
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub option_type: OptionType,
    pub default_value: OptionValue,
    pub single_dash_names: &'static [&'static str],
    pub double_dash_names: &'static [&'static str],
    pub decode: DecodeFn,
    pub validate: ValidateFn,
}

/// The full option table, built once at startup and read-only thereafter.
///
/// The schema is an explicit value passed by reference into the binder;
/// there is no ambient registration state, and shared references are safe
/// across concurrent parses.
#[derive(Debug, Clone)]
pub struct OptionSchema {
    specs: Vec<OptionSpec>,
    by_id: HashMap<OptionId, usize>,
    single_names: HashMap<&'static str, OptionId>,
    double_names: HashMap<&'static str, OptionId>,
}

impl OptionSchema {
    pub fn new(specs: Vec<OptionSpec>) -> Self {
        let mut by_id = HashMap::new();
        let mut single_names = HashMap::new();
        let mut double_names = HashMap::new();

        for (index, spec) in specs.iter().enumerate() {
            by_id.insert(spec.id, index);
            for &name in spec.single_dash_names {
                single_names.insert(name, spec.id);
            }
            for &name in spec.double_dash_names {
                double_names.insert(name, spec.id);
            }
        }

        Self {
            specs,
            by_id,
            single_names,
            double_names,
        }
    }

    /// Resolves a flag name at the given dash arity. A name registered only
    /// at the other arity does not match.
    pub fn lookup(&self, name: &str, arity: DashArity) -> Option<&OptionSpec> {
        let table = match arity {
            DashArity::Single => &self.single_names,
            DashArity::Double => &self.double_names,
        };
        table.get(name).and_then(|&id| self.spec(id))
    }

    pub fn spec(&self, id: OptionId) -> Option<&OptionSpec> {
        self.by_id.get(&id).map(|&index| &self.specs[index])
    }

    pub fn default_for(&self, id: OptionId) -> Option<&OptionValue> {
        self.spec(id).map(|spec| &spec.default_value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.iter()
    }

    pub fn required_ids(&self) -> impl Iterator<Item = OptionId> + '_ {
        self.specs
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.id)
    }

    /// The program's built-in option table.
    pub fn standard() -> Self {
        Self::new(vec![
            OptionSpec {
                id: OptionId::Help,
                name: "help",
                description: "Show this help message.",
                required: false,
                option_type: OptionType::Boolean,
                default_value: OptionValue::Boolean(false),
                single_dash_names: &["h"],
                double_dash_names: &["help"],
                decode: decode_boolean,
                validate: always_valid,
            },
            OptionSpec {
                id: OptionId::Version,
                name: "version",
                description: "Show the version of the import map generator.",
                required: false,
                option_type: OptionType::Boolean,
                default_value: OptionValue::Boolean(false),
                single_dash_names: &["v"],
                double_dash_names: &["version"],
                decode: decode_boolean,
                validate: always_valid,
            },
            OptionSpec {
                id: OptionId::Entrypoint,
                name: "entrypoint",
                description: "The entrypoint to generate an import map from.",
                required: true,
                option_type: OptionType::String,
                default_value: OptionValue::String(String::new()),
                single_dash_names: &[],
                double_dash_names: &["entrypoint"],
                decode: decode_string,
                validate: non_empty_string,
            },
            OptionSpec {
                id: OptionId::GraphMaxDepth,
                name: "graph-max-depth",
                description: "The maximum depth of the graph to generate.",
                required: false,
                option_type: OptionType::Number,
                default_value: OptionValue::Number(1000),
                single_dash_names: &[],
                double_dash_names: &["graph-max-depth", "max-depth"],
                decode: decode_number,
                validate: non_negative_number,
            },
            OptionSpec {
                id: OptionId::IgnoreFiles,
                name: "ignore-files",
                description: "A comma-separated list of globs to ignore when matched.",
                required: false,
                option_type: OptionType::String,
                default_value: OptionValue::String(String::new()),
                single_dash_names: &[],
                double_dash_names: &["ignore-files", "ignore"],
                decode: decode_string,
                validate: always_valid,
            },
        ])
    }
}

fn decode_string(raw: &str) -> Result<OptionValue, DecodeError> {
    Ok(OptionValue::String(raw.to_string()))
}

fn decode_boolean(raw: &str) -> Result<OptionValue, DecodeError> {
    match raw {
        "true" => Ok(OptionValue::Boolean(true)),
        "false" => Ok(OptionValue::Boolean(false)),
        _ => Err(DecodeError::InvalidBoolean {
            raw: raw.to_string(),
        }),
    }
}

fn decode_number(raw: &str) -> Result<OptionValue, DecodeError> {
    raw.parse::<i64>()
        .map(OptionValue::Number)
        .map_err(|_| DecodeError::InvalidNumber {
            raw: raw.to_string(),
        })
}

fn always_valid(_value: &OptionValue) -> bool {
    true
}

fn non_empty_string(value: &OptionValue) -> bool {
    value.as_str().is_some_and(|s| !s.is_empty())
}

fn non_negative_number(value: &OptionValue) -> bool {
    value.as_number().is_some_and(|n| n >= 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_respects_dash_arity() {
        let schema = OptionSchema::standard();
        assert_eq!(
            schema.lookup("help", DashArity::Double).map(|s| s.id),
            Some(OptionId::Help)
        );
        assert_eq!(
            schema.lookup("h", DashArity::Single).map(|s| s.id),
            Some(OptionId::Help)
        );
        // "help" is a double-dash name only; "-help" must not match.
        assert!(schema.lookup("help", DashArity::Single).is_none());
        assert!(schema.lookup("h", DashArity::Double).is_none());
    }

    #[test]
    fn test_alias_names_resolve_to_same_option() {
        let schema = OptionSchema::standard();
        assert_eq!(
            schema.lookup("max-depth", DashArity::Double).map(|s| s.id),
            Some(OptionId::GraphMaxDepth)
        );
        assert_eq!(
            schema.lookup("ignore", DashArity::Double).map(|s| s.id),
            Some(OptionId::IgnoreFiles)
        );
    }

    #[test]
    fn test_boolean_decoder_is_strict() {
        assert_eq!(decode_boolean("true"), Ok(OptionValue::Boolean(true)));
        assert_eq!(decode_boolean("false"), Ok(OptionValue::Boolean(false)));
        assert!(decode_boolean("yes").is_err());
        assert!(decode_boolean("True").is_err());
    }

    #[test]
    fn test_number_decoder_rejects_trailing_garbage() {
        assert_eq!(decode_number("42"), Ok(OptionValue::Number(42)));
        assert!(decode_number("12abc").is_err());
        assert!(decode_number("").is_err());
    }

    #[test]
    fn test_defaults_and_required() {
        let schema = OptionSchema::standard();
        assert_eq!(
            schema.default_for(OptionId::GraphMaxDepth),
            Some(&OptionValue::Number(1000))
        );
        let required: Vec<OptionId> = schema.required_ids().collect();
        assert_eq!(required, vec![OptionId::Entrypoint]);
    }
}
