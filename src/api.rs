use crate::binder::{self, Action};
use crate::error::CliDiagnostic;
use crate::parser::Parser;
use crate::schema::OptionSchema;
use crate::serialization::{actions_to_value, tree_to_value, Value};
use crate::tree::SyntaxTree;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// The result of interpreting an argument string against a schema.
///
/// Carries the full syntax tree for node-by-node inspection, the ordered
/// action list for the caller to apply to its option store, and every
/// warning recorded on the way. Nothing in here is fatal.
pub struct Interpretation {
    pub tree: SyntaxTree,
    pub actions: Vec<Action>,
    pub diagnostics: Vec<CliDiagnostic>,
}

impl Serialize for Interpretation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl Interpretation {
    /// The inspection-facing shape of the interpretation: the argument list
    /// of the tree plus the bound actions.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("arguments".to_string(), tree_to_value(&self.tree));
        map.insert("actions".to_string(), actions_to_value(&self.actions));
        Value::Object(map)
    }

    /// Serializes the interpretation into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the interpretation into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

/// Interprets a raw argument string: lexes and parses it into a syntax
/// tree, then binds the tree against the schema.
///
/// This is the primary entry point. It never fails: malformed input turns
/// into warnings, and the tree stays best-effort valid. Each call is a pure
/// function of its inputs; no state survives between calls.
pub fn interpret(input: &str, schema: &OptionSchema) -> Interpretation {
    let parsed = Parser::new(input).parse();
    let bound = binder::bind(&parsed.tree, schema);

    let diagnostics = parsed
        .diagnostics
        .into_iter()
        .map(CliDiagnostic::from)
        .chain(bound.diagnostics.into_iter().map(CliDiagnostic::from))
        .collect();

    Interpretation {
        tree: parsed.tree,
        actions: bound.actions,
        diagnostics,
    }
}

/// Interprets a process argument vector by joining it with spaces.
///
/// The core imposes no requirement on the origin of its input; this is the
/// conventional adapter for `std::env::args().skip(1)`.
pub fn interpret_argv<I, S>(args: I, schema: &OptionSchema) -> Interpretation
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = args
        .into_iter()
        .map(|arg| arg.as_ref().to_string())
        .collect::<Vec<String>>()
        .join(" ");
    interpret(&joined, schema)
}
