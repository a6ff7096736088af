use crate::binder::Action;
use crate::tree::{ArgumentRef, NodeFlags, SyntaxTree};
use serde::Serialize;
use std::collections::BTreeMap;

/// A generic serializable value, the inspection-facing shape of a parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Number(i64),
    Boolean(bool),
    Null,
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

pub(crate) fn tree_to_value(tree: &SyntaxTree) -> Value {
    Value::Array(tree.arguments().map(argument_to_value).collect())
}

fn argument_to_value(argument: ArgumentRef<'_>) -> Value {
    let mut dash = BTreeMap::new();
    dash.insert(
        "single_dash".to_string(),
        Value::Boolean(argument.is_single_dash()),
    );
    dash.insert(
        "double_dash".to_string(),
        Value::Boolean(argument.is_double_dash()),
    );
    if argument
        .dash()
        .flags
        .contains(NodeFlags::MORE_THAN_TWO_DASHES)
    {
        dash.insert("more_than_two_dashes".to_string(), Value::Boolean(true));
    }

    let mut map = BTreeMap::new();
    map.insert("dash".to_string(), Value::Object(dash));
    map.insert(
        "flag".to_string(),
        Value::String(argument.flag_text().to_string()),
    );
    map.insert(
        "value".to_string(),
        match argument.value_text() {
            Some(text) => Value::String(text.to_string()),
            None => Value::Null,
        },
    );
    if argument.flags().contains(NodeFlags::FORCE_CREATED) {
        map.insert("force_created".to_string(), Value::Boolean(true));
    }
    Value::Object(map)
}

pub(crate) fn actions_to_value(actions: &[Action]) -> Value {
    Value::Array(
        actions
            .iter()
            .map(|action| {
                let mut map = BTreeMap::new();
                map.insert(
                    "option".to_string(),
                    Value::String(format!("{:?}", action.id)),
                );
                map.insert(
                    "value".to_string(),
                    match &action.value {
                        crate::schema::OptionValue::String(s) => Value::String(s.clone()),
                        crate::schema::OptionValue::Boolean(b) => Value::Boolean(*b),
                        crate::schema::OptionValue::Number(n) => Value::Number(*n),
                    },
                );
                Value::Object(map)
            })
            .collect(),
    )
}
