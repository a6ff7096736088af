use crate::error::BindDiagnostic;
use crate::schema::{DashArity, OptionId, OptionSchema, OptionType, OptionValue};
use crate::tree::SyntaxTree;
use serde::Serialize;

/// One typed assignment produced by binding: "set this option to this value".
/// Actions are applied by the caller in sequence order, so a later action
/// for the same option overwrites an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub id: OptionId,
    pub value: OptionValue,
}

/// The result of resolving a syntax tree against an option schema.
#[derive(Debug)]
pub struct BindOutcome {
    pub actions: Vec<Action>,
    pub diagnostics: Vec<BindDiagnostic>,
}

/// Resolves each argument of the tree against the schema, in tree order.
///
/// Binding is pure and idempotent: the tree and schema are read-only, and
/// binding the same tree twice yields identical outcomes. Every anomaly is
/// a warning that skips the argument; binding itself cannot fail.
pub fn bind(tree: &SyntaxTree, schema: &OptionSchema) -> BindOutcome {
    let mut actions = Vec::new();
    let mut diagnostics = Vec::new();

    for argument in tree.arguments() {
        let name = argument.flag_text();
        let arity = if argument.is_single_dash() {
            DashArity::Single
        } else {
            DashArity::Double
        };

        let Some(spec) = schema.lookup(name, arity) else {
            report(
                &mut diagnostics,
                BindDiagnostic::UnknownArgument {
                    name: name.to_string(),
                },
            );
            continue;
        };

        let raw_value = argument.value_text();

        let decoded = match (spec.option_type, raw_value) {
            // A bare boolean flag means "turn it on".
            (OptionType::Boolean, None) => Ok(OptionValue::Boolean(true)),
            (_, Some(raw)) => (spec.decode)(raw),
            (OptionType::String | OptionType::Number, None) => {
                report(
                    &mut diagnostics,
                    BindDiagnostic::MissingValue {
                        name: name.to_string(),
                    },
                );
                continue;
            }
        };

        let value = match decoded {
            Ok(value) => value,
            Err(_) => {
                report(
                    &mut diagnostics,
                    BindDiagnostic::InvalidValue {
                        name: name.to_string(),
                        value: raw_value.unwrap_or_default().to_string(),
                    },
                );
                continue;
            }
        };

        if !(spec.validate)(&value) {
            report(
                &mut diagnostics,
                BindDiagnostic::InvalidValue {
                    name: name.to_string(),
                    value: raw_value.unwrap_or("true").to_string(),
                },
            );
            continue;
        }

        // Explicit-override-only policy: a value equal to the schema default
        // is a silent no-op.
        if value == spec.default_value {
            continue;
        }

        actions.push(Action {
            id: spec.id,
            value,
        });
    }

    BindOutcome {
        actions,
        diagnostics,
    }
}

fn report(diagnostics: &mut Vec<BindDiagnostic>, diagnostic: BindDiagnostic) {
    log::warn!("{diagnostic}");
    diagnostics.push(diagnostic);
}
