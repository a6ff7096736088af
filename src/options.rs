use crate::binder::Action;
use crate::schema::{OptionId, OptionSchema, OptionValue};
use std::collections::{HashMap, HashSet};

/// The caller-level option store: every option seeded with its schema
/// default, updated by applying bound actions in sequence.
///
/// Values are reached through typed accessors keyed by [`OptionId`]; there
/// is no stringly-typed or reflective access. Detecting that a required
/// option never received a value happens here, after binding, not inside
/// the parse/bind core.
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    values: HashMap<OptionId, OptionValue>,
    explicitly_set: HashSet<OptionId>,
}

impl ProgramOptions {
    pub fn new(schema: &OptionSchema) -> Self {
        let values = schema
            .iter()
            .map(|spec| (spec.id, spec.default_value.clone()))
            .collect();
        Self {
            values,
            explicitly_set: HashSet::new(),
        }
    }

    /// Applies actions in order; a later action for the same option
    /// overwrites an earlier one (last-write-wins).
    pub fn apply(&mut self, actions: &[Action]) {
        for action in actions {
            self.values.insert(action.id, action.value.clone());
            self.explicitly_set.insert(action.id);
        }
    }

    pub fn get(&self, id: OptionId) -> Option<&OptionValue> {
        self.values.get(&id)
    }

    /// Whether the option ever received an explicit, non-default value.
    pub fn was_set(&self, id: OptionId) -> bool {
        self.explicitly_set.contains(&id)
    }

    /// Required options that never received an explicit value.
    pub fn missing_required(&self, schema: &OptionSchema) -> Vec<OptionId> {
        schema
            .required_ids()
            .filter(|&id| !self.was_set(id))
            .collect()
    }

    pub fn print_help_and_exit(&self) -> bool {
        self.get(OptionId::Help)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false)
    }

    pub fn print_version_and_exit(&self) -> bool {
        self.get(OptionId::Version)
            .and_then(OptionValue::as_bool)
            .unwrap_or(false)
    }

    /// The entrypoint, once one has been given. Required; has no usable
    /// default.
    pub fn entrypoint(&self) -> Option<&str> {
        if !self.was_set(OptionId::Entrypoint) {
            return None;
        }
        self.get(OptionId::Entrypoint)
            .and_then(OptionValue::as_str)
    }

    pub fn graph_max_depth(&self) -> i64 {
        self.get(OptionId::GraphMaxDepth)
            .and_then(OptionValue::as_number)
            .unwrap_or(1000)
    }

    pub fn ignore_files(&self) -> &str {
        self.get(OptionId::IgnoreFiles)
            .and_then(OptionValue::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> OptionSchema {
        OptionSchema::standard()
    }

    #[test]
    fn test_defaults_before_any_action() {
        let options = ProgramOptions::new(&schema());
        assert!(!options.print_help_and_exit());
        assert!(!options.print_version_and_exit());
        assert_eq!(options.entrypoint(), None);
        assert_eq!(options.graph_max_depth(), 1000);
        assert_eq!(options.ignore_files(), "");
    }

    #[test]
    fn test_apply_is_last_write_wins() {
        let mut options = ProgramOptions::new(&schema());
        options.apply(&[
            Action {
                id: OptionId::GraphMaxDepth,
                value: OptionValue::Number(5),
            },
            Action {
                id: OptionId::GraphMaxDepth,
                value: OptionValue::Number(7),
            },
        ]);
        assert_eq!(options.graph_max_depth(), 7);
    }

    #[test]
    fn test_missing_required_reports_entrypoint() {
        let schema = schema();
        let mut options = ProgramOptions::new(&schema);
        assert_eq!(options.missing_required(&schema), vec![OptionId::Entrypoint]);

        options.apply(&[Action {
            id: OptionId::Entrypoint,
            value: OptionValue::String("main".to_string()),
        }]);
        assert!(options.missing_required(&schema).is_empty());
        assert_eq!(options.entrypoint(), Some("main"));
    }
}
