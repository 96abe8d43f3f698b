//! Configuration checks against a [`Schema`]

use regex::Regex;
use serde_json::{Map, Value};

use super::{Attribute, AttributeType, Schema, Validator};
use crate::diagnostics::Diagnostic;

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

impl Schema {
    /// Check a configuration object, one error diagnostic per problem.
    ///
    /// `null` counts as absent. Attribute paths index blocks and
    /// collections by position, e.g. `filter.0.mode`.
    pub fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        match config {
            Value::Object(object) => self.validate_object(object, "", &mut diagnostics),
            Value::Null => self.validate_object(&Map::new(), "", &mut diagnostics),
            other => diagnostics.push(Diagnostic::error(format!(
                "Configuration must be an object, got {}",
                type_name(other)
            ))),
        }
        diagnostics
    }

    fn validate_object(
        &self,
        object: &Map<String, Value>,
        prefix: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for name in object.keys() {
            if !self.attributes.contains_key(name) {
                diagnostics.push(
                    Diagnostic::error(format!("Unsupported argument \"{name}\""))
                        .at(join(prefix, name)),
                );
            }
        }

        for (name, attribute) in &self.attributes {
            let path = join(prefix, name);
            match object.get(name).filter(|value| !value.is_null()) {
                None if attribute.required => diagnostics.push(
                    Diagnostic::error(format!("Missing required argument \"{name}\"")).at(path),
                ),
                None => {}
                Some(_) if attribute.is_computed_only() => diagnostics.push(
                    Diagnostic::error(format!("Value for unconfigurable attribute \"{name}\""))
                        .with_detail("This attribute is computed by the provider")
                        .at(path),
                ),
                Some(value) => {
                    validate_value(&attribute.kind, attribute, value, &path, diagnostics);
                }
            }
        }
    }
}

fn validate_value(
    kind: &AttributeType,
    attribute: &Attribute,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mismatch = |expected: &str| {
        Diagnostic::error(format!(
            "Incorrect attribute value type: expected {expected}, got {}",
            type_name(value)
        ))
        .at(path)
    };

    match kind {
        AttributeType::String => match value.as_str() {
            Some(s) => check_validators(&attribute.validators, s, path, diagnostics),
            None => diagnostics.push(mismatch("string")),
        },
        AttributeType::Int => {
            if !(value.is_i64() || value.is_u64()) {
                diagnostics.push(mismatch("number"));
            }
        }
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(mismatch("bool"));
            }
        }
        AttributeType::List { element } | AttributeType::Set { element } => {
            let Some(items) = value.as_array() else {
                diagnostics.push(mismatch("list"));
                return;
            };
            for (index, item) in items.iter().enumerate() {
                let item_path = join(path, &index.to_string());
                validate_value(element, attribute, item, &item_path, diagnostics);
                if matches!(kind, AttributeType::Set { .. }) && items[..index].contains(item) {
                    diagnostics.push(
                        Diagnostic::error(format!("Duplicate set element {item}")).at(item_path),
                    );
                }
            }
        }
        AttributeType::Block { block, max_items } => {
            let Some(items) = value.as_array() else {
                diagnostics.push(mismatch("list of objects"));
                return;
            };
            if let Some(max) = max_items
                && items.len() > *max
            {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Too many \"{}\" blocks: at most {max} allowed, got {}",
                        path.rsplit('.').next().unwrap_or(path),
                        items.len()
                    ))
                    .at(path),
                );
            }
            for (index, item) in items.iter().enumerate() {
                let item_path = join(path, &index.to_string());
                match item {
                    Value::Object(object) => block.validate_object(object, &item_path, diagnostics),
                    // An empty block entry
                    Value::Null => block.validate_object(&Map::new(), &item_path, diagnostics),
                    other => diagnostics.push(
                        Diagnostic::error(format!(
                            "Incorrect block entry: expected object, got {}",
                            type_name(other)
                        ))
                        .at(item_path),
                    ),
                }
            }
        }
    }
}

fn check_validators(
    validators: &[Validator],
    value: &str,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for validator in validators {
        match validator {
            Validator::OneOf(allowed) => {
                if !allowed.iter().any(|candidate| candidate == value) {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "Expected one of [{}], got \"{value}\"",
                            allowed.join(", ")
                        ))
                        .at(path),
                    );
                }
            }
            Validator::Matches(pattern) => match Regex::new(pattern) {
                Ok(re) if re.is_match(value) => {}
                Ok(_) => diagnostics.push(
                    Diagnostic::error(format!("\"{value}\" does not match /{pattern}/")).at(path),
                ),
                Err(e) => diagnostics.push(
                    Diagnostic::error(format!("Invalid validator pattern /{pattern}/"))
                        .with_detail(e.to_string())
                        .at(path),
                ),
            },
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
