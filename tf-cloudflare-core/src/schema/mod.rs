//! Attribute schemas for resources, data sources and the provider block

mod validate;

use std::collections::BTreeMap;

use serde::Serialize;

/// Value type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
    Bool,
    List {
        element: Box<AttributeType>,
    },
    /// Unordered, no duplicates
    Set {
        element: Box<AttributeType>,
    },
    /// Nested block, written as a list of objects
    Block {
        block: Schema,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_items: Option<usize>,
    },
}

/// Constraint checked on string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Validator {
    OneOf(Vec<String>),
    Matches(String),
}

impl Validator {
    pub fn one_of(values: &[&str]) -> Self {
        Self::OneOf(values.iter().map(ToString::to_string).collect())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One named field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(flatten)]
    pub kind: AttributeType,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub computed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub force_new: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    fn new(kind: AttributeType) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            description: None,
            validators: Vec::new(),
        }
    }

    pub fn required(kind: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::new(kind)
        }
    }

    pub fn optional(kind: AttributeType) -> Self {
        Self {
            optional: true,
            ..Self::new(kind)
        }
    }

    pub fn computed(kind: AttributeType) -> Self {
        Self {
            computed: true,
            ..Self::new(kind)
        }
    }

    pub fn required_string() -> Self {
        Self::required(AttributeType::String)
    }

    pub fn optional_string() -> Self {
        Self::optional(AttributeType::String)
    }

    pub fn computed_string() -> Self {
        Self::computed(AttributeType::String)
    }

    pub fn computed_int() -> Self {
        Self::computed(AttributeType::Int)
    }

    pub fn optional_string_set() -> Self {
        Self::optional(AttributeType::Set {
            element: Box::new(AttributeType::String),
        })
    }

    /// Optional nested block.
    pub fn block(block: Schema) -> Self {
        Self::optional(AttributeType::Block {
            block,
            max_items: None,
        })
    }

    /// Computed list of nested objects.
    pub fn computed_block(block: Schema) -> Self {
        Self::computed(AttributeType::Block {
            block,
            max_items: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Cap the number of block entries. No effect on other types.
    #[must_use]
    pub fn max_items(mut self, max: usize) -> Self {
        if let AttributeType::Block { max_items, .. } = &mut self.kind {
            *max_items = Some(max);
        }
        self
    }

    /// Set only by the provider, never by configuration.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }
}

/// Field-name-to-constraint mapping of one resource, data source or block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Attributes whose change forces the object to be recreated.
    pub fn force_new_attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.force_new)
            .map(|(name, _)| name.as_str())
    }
}
