//! Field declarations for configuration schemas.

use serde_json::Value;

use crate::Schema;

/// The shape a field's value must have.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    /// Whole number (JSON integers only, `1.0` is rejected).
    Integer,
    Number,
    Boolean,
    /// Homogeneous array; every element must match the item kind.
    Array(Box<FieldKind>),
    /// Nested object described by its own schema.
    Object(Schema),
    /// Object with arbitrary keys whose values share one kind.
    Map(Box<FieldKind>),
    /// Any JSON value, including null.
    Any,
}

impl FieldKind {
    /// Short name used in diagnostics and schema descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Map(_) => "map",
            Self::Any => "any",
        }
    }

    /// Shallow type check (does not descend into arrays or objects).
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array(_) => value.is_array(),
            Self::Object(_) | Self::Map(_) => value.is_object(),
            Self::Any => true,
        }
    }
}

/// Extra constraint on a field value, checked after the type matches.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Inclusive numeric bounds.
    Range { min: Option<f64>, max: Option<f64> },
    /// String must be one of the listed values.
    OneOf(Vec<String>),
    /// String must match the regular expression (regex-lite syntax).
    Pattern(String),
    /// Minimum length for strings (chars) and arrays (elements).
    MinLength(usize),
    /// Rules applied to every element of an array.
    Items(Vec<Rule>),
}

/// A single field declaration.
#[derive(Debug, Clone)]
pub struct Field {
    pub kind: FieldKind,
    /// Whether absence (with no default) is a validation issue
    pub required: bool,
    /// Value used when the field is missing or null
    pub default: Option<Value>,
    pub rules: Vec<Rule>,
    pub description: Option<String>,
}

impl Field {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            default: None,
            rules: Vec::new(),
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn array(item: FieldKind) -> Self {
        Self::new(FieldKind::Array(Box::new(item)))
    }

    pub fn object(schema: Schema) -> Self {
        Self::new(FieldKind::Object(schema))
    }

    pub fn map(value: FieldKind) -> Self {
        Self::new(FieldKind::Map(Box::new(value)))
    }

    pub fn any() -> Self {
        Self::new(FieldKind::Any)
    }

    /// Set the default used when the field is missing.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the field as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn range(mut self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        self.rules.push(Rule::Range {
            min: Some(min.into()),
            max: Some(max.into()),
        });
        self
    }

    pub fn min(mut self, min: impl Into<f64>) -> Self {
        self.rules.push(Rule::Range {
            min: Some(min.into()),
            max: None,
        });
        self
    }

    pub fn one_of(mut self, allowed: &[&str]) -> Self {
        self.rules
            .push(Rule::OneOf(allowed.iter().map(|s| s.to_string()).collect()));
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.rules.push(Rule::Pattern(pattern.into()));
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.rules.push(Rule::MinLength(min));
        self
    }

    /// Bound every array element to `[min, max]`.
    pub fn items_range(mut self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        self.rules.push(Rule::Items(vec![Rule::Range {
            min: Some(min.into()),
            max: Some(max.into()),
        }]));
        self
    }

    pub fn items_min(mut self, min: impl Into<f64>) -> Self {
        self.rules.push(Rule::Items(vec![Rule::Range {
            min: Some(min.into()),
            max: None,
        }]));
        self
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}
