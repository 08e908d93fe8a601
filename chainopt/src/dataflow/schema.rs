use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Coarse value type inferred from a sample value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Sample was null; the real type is unknown
    Null,
}

impl TypeTag {
    pub fn of(value: &JsonValue) -> Self {
        match value {
            JsonValue::String(_) => TypeTag::String,
            JsonValue::Number(_) => TypeTag::Number,
            JsonValue::Bool(_) => TypeTag::Boolean,
            JsonValue::Array(_) => TypeTag::Array,
            JsonValue::Object(_) => TypeTag::Object,
            JsonValue::Null => TypeTag::Null,
        }
    }

    /// Null stands for "unknown" and is compatible with everything.
    pub fn is_compatible_with(&self, other: &TypeTag) -> bool {
        self == other || *self == TypeTag::Null || *other == TypeTag::Null
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
            TypeTag::Null => "null",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat description of a step's input or output shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, TypeTag>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from the top-level keys of a JSON sample object.
    /// Anything other than an object yields an empty schema.
    pub fn from_sample(sample: &JsonValue) -> Self {
        match sample {
            JsonValue::Object(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), TypeTag::of(v)))
                .collect(),
            _ => Self::default(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, tag: TypeTag) -> Self {
        self.fields.insert(name.into(), tag);
        self
    }

    pub fn get(&self, name: &str) -> Option<TypeTag> {
        self.fields.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeTag)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, TypeTag)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, TypeTag)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
