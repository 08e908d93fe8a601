use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

use super::schema::{Schema, TypeTag};

/// A field present on both sides with differing types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConflict {
    pub field: String,
    pub source_type: TypeTag,
    pub target_type: TypeTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestedTransformation {
    /// Map source field `from` onto target field `to`
    Rename { from: String, to: String },
    /// Convert `field` from one type to another
    Cast {
        field: String,
        from: TypeTag,
        to: TypeTag,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaCompatibilityResult {
    pub is_compatible: bool,
    /// Target keys absent from the source
    pub missing_fields: Vec<String>,
    pub type_conflicts: Vec<TypeConflict>,
    pub suggested_transformations: Vec<SuggestedTransformation>,
    pub transformation_required: bool,
}

/// Compare two JSON samples; the source is the upstream step's output, the
/// target the downstream step's expected input.
pub fn check_data_flow_compatibility(
    source_sample: &JsonValue,
    target_sample: &JsonValue,
) -> SchemaCompatibilityResult {
    compare_schemas(
        &Schema::from_sample(source_sample),
        &Schema::from_sample(target_sample),
    )
}

pub fn compare_schemas(source: &Schema, target: &Schema) -> SchemaCompatibilityResult {
    let mut missing_fields = Vec::new();
    let mut type_conflicts = Vec::new();

    for (field, target_type) in target.iter() {
        match source.get(field) {
            None => missing_fields.push(field.to_string()),
            Some(source_type) if !source_type.is_compatible_with(&target_type) => {
                type_conflicts.push(TypeConflict {
                    field: field.to_string(),
                    source_type,
                    target_type,
                });
            }
            Some(_) => {}
        }
    }

    let mut suggested_transformations = Vec::new();
    let mut used_sources: BTreeSet<&str> = BTreeSet::new();
    for missing in &missing_fields {
        if let Some(from) = rename_candidate(source, target, missing, &used_sources) {
            used_sources.insert(from);
            suggested_transformations.push(SuggestedTransformation::Rename {
                from: from.to_string(),
                to: missing.clone(),
            });
        }
    }
    for conflict in &type_conflicts {
        suggested_transformations.push(SuggestedTransformation::Cast {
            field: conflict.field.clone(),
            from: conflict.source_type,
            to: conflict.target_type,
        });
    }

    let transformation_required = !missing_fields.is_empty() || !type_conflicts.is_empty();
    SchemaCompatibilityResult {
        is_compatible: !transformation_required,
        missing_fields,
        type_conflicts,
        suggested_transformations,
        transformation_required,
    }
}

/// Lower-case and drop separators so `userId`, `user_id` and `User-ID` compare equal.
fn normalize_field(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' ' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Closest source field whose normalized name contains, or is contained in,
/// the missing field's name. Fields the target already has are not moved.
fn rename_candidate<'a>(
    source: &'a Schema,
    target: &Schema,
    missing: &str,
    used: &BTreeSet<&str>,
) -> Option<&'a str> {
    let wanted = normalize_field(missing);
    if wanted.is_empty() {
        return None;
    }

    source
        .iter()
        .filter(|(name, _)| !target.contains(name) && !used.contains(name))
        .filter_map(|(name, _)| {
            let candidate = normalize_field(name);
            if candidate.is_empty() {
                return None;
            }
            if candidate.contains(&wanted) || wanted.contains(&candidate) {
                Some((candidate.len().abs_diff(wanted.len()), name))
            } else {
                None
            }
        })
        .min()
        .map(|(_, name)| name)
}
