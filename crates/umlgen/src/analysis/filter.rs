//! Attribute filter
//!
//! Drops declared attributes that would duplicate the primary key, look like
//! hand-written foreign keys, or shadow a generated relation field.

use serde::Serialize;

use super::metadata::RelationField;
use crate::core::UmlAttribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterReason {
    /// Named exactly `id`
    ReservedId,
    /// `<class>Id`, `<class>_id` or `id_<class>`
    ClassKeyPattern,
    /// Any other foreign-key-looking name
    ForeignKeyPattern,
    /// Same name as a relation field on the class
    ShadowsRelation,
}

impl FilterReason {
    pub fn describe(self) -> &'static str {
        match self {
            FilterReason::ReservedId => "reserved for the primary key",
            FilterReason::ClassKeyPattern => "looks like the class's own key",
            FilterReason::ForeignKeyPattern => "looks like a foreign key",
            FilterReason::ShadowsRelation => "shadows a relation field",
        }
    }
}

/// Why `name` must not become a scalar field of `class_name`, if at all
///
/// Generic foreign-key detection is camel-case aware: `productId`,
/// `idProduct`, `product_id` and `id_product` match, while ordinary words
/// that merely end or start with "id" (`paid`, `valid`, `identifier`) do not.
pub fn exclusion_reason(
    name: &str,
    class_name: &str,
    relations: &[RelationField],
) -> Option<FilterReason> {
    let lower = name.to_lowercase();
    let class_lower = class_name.to_lowercase();

    if lower == "id" {
        return Some(FilterReason::ReservedId);
    }
    if lower == format!("{}id", class_lower)
        || lower == format!("{}_id", class_lower)
        || lower == format!("id_{}", class_lower)
    {
        return Some(FilterReason::ClassKeyPattern);
    }
    if looks_like_foreign_key(name) {
        return Some(FilterReason::ForeignKeyPattern);
    }
    if relations
        .iter()
        .any(|r| r.field_name.to_lowercase() == lower)
    {
        return Some(FilterReason::ShadowsRelation);
    }
    None
}

fn looks_like_foreign_key(name: &str) -> bool {
    let lower = name.to_lowercase();
    if lower.len() > 3 && (lower.ends_with("_id") || lower.starts_with("id_")) {
        return true;
    }
    let camel_suffix = name
        .strip_suffix("Id")
        .or_else(|| name.strip_suffix("ID"))
        .is_some_and(|stem| !stem.is_empty() && !stem.ends_with('_'));
    let camel_prefix = name
        .strip_prefix("id")
        .or_else(|| name.strip_prefix("Id"))
        .or_else(|| name.strip_prefix("ID"))
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_uppercase);
    camel_suffix || camel_prefix
}

/// Result of filtering one class's attributes
#[derive(Debug, Clone)]
pub struct FilteredAttributes<'a> {
    pub kept: Vec<&'a UmlAttribute>,
    pub dropped: Vec<(&'a UmlAttribute, FilterReason)>,
}

/// Split `attributes` into kept scalars and dropped key-like names
pub fn filter_attributes<'a, I>(
    attributes: I,
    class_name: &str,
    relations: &[RelationField],
) -> FilteredAttributes<'a>
where
    I: IntoIterator<Item = &'a UmlAttribute>,
{
    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    for attribute in attributes {
        match exclusion_reason(&attribute.name, class_name, relations) {
            Some(reason) => dropped.push((attribute, reason)),
            None => kept.push(attribute),
        }
    }
    FilteredAttributes { kept, dropped }
}
