//! Relation metadata produced by the analyzer
//!
//! One [`RelationField`] list per class id. The map is rebuilt from the
//! diagram on every request and never cached.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::Multiplicity;

/// JPA-style cardinality of one relation end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "OneToOne",
            Cardinality::OneToMany => "OneToMany",
            Cardinality::ManyToOne => "ManyToOne",
            Cardinality::ManyToMany => "ManyToMany",
        }
    }

    /// Whether this end holds a collection
    pub fn is_collection(self) -> bool {
        matches!(self, Cardinality::OneToMany | Cardinality::ManyToMany)
    }

    /// Whether this end holds a single object
    pub fn is_to_one(self) -> bool {
        matches!(self, Cardinality::OneToOne | Cardinality::ManyToOne)
    }
}

/// Cardinality plus the composition tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationType {
    pub cardinality: Cardinality,
    /// Owner of the lifecycle; cascades delete and removes orphans
    pub composition: bool,
}

impl RelationType {
    pub fn plain(cardinality: Cardinality) -> Self {
        Self {
            cardinality,
            composition: false,
        }
    }

    pub fn composed(cardinality: Cardinality) -> Self {
        Self {
            cardinality,
            composition: true,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.composition {
            write!(f, "{}-Composition", self.cardinality.as_str())
        } else {
            write!(f, "{}", self.cardinality.as_str())
        }
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, composition) = match s.strip_suffix("-Composition") {
            Some(base) => (base, true),
            None => (s, false),
        };
        let cardinality = match base {
            "OneToOne" => Cardinality::OneToOne,
            "OneToMany" => Cardinality::OneToMany,
            "ManyToOne" => Cardinality::ManyToOne,
            "ManyToMany" => Cardinality::ManyToMany,
            _ => return Err(format!("Unknown relation type: {}", s)),
        };
        Ok(Self {
            cardinality,
            composition,
        })
    }
}

impl Serialize for RelationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One generated relation field on a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationField {
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    pub target_class_id: String,
    pub target_class_name: String,
    pub field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_by: Option<String>,
    pub is_owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<Multiplicity>,
}

impl RelationField {
    pub fn cardinality(&self) -> Cardinality {
        self.relation_type.cardinality
    }

    pub fn is_composition(&self) -> bool {
        self.relation_type.composition
    }

    pub fn is_collection(&self) -> bool {
        self.cardinality().is_collection()
    }

    /// Owning to-one side; the only kind that carries a foreign key id in DTOs
    pub fn carries_foreign_key(&self) -> bool {
        self.is_owner && self.cardinality().is_to_one()
    }

    /// `<fieldName>Id`
    pub fn foreign_key_name(&self) -> String {
        format!("{}Id", self.field_name)
    }
}

/// Analyzer output keyed by class id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RelationMetadata {
    by_class: BTreeMap<String, Vec<RelationField>>,
}

impl RelationMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class with an empty field list if it is not present yet
    pub fn ensure_class(&mut self, class_id: &str) {
        self.by_class.entry(class_id.to_string()).or_default();
    }

    pub fn push(&mut self, class_id: &str, field: RelationField) {
        self.by_class
            .entry(class_id.to_string())
            .or_default()
            .push(field);
    }

    /// Field names already taken on a class
    pub fn field_names<'a>(&'a self, class_id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields(class_id).iter().map(|f| f.field_name.as_str())
    }

    pub fn fields(&self, class_id: &str) -> &[RelationField] {
        self.by_class
            .get(class_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_class(&self, class_id: &str) -> bool {
        self.by_class.contains_key(class_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RelationField])> {
        self.by_class
            .iter()
            .map(|(id, fields)| (id.as_str(), fields.as_slice()))
    }

    pub fn class_count(&self) -> usize {
        self.by_class.len()
    }

    pub fn field_count(&self) -> usize {
        self.by_class.values().map(Vec::len).sum()
    }
}
