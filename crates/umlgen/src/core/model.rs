//! UML diagram model
//!
//! The wire shape of a class diagram as the diagram-storage service sends it.
//! JSON keys are camelCase; unknown keys (canvas positions, labels the
//! generator does not use) are ignored.

use serde::{Deserialize, Serialize};

/// Visibility modifier for class members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Protected,
    Package,
}

impl Visibility {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Visibility::Public),
            '-' => Some(Visibility::Private),
            '#' => Some(Visibility::Protected),
            '~' => Some(Visibility::Package),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Private => '-',
            Visibility::Protected => '#',
            Visibility::Package => '~',
        }
    }

    /// Java access modifier; package visibility has no keyword
    pub fn java_modifier(self) -> Option<&'static str> {
        match self {
            Visibility::Public => Some("public"),
            Visibility::Private => Some("private"),
            Visibility::Protected => Some("protected"),
            Visibility::Package => None,
        }
    }
}

/// One field of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmlAttribute {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Semantic type name, e.g. `string`, `int`, `Date`
    #[serde(rename = "type")]
    pub attr_type: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
}

impl UmlAttribute {
    pub fn new(name: impl Into<String>, attr_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            attr_type: attr_type.into(),
            visibility: Visibility::Private,
            is_static: false,
            is_primary_key: false,
            is_unique: false,
            is_nullable: None,
            default_value: None,
            column_name: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.is_nullable = Some(nullable);
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column_name = Some(column.into());
        self
    }

    /// Whether a column annotation carries anything beyond the field itself
    pub fn has_column_constraints(&self) -> bool {
        self.column_name.is_some() || self.is_unique || self.is_nullable.is_some()
    }
}

/// Method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UmlParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}

/// Method signature; carried through but not turned into code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmlMethod {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default = "void_type")]
    pub return_type: String,
    #[serde(default)]
    pub parameters: Vec<UmlParameter>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
}

fn void_type() -> String {
    "void".to_string()
}

/// A class in the diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmlClass {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<UmlAttribute>,
    #[serde(default)]
    pub methods: Vec<UmlMethod>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stereotype: Option<String>,
}

impl UmlClass {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: Vec::new(),
            methods: Vec::new(),
            is_abstract: false,
            is_interface: false,
            stereotype: None,
        }
    }

    pub fn with_attribute(mut self, attribute: UmlAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = Some(stereotype.into());
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn interface(mut self) -> Self {
        self.is_interface = true;
        self
    }

    /// Whether the stereotype marks an association class, with or without guillemets
    pub fn has_association_stereotype(&self) -> bool {
        self.stereotype.as_deref().is_some_and(|s| {
            s.trim()
                .trim_start_matches("<<")
                .trim_end_matches(">>")
                .trim_start_matches('«')
                .trim_end_matches('»')
                .trim()
                .eq_ignore_ascii_case("association")
        })
    }
}

/// Relation kind as drawn in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    Association,
    Aggregation,
    Composition,
    Inheritance,
    Realization,
    /// Editor marker for the dashed line to an association class
    AssociationClass,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Association => "association",
            RelationKind::Aggregation => "aggregation",
            RelationKind::Composition => "composition",
            RelationKind::Inheritance => "inheritance",
            RelationKind::Realization => "realization",
            RelationKind::AssociationClass => "associationClass",
        }
    }
}

/// Cardinality at both relation ends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multiplicity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl Multiplicity {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// `from` end, defaulting to `1`
    pub fn from_end(&self) -> &str {
        self.from.as_deref().unwrap_or("1")
    }

    /// `to` end, defaulting to `1`
    pub fn to_end(&self) -> &str {
        self.to.as_deref().unwrap_or("1")
    }
}

/// A relation between two classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmlRelation {
    #[serde(default)]
    pub id: String,
    pub from_class_id: String,
    pub to_class_id: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<Multiplicity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_class_id: Option<String>,
}

impl UmlRelation {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: RelationKind,
    ) -> Self {
        Self {
            id: id.into(),
            from_class_id: from.into(),
            to_class_id: to.into(),
            kind,
            label: None,
            multiplicity: None,
            association_class_id: None,
        }
    }

    pub fn with_multiplicity(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.multiplicity = Some(Multiplicity::new(from, to));
        self
    }

    pub fn with_association_class(mut self, class_id: impl Into<String>) -> Self {
        self.association_class_id = Some(class_id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity.clone().unwrap_or_default()
    }
}

/// A complete class diagram
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub classes: Vec<UmlClass>,
    #[serde(default)]
    pub relations: Vec<UmlRelation>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: UmlClass) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_relation(mut self, relation: UmlRelation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }
}
