//! Resolved per-class view shared by every emitter
//!
//! A [`ClassShape`] fixes, once per request, everything the server and the
//! client must agree on: the primary key and its type, the filtered scalar
//! attributes, the relation fields from the analyzer, and the foreign-key id
//! fields a DTO or client model carries. Emitters only read shapes, which is
//! what keeps `OrderDTO.customerId` and `Order.customerId` in step.

use std::collections::HashSet;

use tracing::{debug, span, Level};

use super::analyzer::analyze_indexed;
use super::filter::filter_attributes;
use super::metadata::{RelationField, RelationMetadata};
use crate::core::naming::{capitalize, lower_first, route_segment, to_snake_case};
use crate::core::{
    ClassKind, Diagnostic, DiagnosticKind, Diagnostics, Diagram, DiagramIndex, ProjectSettings,
    RelationKind, SemanticType, UmlAttribute, UmlClass,
};

/// Which artifacts a class receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMode {
    /// Full CRUD on both stacks
    Full,
    /// Abstract class: listing, lookup and delete, no construction
    ReadOnly,
    /// Interface: a type declaration only
    EntityOnly,
}

impl From<ClassKind> for ResourceMode {
    fn from(kind: ClassKind) -> Self {
        match kind {
            ClassKind::Plain | ClassKind::AssociationClass => ResourceMode::Full,
            ClassKind::Abstract => ResourceMode::ReadOnly,
            ClassKind::Interface => ResourceMode::EntityOnly,
        }
    }
}

impl ResourceMode {
    pub fn has_api(self) -> bool {
        !matches!(self, ResourceMode::EntityOnly)
    }

    pub fn can_write(self) -> bool {
        matches!(self, ResourceMode::Full)
    }
}

#[derive(Debug, Clone)]
pub struct PrimaryKey<'d> {
    pub name: String,
    pub semantic: SemanticType,
    /// Declaring attribute; `None` for the synthesized `Long id`
    pub attribute: Option<&'d UmlAttribute>,
    /// Declared on a superclass rather than on this class
    pub inherited: bool,
}

impl<'d> PrimaryKey<'d> {
    fn synthesized() -> Self {
        Self {
            name: "id".to_string(),
            semantic: SemanticType::default_key(),
            attribute: None,
            inherited: false,
        }
    }

    fn declared_on(class: &'d UmlClass) -> Self {
        class
            .attributes
            .iter()
            .find(|a| a.is_primary_key && !a.is_static)
            .map(|a| Self {
                name: a.name.clone(),
                semantic: SemanticType::parse(&a.attr_type),
                attribute: Some(a),
                inherited: false,
            })
            .unwrap_or_else(Self::synthesized)
    }

    pub fn is_synthesized(&self) -> bool {
        self.attribute.is_none()
    }

    /// Database-generated identity
    pub fn is_generated(&self) -> bool {
        self.semantic.is_integral()
    }

    pub fn java_type(&self) -> &str {
        self.semantic.java_type()
    }

    pub fn dart_type(&self) -> &str {
        self.semantic.dart_type()
    }

    pub fn getter(&self) -> String {
        format!("get{}", capitalize(&self.name))
    }

    pub fn setter(&self) -> String {
        format!("set{}", capitalize(&self.name))
    }
}

#[derive(Debug, Clone)]
pub struct ScalarField<'d> {
    pub attribute: &'d UmlAttribute,
    pub semantic: SemanticType,
    pub inherited: bool,
}

impl<'d> ScalarField<'d> {
    pub fn name(&self) -> &'d str {
        &self.attribute.name
    }

    pub fn is_static(&self) -> bool {
        self.attribute.is_static
    }

    pub fn getter(&self) -> String {
        format!("get{}", capitalize(self.name()))
    }

    pub fn setter(&self) -> String {
        format!("set{}", capitalize(self.name()))
    }
}

/// Flat id field standing in for an owning to-one relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Relation field on the entity, e.g. `customer`
    pub relation_field: String,
    /// Id field on the DTO and client model, e.g. `customerId`
    pub id_field: String,
    pub target_class_id: String,
    pub target_class_name: String,
    /// Target's primary key type
    pub key: SemanticType,
    /// Target's primary key name, for the null-safe getter in mappers
    pub key_name: String,
    /// Declared by a superclass relation
    pub inherited: bool,
}

impl ForeignKey {
    pub fn id_getter(&self) -> String {
        format!("get{}", capitalize(&self.id_field))
    }

    pub fn id_setter(&self) -> String {
        format!("set{}", capitalize(&self.id_field))
    }

    pub fn relation_getter(&self) -> String {
        format!("get{}", capitalize(&self.relation_field))
    }

    pub fn relation_setter(&self) -> String {
        format!("set{}", capitalize(&self.relation_field))
    }

    pub fn target_key_getter(&self) -> String {
        format!("get{}", capitalize(&self.key_name))
    }
}

#[derive(Debug, Clone)]
pub struct ClassShape<'d> {
    pub class: &'d UmlClass,
    pub kind: ClassKind,
    pub mode: ResourceMode,
    pub primary_key: PrimaryKey<'d>,
    /// Inherited scalars first, then the class's own, in declaration order
    pub scalars: Vec<ScalarField<'d>>,
    pub relations: Vec<RelationField>,
    pub foreign_keys: Vec<ForeignKey>,
    pub parent: Option<&'d UmlClass>,
    pub interfaces: Vec<&'d UmlClass>,
    pub has_subclasses: bool,
}

impl<'d> ClassShape<'d> {
    pub fn name(&self) -> &'d str {
        &self.class.name
    }

    pub fn id(&self) -> &'d str {
        &self.class.id
    }

    /// `/api/<route>` segment
    pub fn route(&self) -> String {
        route_segment(&self.class.name)
    }

    pub fn snake_name(&self) -> String {
        to_snake_case(&self.class.name)
    }

    /// Local variable name, e.g. `orderItem`
    pub fn var_name(&self) -> String {
        lower_first(&self.class.name)
    }

    /// Scalars declared on this class, statics included; what the entity renders
    pub fn own_scalars(&self) -> impl Iterator<Item = &ScalarField<'d>> {
        self.scalars.iter().filter(|s| !s.inherited)
    }

    /// Instance scalars including inherited ones; what DTOs and models carry
    pub fn instance_scalars(&self) -> impl Iterator<Item = &ScalarField<'d>> {
        self.scalars.iter().filter(|s| !s.is_static())
    }

    pub fn has_collections(&self) -> bool {
        self.relations.iter().any(RelationField::is_collection)
    }
}

/// Everything the emitters need for one request
#[derive(Debug)]
pub struct ProjectModel<'d> {
    pub settings: ProjectSettings,
    pub index: DiagramIndex<'d>,
    pub metadata: RelationMetadata,
    shapes: Vec<ClassShape<'d>>,
}

impl<'d> ProjectModel<'d> {
    /// Analyze the diagram and resolve every class shape
    pub fn build(
        diagram: &'d Diagram,
        settings: ProjectSettings,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let build_span = span!(Level::DEBUG, "resolve_shapes", classes = diagram.class_count());
        let _enter = build_span.enter();

        let index = DiagramIndex::new(diagram);
        let metadata = analyze_indexed(&index, diagnostics);

        let parents = resolve_parents(&index, diagnostics);
        let own_keys: Vec<PrimaryKey<'d>> = diagram.classes.iter().map(PrimaryKey::declared_on).collect();
        let effective_key = |position: usize| -> PrimaryKey<'d> {
            let root = root_of(position, &parents);
            let mut key = own_keys[root].clone();
            key.inherited = root != position;
            key
        };

        let mut shapes = Vec::with_capacity(diagram.class_count());
        for (position, (class, kind)) in index.classes().enumerate() {
            let primary_key = effective_key(position);
            let relations = metadata.fields(&class.id).to_vec();

            // Superclasses the entity actually extends, root first. An interface
            // parent is realized rather than extended, so nothing is inherited past it.
            let mut lineage: Vec<usize> = ancestors(position, &parents)
                .into_iter()
                .take_while(|&a| {
                    kind == ClassKind::Interface
                        || index.kind(&index.class_at(a).id) != Some(ClassKind::Interface)
                })
                .collect();
            lineage.reverse();

            // Relation fields visible on the entity, inherited ones included
            let visible_relations: Vec<RelationField> = lineage
                .iter()
                .flat_map(|&a| metadata.fields(&index.class_at(a).id).iter().cloned())
                .chain(relations.iter().cloned())
                .collect();

            let mut scalars = Vec::new();
            for &ancestor in &lineage {
                let ancestor_class = index.class_at(ancestor);
                let filtered = filter_attributes(
                    ancestor_class.attributes.iter().filter(|a| !a.is_primary_key),
                    &ancestor_class.name,
                    &visible_relations,
                );
                scalars.extend(filtered.kept.into_iter().map(|attribute| ScalarField {
                    attribute,
                    semantic: SemanticType::parse(&attribute.attr_type),
                    inherited: true,
                }));
            }

            let filtered = filter_attributes(
                class.attributes.iter().filter(|a| !a.is_primary_key),
                &class.name,
                &visible_relations,
            );
            for (attribute, reason) in &filtered.dropped {
                diagnostics.push(Diagnostic::info(
                    DiagnosticKind::FilteredAttribute,
                    &class.id,
                    format!(
                        "{}.{} dropped: {}",
                        class.name,
                        attribute.name,
                        reason.describe()
                    ),
                ));
            }
            for attribute in filtered.kept {
                let semantic = SemanticType::parse(&attribute.attr_type);
                if !semantic.is_known() {
                    diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::UnknownType,
                        &class.id,
                        format!(
                            "{}.{} has type {} outside the type table; emitted verbatim",
                            class.name, attribute.name, attribute.attr_type
                        ),
                    ));
                }
                scalars.push(ScalarField {
                    attribute,
                    semantic,
                    inherited: false,
                });
            }

            let inherited_relations = &visible_relations[..visible_relations.len() - relations.len()];
            let mut foreign_keys: Vec<ForeignKey> = Vec::new();
            // own keys win over inherited ones with the same id field
            for (r, inherited) in relations
                .iter()
                .map(|r| (r, false))
                .chain(inherited_relations.iter().map(|r| (r, true)))
            {
                if !r.carries_foreign_key()
                    // interfaces have no repository to resolve an id against
                    || index.kind(&r.target_class_id) == Some(ClassKind::Interface)
                {
                    continue;
                }
                let id_field = r.foreign_key_name();
                if foreign_keys.iter().any(|fk| fk.id_field == id_field) {
                    continue;
                }
                let target_key = index
                    .position(&r.target_class_id)
                    .map(effective_key)
                    .unwrap_or_else(PrimaryKey::synthesized);
                foreign_keys.push(ForeignKey {
                    relation_field: r.field_name.clone(),
                    id_field,
                    target_class_id: r.target_class_id.clone(),
                    target_class_name: r.target_class_name.clone(),
                    key: target_key.semantic,
                    key_name: target_key.name,
                    inherited,
                });
            }
            // inherited keys first, matching the scalar order
            foreign_keys.sort_by_key(|fk| !fk.inherited);

            let mut parent = parents[position].map(|p| index.class_at(p));
            let mut interfaces = index.interfaces(&class.id);
            // extending an interface is implementing it
            if let Some(p) = parent {
                if index.kind(&p.id) == Some(ClassKind::Interface) && kind != ClassKind::Interface {
                    if !interfaces.iter().any(|i| i.id == p.id) {
                        interfaces.insert(0, p);
                    }
                    parent = None;
                }
            }

            shapes.push(ClassShape {
                class,
                kind,
                mode: ResourceMode::from(kind),
                primary_key,
                scalars,
                relations,
                foreign_keys,
                parent,
                interfaces,
                has_subclasses: false,
            });
        }

        let parent_ids: HashSet<&str> = shapes
            .iter()
            .filter_map(|s| s.parent.map(|p| p.id.as_str()))
            .collect();
        for shape in &mut shapes {
            shape.has_subclasses = parent_ids.contains(shape.class.id.as_str());
        }

        debug!(shapes = shapes.len(), "Class shapes resolved");

        Self {
            settings,
            index,
            metadata,
            shapes,
        }
    }

    pub fn shapes(&self) -> &[ClassShape<'d>] {
        &self.shapes
    }

    pub fn shape(&self, class_id: &str) -> Option<&ClassShape<'d>> {
        self.index.position(class_id).map(|p| &self.shapes[p])
    }

    pub fn shape_named(&self, name: &str) -> Option<&ClassShape<'d>> {
        self.shapes.iter().find(|s| s.class.name == name)
    }

    /// Classes that get a REST resource and a client layer
    pub fn api_shapes(&self) -> impl Iterator<Item = &ClassShape<'d>> {
        self.shapes.iter().filter(|s| s.mode.has_api())
    }
}

/// Resolved parent position per class; cycles are broken and reported
fn resolve_parents(index: &DiagramIndex<'_>, diagnostics: &mut Diagnostics) -> Vec<Option<usize>> {
    let diagram = index.diagram();
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(diagram.class_count());

    for class in &diagram.classes {
        let candidates: Vec<usize> = index
            .outgoing(&class.id, RelationKind::Inheritance)
            .filter(|r| r.association_class_id.is_none())
            .filter_map(|r| index.position(&r.to_class_id))
            .collect();
        if candidates.len() > 1 {
            diagnostics.push(Diagnostic::warning(
                DiagnosticKind::DuplicateInheritance,
                &class.id,
                format!(
                    "{} extends {} classes; only the first is used",
                    class.name,
                    candidates.len()
                ),
            ));
        }
        parents.push(candidates.first().copied());
    }

    for position in 0..parents.len() {
        let mut seen = HashSet::from([position]);
        let mut cursor = parents[position];
        while let Some(next) = cursor {
            if !seen.insert(next) {
                let class = index.class_at(position);
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::InheritanceCycle,
                    &class.id,
                    format!("{} is part of an inheritance cycle; superclass dropped", class.name),
                ));
                parents[position] = None;
                break;
            }
            cursor = parents[next];
        }
    }

    parents
}

/// Ancestor positions, nearest first; assumes cycles were removed
fn ancestors(position: usize, parents: &[Option<usize>]) -> Vec<usize> {
    let mut chain = Vec::new();
    let mut cursor = parents[position];
    while let Some(next) = cursor {
        if chain.contains(&next) || next == position {
            break;
        }
        chain.push(next);
        cursor = parents[next];
    }
    chain
}

fn root_of(position: usize, parents: &[Option<usize>]) -> usize {
    ancestors(position, parents).last().copied().unwrap_or(position)
}
