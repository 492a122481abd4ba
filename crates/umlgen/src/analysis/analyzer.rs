//! Relation analyzer
//!
//! Turns the diagram's relations into per-class relation fields with a
//! consistent ownership story: every two-sided relation yields exactly one
//! owning entry and one inverse entry whose `mappedBy` names the owning
//! field. The analyzer is a pure function of the diagram.

use tracing::{debug, span, trace, Level};

use super::metadata::{Cardinality, RelationField, RelationMetadata, RelationType};
use crate::core::naming::{pluralize, unique_field_name};
use crate::core::{
    Diagnostic, DiagnosticKind, Diagnostics, Diagram, DiagramIndex, Multiplicity, RelationKind,
    UmlClass, UmlRelation,
};

/// Whether a multiplicity end denotes "many"
pub fn is_many(multiplicity: &str) -> bool {
    let m = multiplicity.trim();
    m == "*" || m == "0..*" || m == "1..*" || m.contains('n')
}

/// Analyze a diagram, discarding diagnostics
pub fn analyze(diagram: &Diagram) -> RelationMetadata {
    let mut diagnostics = Diagnostics::new();
    analyze_with_diagnostics(diagram, &mut diagnostics)
}

/// Analyze a diagram, recording skipped relations in `diagnostics`
pub fn analyze_with_diagnostics(
    diagram: &Diagram,
    diagnostics: &mut Diagnostics,
) -> RelationMetadata {
    let index = DiagramIndex::new(diagram);
    analyze_indexed(&index, diagnostics)
}

pub(crate) fn analyze_indexed(
    index: &DiagramIndex<'_>,
    diagnostics: &mut Diagnostics,
) -> RelationMetadata {
    let diagram = index.diagram();
    let analyze_span = span!(
        Level::DEBUG,
        "analyze_relations",
        classes = diagram.class_count(),
        relations = diagram.relation_count()
    );
    let _enter = analyze_span.enter();

    let mut table = FieldTable::new();
    for class in &diagram.classes {
        table.metadata.ensure_class(&class.id);
    }

    for relation in &diagram.relations {
        let (Some(from), Some(to)) = (
            index.class(&relation.from_class_id),
            index.class(&relation.to_class_id),
        ) else {
            diagnostics.push(Diagnostic::warning(
                DiagnosticKind::DanglingRelation,
                &relation.id,
                format!(
                    "relation {} skipped: endpoint {} -> {} does not resolve",
                    relation.id, relation.from_class_id, relation.to_class_id
                ),
            ));
            continue;
        };

        if let Some(assoc_id) = relation.association_class_id.as_deref() {
            match index.class(assoc_id) {
                Some(assoc) => table.association_class(relation, assoc, from, to),
                None => diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::UnresolvedAssociationClass,
                    &relation.id,
                    format!(
                        "relation {} skipped: association class {} does not resolve",
                        relation.id, assoc_id
                    ),
                )),
            }
            continue;
        }

        match relation.kind {
            RelationKind::Inheritance | RelationKind::Realization => {
                trace!(relation = %relation.id, "supertype relation left to emitters");
            }
            RelationKind::Association | RelationKind::Aggregation => {
                table.binary(relation, from, to, false)
            }
            RelationKind::Composition => table.binary(relation, from, to, true),
            RelationKind::AssociationClass => diagnostics.push(Diagnostic::warning(
                DiagnosticKind::UnresolvedAssociationClass,
                &relation.id,
                format!(
                    "relation {} skipped: association-class link without associationClassId",
                    relation.id
                ),
            )),
        }
    }

    debug!(
        fields = table.metadata.field_count(),
        "Relation analysis completed"
    );
    table.metadata
}

/// Explicit accumulator for the fields generated so far
struct FieldTable {
    metadata: RelationMetadata,
}

struct End<'a> {
    class: &'a UmlClass,
    cardinality: Cardinality,
    base_name: String,
}

impl FieldTable {
    fn new() -> Self {
        Self {
            metadata: RelationMetadata::new(),
        }
    }

    fn reserve(&self, class_id: &str, base: &str) -> String {
        unique_field_name(base, self.metadata.field_names(class_id))
    }

    /// Plain association, aggregation or composition between two classes
    fn binary(&mut self, relation: &UmlRelation, from: &UmlClass, to: &UmlClass, composition: bool) {
        let multiplicity = relation.multiplicity();
        let from_many = is_many(multiplicity.from_end());
        let to_many = is_many(multiplicity.to_end());
        let from_lower = from.name.to_lowercase();
        let to_lower = to.name.to_lowercase();

        // (owner, inverse, owner is the `from` end)
        let (owner, inverse, owner_is_from) = match (from_many, to_many) {
            (true, true) => (
                End {
                    class: from,
                    cardinality: Cardinality::ManyToMany,
                    base_name: pluralize(&to_lower),
                },
                End {
                    class: to,
                    cardinality: Cardinality::ManyToMany,
                    base_name: pluralize(&from_lower),
                },
                true,
            ),
            (false, true) => (
                End {
                    class: to,
                    cardinality: Cardinality::ManyToOne,
                    base_name: from_lower,
                },
                End {
                    class: from,
                    cardinality: Cardinality::OneToMany,
                    base_name: pluralize(&to_lower),
                },
                false,
            ),
            // `*` to `1` has no dedicated mapping and is treated as one-to-one
            (true, false) | (false, false) => (
                End {
                    class: from,
                    cardinality: Cardinality::OneToOne,
                    base_name: to_lower,
                },
                End {
                    class: to,
                    cardinality: Cardinality::OneToOne,
                    base_name: from_lower,
                },
                true,
            ),
        };

        // The composition tag marks the whole, which is always the `from` end.
        let tag = |is_from: bool| RelationType {
            cardinality: if is_from == owner_is_from {
                owner.cardinality
            } else {
                inverse.cardinality
            },
            composition: composition && is_from,
        };

        let owner_field = self.reserve(&owner.class.id, &owner.base_name);
        self.metadata.push(
            &owner.class.id,
            RelationField {
                relation_type: tag(owner_is_from),
                target_class_id: inverse.class.id.clone(),
                target_class_name: inverse.class.name.clone(),
                field_name: owner_field.clone(),
                mapped_by: None,
                is_owner: true,
                multiplicity: relation.multiplicity.clone(),
            },
        );

        let inverse_field = self.reserve(&inverse.class.id, &inverse.base_name);
        self.metadata.push(
            &inverse.class.id,
            RelationField {
                relation_type: tag(!owner_is_from),
                target_class_id: owner.class.id.clone(),
                target_class_name: owner.class.name.clone(),
                field_name: inverse_field,
                mapped_by: Some(owner_field),
                is_owner: false,
                multiplicity: relation.multiplicity.clone(),
            },
        );
    }

    /// Star around an association class: two owning ManyToOne fields on the
    /// association class, one inverse OneToMany on each endpoint
    fn association_class(
        &mut self,
        relation: &UmlRelation,
        assoc: &UmlClass,
        from: &UmlClass,
        to: &UmlClass,
    ) {
        let link = Multiplicity::new("*", "1");
        let mut back_refs = Vec::with_capacity(2);

        for endpoint in [from, to] {
            let field = self.reserve(&assoc.id, &endpoint.name.to_lowercase());
            self.metadata.push(
                &assoc.id,
                RelationField {
                    relation_type: RelationType::plain(Cardinality::ManyToOne),
                    target_class_id: endpoint.id.clone(),
                    target_class_name: endpoint.name.clone(),
                    field_name: field.clone(),
                    mapped_by: None,
                    is_owner: true,
                    multiplicity: Some(link.clone()),
                },
            );
            back_refs.push((endpoint, field));
        }

        let collection = pluralize(&assoc.name.to_lowercase());
        for (endpoint, owning_field) in back_refs {
            let field = self.reserve(&endpoint.id, &collection);
            self.metadata.push(
                &endpoint.id,
                RelationField {
                    relation_type: RelationType::plain(Cardinality::OneToMany),
                    target_class_id: assoc.id.clone(),
                    target_class_name: assoc.name.clone(),
                    field_name: field,
                    mapped_by: Some(owning_field),
                    is_owner: false,
                    multiplicity: relation.multiplicity.clone(),
                },
            );
        }
    }
}
