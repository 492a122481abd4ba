//! Relation analyzer scenarios and properties

use std::collections::HashSet;

use proptest::prelude::*;
use umlgen::analysis::{Cardinality, RelationField, RelationMetadata};
use umlgen::prelude::*;
use umlgen::{analyze_with_diagnostics, DiagnosticKind};

fn field<'a>(metadata: &'a RelationMetadata, class_id: &str, name: &str) -> &'a RelationField {
    metadata
        .fields(class_id)
        .iter()
        .find(|f| f.field_name == name)
        .unwrap_or_else(|| panic!("no field {} on {}", name, class_id))
}

mod scenarios {
    use super::*;

    #[test]
    fn test_order_product_one_to_many() {
        let diagram = Diagram::new()
            .with_class(UmlClass::new("o", "Order"))
            .with_class(UmlClass::new("p", "Product"))
            .with_relation(
                UmlRelation::new("r", "o", "p", RelationKind::Association).with_multiplicity("1", "*"),
            );
        let metadata = umlgen::analyze(&diagram);

        let products = field(&metadata, "o", "products");
        assert_eq!(products.cardinality(), Cardinality::OneToMany);
        assert!(!products.is_owner);
        assert_eq!(products.mapped_by.as_deref(), Some("order"));

        let order = field(&metadata, "p", "order");
        assert_eq!(order.cardinality(), Cardinality::ManyToOne);
        assert!(order.is_owner);
        assert_eq!(order.target_class_name, "Order");
    }

    #[test]
    fn test_order_item_association_class() {
        let diagram = Diagram::new()
            .with_class(UmlClass::new("o", "Order"))
            .with_class(UmlClass::new("p", "Product"))
            .with_class(
                UmlClass::new("i", "OrderItem").with_attribute(UmlAttribute::new("quantity", "int")),
            )
            .with_relation(
                UmlRelation::new("r", "o", "p", RelationKind::Association)
                    .with_multiplicity("*", "*")
                    .with_association_class("i"),
            );
        let metadata = umlgen::analyze(&diagram);

        let item = metadata.fields("i");
        assert_eq!(item.len(), 2);
        for (f, target) in item.iter().zip(["o", "p"]) {
            assert_eq!(f.cardinality(), Cardinality::ManyToOne);
            assert!(f.is_owner);
            assert_eq!(f.target_class_id, target);
        }
        assert_eq!(item[0].field_name, "order");
        assert_eq!(item[1].field_name, "product");

        let back = field(&metadata, "o", "orderitems");
        assert_eq!(back.cardinality(), Cardinality::OneToMany);
        assert_eq!(back.mapped_by.as_deref(), Some("order"));
        let back = field(&metadata, "p", "orderitems");
        assert_eq!(back.mapped_by.as_deref(), Some("product"));

        // no direct many-to-many between the endpoints
        assert_eq!(metadata.fields("o").len(), 1);
        assert_eq!(metadata.fields("p").len(), 1);
    }

    #[test]
    fn test_team_person_names_do_not_collide() {
        let diagram = Diagram::new()
            .with_class(UmlClass::new("t", "Team"))
            .with_class(UmlClass::new("p", "Person"))
            .with_relation(
                UmlRelation::new("captain", "t", "p", RelationKind::Association).with_label("captain"),
            )
            .with_relation(
                UmlRelation::new("members", "t", "p", RelationKind::Association).with_label("members"),
            );
        let metadata = umlgen::analyze(&diagram);

        let names: Vec<_> = metadata.field_names("t").collect();
        assert_eq!(names, vec!["person", "person1"]);
        let names: Vec<_> = metadata.field_names("p").collect();
        assert_eq!(names, vec!["team", "team1"]);
        assert_eq!(field(&metadata, "p", "team1").mapped_by.as_deref(), Some("person1"));
    }

    #[test]
    fn test_unresolved_association_class_is_reported() {
        let diagram = Diagram::new()
            .with_class(UmlClass::new("a", "A"))
            .with_class(UmlClass::new("b", "B"))
            .with_relation(
                UmlRelation::new("r1", "a", "b", RelationKind::Association).with_association_class("nope"),
            );
        let mut diagnostics = Diagnostics::new();
        let metadata = analyze_with_diagnostics(&diagram, &mut diagnostics);

        assert_eq!(metadata.field_count(), 0);
        assert_eq!(
            diagnostics
                .of_kind(DiagnosticKind::UnresolvedAssociationClass)
                .count(),
            1
        );
    }

    #[test]
    fn test_metadata_serializes_like_the_editor_expects() {
        let diagram = Diagram::new()
            .with_class(UmlClass::new("o", "Order"))
            .with_class(UmlClass::new("l", "Line"))
            .with_relation(
                UmlRelation::new("r", "o", "l", RelationKind::Composition).with_multiplicity("1", "*"),
            );
        let json = serde_json::to_value(umlgen::analyze(&diagram)).unwrap();
        assert_eq!(json["o"][0]["type"], "OneToMany-Composition");
        assert_eq!(json["o"][0]["fieldName"], "lines");
        assert_eq!(json["o"][0]["mappedBy"], "order");
        assert_eq!(json["l"][0]["isOwner"], true);
        assert!(json["l"][0].get("mappedBy").is_none());
    }
}

const NAMES: [&str; 6] = ["Order", "Product", "Team", "Person", "Tag", "Line"];
const ENDS: [&str; 5] = ["1", "0..1", "*", "1..*", "0..*"];

#[derive(Debug, Clone)]
struct Link {
    from: usize,
    to: usize,
    kind: RelationKind,
    from_end: &'static str,
    to_end: &'static str,
    association_class: Option<usize>,
}

fn link(classes: usize) -> impl Strategy<Value = Link> {
    (
        0..classes + 1,
        0..classes,
        prop_oneof![
            Just(RelationKind::Association),
            Just(RelationKind::Aggregation),
            Just(RelationKind::Composition),
            Just(RelationKind::Inheritance),
        ],
        prop::sample::select(ENDS.to_vec()),
        prop::sample::select(ENDS.to_vec()),
        prop::option::weighted(0.2, 0..classes),
    )
        .prop_map(|(from, to, kind, from_end, to_end, association_class)| Link {
            from,
            to,
            kind,
            from_end,
            to_end,
            association_class,
        })
}

/// Up to six classes and eight relations; an index one past the class list
/// is a dangling endpoint
fn diagrams() -> impl Strategy<Value = (Diagram, Vec<Link>)> {
    (1..=NAMES.len())
        .prop_flat_map(|n| (Just(n), prop::collection::vec(link(n), 0..8)))
        .prop_map(|(n, links)| {
            let id = |i: usize| format!("c{}", i);
            let mut diagram = Diagram::new();
            for (i, name) in NAMES.iter().take(n).enumerate() {
                diagram = diagram.with_class(UmlClass::new(id(i), *name));
            }
            for (r, l) in links.iter().enumerate() {
                let mut relation = UmlRelation::new(format!("r{}", r), id(l.from), id(l.to), l.kind)
                    .with_multiplicity(l.from_end, l.to_end);
                if let Some(a) = l.association_class {
                    relation = relation.with_association_class(id(a));
                }
                diagram = diagram.with_relation(relation);
            }
            (diagram, links)
        })
}

proptest! {
    #[test]
    fn prop_every_class_has_an_entry((diagram, _) in diagrams()) {
        let metadata = umlgen::analyze(&diagram);
        for class in &diagram.classes {
            prop_assert!(metadata.contains_class(&class.id));
        }
        prop_assert_eq!(metadata.class_count(), diagram.class_count());
    }

    #[test]
    fn prop_field_names_unique_per_class((diagram, _) in diagrams()) {
        let metadata = umlgen::analyze(&diagram);
        for (class_id, fields) in metadata.iter() {
            let names: HashSet<_> = fields.iter().map(|f| f.field_name.as_str()).collect();
            prop_assert_eq!(names.len(), fields.len(), "duplicate field on {}", class_id);
        }
    }

    #[test]
    fn prop_mapped_by_names_the_owning_field((diagram, _) in diagrams()) {
        let metadata = umlgen::analyze(&diagram);
        for (class_id, fields) in metadata.iter() {
            for inverse in fields.iter().filter(|f| !f.is_owner) {
                let mapped_by = inverse.mapped_by.as_deref();
                prop_assert!(mapped_by.is_some());
                let owner = metadata
                    .fields(&inverse.target_class_id)
                    .iter()
                    .find(|f| Some(f.field_name.as_str()) == mapped_by);
                prop_assert!(owner.is_some(), "{}.{} maps a missing field", class_id, inverse.field_name);
                let owner = owner.unwrap();
                prop_assert!(owner.is_owner);
                prop_assert_eq!(owner.target_class_id.as_str(), class_id);
            }
            for owner in fields.iter().filter(|f| f.is_owner) {
                prop_assert!(owner.mapped_by.is_none());
            }
        }
    }

    #[test]
    fn prop_many_to_many_has_one_owner((diagram, links) in diagrams()) {
        let metadata = umlgen::analyze(&diagram);
        let class_count = diagram.class_count();
        let expected = links
            .iter()
            .filter(|l| {
                l.from < class_count
                    && l.association_class.is_none()
                    && l.kind != RelationKind::Inheritance
                    && umlgen::analysis::is_many(l.from_end)
                    && umlgen::analysis::is_many(l.to_end)
            })
            .count();
        let many: Vec<_> = metadata
            .iter()
            .flat_map(|(_, fields)| fields.iter())
            .filter(|f| f.cardinality() == Cardinality::ManyToMany)
            .collect();
        prop_assert_eq!(many.iter().filter(|f| f.is_owner).count(), expected);
        prop_assert_eq!(many.iter().filter(|f| !f.is_owner).count(), expected);
    }

    #[test]
    fn prop_association_class_star((diagram, links) in diagrams()) {
        let metadata = umlgen::analyze(&diagram);
        let class_count = diagram.class_count();
        let stars = links
            .iter()
            .filter(|l| l.from < class_count && l.association_class.is_some())
            .count();
        let owners = metadata
            .iter()
            .flat_map(|(_, fields)| fields.iter())
            .filter(|f| f.is_owner && f.cardinality() == Cardinality::ManyToOne)
            .count();
        // every star adds exactly two owning ManyToOne fields
        let plain_many_to_one = links
            .iter()
            .filter(|l| {
                l.from < class_count
                    && l.association_class.is_none()
                    && l.kind != RelationKind::Inheritance
                    && !umlgen::analysis::is_many(l.from_end)
                    && umlgen::analysis::is_many(l.to_end)
            })
            .count();
        prop_assert_eq!(owners, 2 * stars + plain_many_to_one);
    }

    #[test]
    fn prop_analysis_is_deterministic((diagram, _) in diagrams()) {
        prop_assert_eq!(umlgen::analyze(&diagram), umlgen::analyze(&diagram));
    }
}
