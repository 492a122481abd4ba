//! Id-based lookup over a diagram
//!
//! Classes are addressed by their position in `diagram.classes` and by id,
//! never by reference to one another, so self- and mutually-referencing
//! relations need no special handling anywhere downstream.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::model::{Diagram, RelationKind, UmlClass, UmlRelation};

/// Closed classification of a class, decided once per diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassKind {
    Plain,
    Abstract,
    Interface,
    /// Materialises the attributes of a many-to-many link
    AssociationClass,
}

impl ClassKind {
    /// Whether the class gets the CRUD artifact set
    pub fn is_concrete_resource(self) -> bool {
        !matches!(self, ClassKind::Interface)
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKind::Plain => write!(f, "plain"),
            ClassKind::Abstract => write!(f, "abstract"),
            ClassKind::Interface => write!(f, "interface"),
            ClassKind::AssociationClass => write!(f, "association-class"),
        }
    }
}

/// Arena view over a borrowed diagram
#[derive(Debug)]
pub struct DiagramIndex<'d> {
    diagram: &'d Diagram,
    by_id: HashMap<&'d str, usize>,
    kinds: Vec<ClassKind>,
}

impl<'d> DiagramIndex<'d> {
    pub fn new(diagram: &'d Diagram) -> Self {
        let mut by_id = HashMap::with_capacity(diagram.classes.len());
        for (position, class) in diagram.classes.iter().enumerate() {
            by_id.entry(class.id.as_str()).or_insert(position);
        }

        let association_ids: HashSet<&str> = diagram
            .relations
            .iter()
            .filter_map(|r| r.association_class_id.as_deref())
            .collect();

        let kinds = diagram
            .classes
            .iter()
            .map(|class| {
                if association_ids.contains(class.id.as_str()) || class.has_association_stereotype()
                {
                    ClassKind::AssociationClass
                } else if class.is_interface {
                    ClassKind::Interface
                } else if class.is_abstract {
                    ClassKind::Abstract
                } else {
                    ClassKind::Plain
                }
            })
            .collect();

        Self {
            diagram,
            by_id,
            kinds,
        }
    }

    pub fn diagram(&self) -> &'d Diagram {
        self.diagram
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn class(&self, id: &str) -> Option<&'d UmlClass> {
        self.position(id).map(|p| &self.diagram.classes[p])
    }

    pub fn class_at(&self, position: usize) -> &'d UmlClass {
        &self.diagram.classes[position]
    }

    pub fn kind_at(&self, position: usize) -> ClassKind {
        self.kinds[position]
    }

    pub fn kind(&self, id: &str) -> Option<ClassKind> {
        self.position(id).map(|p| self.kinds[p])
    }

    /// Classes in diagram order with their kind
    pub fn classes(&self) -> impl Iterator<Item = (&'d UmlClass, ClassKind)> + '_ {
        self.diagram
            .classes
            .iter()
            .zip(self.kinds.iter().copied())
    }

    /// Outgoing relations of one kind, in diagram order
    pub fn outgoing(
        &self,
        class_id: &'d str,
        kind: RelationKind,
    ) -> impl Iterator<Item = &'d UmlRelation> + 'd {
        let diagram: &'d Diagram = self.diagram;
        diagram
            .relations
            .iter()
            .filter(move |r| r.kind == kind && r.from_class_id == class_id)
    }

    /// Superclass named by the first resolvable `inheritance` relation
    pub fn parent(&self, class_id: &'d str) -> Option<&'d UmlClass> {
        self.outgoing(class_id, RelationKind::Inheritance)
            .find_map(|r| self.class(&r.to_class_id))
    }

    /// Interfaces named by resolvable `realization` relations, deduplicated
    pub fn interfaces(&self, class_id: &'d str) -> Vec<&'d UmlClass> {
        let mut seen = HashSet::new();
        self.outgoing(class_id, RelationKind::Realization)
            .filter_map(|r| self.class(&r.to_class_id))
            .filter(|c| seen.insert(c.id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::UmlRelation;

    fn diagram() -> Diagram {
        Diagram::new()
            .with_class(UmlClass::new("c1", "Animal").abstract_class())
            .with_class(UmlClass::new("c2", "Dog"))
            .with_class(UmlClass::new("c3", "Pet").interface())
            .with_class(UmlClass::new("c4", "Owner"))
            .with_class(UmlClass::new("c5", "Adoption"))
            .with_relation(UmlRelation::new("r1", "c2", "c1", RelationKind::Inheritance))
            .with_relation(UmlRelation::new("r2", "c2", "c3", RelationKind::Realization))
            .with_relation(UmlRelation::new("r3", "c2", "c3", RelationKind::Realization))
            .with_relation(
                UmlRelation::new("r4", "c4", "c2", RelationKind::Association)
                    .with_association_class("c5"),
            )
    }

    #[test]
    fn test_kinds_decided_once() {
        let d = diagram();
        let index = DiagramIndex::new(&d);
        assert_eq!(index.kind("c1"), Some(ClassKind::Abstract));
        assert_eq!(index.kind("c2"), Some(ClassKind::Plain));
        assert_eq!(index.kind("c3"), Some(ClassKind::Interface));
        assert_eq!(index.kind("c5"), Some(ClassKind::AssociationClass));
        assert_eq!(index.kind("missing"), None);
    }

    #[test]
    fn test_stereotype_marks_association_class() {
        let d = Diagram::new().with_class(UmlClass::new("x", "Link").with_stereotype("<<association>>"));
        let index = DiagramIndex::new(&d);
        assert_eq!(index.kind("x"), Some(ClassKind::AssociationClass));
    }

    #[test]
    fn test_parent_and_interfaces() {
        let d = diagram();
        let index = DiagramIndex::new(&d);
        assert_eq!(index.parent("c2").map(|c| c.name.as_str()), Some("Animal"));
        assert_eq!(index.parent("c1"), None);
        let interfaces = index.interfaces("c2");
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].name, "Pet");
    }
}
