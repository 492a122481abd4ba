//! JPA entity builder

use super::java::{Annotation, Field, JavaFile, TypeDecl, TypeKind};
use super::layer_package;
use crate::analysis::{Cardinality, ClassShape, RelationField, ScalarField};
use crate::core::naming::escape_java;
use crate::core::{ClassKind, ProjectSettings, SemanticType, UmlAttribute};

pub fn entity(shape: &ClassShape<'_>, settings: &ProjectSettings) -> JavaFile {
    let package = layer_package(settings, "entity");
    if shape.kind == ClassKind::Interface {
        return JavaFile::new(package, interface_decl(shape));
    }

    let kind = if shape.kind == ClassKind::Abstract {
        TypeKind::AbstractClass
    } else {
        TypeKind::Class
    };
    let mut decl = TypeDecl::new(kind, shape.name())
        .annotated(Annotation::marker("Getter"))
        .annotated(Annotation::marker("Setter"))
        .annotated(Annotation::marker("Entity"))
        .annotated(
            Annotation::marker("Table")
                .arg(format!("name = \"tbl_{}\"", shape.name().to_lowercase())),
        );
    if shape.has_subclasses && shape.parent.is_none() {
        decl = decl.annotated(
            Annotation::marker("Inheritance").arg("strategy = InheritanceType.JOINED"),
        );
    }
    if let Some(parent) = shape.parent {
        decl = decl.extending(&parent.name);
    }
    for interface in &shape.interfaces {
        decl = decl.implementing(&interface.name);
    }

    let mut file_imports: Vec<&'static str> =
        vec!["jakarta.persistence.*", "lombok.Getter", "lombok.Setter"];

    let key = &shape.primary_key;
    if !key.inherited {
        let mut field = Field::private(key.java_type(), &key.name).annotated(Annotation::marker("Id"));
        if key.is_generated() {
            field = field.annotated(
                Annotation::marker("GeneratedValue").arg("strategy = GenerationType.IDENTITY"),
            );
        }
        if let Some(column) = key.attribute.and_then(column_annotation) {
            field = field.annotated(column);
        }
        decl.field(field);
        file_imports.extend(key.semantic.java_import());
    }

    for scalar in shape.own_scalars() {
        decl.field(scalar_field(scalar));
        file_imports.extend(scalar.semantic.java_import());
    }

    for relation in &shape.relations {
        decl.field(relation_field(shape, relation));
    }
    if shape.relations.iter().any(|r| !r.is_owner) {
        file_imports.push("com.fasterxml.jackson.annotation.JsonIgnore");
    }
    if shape.has_collections() {
        file_imports.push("java.util.HashSet");
        file_imports.push("java.util.Set");
    }

    let mut file = JavaFile::new(package, decl);
    for import in file_imports {
        file.import(import);
    }
    file
}

fn interface_decl(shape: &ClassShape<'_>) -> TypeDecl {
    let mut decl = TypeDecl::new(TypeKind::Interface, shape.name());
    if let Some(parent) = shape.parent {
        decl = decl.extending(&parent.name);
    }
    for interface in &shape.interfaces {
        if !decl.extends.contains(&interface.name) {
            decl = decl.extending(&interface.name);
        }
    }
    decl
}

fn column_annotation(attribute: &UmlAttribute) -> Option<Annotation> {
    if !attribute.has_column_constraints() {
        return None;
    }
    let mut column = Annotation::marker("Column");
    if let Some(name) = &attribute.column_name {
        column = column.arg(format!("name = \"{}\"", escape_java(name)));
    }
    if attribute.is_unique {
        column = column.arg("unique = true");
    }
    if let Some(nullable) = attribute.is_nullable {
        column = column.arg(format!("nullable = {}", nullable));
    }
    Some(column)
}

fn scalar_field(scalar: &ScalarField<'_>) -> Field {
    let attribute = scalar.attribute;
    let mut modifiers = attribute
        .visibility
        .java_modifier()
        .map(str::to_string)
        .unwrap_or_default();
    if attribute.is_static {
        if !modifiers.is_empty() {
            modifiers.push(' ');
        }
        modifiers.push_str("static");
    }

    let mut field = Field::private(scalar.semantic.java_type(), &attribute.name).with_modifiers(modifiers);
    if let Some(column) = column_annotation(attribute) {
        field = field.annotated(column);
    }
    if let Some(default) = attribute.default_value.as_deref().filter(|d| !d.is_empty()) {
        let literal = match scalar.semantic {
            SemanticType::String => format!("\"{}\"", escape_java(default)),
            _ => default.to_string(),
        };
        field = field.initialized(literal);
    }
    field
}

fn relation_field(shape: &ClassShape<'_>, relation: &RelationField) -> Field {
    let cardinality = relation.cardinality();
    let mut mapping = Annotation::marker(cardinality.as_str());
    if relation.is_composition() {
        mapping = mapping.arg("cascade = CascadeType.ALL");
        // orphan removal is only defined for the single-valued and one-to-many sides
        if matches!(cardinality, Cardinality::OneToOne | Cardinality::OneToMany) {
            mapping = mapping.arg("orphanRemoval = true");
        }
    }
    if !relation.is_owner {
        if let Some(mapped_by) = &relation.mapped_by {
            mapping = mapping.arg(format!("mappedBy = \"{}\"", mapped_by));
        }
    }

    let target = &relation.target_class_name;
    let mut field = if relation.is_collection() {
        Field::private(format!("Set<{}>", target), &relation.field_name)
            .initialized("new HashSet<>()")
    } else {
        Field::private(target.as_str(), &relation.field_name)
    };
    field = field.annotated(mapping);

    if !relation.is_owner {
        field = field.annotated(Annotation::marker("JsonIgnore"));
    } else if cardinality == Cardinality::ManyToMany {
        let (join, inverse) = join_columns(shape.name(), relation);
        field = field.annotated(Annotation::marker("JoinTable").args([
            format!("name = \"{}\"", join_table_name(relation)),
            format!("joinColumns = @JoinColumn(name = \"{}\")", join),
            format!("inverseJoinColumns = @JoinColumn(name = \"{}\")", inverse),
        ]));
    } else {
        field = field.annotated(
            Annotation::marker("JoinColumn").arg(format!("name = \"{}_id\"", relation.field_name)),
        );
    }
    field
}

/// `<fieldName>_<target-lowercase>`
pub fn join_table_name(relation: &RelationField) -> String {
    format!(
        "{}_{}",
        relation.field_name,
        relation.target_class_name.to_lowercase()
    )
}

/// Owner and inverse join column names; distinct even on self-relations
pub fn join_columns(owner_name: &str, relation: &RelationField) -> (String, String) {
    let join = format!("{}_id", owner_name.to_lowercase());
    let inverse = format!("{}_id", relation.target_class_name.to_lowercase());
    if join == inverse {
        (join, format!("{}_id", relation.field_name))
    } else {
        (join, inverse)
    }
}
