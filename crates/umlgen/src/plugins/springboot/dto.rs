//! DTO builder
//!
//! The DTO is the serialization boundary: primary key, instance scalars and
//! one flat id per owning to-one relation. Never a nested object, never a
//! collection.

use super::java::{Annotation, Field, JavaFile, TypeDecl, TypeKind};
use super::layer_package;
use crate::analysis::ClassShape;
use crate::core::ProjectSettings;

pub fn dto_name(shape: &ClassShape<'_>) -> String {
    format!("{}DTO", shape.name())
}

pub fn dto(shape: &ClassShape<'_>, settings: &ProjectSettings) -> JavaFile {
    let mut decl = TypeDecl::new(TypeKind::Class, dto_name(shape))
        .annotated(Annotation::marker("Getter"))
        .annotated(Annotation::marker("Setter"))
        .annotated(Annotation::marker("NoArgsConstructor"))
        .annotated(Annotation::marker("AllArgsConstructor"));

    let mut type_imports = Vec::new();
    let key = &shape.primary_key;
    decl.field(Field::private(key.java_type(), &key.name));
    type_imports.extend(key.semantic.java_import());

    for scalar in shape.instance_scalars() {
        decl.field(Field::private(scalar.semantic.java_type(), scalar.name()));
        type_imports.extend(scalar.semantic.java_import());
    }
    for fk in &shape.foreign_keys {
        decl.field(Field::private(fk.key.java_type(), &fk.id_field));
        type_imports.extend(fk.key.java_import());
    }

    let mut file = JavaFile::new(layer_package(settings, "dto"), decl);
    for import in [
        "lombok.AllArgsConstructor",
        "lombok.Getter",
        "lombok.NoArgsConstructor",
        "lombok.Setter",
    ] {
        file.import(import);
    }
    for import in type_imports {
        file.import(import);
    }
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ProjectModel;
    use crate::core::{
        Diagnostics, Diagram, GeneratorConfig, RelationKind, UmlAttribute, UmlClass, UmlRelation,
    };

    #[test]
    fn test_flat_ids_only_for_owning_to_one() {
        let diagram = Diagram::new()
            .with_class(UmlClass::new("c", "Customer"))
            .with_class(
                UmlClass::new("o", "Order")
                    .with_attribute(UmlAttribute::new("id", "Long"))
                    .with_attribute(UmlAttribute::new("placedAt", "LocalDateTime"))
                    .with_attribute(UmlAttribute::new("customerId", "Long")),
            )
            .with_relation(
                UmlRelation::new("r", "c", "o", RelationKind::Association).with_multiplicity("1", "*"),
            );
        let settings = ProjectSettings::new("shop", "com.example", GeneratorConfig::default());
        let mut diagnostics = Diagnostics::new();
        let model = ProjectModel::build(&diagram, settings, &mut diagnostics);

        let order = dto(model.shape("o").unwrap(), &model.settings).render();
        assert!(order.contains("public class OrderDTO {"));
        assert!(order.contains("    private Long id;\n    private LocalDateTime placedAt;\n    private Long customerId;\n"));
        assert_eq!(order.matches("customerId").count(), 1);
        assert!(order.contains("import java.time.LocalDateTime;"));

        let customer = dto(model.shape("c").unwrap(), &model.settings).render();
        assert!(!customer.contains("orders"));
        assert!(!customer.contains("Set<"));
    }
}
