//! Spring Data repository builder

use super::java::{Annotation, JavaFile, Method, TypeDecl, TypeKind};
use super::layer_package;
use crate::analysis::ClassShape;
use crate::core::ProjectSettings;

pub fn repository_name(shape: &ClassShape<'_>) -> String {
    format!("{}Repository", shape.name())
}

/// JPQL listing query that fetches every direct relation in one statement
pub fn details_query(shape: &ClassShape<'_>) -> String {
    let name = shape.name();
    let alias: String = name.chars().take(1).flat_map(char::to_lowercase).collect();
    let mut query = format!("SELECT DISTINCT {alias} FROM {name} {alias}");
    for relation in &shape.relations {
        query.push_str(&format!(" LEFT JOIN FETCH {}.{}", alias, relation.field_name));
    }
    query
}

pub fn repository(shape: &ClassShape<'_>, settings: &ProjectSettings) -> JavaFile {
    let name = shape.name();
    let mut decl = TypeDecl::new(TypeKind::Interface, repository_name(shape))
        .annotated(Annotation::marker("Repository"))
        .extending(format!(
            "JpaRepository<{}, {}>",
            name,
            shape.primary_key.java_type()
        ));
    decl.method(
        Method::declaration(format!("List<{}> findAllWithDetails()", name))
            .annotated(Annotation::marker("Query").arg(format!("\"{}\"", details_query(shape)))),
    );

    let mut file = JavaFile::new(layer_package(settings, "repository"), decl);
    file.import(format!("{}.entity.{}", settings.root_package(), name));
    file.import("org.springframework.data.jpa.repository.JpaRepository");
    file.import("org.springframework.data.jpa.repository.Query");
    file.import("org.springframework.stereotype.Repository");
    file.import("java.util.List");
    if let Some(import) = shape.primary_key.semantic.java_import() {
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
    fn test_fetch_query_covers_every_relation() {
        let diagram = Diagram::new()
            .with_class(UmlClass::new("c", "Customer"))
            .with_class(UmlClass::new("o", "Order"))
            .with_class(UmlClass::new("t", "Tag"))
            .with_relation(
                UmlRelation::new("r1", "c", "o", RelationKind::Association).with_multiplicity("1", "*"),
            )
            .with_relation(
                UmlRelation::new("r2", "o", "t", RelationKind::Association).with_multiplicity("*", "*"),
            );
        let settings = ProjectSettings::new("shop", "com.example", GeneratorConfig::default());
        let mut diagnostics = Diagnostics::new();
        let model = ProjectModel::build(&diagram, settings, &mut diagnostics);
        let order = model.shape("o").unwrap();
        assert_eq!(
            details_query(order),
            "SELECT DISTINCT o FROM Order o LEFT JOIN FETCH o.customer LEFT JOIN FETCH o.tags"
        );
        let text = repository(order, &model.settings).render();
        assert!(text.contains("public interface OrderRepository extends JpaRepository<Order, Long> {"));
        assert!(text.contains("    List<Order> findAllWithDetails();"));
    }

    #[test]
    fn test_declared_key_type_drives_generic() {
        let diagram = Diagram::new().with_class(
            UmlClass::new("c", "Country")
                .with_attribute(UmlAttribute::new("isoCode", "string").primary_key()),
        );
        let settings = ProjectSettings::new("geo", "org.demo", GeneratorConfig::default());
        let mut diagnostics = Diagnostics::new();
        let model = ProjectModel::build(&diagram, settings, &mut diagnostics);
        let text = repository(model.shape("c").unwrap(), &model.settings).render();
        assert!(text.contains("JpaRepository<Country, String>"));
        assert!(text.contains("@Query(\"SELECT DISTINCT c FROM Country c\")"));
    }
}
