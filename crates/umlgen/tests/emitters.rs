//! Server and client output agree on field names, routes and keys

use umlgen::plugins::flutter::{self, DartModel, FieldRole};
use umlgen::plugins::springboot;
use umlgen::prelude::*;

fn shop() -> Diagram {
    Diagram::new()
        .with_class(
            UmlClass::new("c", "Customer")
                .with_attribute(UmlAttribute::new("email", "string").unique())
                .with_attribute(UmlAttribute::new("birthday", "LocalDate").nullable(true)),
        )
        .with_class(
            UmlClass::new("o", "Order")
                .with_attribute(UmlAttribute::new("id", "string"))
                .with_attribute(UmlAttribute::new("total", "BigDecimal"))
                .with_attribute(UmlAttribute::new("paid", "boolean")),
        )
        .with_class(
            UmlClass::new("p", "Product")
                .with_attribute(UmlAttribute::new("sku", "string").primary_key())
                .with_attribute(UmlAttribute::new("price", "double")),
        )
        .with_class(UmlClass::new("i", "OrderItem").with_attribute(UmlAttribute::new("quantity", "int")))
        .with_relation(
            UmlRelation::new("r1", "c", "o", RelationKind::Association).with_multiplicity("1", "*"),
        )
        .with_relation(
            UmlRelation::new("r2", "o", "p", RelationKind::Association)
                .with_multiplicity("*", "*")
                .with_association_class("i"),
        )
}

fn settings(config: GeneratorConfig) -> ProjectSettings {
    ProjectSettings::new("My Shop", "com.example", config)
}

#[test]
fn test_dto_and_client_model_share_fields() {
    let diagram = shop();
    let mut diagnostics = Diagnostics::new();
    let model = ProjectModel::build(&diagram, settings(GeneratorConfig::default()), &mut diagnostics);

    for shape in model.api_shapes() {
        let dto = springboot::dto(shape, &model.settings).render();
        let dart = DartModel::from_shape(shape);

        let dto_fields: Vec<&str> = dto
            .lines()
            .filter_map(|l| l.trim().strip_prefix("private "))
            .filter_map(|l| l.strip_suffix(';'))
            .filter_map(|l| l.rsplit(' ').next())
            .collect();
        let dart_fields: Vec<&str> = dart.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(dto_fields, dart_fields, "{} disagrees", shape.name());
    }
}

#[test]
fn test_declared_id_never_duplicates_the_key() {
    let diagram = shop();
    let mut diagnostics = Diagnostics::new();
    let model = ProjectModel::build(&diagram, settings(GeneratorConfig::default()), &mut diagnostics);
    let order = model.shape_named("Order").unwrap();

    let dto = springboot::dto(order, &model.settings).render();
    assert_eq!(dto.matches(" id;").count(), 1);
    assert!(dto.contains("private Long id;"));

    let dart = DartModel::from_shape(order);
    assert_eq!(dart.fields.iter().filter(|f| f.name == "id").count(), 1);
    assert_eq!(dart.key().dart_type(), "int");
    assert!(diagnostics
        .of_kind(umlgen::DiagnosticKind::FilteredAttribute)
        .any(|d| d.message.contains("Order.id")));
}

#[test]
fn test_foreign_keys_follow_the_target_key() {
    let diagram = shop();
    let mut diagnostics = Diagnostics::new();
    let model = ProjectModel::build(&diagram, settings(GeneratorConfig::default()), &mut diagnostics);
    let item = DartModel::from_shape(model.shape("i").unwrap());

    let keys: Vec<_> = item
        .foreign_keys()
        .map(|f| (f.name.as_str(), f.dart_type()))
        .collect();
    assert_eq!(keys, vec![("orderId", "int"), ("productId", "String")]);
    assert!(item.fields.iter().any(|f| f.role == FieldRole::Scalar && f.name == "quantity"));

    let dto = springboot::dto(model.shape("i").unwrap(), &model.settings).render();
    assert!(dto.contains("private Long orderId;"));
    assert!(dto.contains("private String productId;"));
}

#[test]
fn test_subclass_api_carries_inherited_foreign_keys() {
    let diagram = Diagram::new()
        .with_class(
            UmlClass::new("a", "Animal")
                .abstract_class()
                .with_attribute(UmlAttribute::new("name", "string")),
        )
        .with_class(UmlClass::new("d", "Dog").with_attribute(UmlAttribute::new("breed", "string")))
        .with_class(UmlClass::new("p", "Person"))
        .with_relation(UmlRelation::new("r1", "d", "a", RelationKind::Inheritance))
        .with_relation(
            UmlRelation::new("r2", "p", "a", RelationKind::Association).with_multiplicity("1", "*"),
        );
    let mut diagnostics = Diagnostics::new();
    let model = ProjectModel::build(&diagram, settings(GeneratorConfig::default()), &mut diagnostics);
    let dog = model.shape("d").unwrap();

    let dto = springboot::dto(dog, &model.settings).render();
    assert!(dto.contains("private Long personId;"));
    let mapper = springboot::mapper(dog, &model.settings).render();
    assert!(mapper.contains("dogDTO.setPersonId(dog.getPerson().getId());"));
    let service = springboot::service(dog, &model.settings).render();
    assert!(service.contains("personRepository.findById(dogDTO.getPersonId()).ifPresent(dog::setPerson);"));
    // the field itself lives on the superclass entity
    let entity = springboot::entity(dog, &model.settings).render();
    assert!(!entity.contains("private Person person;"));

    let dart = DartModel::from_shape(dog);
    let names: Vec<_> = dart.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "breed", "personId"]);
}

#[test]
fn test_routes_match_across_stacks() {
    let diagram = shop();
    let mut diagnostics = Diagnostics::new();
    let model = ProjectModel::build(&diagram, settings(GeneratorConfig::default()), &mut diagnostics);

    for shape in model.api_shapes() {
        let route = springboot::api_route(shape);
        let controller = springboot::controller(shape, &model.settings).render();
        assert!(controller.contains(&format!("@RequestMapping(\"{}\")", route)));
        let service = flutter::client_service(shape);
        assert!(service.contains(&format!("${{ApiConfig.baseUrl}}{}'", route)));
    }
}

#[test]
fn test_form_selectors_use_the_target_listing() {
    let diagram = shop();
    let mut diagnostics = Diagnostics::new();
    let model = ProjectModel::build(&diagram, settings(GeneratorConfig::default()), &mut diagnostics);

    let form = flutter::form_screen(model.shape("i").unwrap()).unwrap();
    assert!(form.contains("OrderService().getAll()"));
    assert!(form.contains("ProductService().getAll()"));
    assert!(form.contains("DropdownButtonFormField<int>"));
    assert!(form.contains("DropdownButtonFormField<String>"));
}

#[test]
fn test_reject_policy_reaches_the_service() {
    let diagram = shop();
    let mut diagnostics = Diagnostics::new();
    let config = GeneratorConfig::default().with_foreign_key_policy(ForeignKeyPolicy::Reject);
    let model = ProjectModel::build(&diagram, settings(config), &mut diagnostics);

    let service = springboot::service(model.shape("o").unwrap(), &model.settings).render();
    assert!(service.contains("\"Customer not found: \""));

    let lenient = ProjectModel::build(&diagram, settings(GeneratorConfig::default()), &mut diagnostics);
    let service = springboot::service(lenient.shape("o").unwrap(), &lenient.settings).render();
    assert!(!service.contains("not found: "));
}

#[test]
fn test_fullstack_layout() {
    let generation =
        umlgen::generate(&shop(), settings(GeneratorConfig::default()), ExportTarget::Fullstack).unwrap();
    let artifacts = &generation.artifacts;
    let java = "backend/src/main/java/com/example/myshop";

    for (layer, suffix) in [
        ("entity", ""),
        ("dto", "DTO"),
        ("mapper", "Mapper"),
        ("repository", "Repository"),
        ("service", "Service"),
        ("controller", "Controller"),
    ] {
        let path = format!("{}/{}/OrderItem{}.java", java, layer, suffix);
        assert!(artifacts.contains(&path), "missing {}", path);
    }
    for path in [
        "backend/pom.xml",
        "backend/Dockerfile",
        "backend/docker-compose.yml",
        "backend/src/main/resources/application.properties",
        "frontend/pubspec.yaml",
        "frontend/lib/main.dart",
        "frontend/lib/config/api_config.dart",
        "frontend/lib/models/order_item.dart",
        "frontend/lib/services/order_item_service.dart",
        "frontend/lib/screens/order_item_list_screen.dart",
        "frontend/lib/screens/order_item_detail_screen.dart",
        "frontend/lib/screens/order_item_form_screen.dart",
        "README.md",
    ] {
        assert!(artifacts.contains(path), "missing {}", path);
    }

    let readme = artifacts.content("README.md").unwrap();
    assert!(readme.contains("backend/"));
    assert!(readme.contains("frontend/"));
}

#[test]
fn test_single_stack_writes_at_the_root() {
    let generation =
        umlgen::generate(&shop(), settings(GeneratorConfig::default()), ExportTarget::Client).unwrap();
    assert!(generation.artifacts.contains("pubspec.yaml"));
    assert!(generation.artifacts.paths().all(|p| !p.starts_with("frontend/")));
    assert!(generation.artifacts.paths().all(|p| !p.ends_with(".java")));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let first = umlgen::generate(&shop(), settings(GeneratorConfig::default()), ExportTarget::Fullstack).unwrap();
    let second = umlgen::generate(&shop(), settings(GeneratorConfig::default()), ExportTarget::Fullstack).unwrap();
    let a: Vec<_> = first.artifacts.iter().map(|a| (&a.path, &a.content)).collect();
    let b: Vec<_> = second.artifacts.iter().map(|a| (&a.path, &a.content)).collect();
    assert_eq!(a, b);
}
