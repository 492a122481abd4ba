//! REST controller builder

use super::dto::dto_name;
use super::java::{Annotation, Field, JavaFile, Method, Statement, TypeDecl, TypeKind};
use super::layer_package;
use super::mapper::mapper_name;
use super::service::service_name;
use crate::analysis::ClassShape;
use crate::core::ProjectSettings;

pub fn controller_name(shape: &ClassShape<'_>) -> String {
    format!("{}Controller", shape.name())
}

/// `/api/<lowercase-plural>`
pub fn api_route(shape: &ClassShape<'_>) -> String {
    format!("/api/{}", shape.route())
}

fn not_found_unless_present() -> Statement {
    Statement::when(
        "service.findById(id).isEmpty()",
        vec![Statement::line("return ResponseEntity.notFound().build();")],
    )
}

pub fn controller(shape: &ClassShape<'_>, settings: &ProjectSettings) -> JavaFile {
    let name = shape.name();
    let dto = dto_name(shape);
    let dto_var = format!("{}DTO", shape.var_name());
    let key = &shape.primary_key;
    let root = settings.root_package();

    let mut decl = TypeDecl::new(TypeKind::Class, controller_name(shape))
        .annotated(Annotation::marker("RestController"))
        .annotated(Annotation::marker("RequestMapping").arg(format!("\"{}\"", api_route(shape))))
        .annotated(Annotation::marker("CrossOrigin").arg("origins = \"*\""));
    decl.field(Field::private(service_name(shape), "service").annotated(Annotation::marker("Autowired")));
    decl.field(Field::private(mapper_name(shape), "mapper").annotated(Annotation::marker("Autowired")));

    decl.method(
        Method::new(
            format!("public List<{}> getAll()", dto),
            vec![
                Statement::line("return service.findAll()"),
                Statement::line("        .stream()"),
                Statement::line("        .map(mapper::toDTO)"),
                Statement::line("        .collect(Collectors.toList());"),
            ],
        )
        .annotated(Annotation::marker("GetMapping")),
    );

    decl.method(
        Method::new(
            format!(
                "public ResponseEntity<{}> getById(@PathVariable {} id)",
                dto,
                key.java_type()
            ),
            vec![
                Statement::line("return service.findById(id)"),
                Statement::line("        .map(mapper::toDTO)"),
                Statement::line("        .map(ResponseEntity::ok)"),
                Statement::line("        .orElse(ResponseEntity.notFound().build());"),
            ],
        )
        .annotated(Annotation::marker("GetMapping").arg("\"/{id}\"")),
    );

    if shape.mode.can_write() {
        let mut create = Vec::new();
        if key.is_generated() {
            create.push(Statement::line(format!("{}.{}(null);", dto_var, key.setter())));
        }
        create.push(Statement::line(format!(
            "{} saved = service.saveFromDTO({});",
            name, dto_var
        )));
        create.push(Statement::line(
            "return ResponseEntity.status(HttpStatus.CREATED).body(mapper.toDTO(saved));",
        ));
        decl.method(
            Method::new(
                format!(
                    "public ResponseEntity<{}> create(@RequestBody {} {})",
                    dto, dto, dto_var
                ),
                create,
            )
            .annotated(Annotation::marker("PostMapping")),
        );

        decl.method(
            Method::new(
                format!(
                    "public ResponseEntity<{}> update(@PathVariable {} id, @RequestBody {} {})",
                    dto,
                    key.java_type(),
                    dto,
                    dto_var
                ),
                vec![
                    not_found_unless_present(),
                    Statement::line(format!("{}.{}(id);", dto_var, key.setter())),
                    Statement::line(format!(
                        "{} updated = service.saveFromDTO({});",
                        name, dto_var
                    )),
                    Statement::line("return ResponseEntity.ok(mapper.toDTO(updated));"),
                ],
            )
            .annotated(Annotation::marker("PutMapping").arg("\"/{id}\"")),
        );
    }

    decl.method(
        Method::new(
            format!(
                "public ResponseEntity<Void> delete(@PathVariable {} id)",
                key.java_type()
            ),
            vec![
                not_found_unless_present(),
                Statement::line("service.deleteById(id);"),
                Statement::line("return ResponseEntity.noContent().build();"),
            ],
        )
        .annotated(Annotation::marker("DeleteMapping").arg("\"/{id}\"")),
    );

    let mut file = JavaFile::new(layer_package(settings, "controller"), decl);
    file.import(format!("{}.dto.{}", root, dto));
    file.import(format!("{}.service.{}", root, service_name(shape)));
    file.import(format!("{}.mapper.{}", root, mapper_name(shape)));
    if shape.mode.can_write() {
        file.import(format!("{}.entity.{}", root, name));
        file.import("org.springframework.http.HttpStatus");
    }
    if let Some(import) = key.semantic.java_import() {
        file.import(import);
    }
    file.import("org.springframework.beans.factory.annotation.Autowired");
    file.import("org.springframework.http.ResponseEntity");
    file.import("org.springframework.web.bind.annotation.*");
    file.import("java.util.List");
    file.import("java.util.stream.Collectors");
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ProjectModel;
    use crate::core::{Diagnostics, Diagram, GeneratorConfig, UmlAttribute, UmlClass};

    fn render(class: UmlClass) -> String {
        let id = class.id.clone();
        let d = Diagram::new().with_class(class);
        let settings = ProjectSettings::new("shop", "com.example", GeneratorConfig::default());
        let mut diagnostics = Diagnostics::new();
        let model = ProjectModel::build(&d, settings, &mut diagnostics);
        controller(model.shape(&id).unwrap(), &model.settings).render()
    }

    #[test]
    fn test_full_crud_routes() {
        let text = render(UmlClass::new("c", "Category"));
        assert!(text.contains("@RequestMapping(\"/api/categories\")"));
        assert!(text.contains("@CrossOrigin(origins = \"*\")"));
        assert!(text.contains("public ResponseEntity<CategoryDTO> getById(@PathVariable Long id)"));
        assert!(text.contains("return ResponseEntity.status(HttpStatus.CREATED).body(mapper.toDTO(saved));"));
        assert!(text.contains("        categoryDTO.setId(id);\n        Category updated"));
        assert!(text.contains("return ResponseEntity.noContent().build();"));
        // update and delete both guard on existence
        assert_eq!(text.matches("service.findById(id).isEmpty()").count(), 2);
    }

    #[test]
    fn test_declared_string_key_is_not_cleared_on_create() {
        let text = render(
            UmlClass::new("c", "Country")
                .with_attribute(UmlAttribute::new("code", "string").primary_key()),
        );
        assert!(text.contains("getById(@PathVariable String id)"));
        assert!(!text.contains("setCode(null)"));
        assert!(text.contains("countryDTO.setCode(id);"));
    }

    #[test]
    fn test_abstract_controller_is_read_only() {
        let text = render(UmlClass::new("v", "Vehicle").abstract_class());
        assert!(text.contains("@GetMapping"));
        assert!(text.contains("@DeleteMapping(\"/{id}\")"));
        assert!(!text.contains("@PostMapping"));
        assert!(!text.contains("@PutMapping"));
    }
}
