//! Service builder
//!
//! `saveFromDTO` turns a DTO into an entity and attaches every owning to-one
//! target by id. What happens when an id does not resolve is decided by
//! [`ForeignKeyPolicy`].

use std::collections::HashSet;

use super::dto::dto_name;
use super::java::{Annotation, Field, JavaFile, Method, Statement, TypeDecl, TypeKind};
use super::layer_package;
use super::mapper::mapper_name;
use super::repository::repository_name;
use crate::analysis::{ClassShape, ForeignKey};
use crate::core::naming::lower_first;
use crate::core::{ForeignKeyPolicy, ProjectSettings};

pub fn service_name(shape: &ClassShape<'_>) -> String {
    format!("{}Service", shape.name())
}

/// Field holding the repository of a foreign-key target
fn target_repository_var(shape: &ClassShape<'_>, fk: &ForeignKey) -> String {
    if fk.target_class_id == shape.id() {
        "repository".to_string()
    } else {
        format!("{}Repository", lower_first(&fk.target_class_name))
    }
}

fn autowired(ty: impl Into<String>, name: impl Into<String>) -> Field {
    Field::private(ty, name).annotated(Annotation::marker("Autowired"))
}

pub fn service(shape: &ClassShape<'_>, settings: &ProjectSettings) -> JavaFile {
    let name = shape.name();
    let root = settings.root_package();
    let key_type = shape.primary_key.java_type();

    let mut decl = TypeDecl::new(TypeKind::Class, service_name(shape))
        .annotated(Annotation::marker("Service"));
    decl.field(autowired(repository_name(shape), "repository"));
    decl.field(autowired(mapper_name(shape), "mapper"));

    let mut file_imports: Vec<String> = vec![
        format!("{}.entity.{}", root, name),
        format!("{}.repository.{}", root, repository_name(shape)),
        format!("{}.mapper.{}", root, mapper_name(shape)),
        "org.springframework.beans.factory.annotation.Autowired".to_string(),
        "org.springframework.stereotype.Service".to_string(),
        "java.util.List".to_string(),
        "java.util.Optional".to_string(),
    ];
    if let Some(import) = shape.primary_key.semantic.java_import() {
        file_imports.push(import.to_string());
    }

    let writable = shape.mode.can_write();
    if writable {
        let mut injected = HashSet::new();
        for fk in &shape.foreign_keys {
            if fk.target_class_id == shape.id() || !injected.insert(fk.target_class_id.as_str()) {
                continue;
            }
            let repo = format!("{}Repository", fk.target_class_name);
            file_imports.push(format!("{}.repository.{}", root, repo));
            decl.field(autowired(repo, target_repository_var(shape, fk)));
        }
    }

    decl.method(Method::new(
        format!("public List<{}> findAll()", name),
        vec![Statement::line("return repository.findAllWithDetails();")],
    ));
    decl.method(Method::new(
        format!("public Optional<{}> findById({} id)", name, key_type),
        vec![Statement::line("return repository.findById(id);")],
    ));
    if writable {
        decl.method(Method::new(
            format!("public {} save({} entity)", name, name),
            vec![Statement::line("return repository.save(entity);")],
        ));
    }
    decl.method(Method::new(
        format!("public void deleteById({} id)", key_type),
        vec![Statement::line("repository.deleteById(id);")],
    ));

    if writable {
        let policy = settings.config.foreign_key_policy;
        if policy == ForeignKeyPolicy::Reject && !shape.foreign_keys.is_empty() {
            file_imports.push("org.springframework.http.HttpStatus".to_string());
            file_imports.push("org.springframework.web.server.ResponseStatusException".to_string());
        }
        file_imports.push(format!("{}.dto.{}", root, dto_name(shape)));
        decl.method(save_from_dto(shape, policy));
    }

    let mut file = JavaFile::new(layer_package(settings, "service"), decl);
    for import in file_imports {
        file.import(import);
    }
    file
}

fn save_from_dto(shape: &ClassShape<'_>, policy: ForeignKeyPolicy) -> Method {
    let entity_var = shape.var_name();
    let dto_var = format!("{}DTO", entity_var);

    let mut body = vec![
        Statement::line(format!("{} {} = mapper.toEntity({});", shape.name(), entity_var, dto_var)),
        Statement::Blank,
    ];
    for fk in &shape.foreign_keys {
        let id = format!("{}.{}()", dto_var, fk.id_getter());
        let lookup = format!("{}.findById({})", target_repository_var(shape, fk), id);
        let attach = match policy {
            ForeignKeyPolicy::Ignore => vec![Statement::line(format!(
                "{}.ifPresent({}::{});",
                lookup,
                entity_var,
                fk.relation_setter()
            ))],
            ForeignKeyPolicy::Reject => vec![
                Statement::line(format!("{}.{}({}", entity_var, fk.relation_setter(), lookup)),
                Statement::line(format!(
                    "        .orElseThrow(() -> new ResponseStatusException(HttpStatus.NOT_FOUND, \"{} not found: \" + {})));",
                    fk.target_class_name, id
                )),
            ],
        };
        body.push(Statement::when(format!("{} != null", id), attach));
    }
    body.push(Statement::line(format!("return repository.save({});", entity_var)));

    Method::new(
        format!(
            "public {} saveFromDTO({} {})",
            shape.name(),
            dto_name(shape),
            dto_var
        ),
        body,
    )
}
