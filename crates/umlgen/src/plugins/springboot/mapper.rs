//! Entity/DTO mapper builder
//!
//! `toDTO` copies scalars and resolves each owning to-one relation to its
//! target key. `toEntity` copies scalars only; attaching related entities is
//! the service's job.

use super::dto::dto_name;
use super::java::{Annotation, JavaFile, Method, Statement, TypeDecl, TypeKind};
use super::layer_package;
use crate::analysis::ClassShape;
use crate::core::ProjectSettings;

pub fn mapper_name(shape: &ClassShape<'_>) -> String {
    format!("{}Mapper", shape.name())
}

pub fn mapper(shape: &ClassShape<'_>, settings: &ProjectSettings) -> JavaFile {
    let name = shape.name();
    let dto = dto_name(shape);
    let entity_var = shape.var_name();
    let dto_var = format!("{}DTO", entity_var);
    let key = &shape.primary_key;

    let mut to_dto = vec![
        Statement::when(
            format!("{} == null", entity_var),
            vec![Statement::line("return null;")],
        ),
        Statement::Blank,
        Statement::line(format!("{} {} = new {}();", dto, dto_var, dto)),
        Statement::line(format!(
            "{}.{}({}.{}());",
            dto_var,
            key.setter(),
            entity_var,
            key.getter()
        )),
    ];
    for scalar in shape.instance_scalars() {
        to_dto.push(Statement::line(format!(
            "{}.{}({}.{}());",
            dto_var,
            scalar.setter(),
            entity_var,
            scalar.getter()
        )));
    }
    for fk in &shape.foreign_keys {
        to_dto.push(Statement::when(
            format!("{}.{}() != null", entity_var, fk.relation_getter()),
            vec![Statement::line(format!(
                "{}.{}({}.{}().{}());",
                dto_var,
                fk.id_setter(),
                entity_var,
                fk.relation_getter(),
                fk.target_key_getter()
            ))],
        ));
    }
    to_dto.push(Statement::line(format!("return {};", dto_var)));

    let mut decl = TypeDecl::new(TypeKind::Class, mapper_name(shape))
        .annotated(Annotation::marker("Component"));
    decl.method(Method::new(
        format!("public {} toDTO({} {})", dto, name, entity_var),
        to_dto,
    ));

    if shape.mode.can_write() {
        let mut to_entity = vec![
            Statement::when(
                format!("{} == null", dto_var),
                vec![Statement::line("return null;")],
            ),
            Statement::Blank,
            Statement::line(format!("{} {} = new {}();", name, entity_var, name)),
            Statement::line(format!(
                "{}.{}({}.{}());",
                entity_var,
                key.setter(),
                dto_var,
                key.getter()
            )),
        ];
        for scalar in shape.instance_scalars() {
            to_entity.push(Statement::line(format!(
                "{}.{}({}.{}());",
                entity_var,
                scalar.setter(),
                dto_var,
                scalar.getter()
            )));
        }
        to_entity.push(Statement::line(format!("return {};", entity_var)));
        decl.method(Method::new(
            format!("public {} toEntity({} {})", name, dto, dto_var),
            to_entity,
        ));
    }

    let root = settings.root_package();
    let mut file = JavaFile::new(layer_package(settings, "mapper"), decl);
    file.import(format!("{}.entity.{}", root, name));
    file.import(format!("{}.dto.{}", root, dto));
    file.import("org.springframework.stereotype.Component");
    file
}
