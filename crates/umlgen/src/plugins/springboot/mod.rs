//! Spring Boot server plugin
//!
//! Emits a Maven project with one entity, DTO, mapper, repository, service
//! and controller per class, plus the build, runtime and documentation files.

mod controller;
mod dto;
mod entity;
mod java;
mod mapper;
mod project;
mod readme;
mod repository;
mod service;

use tracing::{debug, span, Level};

use crate::analysis::ProjectModel;
use crate::core::{ArtifactKind, ArtifactSet, Emitter, ExportTarget, ProjectSettings};

pub use controller::{api_route, controller, controller_name};
pub use dto::{dto, dto_name};
pub use entity::{entity, join_columns, join_table_name};
pub use java::{Annotation, Field, JavaFile, Member, Method, Statement, TypeDecl, TypeKind};
pub use mapper::{mapper, mapper_name};
pub use readme::{example_request, example_response};
pub use repository::{details_query, repository, repository_name};
pub use service::{service, service_name};

/// `<basePackage>.<segment>.<layer>`
pub(crate) fn layer_package(settings: &ProjectSettings, layer: &str) -> String {
    format!("{}.{}", settings.root_package(), layer)
}

/// Path of a class in one layer, e.g. `.../dto/OrderDTO.java`
pub fn layer_path(settings: &ProjectSettings, layer: &str, type_name: &str) -> String {
    format!("{}/{}/{}.java", settings.java_source_root(), layer, type_name)
}

/// Server stack emitter
#[derive(Debug, Default, Clone, Copy)]
pub struct SpringBootEmitter;

impl SpringBootEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for SpringBootEmitter {
    fn name(&self) -> &'static str {
        "springboot"
    }

    fn target(&self) -> ExportTarget {
        ExportTarget::Server
    }

    fn combined_root(&self) -> &'static str {
        "backend"
    }

    fn emit(&self, model: &ProjectModel<'_>) -> ArtifactSet {
        let emit_span = span!(Level::DEBUG, "emit_server", classes = model.shapes().len());
        let _enter = emit_span.enter();

        let settings = &model.settings;
        let mut set = ArtifactSet::new();

        for shape in model.shapes() {
            set.add(
                layer_path(settings, "entity", shape.name()),
                ArtifactKind::Entity,
                entity(shape, settings).render(),
            );
            if !shape.mode.has_api() {
                debug!(class = shape.name(), "Interface emitted as type only");
                continue;
            }
            set.add(
                layer_path(settings, "dto", &dto_name(shape)),
                ArtifactKind::Dto,
                dto(shape, settings).render(),
            );
            set.add(
                layer_path(settings, "mapper", &mapper_name(shape)),
                ArtifactKind::Mapper,
                mapper(shape, settings).render(),
            );
            set.add(
                layer_path(settings, "repository", &repository_name(shape)),
                ArtifactKind::Repository,
                repository(shape, settings).render(),
            );
            set.add(
                layer_path(settings, "service", &service_name(shape)),
                ArtifactKind::Service,
                service(shape, settings).render(),
            );
            set.add(
                layer_path(settings, "controller", &controller_name(shape)),
                ArtifactKind::Controller,
                controller(shape, settings).render(),
            );
        }

        set.add(
            layer_path(settings, "config", "SwaggerConfig"),
            ArtifactKind::BuildConfig,
            project::swagger_config(settings).render(),
        );
        set.add(
            format!(
                "{}/{}.java",
                settings.java_source_root(),
                settings.application_class()
            ),
            ArtifactKind::BuildConfig,
            project::application_class(settings).render(),
        );
        set.add("pom.xml", ArtifactKind::BuildConfig, project::pom_xml(settings));
        set.add(
            "src/main/resources/application.properties",
            ArtifactKind::BuildConfig,
            project::application_properties(settings),
        );
        set.add("Dockerfile", ArtifactKind::BuildConfig, project::dockerfile(settings));
        set.add(
            "docker-compose.yml",
            ArtifactKind::BuildConfig,
            project::docker_compose(settings),
        );
        set.add(
            "README.md",
            ArtifactKind::Documentation,
            readme::readme(model, self.version()),
        );

        debug!(files = set.len(), bytes = set.total_bytes(), "Server artifacts emitted");
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Diagnostics, Diagram, GeneratorConfig, UmlClass};

    #[test]
    fn test_layout_paths() {
        let d = Diagram::new()
            .with_class(UmlClass::new("o", "Order"))
            .with_class(UmlClass::new("n", "Named").interface());
        let settings = ProjectSettings::new("shop", "com.example", GeneratorConfig::default());
        let mut diagnostics = Diagnostics::new();
        let model = ProjectModel::build(&d, settings, &mut diagnostics);
        let set = SpringBootEmitter::new().emit(&model);

        let root = "src/main/java/com/example/shop";
        for path in [
            format!("{root}/entity/Order.java"),
            format!("{root}/dto/OrderDTO.java"),
            format!("{root}/mapper/OrderMapper.java"),
            format!("{root}/repository/OrderRepository.java"),
            format!("{root}/service/OrderService.java"),
            format!("{root}/controller/OrderController.java"),
            format!("{root}/entity/Named.java"),
            format!("{root}/config/SwaggerConfig.java"),
            format!("{root}/ShopApplication.java"),
            "pom.xml".to_string(),
            "src/main/resources/application.properties".to_string(),
            "Dockerfile".to_string(),
            "docker-compose.yml".to_string(),
            "README.md".to_string(),
        ] {
            assert!(set.contains(&path), "missing {}", path);
        }
        assert!(!set.contains(&format!("{root}/dto/NamedDTO.java")));
        assert_eq!(set.len(), 14);
    }
}
