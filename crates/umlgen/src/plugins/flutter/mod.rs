//! Flutter client plugin
//!
//! Emits a model, an HTTP service and list/detail/form screens per class
//! that has a REST resource, plus the package manifest, API configuration
//! and entry point.

mod codec;
mod model;
mod project;
mod screens;
mod service;

use tracing::{debug, span, Level};

use crate::analysis::ProjectModel;
use crate::core::{ArtifactKind, ArtifactSet, Emitter, ExportTarget};

pub use codec::{decode, encode, format_datetime, parse_datetime, CodecError, FieldValue, ModelInstance};
pub use model::{DartField, DartModel, FieldRole};
pub use project::{api_config, main_dart, menu_shapes, pubspec};
pub use screens::{
    detail_screen, detail_screen_name, form_screen, form_screen_name, list_screen,
    list_screen_name,
};
pub use service::{client_service, client_service_name};

/// Client stack emitter
#[derive(Debug, Default, Clone, Copy)]
pub struct FlutterEmitter;

impl FlutterEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for FlutterEmitter {
    fn name(&self) -> &'static str {
        "flutter"
    }

    fn target(&self) -> ExportTarget {
        ExportTarget::Client
    }

    fn combined_root(&self) -> &'static str {
        "frontend"
    }

    fn emit(&self, model: &ProjectModel<'_>) -> ArtifactSet {
        let emit_span = span!(Level::DEBUG, "emit_client", classes = model.shapes().len());
        let _enter = emit_span.enter();

        let settings = &model.settings;
        let mut set = ArtifactSet::new();

        for shape in model.api_shapes() {
            let snake = shape.snake_name();
            set.add(
                format!("lib/models/{}.dart", snake),
                ArtifactKind::Model,
                DartModel::from_shape(shape).render(),
            );
            set.add(
                format!("lib/services/{}_service.dart", snake),
                ArtifactKind::ClientService,
                client_service(shape),
            );
            set.add(
                format!("lib/screens/{}_list_screen.dart", snake),
                ArtifactKind::Screen,
                list_screen(shape),
            );
            set.add(
                format!("lib/screens/{}_detail_screen.dart", snake),
                ArtifactKind::Screen,
                detail_screen(shape),
            );
            match form_screen(shape) {
                Some(form) => set.add(
                    format!("lib/screens/{}_form_screen.dart", snake),
                    ArtifactKind::Screen,
                    form,
                ),
                None => debug!(class = shape.name(), "Read-only class emitted without a form"),
            }
        }

        set.add("pubspec.yaml", ArtifactKind::BuildConfig, pubspec(settings));
        set.add(
            "lib/config/api_config.dart",
            ArtifactKind::BuildConfig,
            api_config(settings),
        );
        set.add("lib/main.dart", ArtifactKind::BuildConfig, main_dart(model));
        set.add(
            "README.md",
            ArtifactKind::Documentation,
            project::readme(model, self.version()),
        );

        debug!(files = set.len(), bytes = set.total_bytes(), "Client artifacts emitted");
        set
    }
}
