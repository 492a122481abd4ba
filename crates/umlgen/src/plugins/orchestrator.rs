//! Plugin orchestrator for the generation pipeline
//!
//! The orchestrator runs the shared analysis once and hands the resulting
//! [`ProjectModel`] to every emitter selected by the export target:
//! Diagram → Analyzer → ProjectModel → Emitters → ArtifactSet

use std::fmt::Write as _;
use tracing::{debug, info, span, warn, Level};

use crate::analysis::{ProjectModel, RelationMetadata};
use crate::core::{
    ArtifactKind, ArtifactSet, Diagnostics, Diagram, Emitter, ExportError, ExportResult,
    ExportTarget, ProjectSettings,
};
use crate::plugins::flutter::FlutterEmitter;
use crate::plugins::springboot::SpringBootEmitter;

/// Everything one generation run produced, before anything touches disk
#[derive(Debug)]
pub struct Generation {
    pub target: ExportTarget,
    pub artifacts: ArtifactSet,
    pub metadata: RelationMetadata,
    pub diagnostics: Diagnostics,
}

/// Plugin orchestrator that coordinates the analyzer and the emitters
///
/// Emitters are kept in registration order; that order decides nothing but
/// the order of sections in the combined README.
pub struct Orchestrator {
    emitters: Vec<Box<dyn Emitter>>,
}

impl Orchestrator {
    /// Create a new orchestrator with no emitters
    pub fn new() -> Self {
        Self {
            emitters: Vec::new(),
        }
    }

    /// Create a new orchestrator with the server and client emitters registered
    pub fn with_all_plugins() -> Self {
        let mut orchestrator = Self::new();
        orchestrator.register_emitter(Box::new(SpringBootEmitter::new()));
        orchestrator.register_emitter(Box::new(FlutterEmitter::new()));
        orchestrator
    }

    /// Register an emitter; a later emitter with the same name replaces the earlier one
    pub fn register_emitter(&mut self, emitter: Box<dyn Emitter>) {
        debug!(emitter = emitter.name(), "Registering emitter");
        self.emitters.retain(|e| e.name() != emitter.name());
        self.emitters.push(emitter);
    }

    /// Names of registered emitters, in registration order
    pub fn emitter_names(&self) -> Vec<&'static str> {
        self.emitters.iter().map(|e| e.name()).collect()
    }

    fn selected(&self, target: ExportTarget) -> Vec<&dyn Emitter> {
        self.emitters
            .iter()
            .filter(|e| target.includes(e.target()))
            .map(|e| e.as_ref())
            .collect()
    }

    /// Analyze `diagram` and run every emitter `target` selects
    ///
    /// A single selected emitter writes at the artifact root; the combined
    /// target places each stack under its own root and adds a top-level
    /// README.
    pub fn generate(
        &self,
        diagram: &Diagram,
        settings: ProjectSettings,
        target: ExportTarget,
    ) -> ExportResult<Generation> {
        let generate_span = span!(
            Level::INFO,
            "generate",
            target = target.as_str(),
            classes = diagram.class_count(),
            relations = diagram.relation_count()
        );
        let _enter = generate_span.enter();

        let emitters = self.selected(target);
        if emitters.is_empty() {
            warn!(target = target.as_str(), "No emitter registered for target");
            return Err(ExportError::invalid_request(format!(
                "No emitter registered for target {}",
                target.as_str()
            )));
        }

        let mut diagnostics = Diagnostics::new();
        let model = ProjectModel::build(diagram, settings, &mut diagnostics);

        let combined = target == ExportTarget::Fullstack || emitters.len() > 1;
        let mut artifacts = ArtifactSet::new();
        for emitter in &emitters {
            let output = emitter.emit(&model);
            debug!(emitter = emitter.name(), files = output.len(), "Emitter finished");
            if combined {
                artifacts.merge_under(emitter.combined_root(), output);
            } else {
                artifacts = output;
            }
        }
        if combined {
            artifacts.add(
                "README.md",
                ArtifactKind::Documentation,
                combined_readme(&model, &emitters),
            );
        }

        info!(
            files = artifacts.len(),
            bytes = artifacts.total_bytes(),
            warnings = diagnostics.warning_count(),
            "Generation completed"
        );

        Ok(Generation {
            target,
            artifacts,
            metadata: model.metadata,
            diagnostics,
        })
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn combined_readme(model: &ProjectModel<'_>, emitters: &[&dyn Emitter]) -> String {
    let settings = &model.settings;
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", settings.project_name);
    out.push_str("Generated from a UML class diagram.\n\n");
    out.push_str("## Projects\n\n");
    for emitter in emitters {
        let what = match emitter.target() {
            ExportTarget::Server => "REST API server",
            ExportTarget::Client => "client app",
            ExportTarget::Fullstack => "project",
        };
        let _ = writeln!(
            out,
            "- `{}/`: {} ({})",
            emitter.combined_root(),
            what,
            emitter.name()
        );
    }
    out.push_str("\nEach project has its own README with build and run instructions.\n\n");
    out.push_str("## Classes\n\n");
    for shape in model.shapes() {
        let _ = writeln!(out, "- {} ({:?})", shape.name(), shape.kind);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GeneratorConfig, RelationKind, UmlClass, UmlRelation};

    fn settings() -> ProjectSettings {
        ProjectSettings::new("shop", "com.example", GeneratorConfig::default())
    }

    fn diagram() -> Diagram {
        Diagram::new()
            .with_class(UmlClass::new("o", "Order"))
            .with_class(UmlClass::new("p", "Product"))
            .with_relation(
                UmlRelation::new("r", "o", "p", RelationKind::Association).with_multiplicity("1", "*"),
            )
            .with_relation(UmlRelation::new("bad", "o", "zz", RelationKind::Association))
    }

    #[test]
    fn test_orchestrator_creation() {
        let orchestrator = Orchestrator::new();
        assert!(orchestrator.emitter_names().is_empty());
        let all = Orchestrator::with_all_plugins();
        assert_eq!(all.emitter_names(), vec!["springboot", "flutter"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut orchestrator = Orchestrator::with_all_plugins();
        orchestrator.register_emitter(Box::new(SpringBootEmitter::new()));
        assert_eq!(orchestrator.emitter_names(), vec!["flutter", "springboot"]);
    }

    #[test]
    fn test_single_target_writes_at_root() {
        let orchestrator = Orchestrator::with_all_plugins();
        let generation = orchestrator
            .generate(&diagram(), settings(), ExportTarget::Server)
            .unwrap();
        assert!(generation.artifacts.contains("pom.xml"));
        assert!(!generation.artifacts.paths().any(|p| p.starts_with("frontend/")));
        assert_eq!(generation.diagnostics.warning_count(), 1);
        assert_eq!(generation.metadata.fields("o").len(), 1);
    }

    #[test]
    fn test_fullstack_combines_under_roots() {
        let orchestrator = Orchestrator::with_all_plugins();
        let generation = orchestrator
            .generate(&diagram(), settings(), ExportTarget::Fullstack)
            .unwrap();
        let artifacts = &generation.artifacts;
        assert!(artifacts.contains("backend/pom.xml"));
        assert!(artifacts.contains("frontend/pubspec.yaml"));
        assert!(artifacts.contains("backend/README.md"));
        assert!(artifacts.contains("frontend/README.md"));
        let readme = artifacts.content("README.md").unwrap();
        assert!(readme.contains("- `backend/`: REST API server (springboot)"));
        assert!(readme.contains("- `frontend/`: client app (flutter)"));
    }

    #[test]
    fn test_missing_emitter_is_request_error() {
        let orchestrator = Orchestrator::new();
        let err = orchestrator
            .generate(&diagram(), settings(), ExportTarget::Client)
            .unwrap_err();
        assert!(err.is_request_error());
    }
}
