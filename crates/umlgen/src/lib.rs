//! umlgen - Compile UML class diagrams into a Spring Boot server and a Flutter client
//!
//! A diagram of classes and typed relations is analyzed once into
//! relation-field metadata; both target stacks are emitted from that single
//! analysis, so server DTOs and client models agree on every field name and
//! foreign-key contract.
//!
//! # Quick Start
//!
//! ```rust
//! use umlgen::prelude::*;
//!
//! let diagram = Diagram::new()
//!     .with_class(UmlClass::new("o", "Order"))
//!     .with_class(UmlClass::new("p", "Product"))
//!     .with_relation(
//!         UmlRelation::new("r", "o", "p", RelationKind::Association).with_multiplicity("1", "*"),
//!     );
//!
//! let metadata = umlgen::analyze(&diagram);
//! assert_eq!(metadata.fields("o")[0].field_name, "products");
//! assert_eq!(metadata.fields("p")[0].field_name, "order");
//! ```
//!
//! # Generating code
//!
//! ```rust
//! use umlgen::prelude::*;
//!
//! let diagram = Diagram::new().with_class(UmlClass::new("o", "Order"));
//! let settings = ProjectSettings::new("shop", "com.example", GeneratorConfig::default());
//!
//! let generation = umlgen::generate(&diagram, settings, ExportTarget::Fullstack).unwrap();
//! assert!(generation
//!     .artifacts
//!     .contains("backend/src/main/java/com/example/shop/entity/Order.java"));
//! assert!(generation.artifacts.contains("frontend/lib/models/order.dart"));
//! ```
//!
//! [`scaffold::export`] runs the whole request pipeline, from a validated
//! [`ExportRequest`](scaffold::ExportRequest) to a published archive.

pub mod analysis;
pub mod core;
pub mod plugins;
pub mod scaffold;

pub use analysis::{analyze, analyze_with_diagnostics};
pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{ClassShape, ProjectModel, RelationField, RelationMetadata};
    pub use crate::core::{
        ArchiveFormat, ArtifactSet, Diagnostics, Diagram, Emitter, ExportError, ExportTarget,
        ForeignKeyPolicy, GeneratorConfig, ProjectSettings, RelationKind, UmlAttribute, UmlClass,
        UmlRelation,
    };
    pub use crate::plugins::{FlutterEmitter, Generation, Orchestrator, SpringBootEmitter};
    pub use crate::scaffold::{ExportOutcome, ExportRequest};
}

/// Analyze `diagram` and emit every stack `target` selects, in memory
///
/// # Example
/// ```rust
/// use umlgen::prelude::*;
///
/// let diagram = Diagram::new().with_class(UmlClass::new("c", "Customer"));
/// let settings = ProjectSettings::new("crm", "org.acme", GeneratorConfig::default());
/// let generation = umlgen::generate(&diagram, settings, ExportTarget::Server).unwrap();
/// let controller = generation
///     .artifacts
///     .content("src/main/java/org/acme/crm/controller/CustomerController.java")
///     .unwrap();
/// assert!(controller.contains("@RequestMapping(\"/api/customers\")"));
/// ```
pub fn generate(
    diagram: &Diagram,
    settings: ProjectSettings,
    target: ExportTarget,
) -> ExportResult<plugins::Generation> {
    plugins::Orchestrator::with_all_plugins().generate(diagram, settings, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        let diagram = Diagram::new()
            .with_class(UmlClass::new("t", "Team"))
            .with_class(UmlClass::new("p", "Person"))
            .with_relation(UmlRelation::new("r1", "t", "p", RelationKind::Association))
            .with_relation(UmlRelation::new("r2", "t", "p", RelationKind::Association).with_multiplicity("1", "*"));
        let settings = ProjectSettings::new("league", "com.example", GeneratorConfig::default());
        let first = generate(&diagram, settings.clone(), ExportTarget::Fullstack).unwrap();
        let second = generate(&diagram, settings, ExportTarget::Fullstack).unwrap();
        assert_eq!(first.artifacts, second.artifacts);
        assert_eq!(first.metadata, second.metadata);
    }
}
