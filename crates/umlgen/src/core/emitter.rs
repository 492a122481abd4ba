//! Core emitter trait for target stacks
//!
//! An emitter turns a resolved [`ProjectModel`] into text artifacts for one
//! target stack. Emitters are pure: they never touch the filesystem and they
//! read the shared model only, so every emitter sees the same field names
//! and foreign-key contracts.

use crate::analysis::ProjectModel;

use super::artifact::ArtifactSet;
use super::config::ExportTarget;

/// Code generator for one target stack
pub trait Emitter: Send + Sync {
    /// Short identifier, e.g. `"springboot"`
    fn name(&self) -> &'static str;

    /// The single-stack target this emitter serves
    fn target(&self) -> ExportTarget;

    /// Subdirectory used when several stacks share one archive
    fn combined_root(&self) -> &'static str;

    /// Emitter version, recorded in generated READMEs
    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Produce every artifact for the project, paths relative to the stack root
    fn emit(&self, model: &ProjectModel<'_>) -> ArtifactSet;
}
