//! Core abstractions for diagram compilation
//!
//! The data model accepted on input, the naming and type tables both target
//! stacks agree on, and the ambient pieces (errors, diagnostics, logging,
//! configuration) shared by the analyzer, the emitters and the scaffolder.

mod artifact;
mod config;
mod diagnostics;
mod emitter;
mod error;
mod index;
pub mod logging;
mod model;
pub mod naming;
mod settings;
mod types;
mod writer;

pub use artifact::*;
pub use config::*;
pub use diagnostics::*;
pub use emitter::*;
pub use error::*;
pub use index::*;
pub use logging::*;
pub use model::*;
pub use settings::*;
pub use types::*;
pub use writer::*;
