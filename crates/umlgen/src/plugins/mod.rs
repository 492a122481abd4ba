//! Plugin implementations for the target stacks
//!
//! Each plugin implements [`Emitter`](crate::core::Emitter) for one stack;
//! the orchestrator runs the selected ones over a shared project model.

pub mod flutter;
pub mod orchestrator;
pub mod springboot;

pub use flutter::FlutterEmitter;
pub use orchestrator::*;
pub use springboot::SpringBootEmitter;
