//! Core traits, settings, module registry, and the RFC 3339 timestamp codec.

pub mod module;
pub mod registry;
pub mod settings;
pub mod timestamp;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use timestamp::{ParseError, Rfc3339Time};
