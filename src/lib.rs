//! Code generator producing CPython marshalling glue for GObject-based
//! native libraries.
//!
//! A bindings driver parses interface descriptions and, for each exposed
//! function, asks this crate to emit the C fragments its wrapper needs:
//! parameter unpacking, local variable declarations, pre-call validation and
//! conversion, the native call's argument list, and return-value conversion.
//! The [`registry::TypeRegistry`] maps declared type names to per-category
//! handlers; each handler writes its fragments into a per-wrapper
//! [`accumulator::CodeAccumulator`].
//!
//! The output is text. Nothing here validates that the referenced native
//! types exist; the emitted code is only checked when it is later compiled
//! against the real headers.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod registry;

pub mod prelude {
    pub use crate::accumulator::CodeAccumulator;
    pub use crate::config::{GeneratorConfig, NativeIntWidth};
    pub use crate::error::CodegenError;
    pub use crate::generator::{ParamSpec, ReturnSpec, WrapperFragments};
    pub use crate::handlers::ArgHandler;
    pub use crate::registry::TypeRegistry;
}
