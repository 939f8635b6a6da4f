//! Test suite registry.
//!
//! Suites are declared statically (the compiled-in `BUILTIN_SUITES` table) or
//! in a JSON manifest validated against `schema/suite_manifest.schema.json`.
//! Either way the result is a `SuiteRegistry` that is fixed for the life of
//! the process.

pub mod builtin;
pub mod identity;
pub mod model;
pub mod registry;

pub use builtin::{BUILTIN_SUITES, StaticSuite};
pub use identity::{
    DEFAULT_DETAIL_TEMPLATE, INDEX_TEMPLATE, SuiteName, TemplateId, is_valid_suite_name,
};
pub use model::{SuiteDescriptor, SuiteManifest};
pub use registry::SuiteRegistry;
