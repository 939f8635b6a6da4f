//! Suite descriptors and the on-disk manifest they can be loaded from.
//!
//! Descriptors are plain data: a name, an optional layout, and the ordered
//! source/spec paths the layout should load. Nothing here validates; use
//! `SuiteRegistry` to enforce uniqueness and name syntax.

use crate::suite::identity::{SuiteName, TemplateId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// One registered test suite.
pub struct SuiteDescriptor {
    pub name: SuiteName,
    #[serde(default)]
    pub template: Option<TemplateId>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub specs: Vec<String>,
}

impl SuiteDescriptor {
    /// Layout for the detail page, falling back to the jasmine runner.
    pub fn template(&self) -> TemplateId {
        self.template.clone().unwrap_or_else(TemplateId::default_detail)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
/// Suite manifest as stored on disk (`suites/suites.json`).
pub struct SuiteManifest {
    pub schema_version: String,
    pub suites: Vec<SuiteDescriptor>,
}
