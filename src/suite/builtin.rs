//! Suites compiled into the binary.
//!
//! This table is the default registry when no manifest is configured. Order
//! here is the order the index page lists suites in.

use crate::suite::identity::{SuiteName, TemplateId};
use crate::suite::model::SuiteDescriptor;

/// Compile-time form of a `SuiteDescriptor`.
pub struct StaticSuite {
    pub name: &'static str,
    pub template: Option<&'static str>,
    pub sources: &'static [&'static str],
    pub specs: &'static [&'static str],
}

pub const BUILTIN_SUITES: &[StaticSuite] = &[StaticSuite {
    name: "ServicesTests",
    template: None,
    sources: &[
        "horizon/js/angular/horizon.conf.js",
        "horizon/js/angular/services/horizon.utils.js",
    ],
    specs: &["horizon/tests/jasmine/utilsSpec.js"],
}];

impl StaticSuite {
    pub fn to_descriptor(&self) -> SuiteDescriptor {
        SuiteDescriptor {
            name: SuiteName(self.name.to_string()),
            template: self.template.map(|t| TemplateId(t.to_string())),
            sources: self.sources.iter().map(|s| s.to_string()).collect(),
            specs: self.specs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn builtin_descriptors() -> Vec<SuiteDescriptor> {
    BUILTIN_SUITES.iter().map(StaticSuite::to_descriptor).collect()
}
