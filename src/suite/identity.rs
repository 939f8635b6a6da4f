use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout used for detail pages when a suite does not name its own template.
pub const DEFAULT_DETAIL_TEMPLATE: &str = "specrunner/jasmine.html";

/// Layout used for the suite index.
pub const INDEX_TEMPLATE: &str = "specrunner/index.html";

/// Registry key for a test suite (e.g., `ServicesTests`).
///
/// Names double as URL path segments, so the registry restricts them to
/// `^[A-Za-z0-9_.-]+$` at build time.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteName(pub String);

/// Identifier of a renderable page layout.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl SuiteName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TemplateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The jasmine runner layout.
    pub fn default_detail() -> Self {
        TemplateId(DEFAULT_DETAIL_TEMPLATE.to_string())
    }

    pub fn index() -> Self {
        TemplateId(INDEX_TEMPLATE.to_string())
    }
}

impl fmt::Display for SuiteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true when `raw` can be used as a suite name.
///
/// `.` and `..` are rejected even though they match the character class;
/// routers normalize them away before dispatch.
pub fn is_valid_suite_name(raw: &str) -> bool {
    !raw.is_empty()
        && raw != "."
        && raw != ".."
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
